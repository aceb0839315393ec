pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod grid;
pub mod maze;
pub mod pathfinding;
pub mod rng;
pub mod types;
