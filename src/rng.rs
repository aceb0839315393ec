use crate::types::Coord;

/// Small deterministic generator driving maze carving and power-up placement.
///
/// The whole state is one `u32`, so a run can be captured with [`Rng::state`]
/// and replayed later through [`Rng::from_state`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn from_state(state: u32) -> Self {
        Self { seed: state }
    }

    pub fn state(&self) -> u32 {
        self.seed
    }

    pub fn next_f32(&mut self) -> f32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        let out = t ^ (t >> 14);
        (out as f64 / 4_294_967_296.0) as f32
    }

    pub fn int(&mut self, min: i32, max: i32) -> i32 {
        if max <= min {
            return min;
        }
        let span = (max - min + 1) as f32;
        (min + (self.next_f32() * span).floor() as i32).min(max)
    }

    pub fn pick_index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        (self.next_f32() * len as f32).floor().min((len - 1) as f32) as usize
    }

    /// Uniform cell of a `rows` x `cols` grid.
    pub fn coord(&mut self, rows: i32, cols: i32) -> Coord {
        Coord {
            row: self.int(0, rows - 1),
            col: self.int(0, cols - 1),
        }
    }
}
