use crate::types::{Coord, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    pub const CLOSED: Walls = Walls {
        top: true,
        right: true,
        bottom: true,
        left: true,
    };

    pub fn get(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.top,
            Direction::Right => self.right,
            Direction::Down => self.bottom,
            Direction::Left => self.left,
        }
    }

    fn set(&mut self, dir: Direction, present: bool) {
        match dir {
            Direction::Up => self.top = present,
            Direction::Right => self.right = present,
            Direction::Down => self.bottom = present,
            Direction::Left => self.left = present,
        }
    }

    /// Bits: top = 1, right = 2, bottom = 4, left = 8.
    pub fn mask(&self) -> u8 {
        (self.top as u8)
            | (self.right as u8) << 1
            | (self.bottom as u8) << 2
            | (self.left as u8) << 3
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
    pub walls: Walls,
    pub visited: bool,
}

impl Cell {
    fn new(row: i32, col: i32) -> Self {
        Self {
            row,
            col,
            walls: Walls::CLOSED,
            visited: false,
        }
    }

    pub fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }
}

/// Fixed-size rectangular maze, cells stored row-major.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        let mut cells = Vec::with_capacity((rows as usize) * (cols as usize));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(row, col));
            }
        }
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row >= 0 && coord.col >= 0 && coord.row < self.rows && coord.col < self.cols
    }

    /// `None` stands in for every off-grid coordinate.
    pub fn linear_index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row >= self.rows || col >= self.cols {
            return None;
        }
        Some((row * self.cols + col) as usize)
    }

    pub fn coord_of(&self, index: usize) -> Option<Coord> {
        if index >= self.cells.len() {
            return None;
        }
        let cols = self.cols as usize;
        Some(Coord::new((index / cols) as i32, (index % cols) as i32))
    }

    pub fn cell(&self, coord: Coord) -> Option<&Cell> {
        self.linear_index(coord.row, coord.col)
            .map(|index| &self.cells[index])
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        let index = self.linear_index(coord.row, coord.col)?;
        self.cells.get_mut(index)
    }

    pub fn neighbor_at(&self, coord: Coord, dir: Direction) -> Option<Coord> {
        if !self.contains(coord) {
            return None;
        }
        let next = step(coord, dir);
        self.contains(next).then_some(next)
    }

    /// Off-grid cells count as solid on every side.
    pub fn has_wall(&self, coord: Coord, dir: Direction) -> bool {
        self.cell(coord)
            .map(|cell| cell.walls.get(dir))
            .unwrap_or(true)
    }

    pub fn can_move(&self, coord: Coord, dir: Direction) -> bool {
        !self.has_wall(coord, dir) && self.neighbor_at(coord, dir).is_some()
    }

    /// Neighbours reachable without crossing a wall, in top, right, bottom, left order.
    pub fn open_neighbors(&self, coord: Coord) -> Vec<Coord> {
        Direction::ALL
            .into_iter()
            .filter(|dir| !self.has_wall(coord, *dir))
            .filter_map(|dir| self.neighbor_at(coord, dir))
            .collect()
    }

    pub(crate) fn unvisited_neighbors(&self, coord: Coord) -> Vec<Coord> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.neighbor_at(coord, dir))
            .filter(|next| self.cell(*next).map(|cell| !cell.visited).unwrap_or(false))
            .collect()
    }

    pub(crate) fn mark_visited(&mut self, coord: Coord) {
        if let Some(cell) = self.cell_mut(coord) {
            cell.visited = true;
        }
    }

    /// Opens the shared wall of two 4-adjacent cells on both sides.
    pub fn remove_wall_between(&mut self, a: Coord, b: Coord) -> bool {
        let Some(dir) = direction_between(a, b) else {
            return false;
        };
        if !self.contains(a) || !self.contains(b) {
            return false;
        }
        if let Some(cell) = self.cell_mut(a) {
            cell.walls.set(dir, false);
        }
        if let Some(cell) = self.cell_mut(b) {
            cell.walls.set(dir.opposite(), false);
        }
        true
    }

    pub fn reset_walls(&mut self) {
        for cell in &mut self.cells {
            cell.walls = Walls::CLOSED;
            cell.visited = false;
        }
    }

    /// Removed walls, each adjacent pair counted once.
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                let right = !cell.walls.right && cell.col + 1 < self.cols;
                let down = !cell.walls.bottom && cell.row + 1 < self.rows;
                right as usize + down as usize
            })
            .sum()
    }

    pub fn wall_masks(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.walls.mask()).collect()
    }

    /// Text rendering with an optional marker per cell.
    pub fn render_ascii<F>(&self, marker: F) -> String
    where
        F: Fn(Coord) -> Option<char>,
    {
        let mut out = String::new();
        for row in 0..self.rows {
            out.push('+');
            for col in 0..self.cols {
                let top = self.has_wall(Coord::new(row, col), Direction::Up);
                out.push_str(if top { "--+" } else { "  +" });
            }
            out.push('\n');

            out.push(if self.has_wall(Coord::new(row, 0), Direction::Left) {
                '|'
            } else {
                ' '
            });
            for col in 0..self.cols {
                let coord = Coord::new(row, col);
                let mark = marker(coord).unwrap_or(' ');
                out.push(mark);
                out.push(' ');
                out.push(if self.has_wall(coord, Direction::Right) {
                    '|'
                } else {
                    ' '
                });
            }
            out.push('\n');
        }
        if self.rows > 0 {
            out.push('+');
            for col in 0..self.cols {
                let bottom = self.has_wall(Coord::new(self.rows - 1, col), Direction::Down);
                out.push_str(if bottom { "--+" } else { "  +" });
            }
            out.push('\n');
        }
        out
    }
}

pub fn step(coord: Coord, dir: Direction) -> Coord {
    match dir {
        Direction::Up => Coord::new(coord.row - 1, coord.col),
        Direction::Down => Coord::new(coord.row + 1, coord.col),
        Direction::Left => Coord::new(coord.row, coord.col - 1),
        Direction::Right => Coord::new(coord.row, coord.col + 1),
    }
}

pub fn direction_between(from: Coord, to: Coord) -> Option<Direction> {
    match (to.row - from.row, to.col - from.col) {
        (-1, 0) => Some(Direction::Up),
        (1, 0) => Some(Direction::Down),
        (0, -1) => Some(Direction::Left),
        (0, 1) => Some(Direction::Right),
        _ => None,
    }
}
