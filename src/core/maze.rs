//! Maze minigame.
//!
//! Mazes are perfect (exactly one path between any two cells), carved with a
//! randomized depth-first search over a `width x height` cell grid. Cells
//! and the walls between them share one `(2w + 1) x (2h + 1)` tile grid: the
//! player walks on odd coordinates and every step moves one tile.

use crate::errors::{Error, Result};
use rand::{Rng, seq::SliceRandom};
use std::ops::RangeInclusive;

/// Accepted width and height, in cells.
pub const SIZE_RANGE: RangeInclusive<usize> = 2..=10;

/// Scrap metal paid per cell of a solved maze.
pub const REWARD_PER_CELL: i64 = 2;

/// A step direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Direction {
    const fn delta(self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// A generated maze and the player's position in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    width: usize,
    height: usize,
    /// Row-major tiles, `true` for wall
    walls: Vec<bool>,
    position: (usize, usize),
    moves: u32,
}

impl Maze {
    /// Carves a new maze of `width x height` cells.
    ///
    /// Sizes outside [`SIZE_RANGE`] fail with `InvalidAmount`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, width: usize, height: usize) -> Result<Self> {
        for size in [width, height] {
            if !SIZE_RANGE.contains(&size) {
                return Err(Error::InvalidAmount {
                    amount: i64::try_from(size)?,
                });
            }
        }

        let columns = width * 2 + 1;
        let rows = height * 2 + 1;
        let mut maze = Self {
            width,
            height,
            walls: vec![true; columns * rows],
            position: (1, 1),
            moves: 0,
        };

        let mut visited = vec![false; width * height];
        let mut stack = vec![(0usize, 0usize)];
        visited[0] = true;
        maze.open(1, 1);

        while let Some(&(cx, cy)) = stack.last() {
            let mut neighbours = Vec::with_capacity(4);
            if cx > 0 && !visited[cy * width + cx - 1] {
                neighbours.push((cx - 1, cy));
            }
            if cx + 1 < width && !visited[cy * width + cx + 1] {
                neighbours.push((cx + 1, cy));
            }
            if cy > 0 && !visited[(cy - 1) * width + cx] {
                neighbours.push((cx, cy - 1));
            }
            if cy + 1 < height && !visited[(cy + 1) * width + cx] {
                neighbours.push((cx, cy + 1));
            }

            match neighbours.choose(rng) {
                Some(&(nx, ny)) => {
                    visited[ny * width + nx] = true;
                    // knock down the wall between the two cells, then the cell itself
                    maze.open(cx + nx + 1, cy + ny + 1);
                    maze.open(nx * 2 + 1, ny * 2 + 1);
                    stack.push((nx, ny));
                }
                None => {
                    stack.pop();
                }
            }
        }

        Ok(maze)
    }

    const fn columns(&self) -> usize {
        self.width * 2 + 1
    }

    const fn rows(&self) -> usize {
        self.height * 2 + 1
    }

    fn open(&mut self, x: usize, y: usize) {
        let index = y * self.columns() + x;
        self.walls[index] = false;
    }

    /// Whether the tile at `(x, y)` is a wall; tiles outside the grid are walls.
    #[must_use]
    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        if x >= self.columns() || y >= self.rows() {
            return true;
        }
        self.walls[y * self.columns() + x]
    }

    /// Tile coordinates of the exit.
    #[must_use]
    pub const fn exit(&self) -> (usize, usize) {
        (self.columns() - 2, self.rows() - 2)
    }

    /// Current tile coordinates of the player.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        self.position
    }

    /// Successful steps taken so far.
    #[must_use]
    pub const fn moves(&self) -> u32 {
        self.moves
    }

    /// Width and height in cells.
    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Steps one tile in `direction`; returns `false` (and stays put) on a wall.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let (x, y) = self.position;
        let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
            return false;
        };
        if self.is_wall(nx, ny) {
            return false;
        }
        self.position = (nx, ny);
        self.moves += 1;
        true
    }

    /// Whether the player stands on the exit.
    #[must_use]
    pub const fn is_solved(&self) -> bool {
        let (ex, ey) = self.exit();
        self.position.0 == ex && self.position.1 == ey
    }

    /// Emoji grid, one line per tile row.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.rows() * (self.columns() * 4 + 1));
        for y in 0..self.rows() {
            for x in 0..self.columns() {
                let tile = if (x, y) == self.position {
                    "🙂"
                } else if (x, y) == self.exit() {
                    "🏁"
                } else if self.is_wall(x, y) {
                    "⬛"
                } else {
                    "⬜"
                };
                out.push_str(tile);
            }
            out.push('\n');
        }
        out
    }
}

/// Scrap metal paid for solving a `width x height` maze.
#[must_use]
pub fn reward(width: usize, height: usize) -> i64 {
    i64::try_from(width * height).map_or(0, |cells| cells * REWARD_PER_CELL)
}
