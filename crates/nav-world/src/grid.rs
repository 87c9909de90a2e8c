//! Grid bounds.
//!
//! The grid is `width × height` unit cells; the valid coordinate range is
//! `[0, width) × [0, height)` evaluated on the *rounded* cell of a continuous
//! position.  A position at `(width - 0.4, y)` rounds to column `width` and
//! is therefore out of bounds, which keeps the planner and the kinematics
//! agreeing about where the world ends.

use nav_core::{Cell, Point};

/// Rectangular world bounds.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    width: u32,
    height: u32,
}

impl Grid {
    /// Create a grid.
    ///
    /// # Panics
    /// Panics if either dimension is zero.  Grids are built once at the
    /// configuration boundary; a zero dimension there is a caller bug.
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be non-zero");
        Self { width, height }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells — the size of per-cell search arrays.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// `true` iff the rounded cell of `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.contains_cell(p.to_cell())
    }

    #[inline]
    pub fn contains_cell(&self, c: Cell) -> bool {
        self.contains_x(c.x) && self.contains_y(c.y)
    }

    /// Column bounds check — kinematics reflect each axis independently.
    #[inline]
    pub fn contains_x(&self, x: i32) -> bool {
        x >= 0 && (x as u32) < self.width
    }

    #[inline]
    pub fn contains_y(&self, y: i32) -> bool {
        y >= 0 && (y as u32) < self.height
    }

    /// Row-major index of `c` into a dense per-cell array.
    ///
    /// Only meaningful for cells this grid contains.
    #[inline]
    pub fn cell_index(&self, c: Cell) -> usize {
        debug_assert!(self.contains_cell(c));
        c.y as usize * self.width as usize + c.x as usize
    }
}
