#![no_std]

extern crate alloc;

use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use equation::*;
pub use error::*;
pub use prefs::*;
pub use types::*;

mod cell;
mod engine;
mod equation;
mod error;
mod prefs;
mod types;

/// Number of rows and columns of the lesson grid.
pub const GRID_SIZE: Coord = 10;

/// Fixed-size, row-major matrix of cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub fn new() -> Self {
        Self {
            cells: Array2::default((GRID_SIZE, GRID_SIZE).to_nd_index()),
        }
    }

    pub const fn size(&self) -> Coord2 {
        (GRID_SIZE, GRID_SIZE)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GridError::InvalidCoords)
        }
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self[coords]
    }

    pub fn count(&self, cell: Cell) -> CellCount {
        self.cells
            .iter()
            .filter(|&&c| c == cell)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn selected_count(&self) -> CellCount {
        self.count(Cell::Selected)
    }

    /// Iterates over `(coords, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    pub fn iter_rect(&self, rect: Rect) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        rect.iter_coords().map(move |coords| (coords, self[coords]))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::Unselected);
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
