use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cells. Pure container plus adjacency, no game rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// Fresh all-empty, all-hidden board for the given configuration.
    pub fn new(config: GameConfig) -> Self {
        Self {
            cells: Array2::default((config.height as usize, config.width as usize)),
        }
    }

    /// Board with mines at explicit coordinates, hint counts included.
    pub fn with_mines(size: Coord2, mines: &[Coord2]) -> Result<Self> {
        let mut board = Self {
            cells: Array2::default(size.to_nd_index()),
        };

        for &coords in mines {
            board.validate_coords(coords)?;
            board.add_mine(coords);
        }

        Ok(board)
    }

    /// Bounds as `(rows, cols)`.
    pub fn bounds(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn height(&self) -> Coord {
        self.bounds().0
    }

    pub fn width(&self) -> Coord {
        self.bounds().1
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.bounds();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        self.cells.iter_neighbors(coords)
    }

    /// Places a mine and bumps the hint of every non-mine neighbor.
    /// Returns false when the cell already holds one.
    pub fn add_mine(&mut self, coords: Coord2) -> bool {
        if self.cells[coords.to_nd_index()].kind.is_mine() {
            return false;
        }

        self.cells[coords.to_nd_index()].kind = CellKind::Mine;
        for pos in self.neighbors(coords) {
            self.cells[pos.to_nd_index()].kind.bump_hint();
        }
        true
    }

    pub fn mine_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.kind.is_mine())
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.neighbors(coords)
            .filter(|&pos| self.cell(pos).flagged)
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub(crate) fn indexed_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), cell)| ((row as Coord, col as Coord), *cell))
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
