use hashbrown::HashSet;
use smallvec::SmallVec;
use std::collections::VecDeque;

use crate::*;

/// Outcome of a reveal or chord.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    /// Every cell whose revealed flag flipped during this call.
    Opened(Vec<Coord2>),
    /// A mine was revealed at the coordinate. Cells opened earlier in the
    /// same call stay open.
    HitMine(Coord2),
}

impl RevealOutcome {
    pub const fn has_update(&self) -> bool {
        !matches!(self, Self::NoChange)
    }

    /// Merges chord sub-results. A mine hit dominates and the first one wins.
    fn merge(self, rhs: Self) -> Self {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine(at), _) => HitMine(at),
            (_, HitMine(at)) => HitMine(at),
            (Opened(mut cells), Opened(more)) => {
                cells.extend(more);
                Opened(cells)
            }
            (Opened(cells), NoChange) | (NoChange, Opened(cells)) => Opened(cells),
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    /// The flag flipped, carrying the new flagged state.
    Toggled(bool),
    /// Revealed cells cannot be flagged.
    Rejected,
}

impl FlagOutcome {
    pub const fn changed(self) -> bool {
        matches!(self, Self::Toggled(_))
    }
}

impl Board {
    /// Reveals a cell. Revealed and flagged cells are left untouched.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.reveal_cell(coords))
    }

    /// Reveals every openable neighbor of a revealed hint whose
    /// flagged-neighbor count equals the hint exactly. Anything else is a
    /// no-op.
    pub fn chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.chord_cell(coords))
    }

    /// Flips the flag of a hidden cell.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        Ok(self.toggle_flag_cell(coords))
    }

    pub(crate) fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cell(coords);
        if !cell.is_openable() {
            return RevealOutcome::NoChange;
        }

        self.cell_mut(coords).revealed = true;
        match cell.kind() {
            CellKind::Mine => RevealOutcome::HitMine(coords),
            CellKind::Hint(_) => RevealOutcome::Opened(vec![coords]),
            CellKind::Empty => RevealOutcome::Opened(self.flood_fill(coords)),
        }
    }

    pub(crate) fn chord_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.cell(coords);
        let CellKind::Hint(hint) = cell.kind() else {
            return RevealOutcome::NoChange;
        };
        if !cell.is_revealed() || self.count_flagged_neighbors(coords) != hint {
            return RevealOutcome::NoChange;
        }

        let targets: SmallVec<[Coord2; 8]> = self
            .neighbors(coords)
            .filter(|&pos| self.cell(pos).is_openable())
            .collect();

        // every target is opened even when one of them explodes, the loss is
        // reported only after the whole neighborhood has been processed
        let mut outcome = RevealOutcome::NoChange;
        for pos in targets {
            let sub = self.reveal_cell(pos);
            outcome = outcome.merge(sub);
        }
        outcome
    }

    pub(crate) fn toggle_flag_cell(&mut self, coords: Coord2) -> FlagOutcome {
        let cell = self.cell_mut(coords);
        if cell.revealed {
            return FlagOutcome::Rejected;
        }

        cell.flagged = !cell.flagged;
        FlagOutcome::Toggled(cell.flagged)
    }

    /// Opens the connected empty region around `start`, bounded by the first
    /// ring of hints. Worklist traversal, each cell processed at most once.
    fn flood_fill(&mut self, start: Coord2) -> Vec<Coord2> {
        let mut opened = vec![start];
        let mut visited: HashSet<Coord2> = HashSet::new();
        visited.insert(start);
        let mut frontier: VecDeque<Coord2> = self
            .neighbors(start)
            .filter(|&pos| self.cell(pos).is_openable())
            .collect();

        while let Some(coords) = frontier.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // flagged cells wall the fill off, revealed cells are done
            let cell = self.cell(coords);
            if !cell.is_openable() {
                continue;
            }

            self.cell_mut(coords).revealed = true;
            opened.push(coords);
            log::trace!("flood fill opened {:?}", coords);

            if matches!(cell.kind(), CellKind::Empty) {
                frontier.extend(
                    self.neighbors(coords)
                        .filter(|&pos| self.cell(pos).is_openable())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[Coord2]) -> Board {
        Board::with_mines(size, mines).unwrap()
    }

    #[test]
    fn revealing_a_mine_reports_the_hit() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(
            board.reveal((0, 0)).unwrap(),
            RevealOutcome::HitMine((0, 0))
        );
        assert!(board.cell((0, 0)).is_revealed());
    }

    #[test]
    fn revealing_a_hint_opens_only_itself() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert_eq!(
            board.reveal((1, 1)).unwrap(),
            RevealOutcome::Opened(vec![(1, 1)])
        );
        assert!(!board.cell((1, 0)).is_revealed());
    }

    #[test]
    fn flood_fill_stops_at_the_hint_ring() {
        let mut board = board((5, 5), &[(4, 4)]);

        let RevealOutcome::Opened(opened) = board.reveal((0, 0)).unwrap() else {
            panic!("expected an opened region");
        };

        // everything but the mine itself is connected through empties
        assert_eq!(opened.len(), 24);
        assert!(!board.cell((4, 4)).is_revealed());
        assert_eq!(board.cell((3, 3)).kind(), CellKind::Hint(1));
        assert!(board.cell((3, 3)).is_revealed());
    }

    #[test]
    fn flood_fill_never_opens_flagged_cells() {
        let mut board = board((5, 5), &[(4, 4)]);
        board.toggle_flag((2, 2)).unwrap();

        let RevealOutcome::Opened(opened) = board.reveal((0, 0)).unwrap() else {
            panic!("expected an opened region");
        };

        assert!(!board.cell((2, 2)).is_revealed());
        assert!(board.cell((3, 3)).is_revealed());
        assert_eq!(opened.len(), 23);
    }

    #[test]
    fn reveal_is_idempotent() {
        let mut board = board((3, 3), &[(0, 0)]);

        assert!(board.reveal((2, 2)).unwrap().has_update());
        assert_eq!(board.reveal((2, 2)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn flagged_cells_are_protected_from_reveal() {
        let mut board = board((2, 2), &[(0, 0)]);
        board.toggle_flag((0, 0)).unwrap();

        assert_eq!(board.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert!(!board.cell((0, 0)).is_revealed());
    }

    #[test]
    fn out_of_bounds_reveal_is_an_error() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(board.reveal((5, 5)).unwrap_err(), GameError::OutOfBounds);
    }

    #[test]
    fn chord_opens_the_unflagged_neighborhood() {
        let mut board = board((3, 3), &[(0, 0), (0, 2)]);
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 0)).unwrap();
        board.toggle_flag((0, 2)).unwrap();

        let outcome = board.chord((1, 1)).unwrap();

        assert!(matches!(outcome, RevealOutcome::Opened(_)));
        for coords in [(0, 1), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(board.cell(coords).is_revealed(), "at {coords:?}");
        }
        assert!(!board.cell((0, 0)).is_revealed());
        assert!(!board.cell((0, 2)).is_revealed());
    }

    #[test]
    fn chord_with_wrong_flag_count_is_a_no_op() {
        let mut board = board((3, 3), &[(0, 0), (0, 2)]);
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 0)).unwrap();

        assert_eq!(board.chord((1, 1)).unwrap(), RevealOutcome::NoChange);

        board.toggle_flag((0, 2)).unwrap();
        board.toggle_flag((2, 2)).unwrap();

        assert_eq!(board.chord((1, 1)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn chord_trusting_wrong_flags_hits_the_mine() {
        let mut board = board((3, 3), &[(0, 0), (0, 2)]);
        board.reveal((1, 1)).unwrap();
        board.toggle_flag((0, 1)).unwrap();
        board.toggle_flag((0, 2)).unwrap();

        let outcome = board.chord((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine((0, 0)));
        // the loss is reported after the rest of the neighborhood opened
        for coords in [(1, 0), (1, 2), (2, 0), (2, 1), (2, 2)] {
            assert!(board.cell(coords).is_revealed(), "at {coords:?}");
        }
    }

    #[test]
    fn chord_needs_a_revealed_hint() {
        let mut board = board((3, 3), &[(0, 0)]);

        // hidden hint
        assert_eq!(board.chord((1, 1)).unwrap(), RevealOutcome::NoChange);

        // revealed empty
        board.reveal((2, 2)).unwrap();
        assert_eq!(board.chord((2, 2)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn toggle_flag_flips_and_rejects_revealed() {
        let mut board = board((2, 2), &[(0, 0)]);

        assert_eq!(
            board.toggle_flag((0, 0)).unwrap(),
            FlagOutcome::Toggled(true)
        );
        assert_eq!(
            board.toggle_flag((0, 0)).unwrap(),
            FlagOutcome::Toggled(false)
        );

        board.reveal((1, 1)).unwrap();
        assert_eq!(board.toggle_flag((1, 1)).unwrap(), FlagOutcome::Rejected);
    }
}
