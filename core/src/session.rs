use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Session lifecycle. Mines are placed on the first successful reveal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Immutable observation of a session, safe to hand to a presentation layer.
///
/// While the game is live this never discloses the hidden mine layout; a lost
/// board shows the triggered mine, the remaining mines and misplaced flags.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    cells: Array2<CellView>,
    state: GameState,
    mines_left: isize,
    triggered_mine: Option<Coord2>,
}

impl SessionView {
    pub fn cell(&self, coords: Coord2) -> CellView {
        self.cells[coords.to_nd_index()]
    }

    /// Bounds as `(rows, cols)`.
    pub fn bounds(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Mine count minus placed flags. Negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        self.mines_left
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }
}

/// One game from configuration to terminal outcome.
///
/// The session is the sole owner and mutator of its board. Every public
/// operation runs to completion and returns a fresh [`SessionView`];
/// precondition violations, out-of-bounds coordinates and calls on a finished
/// game are no-ops returning the unchanged view.
#[derive(Clone, Debug)]
pub struct GameSession<P: MinePlacer = RandomPlacer> {
    config: GameConfig,
    board: Board,
    placer: Option<P>,
    placed: bool,
    state: GameState,
    flag_count: CellCount,
    correct_flags: CellCount,
    triggered_mine: Option<Coord2>,
}

impl GameSession<RandomPlacer> {
    /// Session with entropy-seeded placement.
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_placer(config, RandomPlacer::from_entropy())
    }
}

impl<P: MinePlacer> GameSession<P> {
    /// Session with an explicit placement strategy; a seeded placer makes the
    /// board reproducible.
    pub fn with_placer(config: GameConfig, placer: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            board: Board::new(config),
            config,
            placer: Some(placer),
            placed: false,
            state: GameState::NotStarted,
            flag_count: 0,
            correct_flags: 0,
            triggered_mine: None,
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Engine-side board access, not part of the player surface.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// How many mines have not been flagged yet.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flag_count as isize)
    }

    /// Reveals a cell. The first successful reveal places the mines with this
    /// coordinate as the safe cell and starts the game.
    ///
    /// The only error is [`GameError::InvalidConfiguration`], escalated from
    /// an exhausted placement sampling budget.
    pub fn reveal(&mut self, coords: Coord2) -> Result<SessionView> {
        if self.state.is_terminal() {
            return Ok(self.view());
        }
        let Ok(coords) = self.board.validate_coords(coords) else {
            return Ok(self.view());
        };

        let first = !self.placed;
        if first {
            // flagged cells do not trigger placement either
            if !self.board.cell(coords).is_openable() {
                return Ok(self.view());
            }
            self.place_mines(coords)?;
        }

        let outcome = self.board.reveal_cell(coords);
        self.absorb(outcome);
        if first {
            // flags may legally predate placement and reconcile into a win
            self.try_win();
        }
        Ok(self.view())
    }

    /// Reveals the whole unflagged neighborhood of a satisfied hint.
    pub fn chord(&mut self, coords: Coord2) -> Result<SessionView> {
        if self.state.is_terminal() || !self.placed {
            return Ok(self.view());
        }
        let Ok(coords) = self.board.validate_coords(coords) else {
            return Ok(self.view());
        };

        let outcome = self.board.chord_cell(coords);
        self.absorb(outcome);
        Ok(self.view())
    }

    /// Toggles the flag of a hidden cell and re-evaluates the win condition.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<SessionView> {
        if self.state.is_terminal() {
            return Ok(self.view());
        }
        let Ok(coords) = self.board.validate_coords(coords) else {
            return Ok(self.view());
        };

        if let FlagOutcome::Toggled(flagged) = self.board.toggle_flag_cell(coords) {
            if flagged {
                self.flag_count += 1;
            } else {
                self.flag_count -= 1;
            }
            if self.placed && self.board.cell(coords).kind().is_mine() {
                if flagged {
                    self.correct_flags += 1;
                } else {
                    self.correct_flags -= 1;
                }
            }
            self.try_win();
        }
        Ok(self.view())
    }

    /// Current observation snapshot.
    pub fn view(&self) -> SessionView {
        let (rows, cols) = self.board.bounds();
        let lost = matches!(self.state, GameState::Lost);
        let cells = Array2::from_shape_fn((rows as usize, cols as usize), |(row, col)| {
            let cell = self.board.cell((row as Coord, col as Coord));
            if lost {
                lost_cell_view(cell)
            } else {
                live_cell_view(cell)
            }
        });

        SessionView {
            cells,
            state: self.state,
            mines_left: self.mines_left(),
            triggered_mine: self.triggered_mine,
        }
    }

    fn place_mines(&mut self, safe: Coord2) -> Result<()> {
        let Some(mut placer) = self.placer.take() else {
            // a previous placement failed, the session stays inert
            return Err(GameError::InvalidConfiguration);
        };
        placer.place(&mut self.board, self.config.mines, safe)?;
        self.placed = true;
        self.state = GameState::InProgress;
        log::debug!("mines placed, safe cell {:?}", safe);

        // flags placed before the first reveal count against the fresh layout
        self.correct_flags = self
            .board
            .indexed_cells()
            .filter(|(_, cell)| cell.is_flagged() && cell.kind().is_mine())
            .count()
            .try_into()
            .unwrap();
        Ok(())
    }

    fn absorb(&mut self, outcome: RevealOutcome) {
        match outcome {
            RevealOutcome::HitMine(at) => {
                self.triggered_mine = Some(at);
                self.state = GameState::Lost;
                log::debug!("mine hit at {:?}", at);
            }
            RevealOutcome::Opened(cells) => {
                log::trace!("opened {} cells", cells.len());
            }
            RevealOutcome::NoChange => {}
        }
    }

    /// Strict rule: the flagged set must equal the mine set exactly.
    fn try_win(&mut self) {
        if self.state != GameState::InProgress {
            return;
        }
        if self.flag_count == self.config.mines && self.correct_flags == self.config.mines {
            self.state = GameState::Won;
            log::debug!("all mines flagged, game won");
        }
    }
}

fn lost_cell_view(cell: Cell) -> CellView {
    match (cell.kind().is_mine(), cell.is_flagged(), cell.is_revealed()) {
        (true, true, _) => CellView::Flagged,
        (true, false, true) => CellView::Exploded,
        (true, false, false) => CellView::Mine,
        (false, true, _) => CellView::Misflagged,
        (false, false, true) => CellView::Revealed(cell.kind().hint()),
        (false, false, false) => CellView::Hidden,
    }
}

fn live_cell_view(cell: Cell) -> CellView {
    if cell.is_revealed() {
        CellView::Revealed(cell.kind().hint())
    } else if cell.is_flagged() {
        CellView::Flagged
    } else {
        CellView::Hidden
    }
}
