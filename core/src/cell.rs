use serde::{Deserialize, Serialize};

/// What a cell permanently is. Assigned once during mine placement.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Empty,
    Hint(u8),
    Mine,
}

impl CellKind {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    /// Adjacent-mine count shown when the cell is revealed, 0 for empties.
    pub const fn hint(self) -> u8 {
        match self {
            Self::Hint(count) => count,
            Self::Empty | Self::Mine => 0,
        }
    }

    /// Records one more adjacent mine. Mines never carry a hint number.
    pub(crate) fn bump_hint(&mut self) {
        *self = match *self {
            Self::Empty => Self::Hint(1),
            Self::Hint(count) => Self::Hint(count + 1),
            Self::Mine => Self::Mine,
        };
    }
}

impl Default for CellKind {
    fn default() -> Self {
        Self::Empty
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) kind: CellKind,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
}

impl Cell {
    pub const fn kind(self) -> CellKind {
        self.kind
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// A cell a reveal may open: neither revealed yet nor flag-protected.
    pub(crate) const fn is_openable(self) -> bool {
        !self.revealed && !self.flagged
    }
}

/// What the player is allowed to see for one cell.
///
/// `Exploded`, `Mine` and `Misflagged` only appear on lost boards, where the
/// layout is disclosed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    /// Revealed safe cell with its adjacent-mine count, 0 for empties.
    Revealed(u8),
    /// A mine the player revealed.
    Exploded,
    /// An untouched mine, disclosed after a loss.
    Mine,
    /// A flag that sat on a safe cell, disclosed after a loss.
    Misflagged,
}
