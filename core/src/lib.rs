use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod session;
mod types;

/// Board dimensions and mine count for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: CellCount) -> Result<Self> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    /// Placement must be able to terminate: `0 < mines < width * height`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        if self.mines == 0 || self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfiguration);
        }
        Ok(())
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    pub const fn total_cells(&self) -> CellCount {
        area(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_configurations_pass() {
        assert!(GameConfig::new(9, 9, 10).is_ok());
        // smallest viable board
        assert!(GameConfig::new(2, 1, 1).is_ok());
    }

    #[test]
    fn presets_are_valid() {
        for preset in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert!(preset.validate().is_ok());
        }
    }

    #[test]
    fn degenerate_boards_are_rejected() {
        // a 1x1 board cannot hold both a mine and a safe first click
        assert_eq!(
            GameConfig::new(1, 1, 1).unwrap_err(),
            GameError::InvalidConfiguration
        );
        assert_eq!(
            GameConfig::new(0, 9, 1).unwrap_err(),
            GameError::InvalidConfiguration
        );
        assert_eq!(
            GameConfig::new(9, 0, 1).unwrap_err(),
            GameError::InvalidConfiguration
        );
    }

    #[test]
    fn mine_count_must_leave_a_safe_cell() {
        assert_eq!(
            GameConfig::new(3, 3, 0).unwrap_err(),
            GameError::InvalidConfiguration
        );
        assert_eq!(
            GameConfig::new(3, 3, 9).unwrap_err(),
            GameError::InvalidConfiguration
        );
        assert!(GameConfig::new(3, 3, 8).is_ok());
    }
}
