use rand::prelude::*;

use super::*;

/// Sampling budget per cell of board area. Rejections are expected near full
/// boards; an exhausted budget means the configuration cannot be satisfied.
const SAMPLES_PER_CELL: u32 = 64;

/// Uniform rejection-sampling placement, seeded for reproducibility.
///
/// Samples random coordinates and rejects any that already hold a mine or
/// match the safe cell, so the first click can never be an instant loss. The
/// safe cell's own hint count is not constrained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomPlacer {
    seed: u64,
}

impl RandomPlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinePlacer for RandomPlacer {
    fn place(&mut self, board: &mut Board, mines: CellCount, safe: Coord2) -> Result<()> {
        let (rows, cols) = board.bounds();
        let budget = u32::from(area(cols, rows)) * SAMPLES_PER_CELL;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;
        let mut samples: u32 = 0;

        while placed < mines {
            if samples >= budget {
                log::warn!(
                    "placement gave up after {} samples, {} of {} mines placed",
                    samples,
                    placed,
                    mines
                );
                return Err(GameError::InvalidConfiguration);
            }
            samples += 1;

            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            if coords == safe {
                continue;
            }
            if board.add_mine(coords) {
                placed += 1;
            }
        }

        log::debug!("placed {} mines in {} samples", placed, samples);
        Ok(())
    }
}
