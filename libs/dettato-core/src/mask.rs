//! Random draws deciding which answer characters start masked.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform draws in `[0, 1)`.
pub trait MaskSource: Send {
    fn next_draw(&mut self) -> f64;
}

/// Draws from a seedable RNG.
#[derive(Debug, Clone)]
pub struct RngMask {
    rng: StdRng,
}

impl RngMask {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible masking for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl MaskSource for RngMask {
    fn next_draw(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed list of draws, starting over when it runs out.
#[derive(Debug, Clone)]
pub struct SequenceMask {
    draws: Vec<f64>,
    next: usize,
}

impl SequenceMask {
    pub fn new(draws: Vec<f64>) -> Self {
        Self { draws, next: 0 }
    }

    /// A source whose draws never exceed any threshold, so nothing is masked.
    pub fn never() -> Self {
        Self::new(vec![0.0])
    }
}

impl MaskSource for SequenceMask {
    fn next_draw(&mut self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let draw = self.draws[self.next % self.draws.len()];
        self.next += 1;
        draw
    }
}
