//! Deterministic seeding.
//!
//! There is no process-wide RNG to reseed, so [`set_seed`] hands back the
//! generator callers must thread through shuffling and sampling. The CUDA
//! device RNG is seeded as a side effect when a GPU is in use.

use candle_core::Device;
use oorandom::Rand64;
use tracing::{debug, info};

use crate::config::TaskConfig;
use crate::error::{Result, SlotframeError};

/// Seeded pseudo-random generator.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: u64,
    rng: Rand64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Rand64::new(u128::from(seed)),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_u64(&mut self) -> u64 {
        self.rng.rand_u64()
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.rand_float()
    }

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    pub fn index(&mut self, upper: usize) -> usize {
        self.rng.rand_range(0..upper as u64) as usize
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// Seed every RNG the run uses and return the host-side generator.
pub fn set_seed(cfg: &TaskConfig) -> Result<SeededRng> {
    if !cfg.no_cuda && candle_core::utils::cuda_is_available() {
        let device =
            Device::cuda_if_available(0).map_err(|e| SlotframeError::Device(e.to_string()))?;
        if device.is_cuda() {
            device
                .set_seed(cfg.seed)
                .map_err(|e| SlotframeError::Device(e.to_string()))?;
            info!(seed = cfg.seed, "seeded CUDA device RNG");
        }
    }

    debug!(seed = cfg.seed, "seeded host RNG");
    Ok(SeededRng::new(cfg.seed))
}
