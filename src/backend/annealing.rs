//! Simulated annealing exposed as a [`SolverBackend`].

use super::SolverBackend;
use crate::anneal::{AnnealConfig, AnnealRunner, MetropolisKernel};
use crate::ising::IsingModel;

/// Runs [`AnnealRunner`] with the Metropolis kernel and returns the best
/// spin state, or an empty vector if annealing failed.
#[derive(Debug, Clone, Default)]
pub struct AnnealingBackend {
    pub config: AnnealConfig,
}

impl AnnealingBackend {
    pub fn new(config: AnnealConfig) -> Self {
        Self { config }
    }
}

impl SolverBackend for AnnealingBackend {
    fn name(&self) -> &str {
        "simulated-annealing"
    }

    fn solve(&self, ising: &IsingModel) -> Vec<i8> {
        let kernel = MetropolisKernel::new().with_parallel(self.config.parallel);
        // block layout is irrelevant here: only the spin vector is returned
        let n = ising.num_variables();
        match AnnealRunner::anneal_ising(ising, 1, n, &self.config, &kernel, None) {
            Ok(result) => result.best_spins,
            Err(_) => Vec::new(),
        }
    }
}
