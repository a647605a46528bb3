//! Annealing configuration.

use crate::error::{QuboError, Result};

/// Number of sweeps per beta value and number of beta values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPlan {
    pub sweeps_per_beta: usize,
    pub num_betas: usize,
}

/// Configuration for a multi-sample annealing run.
///
/// # Examples
///
/// ```
/// use snp_qubo::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_num_samples(20)
///     .with_num_sweeps(5000)
///     .with_seed(42);
/// let plan = config.sweep_plan();
/// assert_eq!(plan.sweeps_per_beta, 5);
/// assert_eq!(plan.num_betas, 1001);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Independent annealing runs, each from its own initial state.
    pub num_samples: usize,

    /// Total Monte Carlo sweep budget per sample.
    pub num_sweeps: usize,

    /// Seed for reproducibility.
    pub seed: u64,

    /// Initial spin states, one per sample, values in `{-1, +1}`.
    ///
    /// `None` draws random initial states from the seed.
    pub initial_states: Option<Vec<Vec<i8>>>,

    /// Whether to anneal samples in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature. Results do not depend
    /// on this flag.
    pub parallel: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            num_samples: 10,
            num_sweeps: 1000,
            seed: 1234,
            initial_states: None,
            parallel: false,
        }
    }
}

impl AnnealConfig {
    /// Sets the number of independent samples.
    pub fn with_num_samples(mut self, n: usize) -> Self {
        self.num_samples = n;
        self
    }

    /// Sets the number of sweeps per sample.
    pub fn with_num_sweeps(mut self, n: usize) -> Self {
        self.num_sweeps = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets one starting spin state per sample.
    pub fn with_initial_states(mut self, states: Vec<Vec<i8>>) -> Self {
        self.initial_states = Some(states);
        self
    }

    /// Runs samples on the rayon pool when the `parallel` feature is on.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Splits the sweep budget into a beta ladder.
    ///
    /// `sweeps_per_beta = max(1, num_sweeps / 1000) | 1` and
    /// `num_betas = num_sweeps / sweeps_per_beta + 1`.
    // NOTE: the odd sweeps-per-beta rule is kept for result compatibility;
    // its origin is undocumented.
    pub fn sweep_plan(&self) -> SweepPlan {
        let sweeps_per_beta = (self.num_sweeps / 1000).max(1) | 1;
        SweepPlan {
            sweeps_per_beta,
            num_betas: self.num_sweeps / sweeps_per_beta + 1,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_samples == 0 {
            return Err(QuboError::invalid_parameter("num_samples must be positive"));
        }
        if self.num_sweeps == 0 {
            return Err(QuboError::invalid_parameter("num_sweeps must be positive"));
        }
        if let Some(states) = &self.initial_states {
            if states.len() != self.num_samples {
                return Err(QuboError::invalid_parameter(format!(
                    "expected {} initial states, got {}",
                    self.num_samples,
                    states.len()
                )));
            }
            if states.iter().flatten().any(|&s| s != 1 && s != -1) {
                return Err(QuboError::invalid_parameter(
                    "initial states must contain only -1 and +1",
                ));
            }
        }
        Ok(())
    }
}
