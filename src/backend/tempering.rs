//! Parallel tempering (replica exchange) over single-spin flips.
//!
//! One replica per inverse temperature, with betas taken from the model's
//! geometric schedule. Each step sweeps every replica with Metropolis
//! moves at its own beta, then offers exchanges between neighbouring
//! replicas. Hot replicas cross barriers; exchanges carry their states
//! down to the cold end. The lowest-energy state seen by any replica at
//! any step is returned.
//!
//! # Reference
//!
//! Swendsen, R. H. & Wang, J.-S. (1986). "Replica Monte Carlo simulation
//! of spin-glasses", *Physical Review Letters* 57(21), 2607-2609.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::SolverBackend;
use crate::anneal::metropolis_sweep;
use crate::error::{QuboError, Result};
use crate::ising::IsingModel;
use crate::schedule::{beta_schedule, ScheduleMode};

/// Configuration for [`TemperingBackend`].
///
/// # Examples
///
/// ```
/// use snp_qubo::backend::TemperingConfig;
///
/// let config = TemperingConfig::default().with_num_chains(16).with_seed(3);
/// assert!(config.validate().is_ok());
/// assert!(config.with_num_chains(1).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemperingConfig {
    /// Number of replicas, one per beta. At least 2.
    pub num_chains: usize,

    /// Sweep-then-exchange rounds.
    pub num_steps: usize,

    /// Seed for initial states, Metropolis moves and exchanges.
    pub seed: u64,
}

impl Default for TemperingConfig {
    fn default() -> Self {
        Self {
            num_chains: 8,
            num_steps: 1000,
            seed: 1234,
        }
    }
}

impl TemperingConfig {
    /// Sets the number of replicas.
    pub fn with_num_chains(mut self, n: usize) -> Self {
        self.num_chains = n;
        self
    }

    /// Sets the number of sweep-then-exchange rounds.
    pub fn with_num_steps(mut self, n: usize) -> Self {
        self.num_steps = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_chains < 2 {
            return Err(QuboError::invalid_parameter(
                "parallel tempering needs at least 2 chains",
            ));
        }
        if self.num_steps == 0 {
            return Err(QuboError::invalid_parameter("num_steps must be positive"));
        }
        Ok(())
    }
}

/// Result of a parallel tempering run.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperingResult {
    /// Lowest-energy spin state seen.
    pub best: Vec<i8>,

    /// Energy of `best`, excluding the Ising offset.
    pub best_energy: f64,

    /// Replica betas, hot to cold.
    pub betas: Vec<f64>,

    /// Exchanges offered between neighbouring replicas.
    pub swaps_attempted: usize,

    /// Exchanges accepted.
    pub swaps_accepted: usize,
}

/// Parallel tempering backend.
#[derive(Debug, Clone, Default)]
pub struct TemperingBackend {
    pub config: TemperingConfig,
}

impl TemperingBackend {
    pub fn new(config: TemperingConfig) -> Self {
        Self { config }
    }

    /// Runs parallel tempering on `ising`.
    ///
    /// # Errors
    ///
    /// [`QuboError::InvalidParameter`] for an invalid configuration and
    /// [`QuboError::DegenerateProblem`] when the model has no usable energy
    /// scale (including a model with no variables).
    pub fn search(&self, ising: &IsingModel) -> Result<TemperingResult> {
        let config = &self.config;
        config.validate()?;
        let betas = beta_schedule(ising, config.num_chains, ScheduleMode::Geometric)?;

        let n = ising.num_variables();
        let adjacency = ising.adjacency();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut chains: Vec<Vec<i8>> = (0..config.num_chains)
            .map(|_| {
                (0..n)
                    .map(|_| if rng.random_bool(0.5) { 1 } else { -1 })
                    .collect()
            })
            .collect();
        let mut energies: Vec<f64> = chains.iter().map(|c| ising.energy(c)).collect();

        let mut best_chain = first_min(&energies);
        let mut best = chains[best_chain].clone();
        let mut best_energy = energies[best_chain];

        let mut swaps_attempted = 0;
        let mut swaps_accepted = 0;

        for _ in 0..config.num_steps {
            for (chain, (&beta, energy)) in chains.iter_mut().zip(betas.iter().zip(&mut energies)) {
                metropolis_sweep(&ising.h, &adjacency, beta, chain, &mut rng);
                *energy = ising.energy(chain);
            }

            best_chain = first_min(&energies);
            if energies[best_chain] < best_energy {
                best.copy_from_slice(&chains[best_chain]);
                best_energy = energies[best_chain];
            }

            for i in 0..config.num_chains - 1 {
                // log of the exchange acceptance ratio; >= 0 means the colder
                // replica holds the higher energy
                let log_ratio = (betas[i] - betas[i + 1]) * (energies[i] - energies[i + 1]);
                swaps_attempted += 1;
                if log_ratio >= 0.0 || rng.random::<f64>() < log_ratio.exp() {
                    chains.swap(i, i + 1);
                    energies.swap(i, i + 1);
                    swaps_accepted += 1;
                }
            }
        }

        debug!(
            chains = config.num_chains,
            steps = config.num_steps,
            swaps_accepted,
            swaps_attempted,
            best_energy,
            "parallel tempering finished"
        );

        Ok(TemperingResult {
            best,
            best_energy,
            betas,
            swaps_attempted,
            swaps_accepted,
        })
    }
}

fn first_min(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v < values[best] {
            best = i;
        }
    }
    best
}

impl SolverBackend for TemperingBackend {
    fn name(&self) -> &str {
        "parallel-tempering"
    }

    fn solve(&self, ising: &IsingModel) -> Vec<i8> {
        match self.search(ising) {
            Ok(result) => result.best,
            Err(_) => Vec::new(),
        }
    }
}
