//! Tabu search over single spin flips.
//!
//! Each iteration scores every flip from the cached local fields, takes
//! the lowest-energy flip whose spin is not tabu (a tabu flip is allowed
//! when it reaches a new best energy, if aspiration is on) and forbids
//! flipping that spin again for `tenure` iterations. The search stops
//! after `max_flips` flips or `patience` flips without a new best.
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search, Part I", *ORSA Journal on Computing* 1(3), 190-206.

use std::collections::{HashSet, VecDeque};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::SolverBackend;
use crate::error::{QuboError, Result};
use crate::ising::IsingModel;

/// Configuration for [`TabuBackend`].
///
/// # Examples
///
/// ```
/// use snp_qubo::backend::TabuConfig;
///
/// let config = TabuConfig::default().with_tenure(3).with_patience(50);
/// assert!(config.validate().is_ok());
/// assert!(config.with_max_flips(0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TabuConfig {
    /// Upper bound on the number of flips.
    pub max_flips: usize,

    /// Flips during which a just-flipped spin may not flip back.
    /// Zero disables the tabu list.
    pub tenure: usize,

    /// Whether a tabu flip is allowed when it reaches a new best energy.
    pub aspiration: bool,

    /// Flips without a new best energy before the search stops.
    pub patience: usize,

    /// Seed for the random initial spin state.
    pub seed: u64,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            max_flips: 2000,
            tenure: 5,
            aspiration: true,
            patience: 400,
            seed: 1234,
        }
    }
}

impl TabuConfig {
    /// Sets the flip budget.
    pub fn with_max_flips(mut self, n: usize) -> Self {
        self.max_flips = n;
        self
    }

    /// Sets how many flips a spin stays tabu.
    pub fn with_tenure(mut self, tenure: usize) -> Self {
        self.tenure = tenure;
        self
    }

    /// Enables or disables aspiration.
    pub fn with_aspiration(mut self, aspiration: bool) -> Self {
        self.aspiration = aspiration;
        self
    }

    /// Sets the number of flips tolerated without a new best.
    pub fn with_patience(mut self, n: usize) -> Self {
        self.patience = n;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_flips == 0 {
            return Err(QuboError::invalid_parameter("max_flips must be positive"));
        }
        if self.patience == 0 {
            return Err(QuboError::invalid_parameter("patience must be positive"));
        }
        Ok(())
    }
}

/// Result of a tabu search run.
#[derive(Debug, Clone, PartialEq)]
pub struct TabuResult {
    /// Lowest-energy spin state seen.
    pub best: Vec<i8>,

    /// Energy of `best`, excluding the Ising offset.
    pub best_energy: f64,

    /// Flips performed.
    pub flips: usize,

    /// Flip after which `best` was reached; 0 if the initial state was best.
    pub best_flip: usize,

    /// Best energy after each flip.
    pub energy_trace: Vec<f64>,
}

/// Recently flipped spins, oldest first.
#[derive(Debug)]
struct TabuList {
    tenure: usize,
    order: VecDeque<usize>,
    members: HashSet<usize>,
}

impl TabuList {
    fn new(tenure: usize) -> Self {
        Self {
            tenure,
            order: VecDeque::with_capacity(tenure),
            members: HashSet::with_capacity(tenure),
        }
    }

    fn contains(&self, spin: usize) -> bool {
        self.members.contains(&spin)
    }

    /// Marks `spin` tabu, releasing the oldest entry once `tenure` spins
    /// are held.
    fn push(&mut self, spin: usize) {
        if self.tenure == 0 {
            return;
        }
        if self.order.len() >= self.tenure {
            if let Some(released) = self.order.pop_front() {
                self.members.remove(&released);
            }
        }
        self.order.push_back(spin);
        self.members.insert(spin);
    }
}

/// Tabu search backend.
#[derive(Debug, Clone, Default)]
pub struct TabuBackend {
    pub config: TabuConfig,
}

impl TabuBackend {
    pub fn new(config: TabuConfig) -> Self {
        Self { config }
    }

    /// Runs tabu search on `ising`.
    ///
    /// # Errors
    ///
    /// [`QuboError::InvalidParameter`] for an invalid configuration and
    /// [`QuboError::DegenerateProblem`] for a model with no variables.
    pub fn search(&self, ising: &IsingModel) -> Result<TabuResult> {
        let config = &self.config;
        config.validate()?;
        let n = ising.num_variables();
        if n == 0 {
            return Err(QuboError::DegenerateProblem);
        }

        let adjacency = ising.adjacency();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut spins: Vec<i8> = (0..n)
            .map(|_| if rng.random_bool(0.5) { 1 } else { -1 })
            .collect();
        let mut fields: Vec<f64> = (0..n)
            .map(|i| {
                adjacency[i]
                    .iter()
                    .fold(ising.h[i], |acc, &(j, coupling)| acc + coupling * f64::from(spins[j]))
            })
            .collect();
        let mut energy = ising.energy(&spins);

        let mut best = spins.clone();
        let mut best_energy = energy;
        let mut best_flip = 0;
        let mut tabu = TabuList::new(config.tenure);
        let mut energy_trace = Vec::with_capacity(config.max_flips);
        let mut stale = 0;

        for flip in 1..=config.max_flips {
            let after_flip = |i: usize| energy - 2.0 * f64::from(spins[i]) * fields[i];

            let mut chosen: Option<(usize, f64)> = None;
            for i in 0..n {
                let candidate = after_flip(i);
                let allowed = !tabu.contains(i) || (config.aspiration && candidate < best_energy);
                if allowed && chosen.map_or(true, |(_, e)| candidate < e) {
                    chosen = Some((i, candidate));
                }
            }
            // every spin is tabu: take the cheapest flip anyway
            let (spin, next_energy) = chosen.unwrap_or_else(|| {
                (0..n)
                    .map(|i| (i, after_flip(i)))
                    .fold((0, f64::INFINITY), |a, b| if b.1 < a.1 { b } else { a })
            });

            spins[spin] = -spins[spin];
            energy = next_energy;
            let step = 2.0 * f64::from(spins[spin]);
            for &(j, coupling) in &adjacency[spin] {
                fields[j] += step * coupling;
            }
            tabu.push(spin);

            if energy < best_energy {
                best.copy_from_slice(&spins);
                best_energy = energy;
                best_flip = flip;
                stale = 0;
            } else {
                stale += 1;
            }
            energy_trace.push(best_energy);

            if stale >= config.patience {
                break;
            }
        }

        // recompute to shed drift from the incremental updates
        let best_energy = ising.energy(&best);
        debug!(
            flips = energy_trace.len(),
            best_flip, best_energy, "tabu search finished"
        );

        Ok(TabuResult {
            best,
            best_energy,
            flips: energy_trace.len(),
            best_flip,
            energy_trace,
        })
    }
}

impl SolverBackend for TabuBackend {
    fn name(&self) -> &str {
        "tabu"
    }

    fn solve(&self, ising: &IsingModel) -> Vec<i8> {
        match self.search(ising) {
            Ok(result) => result.best,
            Err(_) => Vec::new(),
        }
    }
}
