//! Annealing orchestration: schedule, kernel call, best-sample selection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::config::AnnealConfig;
use super::kernel::{best_index, MetropolisKernel, SweepKernel, SweepRequest};
use crate::error::{QuboError, Result};
use crate::ising::IsingModel;
use crate::qubo::QuboMatrix;
use crate::schedule::{beta_schedule, ScheduleMode};
use crate::solution::{snp_sets_from_spins, SnpSetList};

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// SNP sets of the best sample, one list per clique.
    pub snp_sets: SnpSetList,

    /// Spin state of the best sample.
    pub best_spins: Vec<i8>,

    /// Energy of the best sample, Ising offset included.
    pub best_energy: f64,

    /// Index of the best sample among the completed ones.
    pub best_sample: usize,

    /// Samples asked of the kernel.
    pub requested_samples: usize,

    /// Samples the kernel actually completed.
    pub completed_samples: usize,

    /// Energy of every completed sample, Ising offset included.
    pub energies: Vec<f64>,

    /// SNP sets of every completed sample.
    pub sample_snp_sets: Vec<SnpSetList>,

    /// Sweeps performed at each beta value.
    pub sweeps_per_beta: usize,

    /// Beta schedule the kernel ran through.
    pub beta_schedule: Vec<f64>,

    /// Whether the cancellation flag was set when the kernel returned.
    pub cancelled: bool,
}

impl AnnealResult {
    /// Returns `true` if fewer samples completed than were requested.
    pub fn is_partial(&self) -> bool {
        self.completed_samples < self.requested_samples
    }

    /// Number of requested samples that did not complete.
    pub fn shortfall(&self) -> usize {
        self.requested_samples - self.completed_samples
    }
}

/// Executes multi-sample annealing on a QUBO or Ising problem.
///
/// # Usage
///
/// ```ignore
/// let config = AnnealConfig::default().with_seed(42);
/// let result = AnnealRunner::run(&qubo, &config)?;
/// println!("best sets: {:?}", result.snp_sets);
/// ```
pub struct AnnealRunner;

impl AnnealRunner {
    /// Anneals a filled QUBO with the Metropolis kernel.
    pub fn run(qubo: &QuboMatrix, config: &AnnealConfig) -> Result<AnnealResult> {
        Self::run_with_cancel(qubo, config, None)
    }

    /// Anneals with an optional cancellation token.
    ///
    /// Setting the flag stops each sample at its next beta step; samples
    /// that did not finish are dropped. Cancellation is cooperative and
    /// cannot interrupt a sweep in progress.
    pub fn run_with_cancel(
        qubo: &QuboMatrix,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult> {
        let kernel = MetropolisKernel::new().with_parallel(config.parallel);
        Self::run_with_kernel(qubo, config, &kernel, cancel)
    }

    /// Anneals a QUBO with a caller-supplied sweep kernel.
    pub fn run_with_kernel<K: SweepKernel>(
        qubo: &QuboMatrix,
        config: &AnnealConfig,
        kernel: &K,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult> {
        let ising = qubo.to_ising();
        Self::anneal_ising(&ising, qubo.n_cliques(), qubo.n_snps(), config, kernel, cancel)
    }

    /// Anneals an Ising model whose spins are laid out as
    /// `n_cliques` blocks of `n_snps`.
    ///
    /// # Errors
    ///
    /// - [`QuboError::DimensionMismatch`] if the model or an initial state
    ///   does not have `n_cliques * n_snps` spins.
    /// - [`QuboError::DegenerateProblem`] if all biases and couplers are zero,
    ///   or the energy scale does not fit in finite `f64` values.
    /// - [`QuboError::TotalAnnealingFailure`] if no sample completed.
    ///
    /// A partial shortfall is not an error: it is logged and reported via
    /// [`AnnealResult::is_partial`].
    pub fn anneal_ising<K: SweepKernel>(
        ising: &IsingModel,
        n_cliques: usize,
        n_snps: usize,
        config: &AnnealConfig,
        kernel: &K,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult> {
        config.validate()?;

        let num_variables = n_cliques * n_snps;
        if ising.num_variables() != num_variables {
            return Err(QuboError::dimension_mismatch(
                num_variables,
                ising.num_variables(),
            ));
        }
        if let Some(states) = &config.initial_states {
            if let Some(bad) = states.iter().find(|s| s.len() != num_variables) {
                return Err(QuboError::dimension_mismatch(num_variables, bad.len()));
            }
        }

        if !ising.offset.is_finite() {
            return Err(QuboError::DegenerateProblem);
        }

        let plan = config.sweep_plan();
        let betas = beta_schedule(ising, plan.num_betas, ScheduleMode::Geometric)?;

        let request = SweepRequest {
            ising,
            num_samples: config.num_samples,
            sweeps_per_beta: plan.sweeps_per_beta,
            beta_schedule: &betas,
            seed: config.seed,
            initial_states: config.initial_states.as_deref(),
        };
        let samples = kernel.sample(&request, cancel.as_deref());
        let cancelled = cancel
            .as_deref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));

        if samples.num_variables() != num_variables {
            return Err(QuboError::dimension_mismatch(
                num_variables,
                samples.num_variables(),
            ));
        }

        let requested = config.num_samples;
        let completed = samples.len().min(requested);
        if completed == 0 {
            warn!(requested, cancelled, "annealing produced no samples");
            return Err(QuboError::TotalAnnealingFailure { requested });
        }
        if completed < requested {
            warn!(
                requested,
                completed,
                cancelled,
                "partial annealing failure, continuing with completed samples"
            );
        }

        let energies: Vec<f64> = samples.energies()[..completed]
            .iter()
            .map(|e| e + ising.offset)
            .collect();
        if energies.iter().any(|e| !e.is_finite()) {
            return Err(QuboError::DegenerateProblem);
        }
        let best_sample =
            best_index(&energies).ok_or(QuboError::TotalAnnealingFailure { requested })?;

        let mut sample_snp_sets = Vec::with_capacity(completed);
        for (state, _) in samples.iter().take(completed) {
            sample_snp_sets.push(snp_sets_from_spins(state, n_cliques, n_snps)?);
        }
        let best_spins = samples
            .state(best_sample)
            .map(<[i8]>::to_vec)
            .ok_or(QuboError::TotalAnnealingFailure { requested })?;
        let snp_sets = sample_snp_sets[best_sample].clone();

        info!(
            requested,
            completed,
            best_sample,
            best_energy = energies[best_sample],
            sweeps_per_beta = plan.sweeps_per_beta,
            num_betas = plan.num_betas,
            "annealing finished"
        );

        Ok(AnnealResult {
            snp_sets,
            best_spins,
            best_energy: energies[best_sample],
            best_sample,
            requested_samples: requested,
            completed_samples: completed,
            energies,
            sample_snp_sets,
            sweeps_per_beta: plan.sweeps_per_beta,
            beta_schedule: betas,
            cancelled,
        })
    }
}
