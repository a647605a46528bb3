//! Swappable solver backends behind one Ising contract.
//!
//! A backend receives the Ising form of a QUBO and returns a spin (`±1`)
//! or bit (`0/1`) vector with one entry per variable. An **empty** vector
//! signals failure (embedding failure, remote error, timeout, ...), which
//! [`solve_with_backend`] surfaces as [`QuboError::BackendFailure`] rather
//! than as an empty list of SNP sets.
//!
//! Three backends ship with the crate: the simulated annealer, parallel
//! tempering (replica exchange) and single-spin-flip tabu search.

mod annealing;
mod tabu;
mod tempering;

pub use annealing::AnnealingBackend;
pub use tabu::{TabuBackend, TabuConfig, TabuResult};
pub use tempering::{TemperingBackend, TemperingConfig, TemperingResult};

use tracing::warn;

use crate::error::{QuboError, Result};
use crate::ising::IsingModel;
use crate::qubo::QuboMatrix;
use crate::solution::{snp_sets_from_spins, SnpSetList};

/// A solver that minimizes an Ising model.
pub trait SolverBackend {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Returns a solution vector of length `ising.num_variables()`, or an
    /// empty vector on failure.
    fn solve(&self, ising: &IsingModel) -> Vec<i8>;
}

/// Converts `qubo` to Ising form, solves it with `backend` and maps the
/// solution back to SNP sets.
pub fn solve_with_backend<B: SolverBackend + ?Sized>(
    qubo: &QuboMatrix,
    backend: &B,
) -> Result<SnpSetList> {
    let ising = qubo.to_ising();
    let solution = backend.solve(&ising);
    if solution.is_empty() {
        warn!(backend = backend.name(), "solver backend returned no solution");
        return Err(QuboError::backend_failure(backend.name()));
    }
    snp_sets_from_spins(&solution, qubo.n_cliques(), qubo.n_snps())
}
