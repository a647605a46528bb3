//! Multi-sample simulated annealing over an Ising model.
//!
//! [`AnnealRunner`] derives a geometric beta schedule from the problem's
//! energy scale, hands the prepared problem to a [`SweepKernel`], keeps the
//! lowest-energy completed sample and maps it back to SNP sets.
//!
//! The kernel is pluggable. [`MetropolisKernel`] is the in-crate
//! single-spin-flip Metropolis sampler; any other kernel honoring the
//! same request/sample contract can be swapped in.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod kernel;
mod runner;

pub use config::{AnnealConfig, SweepPlan};
pub use kernel::{MetropolisKernel, SampleSet, SweepKernel, SweepRequest};
pub(crate) use kernel::metropolis_sweep;
pub use runner::{AnnealResult, AnnealRunner};
