//! QUBO formulation and simulated annealing for SNP-set discovery.
//!
//! Finds `n_cliques` sets of SNPs of a target size `K` that jointly maximize
//! a correlation-based reward:
//!
//! - **Correlation Matrix**: dense `n × n` container, owned or borrowed.
//! - **QUBO Builder**: size penalty, pairwise reward and inter-clique
//!   dissimilarity terms over variables `x[clique][snp]`.
//! - **Ising conversion**: exact energy-preserving transform under
//!   `s = 2x - 1`.
//! - **Beta schedule**: inverse-temperature ladder from the problem's
//!   energy scale, linear or geometric.
//! - **Annealing**: multi-sample orchestration over a pluggable sweep
//!   kernel, with partial-failure handling and best-sample selection.
//! - **Backends**: alternative solvers behind the same Ising contract.
//! - **Seeding**: per-cluster candidate SNP-set generation.
//!
//! # Data flow
//!
//! ```text
//! CorrelationMatrix -> QuboMatrix -> IsingModel -> beta schedule
//!                                         \-> AnnealRunner -> SNP sets
//! ```
//!
//! # Example
//!
//! ```
//! use snp_qubo::anneal::{AnnealConfig, AnnealRunner};
//! use snp_qubo::matrix::CorrelationMatrix;
//! use snp_qubo::qubo::{QuboMatrix, QuboParams};
//!
//! let corr = CorrelationMatrix::from_rows(&[
//!     vec![0.0, 1.0, 2.0, 3.0],
//!     vec![0.0, 0.0, 4.0, 5.0],
//!     vec![0.0, 0.0, 0.0, 6.0],
//!     vec![0.0, 0.0, 0.0, 0.0],
//! ])
//! .unwrap();
//!
//! let mut qubo = QuboMatrix::new(2, 4);
//! let params = QuboParams::default().with_k(3);
//! qubo.fill(&corr, &params).unwrap();
//!
//! let config = AnnealConfig::default().with_num_samples(4).with_seed(7);
//! let result = AnnealRunner::run(&qubo, &config).unwrap();
//! assert_eq!(result.snp_sets.len(), 2);
//! ```

pub mod anneal;
pub mod backend;
pub mod error;
pub mod ising;
pub mod matrix;
pub mod qubo;
pub mod schedule;
pub mod seeding;
pub mod solution;

pub use error::{QuboError, Result};
