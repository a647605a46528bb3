//! Per-cluster seed generation.
//!
//! Turns clusters of SNPs into candidate SNP sets for a downstream local
//! search. Each cluster is scored pairwise through a [`CorrelationSource`],
//! solved as a blended k-clique QUBO with simulated annealing and mapped
//! back to the caller's SNP identifiers.
//!
//! Clusters below [`SeedingConfig::min_cluster_size`] are skipped and left
//! to other seeding strategies.

mod config;
mod runner;
mod types;

pub use config::{SeedingConfig, MAX_SNP_SET_SIZE};
pub use runner::ClusterSeeder;
pub use types::{CorrelationSource, SeedingResult};
