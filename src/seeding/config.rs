//! Cluster seeding configuration.

use crate::anneal::AnnealConfig;
use crate::error::{QuboError, Result};
use crate::qubo::QuboParams;

/// Largest SNP set a seed may contain.
pub const MAX_SNP_SET_SIZE: usize = 10;

/// Configuration for [`ClusterSeeder`](super::ClusterSeeder).
///
/// # Examples
///
/// ```
/// use snp_qubo::seeding::SeedingConfig;
///
/// let config = SeedingConfig::default()
///     .with_min_cluster_size(20)
///     .with_n_cliques(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeedingConfig {
    /// Clusters smaller than this are skipped. Must be at least 2.
    pub min_cluster_size: usize,

    /// Sets larger than this are dropped.
    pub max_set_size: usize,

    /// Number of cliques (sets) sought per cluster.
    pub n_cliques: usize,

    /// QUBO hyperparameters, including the statistical/biological blend.
    pub qubo: QuboParams,

    /// Annealing settings used for every cluster.
    pub anneal: AnnealConfig,

    /// Whether to process clusters in parallel using rayon.
    ///
    /// Only takes effect with the `parallel` feature.
    pub parallel: bool,
}

impl Default for SeedingConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: 100,
            max_set_size: MAX_SNP_SET_SIZE,
            n_cliques: 2,
            qubo: QuboParams::default(),
            anneal: AnnealConfig::default(),
            parallel: false,
        }
    }
}

impl SeedingConfig {
    /// Sets the smallest cluster that gets annealed.
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Sets the largest SNP set kept as a seed.
    pub fn with_max_set_size(mut self, size: usize) -> Self {
        self.max_set_size = size;
        self
    }

    /// Sets the number of cliques searched per cluster.
    pub fn with_n_cliques(mut self, n: usize) -> Self {
        self.n_cliques = n;
        self
    }

    /// Sets the QUBO parameters used for every cluster.
    pub fn with_qubo(mut self, params: QuboParams) -> Self {
        self.qubo = params;
        self
    }

    /// Sets the annealer configuration used for every cluster.
    pub fn with_anneal(mut self, config: AnnealConfig) -> Self {
        self.anneal = config;
        self
    }

    /// Processes clusters on the rayon pool when the `parallel` feature is on.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates the configuration, including the nested QUBO and
    /// annealing settings.
    pub fn validate(&self) -> Result<()> {
        if self.min_cluster_size < 2 {
            return Err(QuboError::invalid_parameter(
                "min_cluster_size must be at least 2",
            ));
        }
        if self.max_set_size == 0 {
            return Err(QuboError::invalid_parameter("max_set_size must be positive"));
        }
        if self.n_cliques == 0 {
            return Err(QuboError::invalid_parameter("n_cliques must be positive"));
        }
        self.qubo.validate()?;
        self.anneal.validate()
    }
}
