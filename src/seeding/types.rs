//! Seeding traits and result types.

use crate::error::QuboError;

/// Pairwise scores between SNPs of a cluster.
///
/// `S` is the caller's SNP identifier. Scores are only requested for
/// distinct pairs `(a, b)` where `a` precedes `b` in the cluster.
pub trait CorrelationSource<S>: Sync {
    /// Statistical association of the pair, e.g. a pairwise epistasis score.
    fn statistical(&self, a: &S, b: &S) -> f64;

    /// Biological association of the pair, e.g. `1.0` when the two SNPs
    /// share an interaction edge and `0.0` otherwise.
    fn biological(&self, a: &S, b: &S) -> f64;
}

/// Result of seeding a list of clusters.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedingResult<S> {
    /// Seeds per input cluster, in input order. Each seed is sorted and
    /// unique within its cluster. Skipped and failed clusters have none.
    pub cluster_sets: Vec<Vec<Vec<S>>>,

    /// Indices of clusters below the minimum size.
    pub skipped_clusters: Vec<usize>,

    /// Indices of clusters whose solve failed, with the cause.
    pub failed_clusters: Vec<(usize, QuboError)>,

    /// Sets dropped for exceeding the maximum set size.
    pub oversized_sets: usize,
}

impl<S> SeedingResult<S> {
    /// Iterates over every seed of every cluster.
    pub fn seeds(&self) -> impl Iterator<Item = &Vec<S>> + '_ {
        self.cluster_sets.iter().flatten()
    }

    /// Total number of seeds.
    pub fn num_seeds(&self) -> usize {
        self.cluster_sets.iter().map(Vec::len).sum()
    }
}
