//! Cluster seeding execution engine.
//!
//! # Algorithm
//!
//! For each cluster of at least `min_cluster_size` SNPs:
//!
//! 1. Score every pair into upper-triangle statistical and biological
//!    correlation matrices
//! 2. Fill a blended k-clique QUBO and anneal it
//! 3. Map the best sample's sets from cluster positions back to SNP ids
//! 4. Drop empty and oversized sets, deduplicate the rest
//!
//! A failed cluster is logged and reported; it never aborts the others.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use super::config::SeedingConfig;
use super::types::{CorrelationSource, SeedingResult};
use crate::anneal::AnnealRunner;
use crate::error::{QuboError, Result};
use crate::matrix::CorrelationMatrix;
use crate::qubo::QuboMatrix;

/// Outcome of one cluster.
enum ClusterOutcome<S> {
    Skipped,
    Failed(QuboError),
    Seeded { sets: Vec<Vec<S>>, oversized: usize },
}

/// Cluster seeding runner.
pub struct ClusterSeeder;

impl ClusterSeeder {
    /// Generates candidate SNP sets for every cluster.
    ///
    /// Returns an error only if `config` is invalid; per-cluster failures
    /// are collected in [`SeedingResult::failed_clusters`].
    ///
    /// # Examples
    ///
    /// ```
    /// use snp_qubo::anneal::AnnealConfig;
    /// use snp_qubo::seeding::{ClusterSeeder, CorrelationSource, SeedingConfig};
    ///
    /// struct Distance;
    /// impl CorrelationSource<u32> for Distance {
    ///     fn statistical(&self, a: &u32, b: &u32) -> f64 { 1.0 / f64::from(b.abs_diff(*a)) }
    ///     fn biological(&self, _a: &u32, _b: &u32) -> f64 { 0.0 }
    /// }
    ///
    /// let clusters = vec![vec![3, 5, 8, 13, 21]];
    /// let config = SeedingConfig::default()
    ///     .with_min_cluster_size(4)
    ///     .with_anneal(AnnealConfig::default().with_num_samples(4));
    /// let result = ClusterSeeder::run(&clusters, &Distance, &config).unwrap();
    /// assert!(result.seeds().all(|set| set.iter().all(|id| clusters[0].contains(id))));
    /// ```
    pub fn run<S, C>(
        clusters: &[Vec<S>],
        source: &C,
        config: &SeedingConfig,
    ) -> Result<SeedingResult<S>>
    where
        S: Clone + Ord + Send + Sync,
        C: CorrelationSource<S>,
    {
        config.validate()?;

        let seed_one = |cluster: &Vec<S>| -> ClusterOutcome<S> {
            if cluster.len() < config.min_cluster_size {
                return ClusterOutcome::Skipped;
            }
            match seed_cluster(cluster, source, config) {
                Ok((sets, oversized)) => ClusterOutcome::Seeded { sets, oversized },
                Err(e) => ClusterOutcome::Failed(e),
            }
        };

        let outcomes: Vec<ClusterOutcome<S>> = if config.parallel {
            seed_clusters_parallel(clusters, &seed_one)
        } else {
            clusters.iter().map(&seed_one).collect()
        };

        let mut result = SeedingResult {
            cluster_sets: Vec::with_capacity(clusters.len()),
            skipped_clusters: Vec::new(),
            failed_clusters: Vec::new(),
            oversized_sets: 0,
        };
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                ClusterOutcome::Skipped => {
                    result.skipped_clusters.push(index);
                    result.cluster_sets.push(Vec::new());
                }
                ClusterOutcome::Failed(error) => {
                    warn!(cluster = index, %error, "cluster seeding failed");
                    result.failed_clusters.push((index, error));
                    result.cluster_sets.push(Vec::new());
                }
                ClusterOutcome::Seeded { sets, oversized } => {
                    result.oversized_sets += oversized;
                    result.cluster_sets.push(sets);
                }
            }
        }

        if result.oversized_sets > 0 {
            warn!(
                dropped = result.oversized_sets,
                max_set_size = config.max_set_size,
                "SNP sets exceeded the maximum set size and were omitted"
            );
        }
        info!(
            clusters = clusters.len(),
            skipped = result.skipped_clusters.len(),
            failed = result.failed_clusters.len(),
            seeds = result.num_seeds(),
            "cluster seeding finished"
        );
        Ok(result)
    }
}

/// Solves one cluster. Returns its unique sets and the number of oversized
/// sets dropped.
fn seed_cluster<S, C>(
    cluster: &[S],
    source: &C,
    config: &SeedingConfig,
) -> Result<(Vec<Vec<S>>, usize)>
where
    S: Clone + Ord,
    C: CorrelationSource<S>,
{
    let n = cluster.len();
    let mut stat = CorrelationMatrix::zeros(n);
    let mut bio = CorrelationMatrix::zeros(n);
    for i in 0..n {
        for j in (i + 1)..n {
            stat.set(i, j, source.statistical(&cluster[i], &cluster[j]))?;
            bio.set(i, j, source.biological(&cluster[i], &cluster[j]))?;
        }
    }

    let mut qubo = QuboMatrix::new(config.n_cliques, n);
    qubo.fill_blended(&stat, &bio, &config.qubo)?;
    let annealed = AnnealRunner::run(&qubo, &config.anneal)?;

    let mut unique: BTreeSet<Vec<S>> = BTreeSet::new();
    let mut oversized = 0;
    for set in &annealed.snp_sets {
        if set.is_empty() {
            continue;
        }
        if set.len() > config.max_set_size {
            oversized += 1;
            continue;
        }
        let mut ids: Vec<S> = set.iter().map(|&i| cluster[i].clone()).collect();
        ids.sort();
        unique.insert(ids);
    }

    debug!(
        snps = n,
        sets = unique.len(),
        oversized,
        best_energy = annealed.best_energy,
        "cluster seeded"
    );
    Ok((unique.into_iter().collect(), oversized))
}

#[cfg(feature = "parallel")]
fn seed_clusters_parallel<S, F>(clusters: &[Vec<S>], seed_one: &F) -> Vec<ClusterOutcome<S>>
where
    S: Send + Sync,
    F: Fn(&Vec<S>) -> ClusterOutcome<S> + Sync,
{
    use rayon::prelude::*;
    clusters.par_iter().map(seed_one).collect()
}

#[cfg(not(feature = "parallel"))]
fn seed_clusters_parallel<S, F>(clusters: &[Vec<S>], seed_one: &F) -> Vec<ClusterOutcome<S>>
where
    S: Send + Sync,
    F: Fn(&Vec<S>) -> ClusterOutcome<S> + Sync,
{
    clusters.iter().map(seed_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anneal::AnnealConfig;
    use crate::qubo::QuboParams;

    /// Every pair is equally associated.
    struct Uniform {
        stat: f64,
        bio: f64,
    }

    impl CorrelationSource<u32> for Uniform {
        fn statistical(&self, _a: &u32, _b: &u32) -> f64 {
            self.stat
        }

        fn biological(&self, _a: &u32, _b: &u32) -> f64 {
            self.bio
        }
    }

    /// Pairs close in id are strongly associated; pairs with a shared
    /// parity are biologically linked.
    struct Proximity;

    impl CorrelationSource<u32> for Proximity {
        fn statistical(&self, a: &u32, b: &u32) -> f64 {
            4.0 / f64::from(a.abs_diff(*b))
        }

        fn biological(&self, a: &u32, b: &u32) -> f64 {
            if a % 2 == b % 2 {
                1.0
            } else {
                0.0
            }
        }
    }

    fn config() -> SeedingConfig {
        SeedingConfig::default()
            .with_min_cluster_size(4)
            .with_anneal(AnnealConfig::default().with_num_samples(4).with_seed(5))
    }

    #[test]
    fn test_small_clusters_skipped() {
        let clusters = vec![vec![1, 2, 3], vec![10, 11, 12, 13, 14]];
        let result = ClusterSeeder::run(&clusters, &Proximity, &config()).unwrap();

        assert_eq!(result.skipped_clusters, vec![0]);
        assert!(result.cluster_sets[0].is_empty());
        assert!(!result.cluster_sets[1].is_empty());
        assert_eq!(result.cluster_sets.len(), 2);
    }

    #[test]
    fn test_sets_mapped_to_cluster_ids() {
        let clusters = vec![vec![100, 103, 104, 109, 110, 115]];
        let result = ClusterSeeder::run(&clusters, &Proximity, &config()).unwrap();

        assert!(result.num_seeds() > 0);
        for set in result.seeds() {
            assert!(set.iter().all(|id| clusters[0].contains(id)), "set {set:?}");
            assert!(set.windows(2).all(|w| w[0] < w[1]), "set {set:?} not sorted");
        }
    }

    #[test]
    fn test_sets_unique_within_cluster() {
        let clusters = vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8, 9]];
        let config = config().with_n_cliques(3);
        let result = ClusterSeeder::run(&clusters, &Proximity, &config).unwrap();

        for sets in &result.cluster_sets {
            let unique: BTreeSet<&Vec<u32>> = sets.iter().collect();
            assert_eq!(unique.len(), sets.len(), "duplicate sets in {sets:?}");
            assert!(sets.len() <= 3);
        }
    }

    #[test]
    fn test_oversized_sets_dropped() {
        let clusters = vec![vec![1, 2, 3, 4, 5]];
        let source = Uniform { stat: 1.0, bio: 1.0 };
        // the QUBO targets pairs, so nearly every set has two SNPs
        let config = config()
            .with_qubo(QuboParams::default().with_k(2))
            .with_max_set_size(1);
        let result = ClusterSeeder::run(&clusters, &source, &config).unwrap();

        assert!(result.oversized_sets > 0);
        assert!(result.seeds().all(|set| set.len() <= 1));
    }

    #[test]
    fn test_failed_cluster_does_not_abort_others() {
        // all-zero QUBO has no energy scale
        let source = Uniform { stat: 0.0, bio: 0.0 };
        let config = config().with_qubo(QuboParams::default().with_lambdas(0.0, 0.0, 0.0));
        let clusters = vec![vec![1, 2, 3, 4], vec![5, 6]];
        let result = ClusterSeeder::run(&clusters, &source, &config).unwrap();

        assert_eq!(result.failed_clusters, vec![(0, QuboError::DegenerateProblem)]);
        assert_eq!(result.skipped_clusters, vec![1]);
        assert_eq!(result.num_seeds(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let clusters = vec![vec![1u32, 2, 3, 4]];
        let config = config().with_min_cluster_size(1);
        assert!(ClusterSeeder::run(&clusters, &Proximity, &config).is_err());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let clusters = vec![
            vec![1, 2, 3, 4, 5],
            vec![20, 22, 25, 27],
            vec![40, 41],
            vec![50, 53, 54, 58, 59, 60],
        ];
        let seq = ClusterSeeder::run(&clusters, &Proximity, &config()).unwrap();
        let par = ClusterSeeder::run(&clusters, &Proximity, &config().with_parallel(true)).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn test_string_ids() {
        struct ByName;
        impl CorrelationSource<String> for ByName {
            fn statistical(&self, a: &String, b: &String) -> f64 {
                if a.starts_with("rs1") && b.starts_with("rs1") {
                    3.0
                } else {
                    0.5
                }
            }

            fn biological(&self, _a: &String, _b: &String) -> f64 {
                0.0
            }
        }

        let cluster: Vec<String> = ["rs11", "rs12", "rs13", "rs21", "rs22"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let clusters = vec![cluster.clone()];
        let result = ClusterSeeder::run(&clusters, &ByName, &config()).unwrap();
        for set in result.seeds() {
            assert!(set.iter().all(|id| cluster.contains(id)));
        }
    }
}
