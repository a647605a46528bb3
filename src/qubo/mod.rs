//! QUBO formulation of the "N max-weighted K-cliques" SNP-set problem.
//!
//! Variables `x[clique][snp]` are laid out row-major in an `N × N` matrix
//! with `N = n_cliques * n_snps`. Minimizing `xᵀQx + offset` trades off:
//!
//! - a size penalty `λ0 · (Σᵢ xᵢ − K)²` per clique,
//! - a reward `−λ1 · Σ_{i<j} corr(i, j) · xᵢ xⱼ` per clique,
//! - a dissimilarity penalty `λ2 · x[l][i] · x[m][i]` for every clique pair.
//!
//! All three are soft: solutions may violate the size or disjointness
//! target.

mod builder;
mod config;

pub use builder::QuboMatrix;
pub use config::QuboParams;
