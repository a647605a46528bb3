//! QUBO matrix storage and the k-clique fill.

use std::fmt;

use tracing::debug;

use super::config::QuboParams;
use crate::error::{QuboError, Result};
use crate::ising::IsingModel;
use crate::matrix::{linear_combination, CorrelationMatrix};

/// Upper-triangular QUBO matrix over `x[clique][snp]` plus a constant offset.
///
/// Composite index `(clique, snp)` maps to `clique * n_snps + snp`. Only
/// entries with row index ≤ column index are ever written; the diagonal
/// holds linear coefficients and the strict upper triangle pairwise ones.
///
/// # Examples
///
/// ```
/// use snp_qubo::matrix::CorrelationMatrix;
/// use snp_qubo::qubo::{QuboMatrix, QuboParams};
///
/// let corr = CorrelationMatrix::zeros(3);
/// let mut qubo = QuboMatrix::new(2, 3);
/// qubo.fill(&corr, &QuboParams::default().with_k(2)).unwrap();
///
/// // λ0 · (1 − 2K) on the diagonal
/// assert_eq!(qubo.get(0, 1, 0, 1).unwrap(), 5.0 * (1.0 - 4.0));
/// assert_eq!(qubo.offset(), 2.0 * 5.0 * 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QuboMatrix {
    n_cliques: usize,
    n_snps: usize,
    data: Vec<f64>,
    offset: f64,
}

impl QuboMatrix {
    /// Allocates an all-zero QUBO for `n_cliques` sets over `n_snps` SNPs.
    pub fn new(n_cliques: usize, n_snps: usize) -> Self {
        let size = n_cliques * n_snps;
        Self {
            n_cliques,
            n_snps,
            data: vec![0.0; size * size],
            offset: 0.0,
        }
    }

    /// Number of cliques (SNP sets) being searched for.
    pub fn n_cliques(&self) -> usize {
        self.n_cliques
    }

    /// Number of SNPs per clique block.
    pub fn n_snps(&self) -> usize {
        self.n_snps
    }

    /// Number of binary variables `N = n_cliques * n_snps`.
    pub fn size(&self) -> usize {
        self.n_cliques * self.n_snps
    }

    /// Constant energy term.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
    }

    /// Flattened row-major view of the `N × N` coefficients.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Flattened variable index of `(clique, snp)`.
    pub fn index(&self, clique: usize, snp: usize) -> Result<usize> {
        if clique >= self.n_cliques || snp >= self.n_snps {
            return Err(QuboError::IndexOutOfBounds {
                row: clique,
                col: snp,
                size: self.size(),
            });
        }
        Ok(clique * self.n_snps + snp)
    }

    /// Coefficient of `x[c1][v1] · x[c2][v2]`.
    pub fn get(&self, c1: usize, v1: usize, c2: usize, v2: usize) -> Result<f64> {
        let row = self.index(c1, v1)?;
        let col = self.index(c2, v2)?;
        Ok(self.data[row * self.size() + col])
    }

    /// Coefficient at flattened position `(row, col)`.
    pub fn entry(&self, row: usize, col: usize) -> Result<f64> {
        let size = self.size();
        if row >= size || col >= size {
            return Err(QuboError::IndexOutOfBounds { row, col, size });
        }
        Ok(self.data[row * size + col])
    }

    /// Adds `value` to the coefficient of `x[c1][v1] · x[c2][v2]`.
    ///
    /// Fails with [`QuboError::LowerTriangle`] if the flattened position is
    /// below the diagonal.
    pub fn add(&mut self, c1: usize, v1: usize, c2: usize, v2: usize, value: f64) -> Result<()> {
        let row = self.index(c1, v1)?;
        let col = self.index(c2, v2)?;
        self.add_at(row, col, value)
    }

    /// Adds `value` at flattened position `(row, col)`, `row <= col`.
    pub fn add_at(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let size = self.size();
        if row >= size || col >= size {
            return Err(QuboError::IndexOutOfBounds { row, col, size });
        }
        if row > col {
            return Err(QuboError::LowerTriangle { row, col });
        }
        self.data[row * size + col] += value;
        Ok(())
    }

    /// Zeroes every coefficient and the offset.
    pub fn reset(&mut self) {
        self.data.iter_mut().for_each(|v| *v = 0.0);
        self.offset = 0.0;
    }

    /// Fills the k-clique QUBO from a single correlation matrix.
    ///
    /// Any previous content, offset included, is discarded. The matrix is
    /// left untouched if the correlation dimension or the hyperparameters
    /// are invalid.
    pub fn fill(&mut self, corr: &CorrelationMatrix<'_>, params: &QuboParams) -> Result<()> {
        if corr.n() != self.n_snps {
            return Err(QuboError::dimension_mismatch(self.n_snps, corr.n()));
        }
        params.validate()?;

        self.reset();

        let n = self.n_snps;
        let k = params.k as f64;
        let QuboParams {
            lambda0,
            lambda1,
            lambda2,
            ..
        } = *params;

        for l in 0..self.n_cliques {
            // λ0 (Σ xᵢ − K)²: xᵢ² = xᵢ gives λ0(1 − 2K), cross terms 2λ0
            for i in 0..n {
                self.bump(l, i, l, i, lambda0 * (1.0 - 2.0 * k));
                for j in (i + 1)..n {
                    self.bump(l, i, l, j, 2.0 * lambda0);
                }
            }
            self.offset += lambda0 * k * k;

            // no self-correlation reward on the diagonal
            for i in 0..n {
                for j in (i + 1)..n {
                    self.bump(l, i, l, j, -lambda1 * corr.get(i, j));
                }
            }
        }

        for l in 0..self.n_cliques {
            for m in (l + 1)..self.n_cliques {
                for i in 0..n {
                    self.bump(l, i, m, i, lambda2);
                }
            }
        }

        debug!(
            n_cliques = self.n_cliques,
            n_snps = n,
            k = params.k,
            offset = self.offset,
            "filled k-clique qubo"
        );
        Ok(())
    }

    /// Fills the QUBO from a statistical and a biological correlation
    /// matrix blended as `nu · stat + (1 − nu) · bio`.
    pub fn fill_blended(
        &mut self,
        stat: &CorrelationMatrix<'_>,
        bio: &CorrelationMatrix<'_>,
        params: &QuboParams,
    ) -> Result<()> {
        for corr in [stat, bio] {
            if corr.n() != self.n_snps {
                return Err(QuboError::dimension_mismatch(self.n_snps, corr.n()));
            }
        }
        params.validate()?;
        let blended = linear_combination(params.nu, stat, bio)?;
        self.fill(&blended, params)
    }

    /// QUBO objective `Σ_{i≤j} Q[i,j]·xᵢ·xⱼ + offset` of a binary assignment.
    pub fn energy(&self, x: &[u8]) -> Result<f64> {
        let size = self.size();
        if x.len() != size {
            return Err(QuboError::dimension_mismatch(size, x.len()));
        }
        let mut energy = self.offset;
        for i in 0..size {
            if x[i] == 0 {
                continue;
            }
            let row = &self.data[i * size..(i + 1) * size];
            for j in i..size {
                if x[j] != 0 {
                    energy += row[j];
                }
            }
        }
        Ok(energy)
    }

    /// Equivalent Ising model under `s = 2x − 1`.
    pub fn to_ising(&self) -> IsingModel {
        IsingModel::from_upper_triangle(&self.data, self.size(), self.offset)
    }

    fn bump(&mut self, c1: usize, v1: usize, c2: usize, v2: usize, value: f64) {
        let row = c1 * self.n_snps + v1;
        let col = c2 * self.n_snps + v2;
        debug_assert!(row <= col);
        let size = self.size();
        self.data[row * size + col] += value;
    }
}

impl fmt::Display for QuboMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        writeln!(f, "QUBO:")?;
        for row in self.data.chunks(size.max(1)).take(size) {
            let line: Vec<String> = row.iter().map(|v| format!("{v:+.3}")).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        write!(f, "Offset: {:.3}", self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper_corr() -> CorrelationMatrix<'static> {
        CorrelationMatrix::from_rows(&[
            vec![0.0, 1.0, 2.0, 3.0],
            vec![0.0, 0.0, 4.0, 5.0],
            vec![0.0, 0.0, 0.0, 6.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ])
        .unwrap()
    }

    fn scenario_params() -> QuboParams {
        QuboParams::default()
            .with_k(3)
            .with_nu(0.5)
            .with_lambdas(10.0, 0.456, 0.789)
    }

    #[test]
    fn test_index_layout() {
        let qubo = QuboMatrix::new(2, 4);
        assert_eq!(qubo.size(), 8);
        assert_eq!(qubo.index(0, 3).unwrap(), 3);
        assert_eq!(qubo.index(1, 0).unwrap(), 4);
        assert!(qubo.index(2, 0).is_err());
        assert!(qubo.index(0, 4).is_err());
    }

    #[test]
    fn test_fill_coefficients() {
        let mut qubo = QuboMatrix::new(2, 4);
        qubo.fill(&upper_corr(), &scenario_params()).unwrap();

        // diagonal: λ0 (1 − 2K) = 10 · (−5)
        for l in 0..2 {
            for i in 0..4 {
                assert!((qubo.get(l, i, l, i).unwrap() + 50.0).abs() < 1e-12);
            }
        }
        // within clique: 2λ0 − λ1·corr
        assert!((qubo.get(0, 1, 0, 3).unwrap() - (20.0 - 0.456 * 5.0)).abs() < 1e-12);
        assert!((qubo.get(1, 2, 1, 3).unwrap() - (20.0 - 0.456 * 6.0)).abs() < 1e-12);
        // across cliques: λ2 on matching SNPs only
        assert!((qubo.get(0, 2, 1, 2).unwrap() - 0.789).abs() < 1e-12);
        assert_eq!(qubo.get(0, 1, 1, 2).unwrap(), 0.0);
        // λ0 K² per clique
        assert!((qubo.offset() - 2.0 * 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_fill_upper_triangle_only() {
        let mut qubo = QuboMatrix::new(3, 4);
        qubo.fill(&upper_corr(), &scenario_params()).unwrap();
        let n = qubo.size();
        for row in 0..n {
            for col in 0..row {
                assert_eq!(qubo.entry(row, col).unwrap(), 0.0, "({row}, {col})");
            }
        }
    }

    #[test]
    fn test_fill_ignores_lower_triangle_of_corr() {
        let mut full = upper_corr();
        full.set(3, 0, 100.0).unwrap();
        let mut a = QuboMatrix::new(2, 4);
        let mut b = QuboMatrix::new(2, 4);
        a.fill(&upper_corr(), &scenario_params()).unwrap();
        b.fill(&full, &scenario_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_fill_dimension_mismatch_leaves_matrix() {
        let mut qubo = QuboMatrix::new(2, 4);
        qubo.fill(&upper_corr(), &scenario_params()).unwrap();
        let before = qubo.clone();

        let err = qubo.fill(&CorrelationMatrix::zeros(5), &scenario_params());
        assert_eq!(err, Err(QuboError::dimension_mismatch(4, 5)));
        assert_eq!(qubo, before);
    }

    #[test]
    fn test_fill_blended_checks_both() {
        let mut qubo = QuboMatrix::new(2, 4);
        let err = qubo.fill_blended(&upper_corr(), &CorrelationMatrix::zeros(3), &scenario_params());
        assert_eq!(err, Err(QuboError::dimension_mismatch(4, 3)));
        assert_eq!(qubo.offset(), 0.0);
    }

    #[test]
    fn test_fill_blended_identical_inputs() {
        let mut blended = QuboMatrix::new(2, 4);
        blended
            .fill_blended(&upper_corr(), &upper_corr(), &scenario_params())
            .unwrap();
        let mut single = QuboMatrix::new(2, 4);
        single.fill(&upper_corr(), &scenario_params()).unwrap();
        for (a, b) in blended.as_slice().iter().zip(single.as_slice()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_fill_blended_nu_weights() {
        let stat = upper_corr();
        let bio = CorrelationMatrix::zeros(4);
        let params = QuboParams::default()
            .with_k(2)
            .with_nu(0.25)
            .with_lambdas(0.0, 1.0, 0.0);
        let mut qubo = QuboMatrix::new(1, 4);
        qubo.fill_blended(&stat, &bio, &params).unwrap();
        assert!((qubo.get(0, 2, 0, 3).unwrap() + 0.25 * 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_refill_overwrites() {
        let mut qubo = QuboMatrix::new(2, 4);
        qubo.fill(&upper_corr(), &scenario_params()).unwrap();
        let first = qubo.clone();
        qubo.fill(&upper_corr(), &scenario_params()).unwrap();
        assert_eq!(qubo, first);

        qubo.fill(&upper_corr(), &QuboParams::default()).unwrap();
        assert!((qubo.offset() - 2.0 * 5.0 * 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_insertion_order_invariance() {
        let values = [(0, 1, 1.0), (0, 2, 2.0), (0, 3, 3.0), (1, 2, 4.0), (1, 3, 5.0), (2, 3, 6.0)];
        let mut forward = CorrelationMatrix::zeros(4);
        for &(i, j, v) in &values {
            forward.set(i, j, v).unwrap();
        }
        let mut reversed = CorrelationMatrix::zeros(4);
        for &(i, j, v) in values.iter().rev() {
            reversed.set(i, j, v).unwrap();
        }

        let mut a = QuboMatrix::new(2, 4);
        let mut b = QuboMatrix::new(2, 4);
        a.fill(&forward, &scenario_params()).unwrap();
        b.fill(&reversed, &scenario_params()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_add_rejects_lower_triangle() {
        let mut qubo = QuboMatrix::new(2, 2);
        assert_eq!(
            qubo.add(1, 0, 0, 1, 1.0),
            Err(QuboError::LowerTriangle { row: 2, col: 1 })
        );
        qubo.add(0, 1, 1, 0, 2.5).unwrap();
        assert_eq!(qubo.entry(1, 2).unwrap(), 2.5);
    }

    #[test]
    fn test_energy() {
        let mut qubo = QuboMatrix::new(1, 3);
        qubo.add_at(0, 0, -1.0).unwrap();
        qubo.add_at(0, 2, 3.0).unwrap();
        qubo.add_at(2, 2, -2.0).unwrap();
        qubo.set_offset(0.5);

        assert!((qubo.energy(&[0, 0, 0]).unwrap() - 0.5).abs() < 1e-12);
        assert!((qubo.energy(&[1, 0, 0]).unwrap() + 0.5).abs() < 1e-12);
        assert!((qubo.energy(&[1, 0, 1]).unwrap() - 0.5).abs() < 1e-12);
        assert!(qubo.energy(&[1, 0]).is_err());
    }

    #[test]
    fn test_energy_prefers_target_size() {
        let corr = CorrelationMatrix::zeros(4);
        let params = QuboParams::default()
            .with_k(2)
            .with_lambdas(1.0, 0.0, 0.0);
        let mut qubo = QuboMatrix::new(1, 4);
        qubo.fill(&corr, &params).unwrap();

        // (Σx − K)² vanishes at exactly K chosen SNPs
        assert!(qubo.energy(&[1, 1, 0, 0]).unwrap().abs() < 1e-12);
        assert!((qubo.energy(&[1, 1, 1, 0]).unwrap() - 1.0).abs() < 1e-12);
        assert!((qubo.energy(&[0, 0, 0, 0]).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let mut qubo = QuboMatrix::new(1, 2);
        qubo.add_at(0, 1, 1.5).unwrap();
        let text = qubo.to_string();
        assert!(text.starts_with("QUBO:"));
        assert!(text.contains("+0.000 +1.500"));
        assert!(text.ends_with("Offset: 0.000"));
    }
}
