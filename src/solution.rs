//! Mapping solver output back to SNP sets.

use crate::error::{QuboError, Result};

/// One list of SNP indices per clique.
pub type SnpSetList = Vec<Vec<usize>>;

/// Splits a length-`n_cliques * n_snps` solution into per-clique SNP sets.
///
/// Within each contiguous block of `n_snps` entries, the indices whose
/// value is `+1` form that clique's set. Spin (`±1`) and bit (`0/1`)
/// vectors are both accepted. Set sizes are not checked against the
/// target `K`; any size, including zero, may come back.
///
/// # Examples
///
/// ```
/// use snp_qubo::solution::snp_sets_from_spins;
///
/// let spins = [1, -1, 1, -1, -1, 1];
/// let sets = snp_sets_from_spins(&spins, 2, 3).unwrap();
/// assert_eq!(sets, vec![vec![0, 2], vec![2]]);
/// ```
pub fn snp_sets_from_spins(spins: &[i8], n_cliques: usize, n_snps: usize) -> Result<SnpSetList> {
    let expected = n_cliques * n_snps;
    if spins.len() != expected {
        return Err(QuboError::dimension_mismatch(expected, spins.len()));
    }
    if n_snps == 0 {
        return Ok(vec![Vec::new(); n_cliques]);
    }
    Ok(spins
        .chunks(n_snps)
        .map(|block| {
            block
                .iter()
                .enumerate()
                .filter(|&(_, &s)| s == 1)
                .map(|(snp, _)| snp)
                .collect()
        })
        .collect())
}
