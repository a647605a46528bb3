//! Ising spin-glass form of a QUBO problem.
//!
//! Substituting `x = (s + 1) / 2` into `Σ_{i≤j} Q[i,j]·xᵢ·xⱼ + c` gives
//!
//! ```text
//! Σᵢ hᵢ·sᵢ + Σ_{i<j} J[i,j]·sᵢ·sⱼ + offset
//! ```
//!
//! with `hᵢ = Q[i,i]/2 + Σ_{j≠i} Q[i,j]/4`, `J[i,j] = Q[i,j]/4` and
//! `offset = c + Σ Q[i,i]/2 + Σ_{i<j} Q[i,j]/4`. The transform is exact:
//! every assignment has the same energy in both forms.

use std::fmt;

use tracing::debug;

use crate::error::{QuboError, Result};

/// Sparse pairwise coupling `J[start, end]` with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coupler {
    pub start: usize,
    pub end: usize,
    pub value: f64,
}

/// Linear biases, sparse couplers and constant offset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IsingModel {
    /// Per-spin linear bias, one entry per variable.
    pub h: Vec<f64>,

    /// Nonzero couplers in row-major order of the source matrix.
    pub couplers: Vec<Coupler>,

    /// Constant energy term.
    pub offset: f64,
}

impl IsingModel {
    /// Converts a flattened `n × n` QUBO matrix with offset.
    ///
    /// Only the upper triangle (`i <= j`) is read.
    pub fn from_qubo(q: &[f64], n: usize, offset: f64) -> Result<Self> {
        if q.len() != n * n {
            return Err(QuboError::dimension_mismatch(n * n, q.len()));
        }
        Ok(Self::from_upper_triangle(q, n, offset))
    }

    pub(crate) fn from_upper_triangle(q: &[f64], n: usize, q_offset: f64) -> Self {
        let mut h = vec![0.0; n];
        let mut couplers = Vec::new();
        let mut linear_offset = 0.0;
        let mut quadratic_offset = 0.0;

        for i in 0..n {
            for j in i..n {
                let bias = q[i * n + j];
                if i == j {
                    h[i] += 0.5 * bias;
                    linear_offset += bias;
                } else if bias != 0.0 {
                    couplers.push(Coupler {
                        start: i,
                        end: j,
                        value: 0.25 * bias,
                    });
                    h[i] += 0.25 * bias;
                    h[j] += 0.25 * bias;
                    quadratic_offset += bias;
                }
            }
        }

        let offset = q_offset + 0.5 * linear_offset + 0.25 * quadratic_offset;
        debug!(
            num_variables = n,
            num_couplers = couplers.len(),
            offset,
            "converted qubo to ising"
        );
        Self {
            h,
            couplers,
            offset,
        }
    }

    /// Number of spins.
    pub fn num_variables(&self) -> usize {
        self.h.len()
    }

    /// Coupler start indices, parallel to [`Self::coupler_ends`] and
    /// [`Self::coupler_values`].
    pub fn coupler_starts(&self) -> Vec<usize> {
        self.couplers.iter().map(|c| c.start).collect()
    }

    pub fn coupler_ends(&self) -> Vec<usize> {
        self.couplers.iter().map(|c| c.end).collect()
    }

    pub fn coupler_values(&self) -> Vec<f64> {
        self.couplers.iter().map(|c| c.value).collect()
    }

    /// `Σ hᵢ·sᵢ + Σ J·sᵢ·sⱼ` without the offset.
    ///
    /// # Panics
    /// Panics if `spins` is shorter than the model.
    pub fn energy(&self, spins: &[i8]) -> f64 {
        let linear: f64 = self
            .h
            .iter()
            .zip(spins)
            .map(|(&h, &s)| h * f64::from(s))
            .sum();
        let quadratic: f64 = self
            .couplers
            .iter()
            .map(|c| c.value * f64::from(spins[c.start]) * f64::from(spins[c.end]))
            .sum();
        linear + quadratic
    }

    /// Energy including the constant offset, equal to the QUBO objective
    /// of the corresponding binary assignment.
    pub fn total_energy(&self, spins: &[i8]) -> Result<f64> {
        if spins.len() != self.num_variables() {
            return Err(QuboError::dimension_mismatch(
                self.num_variables(),
                spins.len(),
            ));
        }
        Ok(self.energy(spins) + self.offset)
    }

    /// Neighbor lists `(other, J)` per spin, used by sweep kernels.
    pub fn adjacency(&self) -> Vec<Vec<(usize, f64)>> {
        let mut adjacency = vec![Vec::new(); self.num_variables()];
        for c in &self.couplers {
            adjacency[c.start].push((c.end, c.value));
            adjacency[c.end].push((c.start, c.value));
        }
        adjacency
    }
}

fn join<T: fmt::Display>(values: impl Iterator<Item = T>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

impl fmt::Display for IsingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "h value: {}", join(self.h.iter().map(|v| format!("{v:.3}"))))?;
        writeln!(f, "J s_idx: {}", join(self.couplers.iter().map(|c| c.start)))?;
        writeln!(f, "J e_idx: {}", join(self.couplers.iter().map(|c| c.end)))?;
        writeln!(
            f,
            "J value: {}",
            join(self.couplers.iter().map(|c| format!("{:.3}", c.value)))
        )?;
        write!(f, "offset: {:.3}", self.offset)
    }
}
