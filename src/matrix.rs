//! Dense SNP-SNP correlation matrix.
//!
//! Symmetric by convention: consumers only read the upper triangle
//! (`i <= j`). The backing buffer is either owned or borrowed from the
//! caller, so a large externally computed matrix can be wrapped without a
//! copy.

use std::borrow::Cow;

use crate::error::{QuboError, Result};

/// `n × n` row-major correlation matrix over SNP pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix<'a> {
    n: usize,
    data: Cow<'a, [f64]>,
}

impl CorrelationMatrix<'static> {
    /// Creates an owned all-zero matrix.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: Cow::Owned(vec![0.0; n * n]),
        }
    }

    /// Creates an owned matrix from a flattened row-major vector.
    pub fn from_vec(data: Vec<f64>, n: usize) -> Result<Self> {
        if data.len() != n * n {
            return Err(QuboError::dimension_mismatch(n * n, data.len()));
        }
        Ok(Self {
            n,
            data: Cow::Owned(data),
        })
    }

    /// Creates an owned matrix from square rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(QuboError::dimension_mismatch(n, row.len()));
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(data, n)
    }
}

impl<'a> CorrelationMatrix<'a> {
    /// Wraps a caller-owned row-major buffer without copying.
    pub fn from_slice(data: &'a [f64], n: usize) -> Result<Self> {
        if data.len() != n * n {
            return Err(QuboError::dimension_mismatch(n * n, data.len()));
        }
        Ok(Self {
            n,
            data: Cow::Borrowed(data),
        })
    }

    /// Number of SNPs (matrix dimension).
    pub fn n(&self) -> usize {
        self.n
    }

    /// Returns `true` if the matrix wraps a caller buffer.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    /// Correlation between SNP `i` and SNP `j`.
    ///
    /// # Panics
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of range");
        self.data[i * self.n + j]
    }

    /// Sets the correlation between SNP `i` and SNP `j`.
    ///
    /// A borrowed matrix is copied into owned storage on first write.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<()> {
        if i >= self.n || j >= self.n {
            return Err(QuboError::IndexOutOfBounds {
                row: i,
                col: j,
                size: self.n,
            });
        }
        let n = self.n;
        self.data.to_mut()[i * n + j] = value;
        Ok(())
    }

    /// Flattened row-major view of the backing buffer.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Entrywise blend `nu * a + (1 - nu) * b`.
///
/// Used to combine a statistical and a biological correlation matrix.
pub fn linear_combination(
    nu: f64,
    a: &CorrelationMatrix<'_>,
    b: &CorrelationMatrix<'_>,
) -> Result<CorrelationMatrix<'static>> {
    if a.n() != b.n() {
        return Err(QuboError::dimension_mismatch(a.n(), b.n()));
    }
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| nu * x + (1.0 - nu) * y)
        .collect();
    CorrelationMatrix::from_vec(data, a.n())
}
