//! QUBO hyperparameters.

use crate::error::{QuboError, Result};

/// Hyperparameters of the k-clique QUBO.
///
/// # Examples
///
/// ```
/// use snp_qubo::qubo::QuboParams;
///
/// let params = QuboParams::default()
///     .with_k(3)
///     .with_nu(0.5)
///     .with_lambdas(10.0, 0.456, 0.789);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuboParams {
    /// Target number of SNPs per clique.
    pub k: usize,

    /// Blend weight of the statistical matrix against the biological one.
    ///
    /// Only used when two correlation matrices are supplied.
    pub nu: f64,

    /// Strength of the clique size constraint.
    pub lambda0: f64,

    /// Strength of the correlation reward.
    pub lambda1: f64,

    /// Strength of the inter-clique dissimilarity penalty.
    pub lambda2: f64,
}

impl Default for QuboParams {
    fn default() -> Self {
        Self {
            k: 3,
            nu: 0.2,
            lambda0: 5.0,
            lambda1: 1.0,
            lambda2: 1.0,
        }
    }
}

impl QuboParams {
    /// Sets the clique size K.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the weight of the statistical matrix in a blended fill.
    pub fn with_nu(mut self, nu: f64) -> Self {
        self.nu = nu;
        self
    }

    /// Sets the clique size constraint weight.
    pub fn with_lambda0(mut self, lambda0: f64) -> Self {
        self.lambda0 = lambda0;
        self
    }

    /// Sets the correlation reward weight.
    pub fn with_lambda1(mut self, lambda1: f64) -> Self {
        self.lambda1 = lambda1;
        self
    }

    /// Sets the dissimilarity penalty weight.
    pub fn with_lambda2(mut self, lambda2: f64) -> Self {
        self.lambda2 = lambda2;
        self
    }

    /// Sets all three penalty weights at once.
    pub fn with_lambdas(self, lambda0: f64, lambda1: f64, lambda2: f64) -> Self {
        self.with_lambda0(lambda0)
            .with_lambda1(lambda1)
            .with_lambda2(lambda2)
    }

    /// Validates the hyperparameters.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 {
            return Err(QuboError::invalid_parameter("k must be positive"));
        }
        if !(0.0..=1.0).contains(&self.nu) {
            return Err(QuboError::invalid_parameter(format!(
                "nu must be in [0, 1], got {}",
                self.nu
            )));
        }
        for (name, value) in [
            ("lambda0", self.lambda0),
            ("lambda1", self.lambda1),
            ("lambda2", self.lambda2),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(QuboError::invalid_parameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
