//! Inverse-temperature (beta) schedules.
//!
//! The range is bounded by the problem's single-flip energy scale:
//!
//! - `hot = ln 2 / max ΔE`, where `max ΔE` bounds the energy change from
//!   flipping the most strongly coupled spin, so even the largest uphill
//!   move is accepted with probability ½;
//! - `cold = ln 100 / min ΔE`, where `min ΔE` is the smallest nonzero bias
//!   or coupler magnitude, so the smallest uphill move is accepted with
//!   probability 1/100.

use tracing::debug;

use crate::error::{QuboError, Result};
use crate::ising::IsingModel;

/// Spacing of betas between the hot and cold ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScheduleMode {
    /// Evenly spaced betas.
    Linear,

    /// Evenly spaced in `log10(beta)`.
    #[default]
    Geometric,
}

/// Hot (smallest) and cold (largest) inverse temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetaRange {
    pub hot: f64,
    pub cold: f64,
}

/// Computes the hot/cold beta bounds of a model.
///
/// Fails with [`QuboError::DegenerateProblem`] when every bias and coupler
/// is zero or any is non-finite, and when the energy scale is so extreme
/// that either bound is not a finite positive number.
pub fn beta_range(ising: &IsingModel) -> Result<BetaRange> {
    let mut field: Vec<f64> = ising.h.iter().map(|h| h.abs()).collect();
    let magnitudes = || {
        field
            .iter()
            .copied()
            .chain(ising.couplers.iter().map(|c| c.value.abs()))
    };

    if magnitudes().any(|v| !v.is_finite()) {
        return Err(QuboError::DegenerateProblem);
    }
    let min_delta_energy = magnitudes()
        .filter(|&v| v > 0.0)
        .fold(f64::INFINITY, f64::min);
    if !min_delta_energy.is_finite() {
        return Err(QuboError::DegenerateProblem);
    }

    for c in &ising.couplers {
        let j = c.value.abs();
        field[c.start] += j;
        field[c.end] += j;
    }
    let max_delta_energy = field.iter().copied().fold(0.0, f64::max);

    let hot = std::f64::consts::LN_2 / max_delta_energy;
    let cold = 100f64.ln() / min_delta_energy;
    // subnormal minima overflow `cold`, overflowing field sums zero `hot`
    if !max_delta_energy.is_finite() || !(hot.is_finite() && hot > 0.0) || !cold.is_finite() {
        return Err(QuboError::DegenerateProblem);
    }
    Ok(BetaRange { hot, cold })
}

/// Computes `num_betas` non-decreasing betas from hot to cold.
///
/// The first and last entries are exactly [`BetaRange::hot`] and
/// [`BetaRange::cold`].
///
/// # Examples
///
/// ```
/// use snp_qubo::ising::IsingModel;
/// use snp_qubo::schedule::{beta_range, beta_schedule, ScheduleMode};
///
/// let ising = IsingModel::from_qubo(&[1.0, 2.0, 0.0, -3.0], 2, 0.0).unwrap();
/// let betas = beta_schedule(&ising, 5, ScheduleMode::Geometric).unwrap();
/// let range = beta_range(&ising).unwrap();
/// assert_eq!(betas.len(), 5);
/// assert_eq!(betas[0], range.hot);
/// assert_eq!(betas[4], range.cold);
/// ```
pub fn beta_schedule(ising: &IsingModel, num_betas: usize, mode: ScheduleMode) -> Result<Vec<f64>> {
    if num_betas < 2 {
        return Err(QuboError::invalid_parameter(format!(
            "num_betas must be at least 2, got {num_betas}"
        )));
    }
    let BetaRange { hot, cold } = beta_range(ising)?;
    debug!(hot, cold, num_betas, ?mode, "computed beta range");

    Ok(match mode {
        ScheduleMode::Linear => linear_space(hot, cold, num_betas),
        ScheduleMode::Geometric => geometric_space(hot, cold, num_betas),
    })
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linear_space(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            values[n - 1] = end;
            values
        }
    }
}

/// `n` values evenly spaced in `log10` from `start` to `end` inclusive.
///
/// Both endpoints are written back exactly to avoid `log10`/`powf`
/// round-trip error.
pub fn geometric_space(start: f64, end: f64, n: usize) -> Vec<f64> {
    let mut values: Vec<f64> = linear_space(start.log10(), end.log10(), n)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect();
    if let Some(first) = values.first_mut() {
        *first = start;
    }
    if n > 1 {
        values[n - 1] = end;
    }
    values
}
