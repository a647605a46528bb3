//! Sweep kernel contract and the Metropolis reference kernel.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::ising::IsingModel;

/// A prepared annealing problem handed to a [`SweepKernel`].
#[derive(Debug, Clone, Copy)]
pub struct SweepRequest<'a> {
    /// Problem to sample. Couplers satisfy `start < end`.
    pub ising: &'a IsingModel,

    /// Number of independent anneals to attempt.
    pub num_samples: usize,

    /// Sweeps performed at each beta value.
    pub sweeps_per_beta: usize,

    /// Non-decreasing inverse temperatures.
    pub beta_schedule: &'a [f64],

    /// Seed for the kernel's random stream.
    pub seed: u64,

    /// Optional initial spin state per sample.
    pub initial_states: Option<&'a [Vec<i8>]>,
}

/// Completed samples returned by a kernel.
///
/// Holds only the samples that actually finished, so its length may be
/// smaller than the number requested. Energies exclude the Ising offset.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    num_variables: usize,
    states: Vec<i8>,
    energies: Vec<f64>,
}

impl SampleSet {
    /// Creates an empty set for states of `num_variables` spins.
    pub fn new(num_variables: usize) -> Self {
        Self {
            num_variables,
            states: Vec::new(),
            energies: Vec::new(),
        }
    }

    /// Appends a completed sample.
    ///
    /// # Panics
    /// Panics if `state` does not have `num_variables` spins.
    pub fn push(&mut self, state: &[i8], energy: f64) {
        assert_eq!(
            state.len(),
            self.num_variables,
            "sample state has wrong length"
        );
        self.states.extend_from_slice(state);
        self.energies.push(energy);
    }

    /// Number of completed samples.
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    pub fn num_variables(&self) -> usize {
        self.num_variables
    }

    /// Spin state of sample `index`, if it completed.
    pub fn state(&self, index: usize) -> Option<&[i8]> {
        if index >= self.len() {
            return None;
        }
        let start = index * self.num_variables;
        Some(&self.states[start..start + self.num_variables])
    }

    /// Energies of the completed samples, in sample order.
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Iterates over `(state, energy)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[i8], f64)> + '_ {
        (0..self.len()).filter_map(move |i| self.state(i).map(|s| (s, self.energies[i])))
    }

    /// Index of the lowest-energy sample; ties go to the earliest one.
    pub fn best(&self) -> Option<usize> {
        best_index(&self.energies)
    }
}

pub(crate) fn best_index(energies: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &e) in energies.iter().enumerate() {
        match best {
            Some(b) if energies[b] <= e => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Performs the spin-flip sweeps of an annealing run.
///
/// Implementations run `request.num_samples` independent anneals, each
/// through the whole beta schedule with `sweeps_per_beta` sweeps per beta,
/// and return the samples that completed. A kernel may stop early when
/// `cancel` is set; it should poll the flag at coarse granularity, not per
/// spin flip, so cancellation is best-effort.
pub trait SweepKernel: Send + Sync {
    fn sample(&self, request: &SweepRequest<'_>, cancel: Option<&AtomicBool>) -> SampleSet;
}

/// Single-spin-flip Metropolis sampler.
///
/// Each sample draws from its own ChaCha8 stream (`seed`, stream = sample
/// index), so results are identical whether samples run sequentially or in
/// parallel. The cancellation flag is polled once per beta value.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetropolisKernel {
    parallel: bool,
}

impl MetropolisKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anneals samples in parallel (requires the `parallel` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl SweepKernel for MetropolisKernel {
    fn sample(&self, request: &SweepRequest<'_>, cancel: Option<&AtomicBool>) -> SampleSet {
        let n = request.ising.num_variables();
        let adjacency = request.ising.adjacency();

        let run = |sample: usize| -> Option<(Vec<i8>, f64)> {
            let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
            rng.set_stream(sample as u64);

            let mut spins = match request.initial_states.and_then(|s| s.get(sample)) {
                Some(state) => state.clone(),
                None => (0..n)
                    .map(|_| if rng.random_bool(0.5) { 1 } else { -1 })
                    .collect(),
            };

            let completed = anneal_one(
                &request.ising.h,
                &adjacency,
                request.beta_schedule,
                request.sweeps_per_beta,
                &mut spins,
                &mut rng,
                cancel,
            );
            completed.then(|| {
                let energy = request.ising.energy(&spins);
                (spins, energy)
            })
        };

        let outcomes: Vec<Option<(Vec<i8>, f64)>> = if self.parallel {
            run_samples_parallel(request.num_samples, &run)
        } else {
            (0..request.num_samples).map(&run).collect()
        };

        let mut samples = SampleSet::new(n);
        for (state, energy) in outcomes.into_iter().flatten() {
            samples.push(&state, energy);
        }
        samples
    }
}

#[cfg(feature = "parallel")]
fn run_samples_parallel<F>(num_samples: usize, run: &F) -> Vec<Option<(Vec<i8>, f64)>>
where
    F: Fn(usize) -> Option<(Vec<i8>, f64)> + Sync,
{
    use rayon::prelude::*;
    (0..num_samples).into_par_iter().map(run).collect()
}

#[cfg(not(feature = "parallel"))]
fn run_samples_parallel<F>(num_samples: usize, run: &F) -> Vec<Option<(Vec<i8>, f64)>>
where
    F: Fn(usize) -> Option<(Vec<i8>, f64)> + Sync,
{
    (0..num_samples).map(run).collect()
}

/// Anneals one spin vector in place. Returns `false` if cancelled.
fn anneal_one<R: Rng>(
    h: &[f64],
    adjacency: &[Vec<(usize, f64)>],
    beta_schedule: &[f64],
    sweeps_per_beta: usize,
    spins: &mut [i8],
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> bool {
    for &beta in beta_schedule {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return false;
        }

        for _ in 0..sweeps_per_beta {
            metropolis_sweep(h, adjacency, beta, spins, rng);
        }
    }
    true
}

/// One Metropolis pass over every spin at inverse temperature `beta`.
pub(crate) fn metropolis_sweep<R: Rng>(
    h: &[f64],
    adjacency: &[Vec<(usize, f64)>],
    beta: f64,
    spins: &mut [i8],
    rng: &mut R,
) {
    for i in 0..spins.len() {
        let field = adjacency[i]
            .iter()
            .fold(h[i], |acc, &(j, coupling)| acc + coupling * f64::from(spins[j]));
        let delta = -2.0 * f64::from(spins[i]) * field;

        // Metropolis acceptance criterion
        if delta <= 0.0 || rng.random::<f64>() < (-beta * delta).exp() {
            spins[i] = -spins[i];
        }
    }
}
