//! Correlation matrices to SNP sets through every stage of the pipeline.

use snp_qubo::anneal::{AnnealConfig, AnnealRunner};
use snp_qubo::backend::{
    solve_with_backend, AnnealingBackend, TabuBackend, TabuConfig, TemperingBackend,
    TemperingConfig,
};
use snp_qubo::matrix::CorrelationMatrix;
use snp_qubo::qubo::{QuboMatrix, QuboParams};
use snp_qubo::schedule::{beta_range, beta_schedule, ScheduleMode};
use snp_qubo::solution::snp_sets_from_spins;

fn scenario_corr() -> CorrelationMatrix<'static> {
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

fn scenario_qubo() -> QuboMatrix {
    let stat = scenario_corr();
    let bio = scenario_corr();
    let mut qubo = QuboMatrix::new(2, 4);
    qubo.fill_blended(&stat, &bio, &scenario_params()).unwrap();
    qubo
}

fn spins_to_bits(spins: &[i8]) -> Vec<u8> {
    spins.iter().map(|&s| u8::from(s == 1)).collect()
}

#[test]
fn test_scenario_is_deterministic() {
    let qubo = scenario_qubo();
    let config = AnnealConfig::default().with_seed(2024);

    let first = AnnealRunner::run(&qubo, &config).unwrap();
    let second = AnnealRunner::run(&qubo, &config).unwrap();

    assert_eq!(first.best_spins, second.best_spins);
    assert_eq!(first.snp_sets, second.snp_sets);
    assert_eq!(first.energies, second.energies);
    assert_eq!(first.best_energy, second.best_energy);
}

#[test]
fn test_scenario_solution_shape() {
    let qubo = scenario_qubo();
    let result = AnnealRunner::run(&qubo, &AnnealConfig::default().with_seed(2024)).unwrap();

    assert!(!result.is_partial());
    assert_eq!(result.completed_samples, 10);
    assert_eq!(result.sweeps_per_beta, 1);
    assert_eq!(result.beta_schedule.len(), 1001);
    assert_eq!(result.snp_sets.len(), 2);
    for set in &result.snp_sets {
        assert_eq!(set.len(), 3, "clique {set:?} should hold K SNPs");
        assert!(set.iter().all(|&snp| snp < 4));
    }
}

#[test]
fn test_scenario_energy_consistent_across_forms() {
    let qubo = scenario_qubo();
    let ising = qubo.to_ising();
    let result = AnnealRunner::run(&qubo, &AnnealConfig::default().with_seed(2024)).unwrap();

    let qubo_energy = qubo.energy(&spins_to_bits(&result.best_spins)).unwrap();
    let ising_energy = ising.total_energy(&result.best_spins).unwrap();
    assert!((qubo_energy - result.best_energy).abs() < 1e-9);
    assert!((ising_energy - result.best_energy).abs() < 1e-9);

    let sets = snp_sets_from_spins(&result.best_spins, 2, 4).unwrap();
    assert_eq!(sets, result.snp_sets);
}

#[test]
fn test_scenario_best_is_lowest_sample() {
    let qubo = scenario_qubo();
    let result = AnnealRunner::run(&qubo, &AnnealConfig::default().with_seed(77)).unwrap();
    let lowest = result.energies.iter().cloned().fold(f64::INFINITY, f64::min);
    assert_eq!(result.best_energy, lowest);
    assert_eq!(result.energies[result.best_sample], lowest);
}

#[test]
fn test_scenario_schedule_spans_range() {
    let ising = scenario_qubo().to_ising();
    let range = beta_range(&ising).unwrap();
    assert!(range.hot > 0.0 && range.hot < range.cold);

    for mode in [ScheduleMode::Linear, ScheduleMode::Geometric] {
        let betas = beta_schedule(&ising, 50, mode).unwrap();
        assert_eq!(betas.len(), 50);
        assert_eq!(betas[0], range.hot);
        assert_eq!(betas[49], range.cold);
        assert!(betas.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_scenario_backends_agree_on_shape() {
    let qubo = scenario_qubo();
    let annealed = solve_with_backend(&qubo, &AnnealingBackend::default()).unwrap();
    let tempered = solve_with_backend(
        &qubo,
        &TemperingBackend::new(TemperingConfig::default().with_seed(9)),
    )
    .unwrap();
    let tabu = solve_with_backend(&qubo, &TabuBackend::new(TabuConfig::default().with_seed(9)))
        .unwrap();

    for sets in [&annealed, &tempered, &tabu] {
        assert_eq!(sets.len(), 2);
        assert!(sets.iter().flatten().all(|&snp| snp < 4));
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_report_serializes_to_json() {
    let qubo = scenario_qubo();
    let result = AnnealRunner::run(&qubo, &AnnealConfig::default().with_seed(2024)).unwrap();

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"snp_sets\""));
    assert!(json.contains("\"beta_schedule\""));

    let back: snp_qubo::anneal::AnnealResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.snp_sets, result.snp_sets);
    assert_eq!(back.best_spins, result.best_spins);
    assert!((back.best_energy - result.best_energy).abs() < 1e-9);

    let config = AnnealConfig::default().with_initial_states(vec![vec![1, -1, 1]; 10]);
    let json = serde_json::to_string(&config).unwrap();
    let back: AnnealConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
