use signalgp::config::AppConfig;
use signalgp::data::{FeatureTable, TargetSeries};
use signalgp::engines::evaluation::{FitnessEvaluator, FitnessTier};
use signalgp::engines::generation::ProgressCallback;
use signalgp::types::{GenerationStats, TerminationReason};
use signalgp::{compile_signal, search, search_with_callback, search_with_config, SignalGpError};

const FAILURE_FLOOR: f64 = -1e9;

/// Progress callback that records what the engine reported
#[derive(Default)]
struct TestProgressCallback {
    started: Vec<usize>,
    completed: Vec<GenerationStats>,
    early_stop: Option<(usize, f64)>,
}

impl ProgressCallback for &mut TestProgressCallback {
    fn on_generation_start(&mut self, generation: usize) {
        self.started.push(generation);
    }

    fn on_generation_complete(&mut self, stats: &GenerationStats) {
        println!(
            "Generation {}: max {:.4}, mean {:.4}, HoF best {:.4}",
            stats.generation, stats.max_fitness, stats.mean_fitness, stats.hall_of_fame_best
        );
        self.completed.push(stats.clone());
    }

    fn on_early_stop(&mut self, generation: usize, validation_return: f64) {
        self.early_stop = Some((generation, validation_return));
    }
}

/// One feature alternating +1 / -1 with a +0.01 / -0.01 return on the same row
fn oscillating(rows: usize) -> (FeatureTable, TargetSeries) {
    let x: Vec<f64> = (0..rows).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
    let y: Vec<f64> = x.iter().map(|&v| if v > 0.0 { 0.01 } else { -0.01 }).collect();
    (
        FeatureTable::from_columns(vec![("x", x)]).unwrap(),
        TargetSeries::new(y),
    )
}

fn multi_feature(rows: usize, offset: usize) -> (FeatureTable, TargetSeries) {
    let wave: Vec<f64> = (offset..offset + rows).map(|i| (i as f64 * 0.4).sin()).collect();
    let slope: Vec<f64> = (offset..offset + rows).map(|i| (i as f64 * 0.4).cos()).collect();
    let noise: Vec<f64> = (offset..offset + rows)
        .map(|i| ((i * 7919) % 13) as f64 / 13.0 - 0.5)
        .collect();
    let returns: Vec<f64> = wave.iter().map(|w| 0.01 * w).collect();
    (
        FeatureTable::from_columns(vec![("wave", wave), ("slope", slope), ("noise", noise)])
            .unwrap(),
        TargetSeries::new(returns),
    )
}

#[test]
fn test_oscillating_feature_finds_non_losing_rule() {
    let (train, train_y) = oscillating(100);
    let (val, val_y) = oscillating(40);

    let outcome = search(&train, &train_y, &val, &val_y, 20, 5, 42).unwrap();

    assert!(!outcome.hall_of_fame.is_empty());
    assert!(outcome.hall_of_fame.len() <= 10);
    assert!(outcome.generations_run <= 5);
    let best = outcome.best().unwrap();
    assert!(best.fitness().unwrap() > FAILURE_FLOOR);
}

#[test]
fn test_all_zero_targets_never_qualify() {
    let (train, _) = oscillating(60);
    let (val, _) = oscillating(20);
    let zeros = TargetSeries::new(vec![0.0; 60]);
    let val_zeros = TargetSeries::new(vec![0.0; 20]);

    let outcome = search(&train, &zeros, &val, &val_zeros, 15, 3, 5).unwrap();

    let evaluator = FitnessEvaluator::default();
    let (expected, tier) = evaluator.apply_policy(0.0, 0.0);
    assert_eq!(tier, FitnessTier::SubThreshold);
    for individual in outcome.hall_of_fame.iter() {
        assert_eq!(individual.fitness(), Some(expected));
    }
    assert_eq!(outcome.termination, TerminationReason::GenerationBudget);
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let (train, train_y) = multi_feature(120, 0);
    let (val, val_y) = multi_feature(40, 120);

    let first = search(&train, &train_y, &val, &val_y, 30, 6, 1234).unwrap();
    let second = search(&train, &train_y, &val, &val_y, 30, 6, 1234).unwrap();

    assert_eq!(first.generations_run, second.generations_run);
    assert_eq!(first.hall_of_fame.entries(), second.hall_of_fame.entries());
    assert_eq!(first.history, second.history);
}

#[test]
fn test_hall_of_fame_sorted_and_bounded() {
    let (train, train_y) = multi_feature(120, 0);
    let (val, val_y) = multi_feature(40, 120);
    let mut config = AppConfig::default();
    config.evolution.population_size = 25;
    config.evolution.max_generations = 4;
    config.evolution.hall_of_fame_size = 4;
    config.early_stopping.enabled = false;

    let outcome = search_with_config(&config, &train, &train_y, &val, &val_y).unwrap();

    assert_eq!(outcome.hall_of_fame.capacity(), 4);
    assert!(outcome.hall_of_fame.len() <= 4);
    let fitness: Vec<f64> = outcome.hall_of_fame.iter().map(|i| i.fitness().unwrap()).collect();
    assert!(fitness.windows(2).all(|w| w[0] >= w[1]));
    assert!(outcome.hall_of_fame.iter().all(|i| i.size() <= 80));
}

#[test]
fn test_progress_and_early_stop() {
    let (train, train_y) = oscillating(80);
    let (val, val_y) = oscillating(30);
    let mut config = AppConfig::default();
    config.evolution.population_size = 20;
    config.evolution.max_generations = 10;
    config.early_stopping.validation_target = 0.0;

    let mut callback = TestProgressCallback::default();
    let outcome =
        search_with_callback(&config, &train, &train_y, &val, &val_y, &mut callback).unwrap();

    assert_eq!(outcome.termination, TerminationReason::EarlyStop);
    assert_eq!(callback.completed.len(), outcome.generations_run + 1);
    assert_eq!(callback.started, (0..=outcome.generations_run).collect::<Vec<_>>());
    let (generation, validation_return) = callback.early_stop.unwrap();
    assert_eq!(generation, outcome.generations_run);
    assert!(validation_return >= 0.0);
}

#[test]
fn test_budget_exhausted_without_target() {
    let (train, train_y) = oscillating(60);
    let (val, val_y) = oscillating(20);
    let mut config = AppConfig::default();
    config.evolution.population_size = 10;
    config.evolution.max_generations = 3;
    config.early_stopping.validation_target = 1e6;

    let mut callback = TestProgressCallback::default();
    let outcome =
        search_with_callback(&config, &train, &train_y, &val, &val_y, &mut callback).unwrap();

    assert_eq!(outcome.termination, TerminationReason::GenerationBudget);
    assert_eq!(outcome.generations_run, 3);
    assert_eq!(callback.completed.len(), 4);
    assert!(callback.early_stop.is_none());
}

#[test]
fn test_compiled_signal_is_binary_and_deterministic() {
    let (train, train_y) = multi_feature(100, 0);
    let (val, val_y) = multi_feature(40, 100);
    let (test, _) = multi_feature(40, 140);

    let (hof, pset, names) = search(&train, &train_y, &val, &val_y, 20, 3, 9)
        .unwrap()
        .into_parts();
    assert_eq!(names, vec!["wave", "slope", "noise"]);

    for individual in hof.iter() {
        let compiled = compile_signal(individual, &pset, &names).unwrap();
        let first = compiled.apply(&test).unwrap();
        let second = compiled.apply(&test).unwrap();
        assert_eq!(first.len(), 40);
        assert_eq!(first, second);
        assert!(first.iter().all(|&s| s == 0.0 || s == 1.0));
    }
}

#[test]
fn test_input_contract_violations() {
    let (train, train_y) = oscillating(20);
    let (val, val_y) = oscillating(10);

    let is_invalid = |r: signalgp::Result<_>| matches!(r, Err(SignalGpError::InvalidInput(_)));

    assert!(is_invalid(search(&train, &train_y, &val, &val_y, 0, 2, 1)));
    assert!(is_invalid(search(&train, &val_y, &val, &val_y, 5, 2, 1)));

    let empty = FeatureTable::from_columns(vec![("x", Vec::new())]).unwrap();
    let no_targets = TargetSeries::new(Vec::new());
    assert!(is_invalid(search(&train, &train_y, &empty, &no_targets, 5, 2, 1)));

    let other = FeatureTable::from_columns(vec![("z", vec![0.0; 10])]).unwrap();
    assert!(is_invalid(search(&train, &train_y, &other, &val_y, 5, 2, 1)));

    let mut with_nan = vec![1.0; 20];
    with_nan[4] = f64::NAN;
    let nan_table = FeatureTable::from_columns(vec![("x", with_nan)]).unwrap();
    assert!(is_invalid(search(&nan_table, &train_y, &val, &val_y, 5, 2, 1)));
}

#[test]
fn test_initial_depth_beyond_size_limit_rejected() {
    let (train, train_y) = oscillating(20);
    let (val, val_y) = oscillating(10);
    let mut config = AppConfig::default();
    config.evolution.population_size = 10;
    config.evolution.max_tree_size = 3;
    config.evolution.init_min_depth = 3;
    config.evolution.init_max_depth = 3;

    assert!(matches!(
        search_with_config(&config, &train, &train_y, &val, &val_y),
        Err(SignalGpError::Configuration(_))
    ));
}
