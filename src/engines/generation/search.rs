use super::evolution_engine::{EvolutionEngine, ProgressCallback};
use super::hall_of_fame::HallOfFame;
use super::individual::Individual;
use super::progress::LogProgressCallback;
use crate::config::{AppConfig, SignalConfig};
use crate::data::{FeatureTable, TargetSeries};
use crate::engines::evaluation::{CompiledSignal, SignalCompiler};
use crate::error::{Result, SignalGpError};
use crate::functions::PrimitiveSet;
use crate::types::{GenerationStats, TerminationReason};
use std::sync::Arc;

/// Everything a finished search hands back to the caller
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub hall_of_fame: HallOfFame,
    pub primitive_set: Arc<PrimitiveSet>,
    pub feature_names: Vec<String>,
    pub history: Vec<GenerationStats>,
    pub generations_run: usize,
    pub termination: TerminationReason,
    signal: SignalConfig,
}

impl SearchOutcome {
    /// Hall of Fame, primitive set and the training feature columns in order
    pub fn into_parts(self) -> (HallOfFame, Arc<PrimitiveSet>, Vec<String>) {
        (self.hall_of_fame, self.primitive_set, self.feature_names)
    }

    pub fn best(&self) -> Option<&Individual> {
        self.hall_of_fame.best()
    }

    /// Compile with the same signal mapping the search scored against
    pub fn compile_signal(&self, individual: &Individual) -> Result<CompiledSignal> {
        SignalCompiler::new(Arc::clone(&self.primitive_set), self.signal.clone())
            .compile(individual, &self.feature_names)
    }
}

/// Evolve signal rules with default settings apart from population, budget and seed
pub fn search(
    train_features: &FeatureTable,
    train_targets: &TargetSeries,
    val_features: &FeatureTable,
    val_targets: &TargetSeries,
    population_size: usize,
    max_generations: usize,
    seed: u64,
) -> Result<SearchOutcome> {
    let mut config = AppConfig::default();
    config.evolution.population_size = population_size;
    config.evolution.max_generations = max_generations;
    config.evolution.seed = seed;

    search_with_config(&config, train_features, train_targets, val_features, val_targets)
}

pub fn search_with_config(
    config: &AppConfig,
    train_features: &FeatureTable,
    train_targets: &TargetSeries,
    val_features: &FeatureTable,
    val_targets: &TargetSeries,
) -> Result<SearchOutcome> {
    search_with_callback(
        config,
        train_features,
        train_targets,
        val_features,
        val_targets,
        LogProgressCallback,
    )
}

pub fn search_with_callback<C: ProgressCallback>(
    config: &AppConfig,
    train_features: &FeatureTable,
    train_targets: &TargetSeries,
    val_features: &FeatureTable,
    val_targets: &TargetSeries,
    callback: C,
) -> Result<SearchOutcome> {
    validate_inputs(config, train_features, train_targets, val_features, val_targets)?;
    config.validate()?;

    let feature_names = train_features.column_names().to_vec();
    let evo = &config.evolution;
    let pset = Arc::new(
        PrimitiveSet::new(feature_names.clone())
            .with_ephemeral_range(evo.ephemeral_min..evo.ephemeral_max)?,
    );

    log::info!(
        "Starting search: {} features, {} training rows, {} validation rows, population {}, {} generations, seed {}",
        feature_names.len(),
        train_features.n_rows(),
        val_features.n_rows(),
        evo.population_size,
        evo.max_generations,
        evo.seed
    );

    let mut engine = EvolutionEngine::new(config.clone(), Arc::clone(&pset));
    let summary = engine.run(train_features, train_targets, val_features, val_targets, callback)?;

    Ok(SearchOutcome {
        hall_of_fame: engine.into_hall_of_fame(),
        primitive_set: pset,
        feature_names,
        history: summary.history,
        generations_run: summary.generations_run,
        termination: summary.termination,
        signal: config.signal.clone(),
    })
}

/// Freeze a Hall-of-Fame entry into a signal function using the default mapping
pub fn compile_signal(
    individual: &Individual,
    primitive_set: &Arc<PrimitiveSet>,
    feature_names: &[String],
) -> Result<CompiledSignal> {
    SignalCompiler::new(Arc::clone(primitive_set), SignalConfig::default())
        .compile(individual, feature_names)
}

fn validate_inputs(
    config: &AppConfig,
    train_features: &FeatureTable,
    train_targets: &TargetSeries,
    val_features: &FeatureTable,
    val_targets: &TargetSeries,
) -> Result<()> {
    if config.evolution.population_size == 0 {
        return Err(SignalGpError::InvalidInput(
            "Population size must be at least 1".to_string(),
        ));
    }
    if train_features.n_columns() == 0 {
        return Err(SignalGpError::InvalidInput(
            "Training feature table has no columns".to_string(),
        ));
    }

    for (label, features, targets) in [
        ("training", train_features, train_targets),
        ("validation", val_features, val_targets),
    ] {
        if features.n_rows() == 0 || targets.is_empty() {
            return Err(SignalGpError::InvalidInput(format!("The {} split is empty", label)));
        }
        if features.n_rows() != targets.len() {
            return Err(SignalGpError::InvalidInput(format!(
                "The {} split has {} feature rows but {} targets",
                label,
                features.n_rows(),
                targets.len()
            )));
        }
        if let Some(column) = features.first_non_finite_column() {
            return Err(SignalGpError::InvalidInput(format!(
                "Column '{}' of the {} split contains NaN or infinite values",
                column, label
            )));
        }
        if let Some(pos) = targets.values().iter().position(|v| !v.is_finite()) {
            return Err(SignalGpError::InvalidInput(format!(
                "{} target at row {} is not finite",
                label, pos
            )));
        }
        if let Some(pos) = targets.values().iter().position(|&v| v < -1.0) {
            return Err(SignalGpError::InvalidInput(format!(
                "{} target at row {} is below -1 ({})",
                label,
                pos,
                targets.values()[pos]
            )));
        }
    }

    for name in train_features.column_names() {
        if val_features.column(name).is_none() {
            return Err(SignalGpError::InvalidInput(format!(
                "Validation split is missing feature column '{}'",
                name
            )));
        }
        if let Some(column) = train_features.column(name) {
            if column.windows(2).all(|w| w[0] == w[1]) {
                log::warn!("Feature '{}' is constant over the training split", name);
            }
        }
    }

    Ok(())
}
