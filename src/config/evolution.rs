use super::traits::{check_unit_interval, ConfigSection};
use crate::engines::generation::ast::MAX_ARITY;
use crate::error::SignalGpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub max_generations: usize,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub init_method: InitMethod,
    pub init_min_depth: usize,
    pub init_max_depth: usize,
    pub mutation_min_depth: usize,
    pub mutation_max_depth: usize,
    pub max_tree_size: usize,       // Node count limit applied after crossover/mutation
    pub hall_of_fame_size: usize,
    pub ephemeral_min: f64,         // Ephemeral constants are drawn from [min, max)
    pub ephemeral_max: f64,
    pub seed: u64,
    pub parallel_evaluation: bool,
}

/// Shape of randomly generated trees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitMethod {
    /// Every leaf sits at the sampled depth
    Full,
    /// Leaves may appear at any depth up to the sampled one
    Grow,
    /// Alternate Full and Grow per tree
    HalfAndHalf,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 400,
            max_generations: 200,
            crossover_rate: 0.5,
            mutation_rate: 0.4,
            tournament_size: 5,
            init_method: InitMethod::Full,
            init_min_depth: 1,
            init_max_depth: 3,
            mutation_min_depth: 1,
            mutation_max_depth: 3,
            max_tree_size: 80,
            hall_of_fame_size: 10,
            ephemeral_min: 0.0,
            ephemeral_max: 1.0,
            seed: 42,
            parallel_evaluation: true,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), SignalGpError> {
        if self.population_size == 0 {
            return Err(SignalGpError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(SignalGpError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }
        check_unit_interval(Self::section_name(), "crossover_rate", self.crossover_rate)?;
        check_unit_interval(Self::section_name(), "mutation_rate", self.mutation_rate)?;
        if self.init_min_depth > self.init_max_depth {
            return Err(SignalGpError::Configuration(format!(
                "init_min_depth ({}) exceeds init_max_depth ({})",
                self.init_min_depth, self.init_max_depth
            )));
        }
        if self.mutation_min_depth > self.mutation_max_depth {
            return Err(SignalGpError::Configuration(format!(
                "mutation_min_depth ({}) exceeds mutation_max_depth ({})",
                self.mutation_min_depth, self.mutation_max_depth
            )));
        }
        if self.max_tree_size == 0 {
            return Err(SignalGpError::Configuration(
                "Maximum tree size must be at least 1".to_string(),
            ));
        }
        let largest_initial = full_tree_size(self.init_max_depth);
        if largest_initial > self.max_tree_size {
            return Err(SignalGpError::Configuration(format!(
                "Trees of init_max_depth {} can reach {} nodes, above max_tree_size {}",
                self.init_max_depth, largest_initial, self.max_tree_size
            )));
        }
        if self.hall_of_fame_size == 0 {
            return Err(SignalGpError::Configuration(
                "Hall of Fame size must be at least 1".to_string(),
            ));
        }
        if !self.ephemeral_min.is_finite()
            || !self.ephemeral_max.is_finite()
            || self.ephemeral_min >= self.ephemeral_max
        {
            return Err(SignalGpError::Configuration(format!(
                "Ephemeral constant range [{}, {}) is empty or not finite",
                self.ephemeral_min, self.ephemeral_max
            )));
        }
        Ok(())
    }
}

/// Node count of a complete tree of `depth` where every call takes `MAX_ARITY` children
fn full_tree_size(depth: usize) -> usize {
    (0..=depth).fold(0usize, |total, level| {
        total.saturating_add(MAX_ARITY.saturating_pow(level.min(u32::MAX as usize) as u32))
    })
}
