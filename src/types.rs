use serde::{Deserialize, Serialize};

/// Fitness statistics recorded after each generation's evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub max_fitness: f64,
    pub mean_fitness: f64,
    pub min_fitness: f64,
    pub evaluations: usize,       // Individuals scored this generation
    pub size_reverts: usize,      // Offspring rejected by the size limit
    pub hall_of_fame_best: f64,
    pub validation_return: f64,   // Cumulative return of the best-ever individual on validation
}

/// Why the evolutionary loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    GenerationBudget,
    EarlyStop,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::GenerationBudget => write!(f, "generation budget exhausted"),
            TerminationReason::EarlyStop => write!(f, "validation target reached"),
        }
    }
}
