use crate::config::EarlyStoppingConfig;
use crate::engines::evaluation::{ColumnView, SignalCompiler};
use crate::engines::generation::individual::Individual;
use crate::engines::metrics::returns::cumulative_return;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCheck {
    pub validation_return: f64,
    pub should_stop: bool,
}

/// Halts the search once the best-ever individual's cumulative return on the
/// validation split reaches the target.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    config: EarlyStoppingConfig,
}

impl EarlyStopping {
    pub fn new(config: EarlyStoppingConfig) -> Self {
        Self { config }
    }

    pub fn check(
        &self,
        best: Option<&Individual>,
        compiler: &SignalCompiler,
        validation: &ColumnView<'_>,
        validation_targets: &[f64],
    ) -> StopCheck {
        let validation_return = match best {
            Some(individual) => {
                let signal = compiler.signal(individual.root(), validation);
                cumulative_return(&signal, validation_targets)
            }
            None => 0.0,
        };

        StopCheck {
            validation_return,
            should_stop: best.is_some()
                && self.config.enabled
                && validation_return >= self.config.validation_target,
        }
    }
}
