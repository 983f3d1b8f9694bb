pub mod fitness;
pub mod signal;

pub use fitness::{FitnessBreakdown, FitnessEvaluator, FitnessTier};
pub use signal::{ColumnView, CompiledSignal, SignalCompiler};
