pub mod engine;
pub mod returns;

pub use engine::{HallOfFameReportEntry, MetricsEngine, SplitSummary};
