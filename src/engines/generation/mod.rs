pub mod ast;
pub mod builder;
pub mod individual;
pub mod operators;
pub mod hall_of_fame;
pub mod early_stopping;
pub mod evolution_engine;
pub mod progress;
pub mod search;

pub use ast::Node;
pub use builder::TreeBuilder;
pub use individual::{Individual, IndividualMetadata, Origin};
pub use hall_of_fame::HallOfFame;
pub use early_stopping::{EarlyStopping, StopCheck};
pub use evolution_engine::{EvolutionEngine, EvolutionSummary, ProgressCallback};
pub use progress::{ChannelProgressCallback, LogProgressCallback, ProgressMessage};
pub use search::SearchOutcome;
