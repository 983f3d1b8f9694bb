pub mod traits;
pub mod evolution;
pub mod fitness;
pub mod manager;

pub use manager::AppConfig;
pub use evolution::{EvolutionConfig, InitMethod};
pub use fitness::{EarlyStoppingConfig, FitnessConfig, SignalConfig};
pub use traits::ConfigSection;
