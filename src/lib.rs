pub mod config;
pub mod data;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use engines::generation::search::{
    compile_signal, search, search_with_callback, search_with_config, SearchOutcome,
};
pub use error::{Result, SignalGpError};
