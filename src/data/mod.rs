pub mod splitter;
pub mod table;

pub use splitter::{ChronologicalSplitter, DataSplit, DatasetSplits};
pub use table::{FeatureTable, TargetSeries};
