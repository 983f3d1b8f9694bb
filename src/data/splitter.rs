use super::table::{FeatureTable, TargetSeries};
use crate::error::{Result, SignalGpError};
use chrono::{DateTime, Utc};
use std::ops::Range;

/// One contiguous, chronologically ordered slice of the dataset
#[derive(Debug, Clone)]
pub struct DataSplit {
    pub features: FeatureTable,
    pub targets: TargetSeries,
    pub rows: Range<usize>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DataSplit {
    fn new(features: &FeatureTable, targets: &TargetSeries, rows: Range<usize>) -> Result<Self> {
        let sliced = features.slice(rows.clone())?;
        let start = sliced.index().and_then(|idx| idx.first().copied());
        let end = sliced.index().and_then(|idx| idx.last().copied());
        Ok(Self {
            targets: targets.slice(rows.clone())?,
            features: sliced,
            rows,
            start,
            end,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Train / validation / test partition, in that chronological order
#[derive(Debug, Clone)]
pub struct DatasetSplits {
    pub train: DataSplit,
    pub validation: DataSplit,
    pub test: DataSplit,
}

/// Splits rows by position: the first `train_pct` rows train, the next
/// `validation_pct` validate, and the remainder is held out for testing.
#[derive(Debug, Clone, Copy)]
pub struct ChronologicalSplitter {
    pub train_pct: f64,
    pub validation_pct: f64,
}

impl Default for ChronologicalSplitter {
    fn default() -> Self {
        Self {
            train_pct: 0.6,
            validation_pct: 0.2,
        }
    }
}

impl ChronologicalSplitter {
    pub fn new(train_pct: f64, validation_pct: f64) -> Result<Self> {
        if !(train_pct > 0.0 && validation_pct > 0.0 && train_pct + validation_pct < 1.0) {
            return Err(SignalGpError::Configuration(format!(
                "Invalid split proportions: train {} validation {}",
                train_pct, validation_pct
            )));
        }
        Ok(Self {
            train_pct,
            validation_pct,
        })
    }

    pub fn split(&self, features: &FeatureTable, targets: &TargetSeries) -> Result<DatasetSplits> {
        let total_rows = features.n_rows();
        if targets.len() != total_rows {
            return Err(SignalGpError::InvalidInput(format!(
                "Feature table has {} rows but target series has {}",
                total_rows,
                targets.len()
            )));
        }

        let train_end = (total_rows as f64 * self.train_pct) as usize;
        let validation_end = (total_rows as f64 * (self.train_pct + self.validation_pct)) as usize;

        if train_end == 0 || validation_end <= train_end || validation_end >= total_rows {
            return Err(SignalGpError::InvalidInput(format!(
                "Invalid split: {} rows cannot fill non-empty train/validation/test splits",
                total_rows
            )));
        }

        Ok(DatasetSplits {
            train: DataSplit::new(features, targets, 0..train_end)?,
            validation: DataSplit::new(features, targets, train_end..validation_end)?,
            test: DataSplit::new(features, targets, validation_end..total_rows)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn dataset(rows: usize) -> (FeatureTable, TargetSeries) {
        let values: Vec<f64> = (0..rows).map(|i| i as f64).collect();
        let start = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let index = (0..rows).map(|i| start + Duration::days(30 * i as i64)).collect();
        let table = FeatureTable::from_columns(vec![("x", values.clone())])
            .unwrap()
            .with_index(index)
            .unwrap();
        (table, TargetSeries::new(values))
    }

    #[test]
    fn test_sixty_twenty_twenty() {
        let (table, targets) = dataset(100);
        let splits = ChronologicalSplitter::default().split(&table, &targets).unwrap();

        assert_eq!(splits.train.rows, 0..60);
        assert_eq!(splits.validation.rows, 60..80);
        assert_eq!(splits.test.rows, 80..100);
        assert_eq!(splits.validation.targets.values()[0], 60.0);
        assert!(splits.train.end.unwrap() < splits.validation.start.unwrap());
        assert!(splits.validation.end.unwrap() < splits.test.start.unwrap());
    }

    #[test]
    fn test_too_few_rows() {
        let (table, targets) = dataset(2);
        assert!(ChronologicalSplitter::default().split(&table, &targets).is_err());
    }

    #[test]
    fn test_length_mismatch() {
        let (table, _) = dataset(10);
        let targets = TargetSeries::new(vec![0.0; 9]);
        assert!(ChronologicalSplitter::default().split(&table, &targets).is_err());
    }

    #[test]
    fn test_invalid_proportions() {
        assert!(ChronologicalSplitter::new(0.8, 0.3).is_err());
        assert!(ChronologicalSplitter::new(0.7, 0.2).is_ok());
    }
}
