use crate::error::{Result, SignalGpError};
use chrono::{DateTime, Utc};
use polars::prelude::*;
use std::collections::HashSet;
use std::ops::Range;

/// Immutable, time-ordered table of named numeric feature columns.
///
/// Columns are stored column-major. Every column has exactly `n_rows` values and
/// the optional timestamp index, when present, has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: Option<Vec<DateTime<Utc>>>,
    n_rows: usize,
}

impl FeatureTable {
    pub fn new(names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(SignalGpError::InvalidInput(format!(
                "{} column names given for {} columns",
                names.len(),
                columns.len()
            )));
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(SignalGpError::InvalidInput(format!(
                    "Duplicate feature column '{}'",
                    name
                )));
            }
        }

        let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
        for (name, column) in names.iter().zip(&columns) {
            if column.len() != n_rows {
                return Err(SignalGpError::InvalidInput(format!(
                    "Column '{}' has {} rows, expected {}",
                    name,
                    column.len(),
                    n_rows
                )));
            }
        }

        Ok(Self {
            names,
            columns,
            index: None,
            n_rows,
        })
    }

    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let (names, values): (Vec<String>, Vec<Vec<f64>>) =
            columns.into_iter().map(|(n, v)| (n.into(), v)).unzip();
        Self::new(names, values)
    }

    /// Build a table from a polars frame, casting every column to `Float64`
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let mut names = Vec::with_capacity(df.width());
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let casted = column.cast(&DataType::Float64)?;
            let values = casted.f64()?;
            if values.null_count() > 0 {
                return Err(SignalGpError::InvalidInput(format!(
                    "Column '{}' contains {} missing values",
                    column.name(),
                    values.null_count()
                )));
            }
            names.push(column.name().to_string());
            columns.push(values.into_no_null_iter().collect());
        }

        Self::new(names, columns)
    }

    /// Attach a chronological timestamp index
    pub fn with_index(mut self, index: Vec<DateTime<Utc>>) -> Result<Self> {
        if index.len() != self.n_rows {
            return Err(SignalGpError::InvalidInput(format!(
                "Index has {} entries but table has {} rows",
                index.len(),
                self.n_rows
            )));
        }
        if index.windows(2).any(|w| w[1] < w[0]) {
            return Err(SignalGpError::InvalidInput(
                "Index is not in chronological order".to_string(),
            ));
        }
        self.index = Some(index);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.column_index(name).map(|i| self.columns[i].as_slice())
    }

    pub fn column_at(&self, index: usize) -> &[f64] {
        &self.columns[index]
    }

    pub fn index(&self) -> Option<&[DateTime<Utc>]> {
        self.index.as_deref()
    }

    /// Rows `range` of every column, index included
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.n_rows {
            return Err(SignalGpError::InvalidInput(format!(
                "Row range {:?} out of bounds for {} rows",
                range, self.n_rows
            )));
        }
        Ok(Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c[range.clone()].to_vec()).collect(),
            index: self.index.as_ref().map(|idx| idx[range.clone()].to_vec()),
            n_rows: range.len(),
        })
    }

    /// Name of the first column holding a NaN or infinite value
    pub fn first_non_finite_column(&self) -> Option<&str> {
        self.names
            .iter()
            .zip(&self.columns)
            .find(|(_, c)| c.iter().any(|v| !v.is_finite()))
            .map(|(n, _)| n.as_str())
    }
}

/// Return-like values aligned row-for-row with a [`FeatureTable`]
#[derive(Debug, Clone, PartialEq)]
pub struct TargetSeries {
    values: Vec<f64>,
}

impl TargetSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn from_series(series: &Series) -> Result<Self> {
        let casted = series.cast(&DataType::Float64)?;
        let values = casted.f64()?;
        if values.null_count() > 0 {
            return Err(SignalGpError::InvalidInput(format!(
                "Target series '{}' contains {} missing values",
                series.name(),
                values.null_count()
            )));
        }
        Ok(Self::new(values.into_no_null_iter().collect()))
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.values.len() {
            return Err(SignalGpError::InvalidInput(format!(
                "Row range {:?} out of bounds for {} targets",
                range,
                self.values.len()
            )));
        }
        Ok(Self::new(self.values[range].to_vec()))
    }
}

impl From<Vec<f64>> for TargetSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_table() -> FeatureTable {
        FeatureTable::from_columns(vec![
            ("mom_3", vec![0.1, -0.2, 0.3, 0.4]),
            ("vol_6", vec![1.0, 1.1, 1.2, 1.3]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape_and_lookup() {
        let table = sample_table();
        assert_eq!(table.n_rows(), 4);
        assert_eq!(table.n_columns(), 2);
        assert_eq!(table.column_index("vol_6"), Some(1));
        assert_eq!(table.column("mom_3").unwrap()[1], -0.2);
        assert!(table.column("missing").is_none());
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = FeatureTable::from_columns(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert!(matches!(result, Err(SignalGpError::InvalidInput(_))));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FeatureTable::from_columns(vec![("a", vec![1.0]), ("a", vec![2.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_slice_keeps_index_aligned() {
        let index: Vec<_> = (1..=4)
            .map(|m| Utc.with_ymd_and_hms(2020, m, 1, 0, 0, 0).unwrap())
            .collect();
        let table = sample_table().with_index(index.clone()).unwrap();
        let sliced = table.slice(1..3).unwrap();

        assert_eq!(sliced.n_rows(), 2);
        assert_eq!(sliced.column("vol_6").unwrap(), &[1.1, 1.2]);
        assert_eq!(sliced.index().unwrap(), &index[1..3]);
    }

    #[test]
    fn test_unordered_index_rejected() {
        let mut index: Vec<_> = (1..=4)
            .map(|m| Utc.with_ymd_and_hms(2020, m, 1, 0, 0, 0).unwrap())
            .collect();
        index.swap(0, 3);
        assert!(sample_table().with_index(index).is_err());
    }

    #[test]
    fn test_from_dataframe() {
        let df = df!(
            "mom_3" => &[0.5, -0.5, 1.5],
            "regime" => &[1i64, 0, 1]
        )
        .unwrap();
        let table = FeatureTable::from_dataframe(&df).unwrap();

        assert_eq!(table.column_names(), &["mom_3".to_string(), "regime".to_string()]);
        assert_eq!(table.column("regime").unwrap(), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_target_from_series() {
        let series = Series::new("ret".into(), &[0.01, -0.02, 0.03]);
        let targets = TargetSeries::from_series(&series).unwrap();
        assert_eq!(targets.values(), &[0.01, -0.02, 0.03]);
    }

    #[test]
    fn test_non_finite_detection() {
        let table =
            FeatureTable::from_columns(vec![("a", vec![1.0]), ("b", vec![f64::NAN])]).unwrap();
        assert_eq!(table.first_non_finite_column(), Some("b"));
        assert_eq!(sample_table().first_non_finite_column(), None);
    }
}
