use crate::data::{DataSplit, DatasetSplits};
use crate::engines::generation::individual::Origin;
use crate::engines::generation::search::SearchOutcome;
use crate::engines::metrics::returns::{
    equity_curve, exposure, max_drawdown, strategy_returns, total_return,
};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Performance of one signal over one split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub exposure: f64,
}

/// One Hall-of-Fame entry measured on every split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HallOfFameReportEntry {
    pub rank: usize,
    pub formula: String,
    pub fitness: f64,
    pub size: usize,
    /// Operator that produced the tree and the generation it appeared in
    pub origin: Origin,
    pub generation: usize,
    pub train: SplitSummary,
    pub validation: SplitSummary,
    pub test: SplitSummary,
}

pub struct MetricsEngine;

impl MetricsEngine {
    pub fn summarize(signal: &[f64], targets: &[f64]) -> SplitSummary {
        let equity = equity_curve(&strategy_returns(signal, targets));
        SplitSummary {
            total_return: total_return(&equity),
            max_drawdown: max_drawdown(&equity),
            exposure: exposure(signal),
        }
    }

    /// Re-run every Hall-of-Fame entry on train, validation and test
    pub fn hall_of_fame_report(
        outcome: &SearchOutcome,
        splits: &DatasetSplits,
    ) -> Result<Vec<HallOfFameReportEntry>> {
        outcome
            .hall_of_fame
            .iter()
            .enumerate()
            .map(|(rank, individual)| {
                let compiled = outcome.compile_signal(individual)?;
                let measure = |split: &DataSplit| -> Result<SplitSummary> {
                    let signal = compiled.apply(&split.features)?;
                    Ok(Self::summarize(&signal, split.targets.values()))
                };

                Ok(HallOfFameReportEntry {
                    rank,
                    formula: individual.to_formula(&outcome.primitive_set),
                    fitness: individual.rank_fitness(),
                    size: individual.size(),
                    origin: individual.metadata.origin,
                    generation: individual.metadata.generation,
                    train: measure(&splits.train)?,
                    validation: measure(&splits.validation)?,
                    test: measure(&splits.test)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ChronologicalSplitter, FeatureTable, TargetSeries};
    use crate::engines::generation::search::search;

    #[test]
    fn test_summarize() {
        let summary = MetricsEngine::summarize(&[1.0, 0.0, 1.0, 1.0], &[0.1, 0.5, -0.5, 0.2]);
        // equity 1.1, 1.1, 0.55, 0.66
        assert!((summary.total_return - (-0.34)).abs() < 1e-12);
        assert!((summary.max_drawdown - 0.5).abs() < 1e-12);
        assert_eq!(summary.exposure, 0.75);
    }

    #[test]
    fn test_flat_signal_summary() {
        let summary = MetricsEngine::summarize(&[0.0; 3], &[0.1, -0.1, 0.2]);
        assert_eq!(summary, SplitSummary { total_return: 0.0, max_drawdown: 0.0, exposure: 0.0 });
    }

    #[test]
    fn test_report_covers_every_entry() {
        let x: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let y: Vec<f64> = x.iter().map(|v| v * 0.01).collect();
        let table = FeatureTable::from_columns(vec![("x", x)]).unwrap();
        let targets = TargetSeries::new(y);
        let splits = ChronologicalSplitter::default().split(&table, &targets).unwrap();

        let outcome = search(
            &splits.train.features,
            &splits.train.targets,
            &splits.validation.features,
            &splits.validation.targets,
            10,
            2,
            7,
        )
        .unwrap();

        let report = MetricsEngine::hall_of_fame_report(&outcome, &splits).unwrap();
        assert_eq!(report.len(), outcome.hall_of_fame.len());
        for (rank, entry) in report.iter().enumerate() {
            assert_eq!(entry.rank, rank);
            assert!(entry.train.exposure >= 0.0 && entry.train.exposure <= 1.0);
            assert!(entry.generation <= outcome.generations_run);
            if entry.origin == Origin::Initial {
                assert_eq!(entry.generation, 0);
            }
        }
    }
}
