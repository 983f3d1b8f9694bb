use anyhow::{Context, Result};
use chrono::{Duration, TimeZone, Utc};
use polars::prelude::*;
use signalgp::config::AppConfig;
use signalgp::data::{ChronologicalSplitter, FeatureTable, TargetSeries};
use signalgp::engines::metrics::MetricsEngine;

const ROWS: usize = 300;

/// Deterministic demo dataset: a slow cycle, its lagged momentum and a distractor
fn synthetic_dataset() -> Result<(FeatureTable, TargetSeries)> {
    let cycle: Vec<f64> = (0..ROWS).map(|i| (i as f64 * 0.35).sin()).collect();
    let momentum: Vec<f64> = (0..ROWS)
        .map(|i| if i >= 3 { cycle[i] - cycle[i - 3] } else { 0.0 })
        .collect();
    let distractor: Vec<f64> = (0..ROWS).map(|i| ((i * 37) % 11) as f64 / 11.0 - 0.5).collect();
    let returns: Vec<f64> = cycle.iter().map(|c| 0.02 * c).collect();

    let df = df![
        "cycle" => cycle,
        "mom_3" => momentum,
        "distractor" => distractor,
    ]?;
    let start = Utc
        .with_ymd_and_hms(2000, 1, 31, 0, 0, 0)
        .single()
        .context("invalid start date")?;
    let index = (0..ROWS).map(|i| start + Duration::days(30 * i as i64)).collect();

    let features = FeatureTable::from_dataframe(&df)?.with_index(index)?;
    let targets = TargetSeries::from_series(&Series::new("ret".into(), returns))?;
    Ok((features, targets))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::load_layered(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => AppConfig::default(),
    };

    let (features, targets) = synthetic_dataset()?;
    let splits = ChronologicalSplitter::default().split(&features, &targets)?;
    log::info!(
        "Rows: train {} | validation {} | test {}",
        splits.train.len(),
        splits.validation.len(),
        splits.test.len()
    );

    let outcome = signalgp::search_with_config(
        &config,
        &splits.train.features,
        &splits.train.targets,
        &splits.validation.features,
        &splits.validation.targets,
    )?;

    for entry in MetricsEngine::hall_of_fame_report(&outcome, &splits)? {
        log::info!(
            "#{} fit {:.4} size {} ({:?}, gen {}) | train {:.4} (dd {:.3}) | val {:.4} | test {:.4} (exp {:.2}) | {}",
            entry.rank,
            entry.fitness,
            entry.size,
            entry.origin,
            entry.generation,
            entry.train.total_return,
            entry.train.max_drawdown,
            entry.validation.total_return,
            entry.test.total_return,
            entry.test.exposure,
            entry.formula
        );
    }

    Ok(())
}
