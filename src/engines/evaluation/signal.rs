use crate::config::SignalConfig;
use crate::data::FeatureTable;
use crate::engines::generation::ast::Node;
use crate::engines::generation::individual::Individual;
use crate::error::{Result, SignalGpError};
use crate::functions::{primitives::stable_sigmoid, PrimitiveSet};
use std::sync::Arc;

/// Feature columns of a table, reordered to match a primitive set's terminals
#[derive(Debug, Clone)]
pub struct ColumnView<'a> {
    columns: Vec<&'a [f64]>,
    n_rows: usize,
}

impl<'a> ColumnView<'a> {
    pub fn resolve(table: &'a FeatureTable, feature_names: &[String]) -> Result<Self> {
        let columns = feature_names
            .iter()
            .map(|name| {
                table.column(name).ok_or_else(|| {
                    SignalGpError::Validation(format!("Feature table has no column '{}'", name))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            columns,
            n_rows: table.n_rows(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn columns(&self) -> &[&'a [f64]] {
        &self.columns
    }
}

/// Turns expression trees into 0/1 position series.
///
/// The tree is evaluated once per row, the raw score is squashed through the
/// clipped logistic function and the position is long (1.0) only when the
/// result is strictly above the cutoff. Evaluation draws no randomness, so the
/// same tree and table always give the same series.
#[derive(Debug, Clone)]
pub struct SignalCompiler {
    pset: Arc<PrimitiveSet>,
    config: SignalConfig,
}

impl SignalCompiler {
    pub fn new(pset: Arc<PrimitiveSet>, config: SignalConfig) -> Self {
        Self { pset, config }
    }

    pub fn primitive_set(&self) -> &Arc<PrimitiveSet> {
        &self.pset
    }

    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    pub fn raw_scores(&self, root: &Node, view: &ColumnView<'_>) -> Vec<f64> {
        (0..view.n_rows())
            .map(|row| root.evaluate(&self.pset, view.columns(), row))
            .collect()
    }

    pub fn position(&self, raw: f64) -> f64 {
        if stable_sigmoid(raw, self.config.clip_bound) > self.config.cutoff {
            1.0
        } else {
            0.0
        }
    }

    pub fn signal(&self, root: &Node, view: &ColumnView<'_>) -> Vec<f64> {
        self.raw_scores(root, view)
            .into_iter()
            .map(|raw| self.position(raw))
            .collect()
    }

    /// Freeze `individual` into a reusable signal function bound to `feature_names`
    pub fn compile(
        &self,
        individual: &Individual,
        feature_names: &[String],
    ) -> Result<CompiledSignal> {
        if feature_names.len() != self.pset.n_features() {
            return Err(SignalGpError::Validation(format!(
                "{} feature names given for a primitive set with {} features",
                feature_names.len(),
                self.pset.n_features()
            )));
        }
        individual.root().validate(&self.pset)?;

        Ok(CompiledSignal {
            root: individual.root().clone(),
            feature_names: feature_names.to_vec(),
            compiler: self.clone(),
        })
    }
}

/// Signal function of one individual, applicable to any table carrying its features
#[derive(Debug, Clone)]
pub struct CompiledSignal {
    root: Node,
    feature_names: Vec<String>,
    compiler: SignalCompiler,
}

impl CompiledSignal {
    /// Binary position per row of `table`, in row order
    pub fn apply(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        let view = ColumnView::resolve(table, &self.feature_names)?;
        Ok(self.compiler.signal(&self.root, &view))
    }

    pub fn raw_scores(&self, table: &FeatureTable) -> Result<Vec<f64>> {
        let view = ColumnView::resolve(table, &self.feature_names)?;
        Ok(self.compiler.raw_scores(&self.root, &view))
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn formula(&self) -> String {
        self.root.to_formula(self.compiler.primitive_set())
    }
}
