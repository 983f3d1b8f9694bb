use crate::error::{Result, SignalGpError};
use crate::functions::{
    primitives::{
        Abs, Add, Clip, Mul, ProtectedDiv, ProtectedLog1p, ProtectedSqrt, SafeDiv, Sigmoid, Sign,
        Sub, Tanh,
    },
    traits::Primitive,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Position of a primitive inside its [`PrimitiveSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveId(pub usize);

/// Immutable vocabulary of an expression tree: primitives, feature terminals
/// and the ephemeral-constant generator.
///
/// Trees store [`PrimitiveId`]s and feature positions directly, so evaluation
/// never looks anything up by name.
pub struct PrimitiveSet {
    primitives: Vec<Arc<dyn Primitive>>,
    feature_names: Vec<String>,
    ephemeral_range: Range<f64>,
}

impl PrimitiveSet {
    pub fn new(feature_names: Vec<String>) -> Self {
        let mut set = Self {
            primitives: Vec::new(),
            feature_names,
            ephemeral_range: 0.0..1.0,
        };
        set.register_primitives();
        set
    }

    pub fn with_ephemeral_range(mut self, range: Range<f64>) -> Result<Self> {
        if !(range.start.is_finite() && range.end.is_finite() && range.start < range.end) {
            return Err(SignalGpError::Configuration(format!(
                "Ephemeral constant range {:?} is empty or not finite",
                range
            )));
        }
        self.ephemeral_range = range;
        Ok(self)
    }

    fn register_primitives(&mut self) {
        let primitives: Vec<Arc<dyn Primitive>> = vec![
            Arc::new(Add),
            Arc::new(Sub),
            Arc::new(Mul),
            Arc::new(SafeDiv),
            Arc::new(ProtectedDiv),
            Arc::new(Tanh),
            Arc::new(Abs),
            Arc::new(Sign),
            Arc::new(ProtectedSqrt),
            Arc::new(Clip),
            Arc::new(Sigmoid),
            Arc::new(ProtectedLog1p),
        ];
        self.primitives.extend(primitives);
    }

    pub fn primitive(&self, id: PrimitiveId) -> &dyn Primitive {
        self.primitives[id.0].as_ref()
    }

    pub fn get(&self, alias: &str) -> Option<PrimitiveId> {
        self.primitives
            .iter()
            .position(|p| p.alias() == alias)
            .map(PrimitiveId)
    }

    pub fn ids(&self) -> impl Iterator<Item = PrimitiveId> + '_ {
        (0..self.primitives.len()).map(PrimitiveId)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Terminal choices: every feature plus one ephemeral-constant slot
    pub fn n_terminals(&self) -> usize {
        self.feature_names.len() + 1
    }

    pub fn random_primitive<R: Rng>(&self, rng: &mut R) -> PrimitiveId {
        PrimitiveId(rng.gen_range(0..self.primitives.len()))
    }

    /// Fresh literal for a constant leaf; frozen into the tree afterwards
    pub fn sample_ephemeral<R: Rng>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.ephemeral_range.clone())
    }
}

impl std::fmt::Debug for PrimitiveSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveSet")
            .field(
                "primitives",
                &self.primitives.iter().map(|p| p.alias()).collect::<Vec<_>>(),
            )
            .field("feature_names", &self.feature_names)
            .field("ephemeral_range", &self.ephemeral_range)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pset() -> PrimitiveSet {
        PrimitiveSet::new(vec!["mom_3".to_string(), "vol_6".to_string()])
    }

    #[test]
    fn test_registry_primitive_retrieval() {
        let set = pset();
        let id = set.get("div_prot").unwrap();
        assert_eq!(set.primitive(id).alias(), "div_prot");
        assert_eq!(set.primitive(id).arity(), 2);
    }

    #[test]
    fn test_primitive_not_found() {
        assert!(pset().get("NonExistent").is_none());
    }

    #[test]
    fn test_full_vocabulary_registered() {
        let set = pset();
        for alias in [
            "add", "sub", "mul", "div_safe", "div_prot", "tanh", "abs", "sign", "sqrt_safe",
            "clip10", "sigmoid", "log1p_safe",
        ] {
            assert!(set.get(alias).is_some(), "{} missing", alias);
        }
        assert_eq!(set.n_terminals(), 3);
    }

    #[test]
    fn test_ephemeral_within_range() {
        let set = pset().with_ephemeral_range(-2.0..-1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let c = set.sample_ephemeral(&mut rng);
            assert!((-2.0..-1.0).contains(&c));
        }
    }

    #[test]
    fn test_empty_ephemeral_range_rejected() {
        assert!(pset().with_ephemeral_range(1.0..1.0).is_err());
    }
}
