use crate::engines::generation::ast::Node;
use crate::functions::PrimitiveSet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    Initial,
    Crossover,
    Mutation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualMetadata {
    pub origin: Origin,
    pub generation: usize,
}

/// Candidate trading rule: an expression tree with a lazily assigned fitness.
///
/// Any change to the tree goes through [`Individual::replace_root`], which drops
/// the cached fitness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    root: Node,
    fitness: Option<f64>,
    pub metadata: IndividualMetadata,
}

impl Individual {
    pub fn new(root: Node, origin: Origin, generation: usize) -> Self {
        Self {
            root,
            fitness: None,
            metadata: IndividualMetadata { origin, generation },
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn replace_root(&mut self, root: Node, origin: Origin, generation: usize) {
        self.root = root;
        self.fitness = None;
        self.metadata = IndividualMetadata { origin, generation };
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn is_evaluated(&self) -> bool {
        self.fitness.is_some()
    }

    /// Fitness for ranking; unevaluated individuals rank below everything
    pub fn rank_fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    pub fn to_formula(&self, pset: &PrimitiveSet) -> String {
        self.root.to_formula(pset)
    }

    /// Structural signature used for deduplication
    pub fn canonical_signature(&self) -> String {
        serde_json::to_string(&self.root).unwrap_or_else(|_| String::new())
    }
}
