use crate::engines::generation::individual::Individual;
use std::collections::HashSet;

/// Bounded archive of the best individuals seen across all generations.
///
/// Entries are independent snapshots sorted by descending fitness. Equal
/// fitness keeps insertion order, and a full archive only admits a candidate
/// strictly fitter than its current last entry. Structurally identical trees
/// are stored once, which makes repeated updates with the same population a
/// no-op.
#[derive(Debug, Clone)]
pub struct HallOfFame {
    entries: Vec<Individual>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_size),
            max_size,
            seen_signatures: HashSet::new(),
        }
    }

    /// Merge a population in; returns how many candidates were admitted
    pub fn update(&mut self, population: &[Individual]) -> usize {
        population.iter().filter(|ind| self.try_add(ind)).count()
    }

    /// Attempt to admit a snapshot of `candidate`
    pub fn try_add(&mut self, candidate: &Individual) -> bool {
        let fitness = match candidate.fitness() {
            Some(f) => f,
            None => return false,
        };

        if self.max_size == 0 {
            return false;
        }

        if self.entries.len() >= self.max_size {
            let worst = self
                .entries
                .last()
                .map(Individual::rank_fitness)
                .unwrap_or(f64::NEG_INFINITY);
            if fitness <= worst {
                return false;
            }
        }

        let signature = candidate.canonical_signature();
        if self.seen_signatures.contains(&signature) {
            return false; // Duplicate, reject
        }

        // After every entry with fitness >= candidate, so earlier admissions win ties
        let position = self.entries.partition_point(|e| e.rank_fitness() >= fitness);
        self.entries.insert(position, candidate.clone());
        self.seen_signatures.insert(signature);

        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_signatures.remove(&removed.canonical_signature());
            }
        }

        true
    }

    pub fn best(&self) -> Option<&Individual> {
        self.entries.first()
    }

    pub fn get(&self, rank: usize) -> Option<&Individual> {
        self.entries.get(rank)
    }

    pub fn entries(&self) -> &[Individual] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.entries.iter()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HallOfFame {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
