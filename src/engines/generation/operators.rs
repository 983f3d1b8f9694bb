use crate::config::InitMethod;
use crate::engines::generation::ast::Node;
use crate::engines::generation::builder::TreeBuilder;
use crate::engines::generation::individual::Individual;
use rand::Rng;

/// Tournament selection: index of the fittest of K uniformly sampled candidates.
/// Sampling is with replacement; the first-drawn candidate wins ties.
pub fn tournament_selection<R: Rng>(
    population: &[Individual],
    tournament_size: usize,
    rng: &mut R,
) -> usize {
    let mut best_idx = rng.gen_range(0..population.len());
    let mut best_fitness = population[best_idx].rank_fitness();

    for _ in 1..tournament_size {
        let idx = rng.gen_range(0..population.len());
        let fitness = population[idx].rank_fitness();
        if fitness > best_fitness {
            best_idx = idx;
            best_fitness = fitness;
        }
    }

    best_idx
}

/// Run `count` independent tournaments and clone the winners
pub fn select_tournament<R: Rng>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..count)
        .map(|_| population[tournament_selection(population, tournament_size, rng)].clone())
        .collect()
}

/// One-point subtree crossover: swap a random non-root subtree of each parent.
/// Returns false (and leaves both untouched) when either tree is a single node.
pub fn subtree_crossover<R: Rng>(first: &mut Node, second: &mut Node, rng: &mut R) -> bool {
    let (size1, size2) = (first.size(), second.size());
    if size1 < 2 || size2 < 2 {
        return false;
    }

    let point1 = rng.gen_range(1..size1);
    let point2 = rng.gen_range(1..size2);

    let incoming = match second.subtree(point2) {
        Some(node) => node.clone(),
        None => return false,
    };
    match first.replace_subtree(point1, incoming) {
        Some(outgoing) => second.replace_subtree(point2, outgoing).is_some(),
        None => false,
    }
}

/// Uniform subtree mutation: replace a random subtree (root included) with a
/// freshly generated one
pub fn subtree_mutation<R: Rng>(
    tree: &mut Node,
    builder: &TreeBuilder<'_>,
    method: InitMethod,
    min_depth: usize,
    max_depth: usize,
    rng: &mut R,
) -> bool {
    let point = rng.gen_range(0..tree.size());
    let replacement = builder.generate(method, min_depth, max_depth, rng);
    tree.replace_subtree(point, replacement).is_some()
}

/// Size limit check applied to every offspring
pub fn within_size_limit(tree: &Node, max_size: usize) -> bool {
    tree.size() <= max_size
}
