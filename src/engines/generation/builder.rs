use crate::config::InitMethod;
use crate::engines::generation::ast::Node;
use crate::functions::PrimitiveSet;
use rand::Rng;

/// Random tree construction over a primitive set.
///
/// A target height is drawn uniformly from `[min_depth, max_depth]`; Full trees
/// place every leaf at that height, Grow trees may stop early once `min_depth`
/// is reached.
pub struct TreeBuilder<'a> {
    pset: &'a PrimitiveSet,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(pset: &'a PrimitiveSet) -> Self {
        Self { pset }
    }

    pub fn generate<R: Rng>(
        &self,
        method: InitMethod,
        min_depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> Node {
        let grow = match method {
            InitMethod::Full => false,
            InitMethod::Grow => true,
            InitMethod::HalfAndHalf => rng.gen_bool(0.5),
        };
        let height = rng.gen_range(min_depth..=max_depth);
        self.build(0, height, min_depth, grow, rng)
    }

    pub fn full<R: Rng>(&self, min_depth: usize, max_depth: usize, rng: &mut R) -> Node {
        self.generate(InitMethod::Full, min_depth, max_depth, rng)
    }

    fn build<R: Rng>(
        &self,
        depth: usize,
        height: usize,
        min_depth: usize,
        grow: bool,
        rng: &mut R,
    ) -> Node {
        if depth >= height || (grow && depth >= min_depth && rng.gen_bool(self.terminal_ratio())) {
            return self.random_terminal(rng);
        }

        let primitive = self.pset.random_primitive(rng);
        let arity = self.pset.primitive(primitive).arity();
        let args = (0..arity)
            .map(|_| self.build(depth + 1, height, min_depth, grow, rng))
            .collect();
        Node::call(primitive, args)
    }

    fn terminal_ratio(&self) -> f64 {
        let terminals = self.pset.n_terminals() as f64;
        terminals / (terminals + self.pset.len() as f64)
    }

    /// Feature reference, or a freshly sampled constant for the ephemeral slot
    pub fn random_terminal<R: Rng>(&self, rng: &mut R) -> Node {
        let choice = rng.gen_range(0..self.pset.n_terminals());
        if choice < self.pset.n_features() {
            Node::Feature(choice)
        } else {
            Node::Constant(self.pset.sample_ephemeral(rng))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pset() -> PrimitiveSet {
        PrimitiveSet::new(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    }

    fn leaf_depths(node: &Node, depth: usize, out: &mut Vec<usize>) {
        match node {
            Node::Call { args, .. } => args.iter().for_each(|a| leaf_depths(a, depth + 1, out)),
            _ => out.push(depth),
        }
    }

    #[test]
    fn test_full_trees_are_balanced_and_bounded() {
        let pset = pset();
        let builder = TreeBuilder::new(&pset);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let tree = builder.full(1, 3, &mut rng);
            assert!((1..=3).contains(&tree.depth()));
            let mut depths = Vec::new();
            leaf_depths(&tree, 0, &mut depths);
            assert!(depths.iter().all(|&d| d == tree.depth()));
            assert!(tree.validate(&pset).is_ok());
        }
    }

    #[test]
    fn test_grow_respects_bounds() {
        let pset = pset();
        let builder = TreeBuilder::new(&pset);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            let tree = builder.generate(InitMethod::Grow, 2, 4, &mut rng);
            assert!(tree.depth() >= 2 && tree.depth() <= 4);
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let pset = pset();
        let builder = TreeBuilder::new(&pset);
        let a = builder.generate(InitMethod::HalfAndHalf, 1, 4, &mut StdRng::seed_from_u64(99));
        let b = builder.generate(InitMethod::HalfAndHalf, 1, 4, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_terminals_cover_features_and_constants() {
        let pset = pset();
        let builder = TreeBuilder::new(&pset);
        let mut rng = StdRng::seed_from_u64(1);
        let leaves: Vec<Node> = (0..400).map(|_| builder.random_terminal(&mut rng)).collect();

        assert!(leaves.iter().any(|n| matches!(n, Node::Constant(c) if (0.0..1.0).contains(c))));
        for feature in 0..3 {
            assert!(leaves.iter().any(|n| *n == Node::Feature(feature)));
        }
    }
}
