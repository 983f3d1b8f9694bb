use crate::error::{Result, SignalGpError};
use crate::functions::{PrimitiveId, PrimitiveSet};
use serde::{Deserialize, Serialize};

/// Largest arity in the primitive vocabulary; evaluation uses a stack buffer this wide
pub const MAX_ARITY: usize = 2;

/// Expression tree node.
///
/// Nodes are addressed by their pre-order position: the root is 0, its first
/// argument subtree starts at 1, and so on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Call {
        primitive: PrimitiveId,
        args: Vec<Node>,
    },
    /// Position of a feature in the primitive set's terminal list
    Feature(usize),
    /// Ephemeral constant, sampled once at construction
    Constant(f64),
}

impl Node {
    pub fn call(primitive: PrimitiveId, args: Vec<Node>) -> Self {
        Node::Call { primitive, args }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Node::Call { .. })
    }

    /// Node count
    pub fn size(&self) -> usize {
        match self {
            Node::Call { args, .. } => 1 + args.iter().map(Node::size).sum::<usize>(),
            _ => 1,
        }
    }

    /// Height of the tree; a lone terminal has depth 0
    pub fn depth(&self) -> usize {
        match self {
            Node::Call { args, .. } => 1 + args.iter().map(Node::depth).max().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn subtree(&self, mut index: usize) -> Option<&Node> {
        if index == 0 {
            return Some(self);
        }
        index -= 1;
        if let Node::Call { args, .. } = self {
            for arg in args {
                let size = arg.size();
                if index < size {
                    return arg.subtree(index);
                }
                index -= size;
            }
        }
        None
    }

    pub fn subtree_mut(&mut self, mut index: usize) -> Option<&mut Node> {
        if index == 0 {
            return Some(self);
        }
        index -= 1;
        if let Node::Call { args, .. } = self {
            for arg in args.iter_mut() {
                let size = arg.size();
                if index < size {
                    return arg.subtree_mut(index);
                }
                index -= size;
            }
        }
        None
    }

    /// Swap in `replacement` at pre-order `index`, returning the subtree it displaced
    pub fn replace_subtree(&mut self, index: usize, replacement: Node) -> Option<Node> {
        let slot = self.subtree_mut(index)?;
        Some(std::mem::replace(slot, replacement))
    }

    /// Evaluate the tree for one row. `columns[i]` holds feature `i`.
    pub fn evaluate(&self, pset: &PrimitiveSet, columns: &[&[f64]], row: usize) -> f64 {
        match self {
            Node::Call { primitive, args } => {
                let mut values = [0.0; MAX_ARITY];
                for (slot, arg) in values.iter_mut().zip(args) {
                    *slot = arg.evaluate(pset, columns, row);
                }
                pset.primitive(*primitive).apply(&values[..args.len()])
            }
            Node::Feature(index) => columns[*index][row],
            Node::Constant(value) => *value,
        }
    }

    /// Check that every id, feature position and arity agrees with `pset`
    pub fn validate(&self, pset: &PrimitiveSet) -> Result<()> {
        match self {
            Node::Call { primitive, args } => {
                if primitive.0 >= pset.len() {
                    return Err(SignalGpError::Validation(format!(
                        "Unknown primitive id {}",
                        primitive.0
                    )));
                }
                let func = pset.primitive(*primitive);
                if args.len() != func.arity() || args.len() > MAX_ARITY {
                    return Err(SignalGpError::Validation(format!(
                        "Function {} expects {} args, got {}",
                        func.alias(),
                        func.arity(),
                        args.len()
                    )));
                }
                args.iter().try_for_each(|arg| arg.validate(pset))
            }
            Node::Feature(index) => {
                if *index >= pset.n_features() {
                    return Err(SignalGpError::Validation(format!(
                        "Feature terminal {} out of range for {} features",
                        index,
                        pset.n_features()
                    )));
                }
                Ok(())
            }
            Node::Constant(value) => {
                if !value.is_finite() {
                    return Err(SignalGpError::Validation(format!(
                        "Constant terminal {} is not finite",
                        value
                    )));
                }
                Ok(())
            }
        }
    }

    /// Prefix rendering, e.g. `add(mom_3, tanh(0.4213))`
    pub fn to_formula(&self, pset: &PrimitiveSet) -> String {
        let mut out = String::new();
        self.write_formula(pset, &mut out);
        out
    }

    pub fn to_formula_short(&self, pset: &PrimitiveSet, max_len: usize) -> String {
        let formula = self.to_formula(pset);
        if formula.chars().count() <= max_len {
            formula
        } else {
            let truncated: String = formula.chars().take(max_len.saturating_sub(3)).collect();
            format!("{}...", truncated)
        }
    }

    fn write_formula(&self, pset: &PrimitiveSet, out: &mut String) {
        match self {
            Node::Call { primitive, args } => {
                out.push_str(pset.primitive(*primitive).alias());
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    arg.write_formula(pset, out);
                }
                out.push(')');
            }
            Node::Feature(index) => match pset.feature_names().get(*index) {
                Some(name) => out.push_str(name),
                None => out.push_str(&format!("x{}", index)),
            },
            Node::Constant(value) => out.push_str(&format!("{:.4}", value)),
        }
    }
}
