/// Primitive function usable as an internal tree node.
///
/// Every primitive maps reals to a real and must be total: for any input,
/// finite or not, `apply` returns a finite value and never panics. This keeps
/// the vocabulary closed, so any arity-correct tree can be evaluated.
pub trait Primitive: Send + Sync {
    /// Name used in rendered formulas
    fn alias(&self) -> &'static str;

    fn arity(&self) -> usize;

    /// `args.len()` always equals `arity()`
    fn apply(&self, args: &[f64]) -> f64;

    /// Upper/lower bound on the output, when the primitive guarantees one
    fn value_range(&self) -> Option<(f64, f64)> {
        None
    }
}
