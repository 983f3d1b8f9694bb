use crate::functions::traits::Primitive;

/// Denominators with smaller magnitude make protected division return 0
pub const DIV_EPSILON: f64 = 1e-6;
/// `log1p` arguments at or below this return 0
pub const LOG1P_FLOOR: f64 = -0.999;
/// Symmetric bound of the clipping primitive
pub const CLIP_BOUND: f64 = 10.0;

/// Replace NaN/Inf by the neutral value 0.0
#[inline]
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

#[inline]
pub fn protected_div(x: f64, y: f64) -> f64 {
    if y.abs() > DIV_EPSILON {
        finite_or_zero(x / y)
    } else {
        0.0
    }
}

#[inline]
pub fn protected_sqrt(x: f64) -> f64 {
    finite_or_zero(x.abs().sqrt())
}

#[inline]
pub fn protected_log1p(x: f64) -> f64 {
    if x <= LOG1P_FLOOR {
        0.0
    } else {
        finite_or_zero(x.ln_1p())
    }
}

/// Clip into `[-bound, bound]`; NaN maps to 0 and infinities to the nearest bound
#[inline]
pub fn clip(x: f64, bound: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(-bound, bound)
    }
}

/// Logistic function on the clipped input
#[inline]
pub fn stable_sigmoid(x: f64, bound: f64) -> f64 {
    1.0 / (1.0 + (-clip(x, bound)).exp())
}

/// Sign with sign(0) = 0
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

// --- Arithmetic ---
pub struct Add;
impl Primitive for Add {
    fn alias(&self) -> &'static str { "add" }
    fn arity(&self) -> usize { 2 }
    fn apply(&self, args: &[f64]) -> f64 {
        finite_or_zero(args[0] + args[1])
    }
}

pub struct Sub;
impl Primitive for Sub {
    fn alias(&self) -> &'static str { "sub" }
    fn arity(&self) -> usize { 2 }
    fn apply(&self, args: &[f64]) -> f64 {
        finite_or_zero(args[0] - args[1])
    }
}

pub struct Mul;
impl Primitive for Mul {
    fn alias(&self) -> &'static str { "mul" }
    fn arity(&self) -> usize { 2 }
    fn apply(&self, args: &[f64]) -> f64 {
        finite_or_zero(args[0] * args[1])
    }
}

/// Division that only guards an exact zero denominator
pub struct SafeDiv;
impl Primitive for SafeDiv {
    fn alias(&self) -> &'static str { "div_safe" }
    fn arity(&self) -> usize { 2 }
    fn apply(&self, args: &[f64]) -> f64 {
        if args[1] == 0.0 {
            0.0
        } else {
            finite_or_zero(args[0] / args[1])
        }
    }
}

/// Division returning 0 whenever the denominator is close to zero
pub struct ProtectedDiv;
impl Primitive for ProtectedDiv {
    fn alias(&self) -> &'static str { "div_prot" }
    fn arity(&self) -> usize { 2 }
    fn apply(&self, args: &[f64]) -> f64 {
        protected_div(args[0], args[1])
    }
}

// --- Unary transforms ---
pub struct Tanh;
impl Primitive for Tanh {
    fn alias(&self) -> &'static str { "tanh" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        finite_or_zero(args[0].tanh())
    }
    fn value_range(&self) -> Option<(f64, f64)> { Some((-1.0, 1.0)) }
}

pub struct Abs;
impl Primitive for Abs {
    fn alias(&self) -> &'static str { "abs" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        finite_or_zero(args[0].abs())
    }
}

pub struct Sign;
impl Primitive for Sign {
    fn alias(&self) -> &'static str { "sign" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        sign(args[0])
    }
    fn value_range(&self) -> Option<(f64, f64)> { Some((-1.0, 1.0)) }
}

pub struct ProtectedSqrt;
impl Primitive for ProtectedSqrt {
    fn alias(&self) -> &'static str { "sqrt_safe" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        protected_sqrt(args[0])
    }
}

pub struct Clip;
impl Primitive for Clip {
    fn alias(&self) -> &'static str { "clip10" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        clip(args[0], CLIP_BOUND)
    }
    fn value_range(&self) -> Option<(f64, f64)> { Some((-CLIP_BOUND, CLIP_BOUND)) }
}

pub struct Sigmoid;
impl Primitive for Sigmoid {
    fn alias(&self) -> &'static str { "sigmoid" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        stable_sigmoid(args[0], CLIP_BOUND)
    }
    fn value_range(&self) -> Option<(f64, f64)> { Some((0.0, 1.0)) }
}

pub struct ProtectedLog1p;
impl Primitive for ProtectedLog1p {
    fn alias(&self) -> &'static str { "log1p_safe" }
    fn arity(&self) -> usize { 1 }
    fn apply(&self, args: &[f64]) -> f64 {
        protected_log1p(args[0])
    }
}
