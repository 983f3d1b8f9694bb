use crate::config::FitnessConfig;
use crate::engines::metrics::returns::{equity_curve, max_drawdown, strategy_returns, total_return};
use serde::{Deserialize, Serialize};

/// Which branch of the scoring policy produced a fitness value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitnessTier {
    /// Negative total return: fixed failure floor
    Failure,
    /// Non-negative return below the minimum: soft gradient, below every qualifier
    SubThreshold,
    /// Return at or above the minimum: return minus weighted drawdown
    Qualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessBreakdown {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub fitness: f64,
    pub tier: FitnessTier,
}

/// Scores a binary signal against aligned returns.
///
/// With return R, drawdown D, floor F, threshold M, penalty w and scale s:
/// - `R < 0`: `-F`
/// - `0 <= R < M`: `s * (R - M) - w`
/// - `R >= M`: `R - w * D`
///
/// Targets are return-like (`>= -1`), so equity never turns negative and a
/// qualifying candidate has `D < 1`, putting every qualifier above `-w`.
/// The sub-threshold tier stays strictly below `-w`.
#[derive(Debug, Clone, Default)]
pub struct FitnessEvaluator {
    config: FitnessConfig,
}

impl FitnessEvaluator {
    pub fn new(config: FitnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FitnessConfig {
        &self.config
    }

    pub fn failure_fitness(&self) -> f64 {
        -self.config.failure_floor
    }

    pub fn score(&self, signal: &[f64], targets: &[f64]) -> f64 {
        self.breakdown(signal, targets).fitness
    }

    pub fn breakdown(&self, signal: &[f64], targets: &[f64]) -> FitnessBreakdown {
        debug_assert_eq!(signal.len(), targets.len());

        let equity = equity_curve(&strategy_returns(signal, targets));
        let total = total_return(&equity);
        let drawdown = max_drawdown(&equity);
        let (fitness, tier) = self.apply_policy(total, drawdown);

        FitnessBreakdown {
            total_return: total,
            max_drawdown: drawdown,
            fitness,
            tier,
        }
    }

    /// Three-tier policy on precomputed return and drawdown
    pub fn apply_policy(&self, total_return: f64, max_drawdown: f64) -> (f64, FitnessTier) {
        let c = &self.config;
        let total_return = if total_return == f64::INFINITY {
            f64::MAX
        } else {
            total_return
        };
        if total_return.is_nan() || total_return < 0.0 {
            (-c.failure_floor, FitnessTier::Failure)
        } else if total_return < c.min_return {
            (
                c.sub_threshold_scale * (total_return - c.min_return) - c.drawdown_penalty,
                FitnessTier::SubThreshold,
            )
        } else {
            (total_return - c.drawdown_penalty * max_drawdown, FitnessTier::Qualified)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_losing_signal_hits_floor() {
        let evaluator = FitnessEvaluator::default();
        let b = evaluator.breakdown(&[1.0, 1.0], &[0.05, -0.06]);
        assert_eq!(b.tier, FitnessTier::Failure);
        assert_eq!(b.fitness, -1e9);
    }

    #[test]
    fn test_flat_signal_is_sub_threshold_at_zero() {
        let evaluator = FitnessEvaluator::default();
        let b = evaluator.breakdown(&[0.0, 0.0, 0.0], &[0.5, -0.2, 0.1]);
        assert_eq!(b.total_return, 0.0);
        assert_eq!(b.max_drawdown, 0.0);
        assert_eq!(b.tier, FitnessTier::SubThreshold);
        assert!((b.fitness - (-0.6)).abs() < 1e-12);
    }

    #[test]
    fn test_qualified_is_return_minus_penalty() {
        let evaluator = FitnessEvaluator::default();
        let b = evaluator.breakdown(&[1.0, 1.0, 1.0], &[0.5, -0.2, 0.1]);
        // equity 1.5, 1.2, 1.32
        assert_eq!(b.tier, FitnessTier::Qualified);
        assert!((b.total_return - 0.32).abs() < 1e-12);
        assert!((b.max_drawdown - 0.2).abs() < 1e-12);
        assert_eq!(b.fitness, b.total_return - 0.3 * b.max_drawdown);
    }

    #[test]
    fn test_non_finite_return_treated_as_failure() {
        let evaluator = FitnessEvaluator::default();
        assert_eq!(evaluator.apply_policy(f64::NAN, 0.0).1, FitnessTier::Failure);
    }

    #[test]
    fn test_overflowing_growth_qualifies_with_finite_score() {
        let evaluator = FitnessEvaluator::default();
        let b = evaluator.breakdown(&[1.0; 4], &[1e100; 4]);
        assert_eq!(b.tier, FitnessTier::Qualified);
        assert!(b.total_return.is_finite());
        assert!(b.fitness.is_finite() && b.fitness > 0.0);
        assert_eq!(b.max_drawdown, 0.0);

        let (fitness, tier) = evaluator.apply_policy(f64::INFINITY, 0.5);
        assert_eq!(tier, FitnessTier::Qualified);
        assert!(fitness.is_finite());
    }
}
