// src/engines/metrics/returns.rs

/// Per-period strategy returns: position times target
pub fn strategy_returns(signal: &[f64], targets: &[f64]) -> Vec<f64> {
    signal.iter().zip(targets).map(|(s, r)| s * r).collect()
}

/// Compounded equity curve starting from 1.0 (the starting value itself is not included).
/// Growth saturates at `f64::MAX` instead of overflowing to infinity.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |equity, r| {
            let grown = *equity * (1.0 + r);
            *equity = if grown == f64::INFINITY { f64::MAX } else { grown };
            Some(*equity)
        })
        .collect()
}

/// Compounded return over the whole curve; an empty curve returns 0
pub fn total_return(equity: &[f64]) -> f64 {
    equity.last().map(|e| e - 1.0).unwrap_or(0.0)
}

/// Largest peak-to-trough decline as a fraction of the peak.
///
/// The running peak starts at the initial capital of 1.0, so a loss in the
/// first period counts. A non-positive peak contributes no drawdown.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut max_dd = 0.0_f64;

    for &value in equity {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Compounded return of holding `signal` against `targets`
pub fn cumulative_return(signal: &[f64], targets: &[f64]) -> f64 {
    total_return(&equity_curve(&strategy_returns(signal, targets)))
}

/// Fraction of periods with an open position
pub fn exposure(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().filter(|&&s| s != 0.0).count() as f64 / signal.len() as f64
}
