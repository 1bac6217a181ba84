//! Performance metrics — pure functions that grade a finished simulation.
//!
//! Every metric is a pure function: trade list and/or capital curve in,
//! scalar out, with an explicit zero for the empty case. No dependency on
//! the data layer or the simulator.

use crate::domain::Trade;

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(final_capital: f64, initial_capital: f64) -> f64 {
    if initial_capital <= 0.0 {
        return 0.0;
    }
    (final_capital - initial_capital) / initial_capital
}

/// Win rate: fraction of trades with a positive return. Zero-return trades
/// count as losses.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    profitable_trades(trades) as f64 / trades.len() as f64
}

/// Count of trades with a positive return.
pub fn profitable_trades(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.is_winner()).count()
}

/// Arithmetic mean of per-trade returns.
pub fn avg_return_per_trade(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    trades.iter().map(|t| t.return_pct).sum::<f64>() / trades.len() as f64
}

/// Maximum peak-to-trough decline of the capital curve, as a positive
/// fraction of the peak in [0, 1]. The peak starts at the first point.
///
/// Returns 0.0 for an empty, constant, or monotonically increasing curve.
pub fn max_drawdown(capital_curve: &[f64]) -> f64 {
    let Some(&first) = capital_curve.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;

    for &capital in capital_curve {
        if capital > peak {
            peak = capital;
        }
        if peak > 0.0 {
            let dd = (peak - capital) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Volatility of per-trade returns: population standard deviation (the
/// divisor is n, not n-1). A single trade has zero volatility.
pub fn volatility(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let returns: Vec<f64> = trades.iter().map(|t| t.return_pct).collect();
    population_std_dev(&returns)
}

/// Mean trade return over its volatility. Unannualized, no risk-free
/// adjustment. Returns 0.0 whenever volatility is zero.
pub fn sharpe_ratio(avg_return: f64, volatility: f64) -> f64 {
    if volatility > 0.0 {
        avg_return / volatility
    } else {
        0.0
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divisor n).
pub(crate) fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
