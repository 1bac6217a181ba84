//! Multi-symbol backtest orchestration.
//!
//! Two entry points:
//! - `run_backtest_batch()`: fetches per symbol with rate limiting, then
//!   backtests. Used by the CLI.
//! - `run_batch_from_series()`: takes pre-fetched series and backtests them
//!   in parallel with rayon. Symbols are independent, so the results are
//!   identical to the sequential path in a different wall time.

use std::thread;
use std::time::Duration as StdDuration;

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use swinglab_core::backtest::{run_backtest, BacktestParams, BacktestResult};
use swinglab_core::data::{BarProvider, DataError, FetchProgress};
use swinglab_core::domain::Bar;

use crate::config::BatchSection;

/// Calendar padding on every historical fetch so weekends and holidays do
/// not eat into the requested period.
pub const FETCH_PAD_DAYS: i64 = 10;

/// Runtime options for one batch, merged from config and CLI flags.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Fetches end at this date.
    pub as_of: NaiveDate,
    /// Pause before each symbol fetch.
    pub delay_ms: u64,
    /// Truncate the roster to this many symbols.
    pub max_symbols: Option<usize>,
}

impl BatchOptions {
    pub fn from_config(batch: &BatchSection, as_of: NaiveDate) -> Self {
        Self {
            as_of,
            delay_ms: batch.delay_ms,
            max_symbols: batch.max_symbols,
        }
    }
}

/// Results of one batch, ranked by total return.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Per-symbol results, sorted by `total_return` descending.
    pub results: Vec<BacktestResult>,
    pub symbols_skipped: usize,
}

/// Headline statistics over a ranked batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub best_symbol: String,
    pub best_return: f64,
    pub worst_symbol: String,
    pub worst_return: f64,
    pub profitable: usize,
    pub total: usize,
    pub mean_return: f64,
}

impl BatchOutcome {
    /// None when the batch produced no results at all.
    pub fn summary(&self) -> Option<BatchSummary> {
        let first = self.results.first()?;
        let last = self.results.last()?;
        let profitable = self.results.iter().filter(|r| r.is_profitable()).count();
        let mean_return = self.results.iter().map(|r| r.total_return).sum::<f64>()
            / self.results.len() as f64;

        Some(BatchSummary {
            best_symbol: first.symbol.clone(),
            best_return: first.total_return,
            worst_symbol: last.symbol.clone(),
            worst_return: last.total_return,
            profitable,
            total: self.results.len(),
            mean_return,
        })
    }
}

/// Series shorter than this never reach the backtest; the symbol is skipped
/// outright rather than zero-scored. Scales with the requested period.
pub fn pre_gate_min(lookback_days: usize) -> usize {
    10.max(lookback_days * 2 / 5)
}

fn rank_by_return(results: &mut [BacktestResult]) {
    results.sort_by(|a, b| {
        b.total_return
            .partial_cmp(&a.total_return)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Fetch and backtest every symbol in the roster, rate limited.
///
/// Per-symbol failures (fetch errors, series under the pre-gate) skip that
/// symbol only; the batch always completes and ranks whatever it gathered.
pub fn run_backtest_batch(
    provider: &dyn BarProvider,
    symbols: &[String],
    params: &BacktestParams,
    opts: &BatchOptions,
    progress: &dyn FetchProgress,
) -> BatchOutcome {
    let roster = match opts.max_symbols {
        Some(n) => &symbols[..n.min(symbols.len())],
        None => symbols,
    };
    let start = opts.as_of - Duration::days(params.lookback_days as i64 + FETCH_PAD_DAYS);
    let need = pre_gate_min(params.lookback_days);

    let mut results = Vec::with_capacity(roster.len());
    let mut skipped = 0usize;

    for (index, symbol) in roster.iter().enumerate() {
        if opts.delay_ms > 0 {
            thread::sleep(StdDuration::from_millis(opts.delay_ms));
        }
        progress.on_start(symbol, index, roster.len());

        let outcome = provider.fetch(symbol, start, opts.as_of).and_then(|bars| {
            if bars.len() < need {
                return Err(DataError::InsufficientData {
                    symbol: symbol.clone(),
                    got: bars.len(),
                    need,
                });
            }
            let result = run_backtest(symbol, &bars, params);
            println!(
                "  Return: {:+.1}%, Win rate: {:.1}%, Trades: {}",
                result.total_return * 100.0,
                result.win_rate * 100.0,
                result.total_trades
            );
            results.push(result);
            Ok(())
        });

        if outcome.is_err() {
            skipped += 1;
        }
        progress.on_complete(symbol, index, roster.len(), &outcome);
    }

    rank_by_return(&mut results);
    progress.on_batch_complete(results.len(), skipped, roster.len());

    BatchOutcome {
        results,
        symbols_skipped: skipped,
    }
}

/// Backtest pre-fetched series in parallel. Returns ranked results.
pub fn run_batch_from_series(
    series: &[(String, Vec<Bar>)],
    params: &BacktestParams,
) -> Vec<BacktestResult> {
    let mut results: Vec<BacktestResult> = series
        .par_iter()
        .map(|(symbol, bars)| run_backtest(symbol, bars, params))
        .collect();
    rank_by_return(&mut results);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_gate_scales_with_lookback() {
        assert_eq!(pre_gate_min(252), 100); // 40% of 252
        assert_eq!(pre_gate_min(20), 10); // floor of 10
        assert_eq!(pre_gate_min(0), 10);
        assert_eq!(pre_gate_min(1000), 400);
    }

    #[test]
    fn ranking_is_descending_by_total_return() {
        let mut results = vec![
            BacktestResult::insufficient_data("FLAT", 3),
            {
                let mut r = BacktestResult::insufficient_data("UP", 3);
                r.total_return = 0.4;
                r
            },
            {
                let mut r = BacktestResult::insufficient_data("DOWN", 3);
                r.total_return = -0.2;
                r
            },
        ];
        rank_by_return(&mut results);

        let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["UP", "FLAT", "DOWN"]);
    }

    #[test]
    fn summary_of_empty_batch_is_none() {
        let outcome = BatchOutcome {
            results: Vec::new(),
            symbols_skipped: 3,
        };
        assert!(outcome.summary().is_none());
    }

    #[test]
    fn summary_reports_extremes_and_mean() {
        let mut results = Vec::new();
        for (symbol, ret) in [("A", 0.3), ("B", 0.1), ("C", -0.1)] {
            let mut r = BacktestResult::insufficient_data(symbol, 50);
            r.total_return = ret;
            results.push(r);
        }
        let outcome = BatchOutcome {
            results,
            symbols_skipped: 0,
        };

        let summary = outcome.summary().unwrap();
        assert_eq!(summary.best_symbol, "A");
        assert_eq!(summary.worst_symbol, "C");
        assert_eq!(summary.profitable, 2);
        assert_eq!(summary.total, 3);
        assert!((summary.mean_return - 0.1).abs() < 1e-12);
    }
}
