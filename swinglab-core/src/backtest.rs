//! Per-symbol backtest assembly: shock filter → minimum-data gate →
//! simulation → metrics.

use crate::domain::Bar;
use crate::filter;
use crate::metrics;
use crate::strategy::{self, Simulation, StrategyParams};
use serde::{Deserialize, Serialize};

/// Parameters for one symbol's backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestParams {
    /// Requested analysis period in days; also drives the minimum-data gate.
    pub lookback_days: usize,
    /// Holding limit for the simulator's forced exit.
    pub max_hold_days: usize,
    pub initial_capital: f64,
    /// Remove extreme one-day moves before simulating.
    pub filter_shocks: bool,
    /// Close-to-close move that counts as a shock (0.25 = 25%).
    pub shock_threshold: f64,
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            lookback_days: 252,
            max_hold_days: 10,
            initial_capital: 10_000.0,
            filter_shocks: true,
            shock_threshold: filter::DEFAULT_SHOCK_THRESHOLD,
        }
    }
}

impl BacktestParams {
    /// Bars the (filtered) series must keep for a simulation to run: at
    /// least 5, or a fifth of the requested period, whichever is larger.
    pub fn min_bars(&self) -> usize {
        5.max(self.lookback_days / 5)
    }

    fn strategy_params(&self) -> StrategyParams {
        StrategyParams {
            max_hold_days: self.max_hold_days,
            initial_capital: self.initial_capital,
        }
    }
}

/// Per-symbol result record. Field names are the published JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub symbol: String,
    pub total_return: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub avg_return_per_trade: f64,
    pub max_drawdown: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
    /// Bars actually analyzed, after any filtering.
    pub analysis_days: usize,
}

impl BacktestResult {
    /// All-zero record for a symbol whose series was too short to simulate.
    pub fn insufficient_data(symbol: &str, analysis_days: usize) -> Self {
        Self {
            symbol: symbol.to_string(),
            total_return: 0.0,
            win_rate: 0.0,
            total_trades: 0,
            profitable_trades: 0,
            avg_return_per_trade: 0.0,
            max_drawdown: 0.0,
            sharpe_ratio: 0.0,
            volatility: 0.0,
            analysis_days,
        }
    }

    /// Grade a finished simulation.
    pub fn from_simulation(
        symbol: &str,
        sim: &Simulation,
        initial_capital: f64,
        analysis_days: usize,
    ) -> Self {
        let avg_return = metrics::avg_return_per_trade(&sim.trades);
        let vol = metrics::volatility(&sim.trades);
        Self {
            symbol: symbol.to_string(),
            total_return: metrics::total_return(sim.final_capital, initial_capital),
            win_rate: metrics::win_rate(&sim.trades),
            total_trades: sim.trades.len(),
            profitable_trades: metrics::profitable_trades(&sim.trades),
            avg_return_per_trade: avg_return,
            max_drawdown: metrics::max_drawdown(&sim.capital_curve),
            sharpe_ratio: metrics::sharpe_ratio(avg_return, vol),
            volatility: vol,
            analysis_days,
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.total_return > 0.0
    }
}

/// Run the full pipeline for one symbol over an already-fetched series.
///
/// With `filter_shocks` set the series is filtered first; the minimum-data
/// gate then judges the surviving length. A gated symbol gets a zero-valued
/// result whose `analysis_days` reports that surviving length.
pub fn run_backtest(symbol: &str, bars: &[Bar], params: &BacktestParams) -> BacktestResult {
    let filtered;
    let series: &[Bar] = if params.filter_shocks {
        filtered = filter::filter_shocks(bars, params.shock_threshold);
        &filtered
    } else {
        bars
    };

    if series.len() < params.min_bars() {
        return BacktestResult::insufficient_data(symbol, series.len());
    }

    let sim = strategy::simulate(series, &params.strategy_params());
    BacktestResult::from_simulation(symbol, &sim, params.initial_capital, series.len())
}
