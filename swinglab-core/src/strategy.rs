//! Strategy simulation — the long-only reversal loop.
//!
//! The simulator walks a (possibly shock-filtered) series bar by bar,
//! entering on low patterns and exiting on high patterns, with execution at
//! the next bar's close. State is a single value advanced once per
//! iteration; runs share nothing, so per-symbol simulations parallelize
//! trivially.

use crate::domain::{Bar, ExitReason, OpenPosition, Trade};
use crate::signals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tunables for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyParams {
    /// Holding limit in processed bars; positions at or past it are
    /// force-closed before any other decision that iteration.
    pub max_hold_days: usize,
    /// Starting capital; trade returns compound against it.
    pub initial_capital: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            max_hold_days: 10,
            initial_capital: 10_000.0,
        }
    }
}

/// Output of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Completed round trips, in close order.
    pub trades: Vec<Trade>,
    /// Running capital after each processed bar (indices 1..=len-2),
    /// including bars where nothing traded.
    pub capital_curve: Vec<f64>,
    pub final_capital: f64,
}

/// Simulator state threaded through the scan.
#[derive(Debug)]
struct SimState {
    position: Option<OpenPosition>,
    capital: f64,
    trades: Vec<Trade>,
}

impl SimState {
    fn new(initial_capital: f64) -> Self {
        Self {
            position: None,
            capital: initial_capital,
            trades: Vec::new(),
        }
    }

    fn close(
        &mut self,
        position: OpenPosition,
        exit_price: f64,
        exit_date: NaiveDate,
        exit_reason: ExitReason,
    ) {
        let return_pct = position.return_at(exit_price);
        self.capital *= 1.0 + return_pct;
        self.trades.push(Trade {
            side: position.side,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_date,
            exit_price,
            return_pct,
            exit_reason,
        });
    }

    /// One iteration: evaluate day `i`, execute at bar `i + 1`.
    fn advance(&mut self, bars: &[Bar], i: usize, params: &StrategyParams) {
        let set = signals::evaluate_at(bars, i);
        let exec_price = bars[i + 1].close;
        let exec_date = bars[i + 1].date;

        // The forced exit runs before entry/exit logic; the slot it frees
        // is immediately eligible for a new entry this same iteration.
        if let Some(position) = self.position.take() {
            if position.days_held >= params.max_hold_days {
                self.close(position, exec_price, exec_date, ExitReason::MaxHoldExceeded);
            } else {
                self.position = Some(position);
            }
        }

        match self.position.take() {
            None => {
                if set.entry_signal() {
                    self.position = Some(OpenPosition::open_long(exec_price, exec_date));
                }
            }
            Some(mut position) => {
                position.days_held += 1;
                if set.exit_signal() {
                    self.close(position, exec_price, exec_date, ExitReason::SignalExit);
                } else {
                    self.position = Some(position);
                }
            }
        }
    }
}

/// Run the reversal strategy over `bars`.
///
/// Processes indices 1..=len-2 (none at all for series shorter than 3)
/// and records the running capital once per processed bar. A position
/// still open when the scan ends is dropped: no trade is recorded and the
/// capital is unchanged by it.
pub fn simulate(bars: &[Bar], params: &StrategyParams) -> Simulation {
    let mut state = SimState::new(params.initial_capital);
    let mut capital_curve = Vec::new();

    if bars.len() >= signals::DETECTION_WINDOW {
        capital_curve.reserve(bars.len() - 2);
        for i in 1..bars.len() - 1 {
            state.advance(bars, i, params);
            capital_curve.push(state.capital);
        }
    }

    Simulation {
        trades: state.trades,
        capital_curve,
        final_capital: state.capital,
    }
}
