//! Trade — a completed round-trip with entry and exit context.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a position. The reversal strategy only ever opens longs;
/// the enum keeps trade records explicit about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeSide {
    Long,
}

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// An exit pattern (local extreme or close high) fired.
    SignalExit,
    /// The position reached the maximum holding period.
    MaxHoldExceeded,
}

/// A complete round-trip trade: entry at one bar's close, exit at a later one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: TradeSide,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    /// Fractional return, (exit - entry) / entry.
    pub return_pct: f64,
    pub exit_reason: ExitReason,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.return_pct > 0.0
    }
}
