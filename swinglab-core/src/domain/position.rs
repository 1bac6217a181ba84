use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::trade::TradeSide;

/// An open position during simulation. At most one exists per symbol run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    pub side: TradeSide,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    /// Bars processed since entry, counted from the bar after the fill.
    pub days_held: usize,
}

impl OpenPosition {
    pub fn open_long(entry_price: f64, entry_date: NaiveDate) -> Self {
        Self {
            side: TradeSide::Long,
            entry_price,
            entry_date,
            days_held: 0,
        }
    }

    /// Fractional return if the position were closed at `exit_price`.
    pub fn return_at(&self, exit_price: f64) -> f64 {
        (exit_price - self.entry_price) / self.entry_price
    }
}
