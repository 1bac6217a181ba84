//! Extreme-event filtering — drops single-day price shocks and their
//! neighborhood from a series before simulation.
//!
//! A shock is a close-to-close move whose magnitude meets or exceeds the
//! threshold (default 25%). The shocked day plus a two-day buffer on each
//! side is removed and the survivors are re-indexed positionally: bars that
//! were days apart become adjacent, and downstream detectors treat them as
//! real neighbors. Calendar gaps are not bridged or interpolated.

use crate::domain::Bar;

/// Default close-to-close move that marks a day as a shock.
pub const DEFAULT_SHOCK_THRESHOLD: f64 = 0.25;

/// Days excluded on each side of a shock day.
pub const SHOCK_BUFFER_DAYS: usize = 2;

/// Series shorter than this are returned unfiltered.
const MIN_FILTER_LEN: usize = 5;

/// Returns true when the close-to-close move into day `i` meets or exceeds
/// `threshold`. Day 0 has no prior close and is never a shock, and
/// out-of-range indices are false.
pub fn is_shock_day(bars: &[Bar], i: usize, threshold: f64) -> bool {
    if i < 1 || i >= bars.len() {
        return false;
    }
    let prev_close = bars[i - 1].close;
    if prev_close == 0.0 {
        return false;
    }
    let change = (bars[i].close - prev_close).abs() / prev_close;
    change >= threshold
}

/// Remove shock days and their buffers from `bars`.
///
/// Returns the input unchanged when the series is shorter than 5 bars, when
/// no day meets the threshold, or when exclusion would empty the series.
pub fn filter_shocks(bars: &[Bar], threshold: f64) -> Vec<Bar> {
    if bars.len() < MIN_FILTER_LEN {
        return bars.to_vec();
    }

    let shock_days: Vec<usize> = (1..bars.len())
        .filter(|&i| is_shock_day(bars, i, threshold))
        .collect();

    if shock_days.is_empty() {
        return bars.to_vec();
    }

    let mut excluded = vec![false; bars.len()];
    for &day in &shock_days {
        let lo = day.saturating_sub(SHOCK_BUFFER_DAYS);
        let hi = (day + SHOCK_BUFFER_DAYS).min(bars.len() - 1);
        for slot in &mut excluded[lo..=hi] {
            *slot = true;
        }
    }

    let kept: Vec<Bar> = bars
        .iter()
        .zip(&excluded)
        .filter(|(_, &gone)| !gone)
        .map(|(b, _)| b.clone())
        .collect();

    // A filter that removes everything is useless; fall back to the raw series.
    if kept.is_empty() {
        return bars.to_vec();
    }
    kept
}
