//! Bar provider trait and structured error types.
//!
//! The BarProvider trait abstracts over bar sources (Yahoo Finance,
//! synthetic generation) so orchestration code can swap implementations
//! and tests can substitute fixtures.

use crate::domain::Bar;
use chrono::NaiveDate;
use thiserror::Error;

/// Structured error types for data operations.
///
/// Per-symbol failures are routine: batch callers log them via a progress
/// reporter and move on to the next symbol.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("insufficient data for {symbol}: {got} bars (need {need})")]
    InsufficientData {
        symbol: String,
        got: usize,
        need: usize,
    },

    #[error("symbol file error: {0}")]
    SymbolFile(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Trait for daily-bar sources.
///
/// Implementations return a canonical series: strictly ascending unique
/// dates, sane OHLC, adjustments already applied.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a closed date range.
    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<Bar>, DataError>;
}

/// Progress callback for multi-symbol operations.
pub trait FetchProgress: Send {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol finishes, successfully or not.
    fn on_complete(&self, symbol: &str, index: usize, total: usize, result: &Result<(), DataError>);

    /// Called when the entire batch is done.
    fn on_batch_complete(&self, succeeded: usize, skipped: usize, total: usize);
}

/// Simple progress reporter that prints to stdout.
pub struct StdoutProgress;

impl FetchProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(
        &self,
        symbol: &str,
        _index: usize,
        _total: usize,
        result: &Result<(), DataError>,
    ) {
        match result {
            Ok(()) => println!("  OK: {symbol}"),
            Err(e) => println!("  SKIP: {symbol}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, skipped: usize, total: usize) {
        println!("\nBatch complete: {succeeded}/{total} analyzed, {skipped} skipped");
    }
}

/// Progress reporter that swallows everything. Used when stdout carries a
/// machine-readable report, and in tests.
pub struct SilentProgress;

impl FetchProgress for SilentProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _symbol: &str,
        _index: usize,
        _total: usize,
        _result: &Result<(), DataError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _skipped: usize, _total: usize) {}
}

/// Bring a raw series into canonical form: sort ascending by date, drop
/// duplicate dates (first occurrence wins) and bars that fail sanity.
pub fn canonicalize(mut bars: Vec<Bar>) -> Vec<Bar> {
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    bars.retain(Bar::is_sane);
    bars
}
