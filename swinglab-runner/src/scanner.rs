//! Latest-day scan over a symbol roster.
//!
//! For each symbol: fetch a short calendar window ending at `as_of`, keep
//! the trailing trading bars, and ask the detector about yesterday. A
//! symbol that fails to fetch or comes back too short is skipped and
//! reported through the progress callback; the scan always finishes.

use std::collections::HashSet;
use std::thread;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use swinglab_core::data::{BarProvider, DataError, FetchProgress};
use swinglab_core::domain::Bar;
use swinglab_core::signals::{detect_latest, PatternHit, PatternKind, DETECTION_WINDOW};

use crate::config::ScanSection;

/// Runtime options for one scan, merged from config and CLI flags.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// The "today" the scan runs against; yesterday is the candidate day.
    pub as_of: NaiveDate,
    /// Trading bars kept for the detection window.
    pub window_days: usize,
    /// Calendar padding on the fetch range.
    pub pad_days: i64,
    /// Pause before each symbol fetch.
    pub delay_ms: u64,
    /// Truncate the roster to this many symbols.
    pub max_symbols: Option<usize>,
}

impl ScanOptions {
    pub fn from_config(scan: &ScanSection, as_of: NaiveDate) -> Self {
        Self {
            as_of,
            window_days: scan.window_days,
            pad_days: scan.pad_days,
            delay_ms: scan.delay_ms,
            max_symbols: None,
        }
    }
}

/// Everything one scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub generated_at: DateTime<Utc>,
    /// Hits in scan order (roster order, then kind order per symbol).
    pub hits: Vec<PatternHit>,
    pub symbols_scanned: usize,
    pub symbols_skipped: usize,
}

impl ScanOutcome {
    /// Hits of one kind, in scan order.
    pub fn hits_of(&self, kind: PatternKind) -> Vec<PatternHit> {
        self.hits.iter().filter(|h| h.kind == kind).cloned().collect()
    }

    pub fn count_of(&self, kind: PatternKind) -> usize {
        self.hits.iter().filter(|h| h.kind == kind).count()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.len()
    }

    /// Number of distinct symbols with at least one hit.
    pub fn distinct_hit_symbols(&self) -> usize {
        self.hits
            .iter()
            .map(|h| h.symbol.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

/// The trailing `window` bars of a series.
fn tail_window(bars: &[Bar], window: usize) -> &[Bar] {
    &bars[bars.len().saturating_sub(window)..]
}

/// Scan every symbol in the roster for yesterday's reversal patterns.
pub fn run_scan(
    provider: &dyn BarProvider,
    symbols: &[String],
    opts: &ScanOptions,
    progress: &dyn FetchProgress,
) -> ScanOutcome {
    let roster = match opts.max_symbols {
        Some(n) => &symbols[..n.min(symbols.len())],
        None => symbols,
    };
    let start = opts.as_of - Duration::days(opts.window_days as i64 + opts.pad_days);

    let mut hits = Vec::new();
    let mut skipped = 0usize;

    for (index, symbol) in roster.iter().enumerate() {
        if opts.delay_ms > 0 {
            thread::sleep(StdDuration::from_millis(opts.delay_ms));
        }
        progress.on_start(symbol, index, roster.len());

        let outcome = provider.fetch(symbol, start, opts.as_of).and_then(|bars| {
            let window = tail_window(&bars, opts.window_days);
            if window.len() < DETECTION_WINDOW {
                return Err(DataError::InsufficientData {
                    symbol: symbol.clone(),
                    got: window.len(),
                    need: DETECTION_WINDOW,
                });
            }
            hits.extend(detect_latest(symbol, window));
            Ok(())
        });

        if outcome.is_err() {
            skipped += 1;
        }
        progress.on_complete(symbol, index, roster.len(), &outcome);
    }

    progress.on_batch_complete(roster.len() - skipped, skipped, roster.len());

    ScanOutcome {
        generated_at: Utc::now(),
        hits,
        symbols_scanned: roster.len(),
        symbols_skipped: skipped,
    }
}
