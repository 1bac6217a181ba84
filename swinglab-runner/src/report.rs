//! Reporting — console tables, the scan JSON document, and result files.
//!
//! Three output surfaces:
//! - **Console**: grouped scan sections and the ranked profitability table
//! - **JSON**: the published scan report shape, and timestamped result files
//! - **CSV**: a per-symbol trade tape for external analysis tools

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use swinglab_core::backtest::BacktestResult;
use swinglab_core::domain::Trade;
use swinglab_core::signals::{PatternHit, PatternKind};

use crate::batch::BatchOutcome;
use crate::scanner::ScanOutcome;

// ─── Scan console report ────────────────────────────────────────────

/// Print the grouped scan report.
pub fn print_scan(outcome: &ScanOutcome) {
    if outcome.hits.is_empty() {
        println!(
            "No reversal patterns detected today ({} symbols scanned).",
            outcome.symbols_scanned
        );
        return;
    }

    println!("\n{}", "=".repeat(80));
    println!("DAILY REVERSAL SCAN");
    println!("{}", "=".repeat(80));

    for kind in PatternKind::ALL {
        let hits = outcome.hits_of(kind);
        if hits.is_empty() {
            continue;
        }

        println!("\n{}:", kind.label().to_uppercase());
        println!("{}", "-".repeat(50));
        for hit in &hits {
            let mut line = format!(
                "  {:<6} | {} | Close: ${:8.2}",
                hit.symbol, hit.date, hit.close_price
            );
            if let Some(high) = hit.high_price {
                line.push_str(&format!(" | High: ${high:8.2}"));
            }
            if let Some(low) = hit.low_price {
                line.push_str(&format!(" | Low: ${low:8.2}"));
            }
            println!("{line}");
        }
    }

    println!("\n{}", "=".repeat(80));
    println!(
        "Summary: {} extreme highs, {} close highs, {} extreme lows, {} close lows",
        outcome.count_of(PatternKind::LocalExtremeHigh),
        outcome.count_of(PatternKind::LocalCloseHigh),
        outcome.count_of(PatternKind::LocalExtremeLow),
        outcome.count_of(PatternKind::LocalCloseLow),
    );
    println!("Total patterns detected: {}", outcome.total_hits());
}

// ─── Scan JSON document ─────────────────────────────────────────────

/// Counts block of the scan report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummaryCounts {
    pub extreme_highs_count: usize,
    pub close_highs_count: usize,
    pub extreme_lows_count: usize,
    pub close_lows_count: usize,
    pub total_patterns: usize,
}

/// The published scan report shape. Field names are the JSON contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReportDoc {
    pub timestamp: String,
    /// Distinct symbols that produced at least one hit, not symbols scanned.
    pub total_symbols_analyzed: usize,
    pub local_extreme_highs: Vec<PatternHit>,
    pub local_close_highs: Vec<PatternHit>,
    pub local_extreme_lows: Vec<PatternHit>,
    pub local_close_lows: Vec<PatternHit>,
    pub summary: ScanSummaryCounts,
}

/// Group a scan outcome into the report document.
pub fn scan_report_doc(outcome: &ScanOutcome) -> ScanReportDoc {
    ScanReportDoc {
        timestamp: outcome.generated_at.to_rfc3339(),
        total_symbols_analyzed: outcome.distinct_hit_symbols(),
        local_extreme_highs: outcome.hits_of(PatternKind::LocalExtremeHigh),
        local_close_highs: outcome.hits_of(PatternKind::LocalCloseHigh),
        local_extreme_lows: outcome.hits_of(PatternKind::LocalExtremeLow),
        local_close_lows: outcome.hits_of(PatternKind::LocalCloseLow),
        summary: ScanSummaryCounts {
            extreme_highs_count: outcome.count_of(PatternKind::LocalExtremeHigh),
            close_highs_count: outcome.count_of(PatternKind::LocalCloseHigh),
            extreme_lows_count: outcome.count_of(PatternKind::LocalExtremeLow),
            close_lows_count: outcome.count_of(PatternKind::LocalCloseLow),
            total_patterns: outcome.total_hits(),
        },
    }
}

/// The scan report document as pretty JSON.
pub fn scan_report_json(outcome: &ScanOutcome) -> Result<String> {
    serde_json::to_string_pretty(&scan_report_doc(outcome))
        .context("failed to serialize scan report")
}

// ─── Backtest console report ────────────────────────────────────────

/// Print the ranked profitability table plus the summary block.
///
/// Expects `outcome.results` in rank order (the batch sorts them).
pub fn print_backtest_table(outcome: &BatchOutcome) {
    if outcome.results.is_empty() {
        println!("No backtest results to display.");
        return;
    }

    println!("\n{}", "=".repeat(100));
    println!("PROFITABILITY RANKING");
    println!("{}", "=".repeat(100));
    println!(
        "{:<4} {:<8} {:<12} {:<10} {:<8} {:<12} {:<8} {:<10}",
        "Rank", "Symbol", "Total Return", "Win Rate", "Trades", "Avg/Trade", "Sharpe", "Max DD"
    );
    println!("{}", "-".repeat(100));

    for (rank, result) in outcome.results.iter().enumerate() {
        println!(
            "{:<4} {:<8} {:<12} {:<10} {:<8} {:<12} {:<8.2} {:<10}",
            rank + 1,
            result.symbol,
            format!("{:+.1}%", result.total_return * 100.0),
            format!("{:.1}%", result.win_rate * 100.0),
            result.total_trades,
            format!("{:+.1}%", result.avg_return_per_trade * 100.0),
            result.sharpe_ratio,
            format!("{:.1}%", result.max_drawdown * 100.0),
        );
    }
    println!("{}", "-".repeat(100));

    if let Some(summary) = outcome.summary() {
        println!(
            "Best performer: {} ({:+.1}% return)",
            summary.best_symbol,
            summary.best_return * 100.0
        );
        if summary.total > 1 {
            println!(
                "Worst performer: {} ({:+.1}% return)",
                summary.worst_symbol,
                summary.worst_return * 100.0
            );
        }
        println!("\nSummary statistics:");
        println!(
            "  Profitable stocks: {}/{} ({:.1}%)",
            summary.profitable,
            summary.total,
            summary.profitable as f64 / summary.total as f64 * 100.0
        );
        println!("  Average return: {:+.1}%", summary.mean_return * 100.0);
    }

    if outcome.symbols_skipped > 0 {
        println!("  Skipped symbols: {}", outcome.symbols_skipped);
    }
}

// ─── Result files ───────────────────────────────────────────────────

/// Write ranked results to `backtest_results_<timestamp>.json` under `dir`.
///
/// Returns the path of the file written.
pub fn save_results_json(results: &[BacktestResult], dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create results dir: {}", dir.display()))?;

    let filename = format!(
        "backtest_results_{}.json",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);

    let json = serde_json::to_string_pretty(results).context("failed to serialize results")?;
    std::fs::write(&path, json)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}

/// One symbol's trade tape as CSV.
pub fn trades_csv(symbol: &str, trades: &[Trade]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "symbol",
        "side",
        "entry_date",
        "entry_price",
        "exit_date",
        "exit_price",
        "return_pct",
        "exit_reason",
    ])?;

    for trade in trades {
        wtr.write_record([
            symbol,
            &format!("{:?}", trade.side),
            &trade.entry_date.to_string(),
            &format!("{:.4}", trade.entry_price),
            &trade.exit_date.to_string(),
            &format!("{:.4}", trade.exit_price),
            &format!("{:.6}", trade.return_pct),
            &format!("{:?}", trade.exit_reason),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}
