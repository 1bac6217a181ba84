//! Integration tests for report surfaces.
//!
//! Runs real backtests and checks that:
//! 1. Saved result files are timestamped and parse back losslessly.
//! 2. The trade tape reflects what the simulator actually did.
//! 3. Console formatting handles populated outcomes.

use chrono::{NaiveDate, TimeZone, Utc};
use swinglab_core::backtest::{BacktestParams, BacktestResult};
use swinglab_core::domain::Bar;
use swinglab_core::signals::{PatternHit, PatternKind};
use swinglab_core::strategy::{simulate, StrategyParams};
use swinglab_runner::batch::{run_batch_from_series, BatchOutcome};
use swinglab_runner::report::{print_backtest_table, print_scan, save_results_json, trades_csv};
use swinglab_runner::scanner::ScanOutcome;

fn bars_from_closes(closes: &[f64]) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: base + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        })
        .collect()
}

/// Dip, rebound, exit: one complete round trip plus calm padding.
fn round_trip_closes() -> Vec<f64> {
    vec![100.0, 92.0, 95.0, 103.0, 97.0, 96.0, 96.0, 96.0, 96.0, 96.0]
}

fn ranked_results() -> Vec<BacktestResult> {
    let params = BacktestParams {
        lookback_days: 20,
        ..BacktestParams::default()
    };
    let series = vec![
        ("WIN".to_string(), bars_from_closes(&round_trip_closes())),
        ("FLAT".to_string(), bars_from_closes(&[100.0; 10])),
    ];
    run_batch_from_series(&series, &params)
}

#[test]
fn saved_results_parse_back_losslessly() {
    let results = ranked_results();
    let dir = tempfile::tempdir().unwrap();

    let path = save_results_json(&results, dir.path()).unwrap();

    assert!(path.exists());
    let filename = path.file_name().unwrap().to_str().unwrap();
    assert!(
        filename.starts_with("backtest_results_") && filename.ends_with(".json"),
        "unexpected filename: {filename}"
    );

    let json = std::fs::read_to_string(&path).unwrap();
    let parsed: Vec<BacktestResult> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, results);
}

#[test]
fn saving_creates_the_results_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("results").join("daily");

    let path = save_results_json(&ranked_results(), &nested).unwrap();

    assert!(nested.is_dir());
    assert!(path.starts_with(&nested));
}

#[test]
fn trade_tape_reflects_the_simulation() {
    let bars = bars_from_closes(&round_trip_closes());
    let sim = simulate(&bars, &StrategyParams::default());
    assert_eq!(sim.trades.len(), 1);

    let csv = trades_csv("WIN", &sim.trades).unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(rows.len(), 2);

    // Entry fills at the bar after the dip signal, exit after the peak.
    let fields: Vec<&str> = rows[1].split(',').collect();
    assert_eq!(fields[0], "WIN");
    assert_eq!(fields[1], "Long");
    assert_eq!(fields[2], "2024-06-03");
    assert_eq!(fields[3], "95.0000");
    assert_eq!(fields[4], "2024-06-05");
    assert_eq!(fields[5], "97.0000");
    assert_eq!(fields[7], "SignalExit");
}

#[test]
fn console_report_handles_populated_outcomes() {
    // Smoke: the table and scan formatting must not panic on real data.
    let results = ranked_results();
    print_backtest_table(&BatchOutcome {
        results,
        symbols_skipped: 1,
    });

    let hit = PatternHit {
        kind: PatternKind::LocalExtremeLow,
        symbol: "DIP".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 6).unwrap(),
        close_price: 95.0,
        high_price: None,
        low_price: Some(94.0),
    };
    print_scan(&ScanOutcome {
        generated_at: Utc.with_ymd_and_hms(2024, 6, 7, 13, 30, 0).unwrap(),
        hits: vec![hit],
        symbols_scanned: 3,
        symbols_skipped: 0,
    });
}
