//! SwingLab Runner — scan and backtest orchestration, reporting, notification.
//!
//! This crate builds on `swinglab-core` to provide:
//! - Daily reversal scans across a symbol roster
//! - Batch backtests with profitability ranking
//! - Console, JSON, and CSV report surfaces
//! - Webhook notification for unattended scans
//! - TOML run configuration with fingerprinting

pub mod batch;
pub mod config;
pub mod notify;
pub mod report;
pub mod scanner;

pub use batch::{
    pre_gate_min, run_backtest_batch, run_batch_from_series, BatchOptions, BatchOutcome,
    BatchSummary, FETCH_PAD_DAYS,
};
pub use config::{BacktestSection, BatchSection, ConfigError, RunConfig, ScanSection};
pub use notify::{Notifier, NotifyError, WebhookNotifier};
pub use report::{
    print_backtest_table, print_scan, save_results_json, scan_report_doc, scan_report_json,
    trades_csv, ScanReportDoc, ScanSummaryCounts,
};
pub use scanner::{run_scan, ScanOptions, ScanOutcome};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn run_config_is_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
    }

    #[test]
    fn scan_types_are_send_sync() {
        assert_send::<ScanOptions>();
        assert_sync::<ScanOptions>();
        assert_send::<ScanOutcome>();
        assert_sync::<ScanOutcome>();
    }

    #[test]
    fn batch_types_are_send_sync() {
        assert_send::<BatchOptions>();
        assert_sync::<BatchOptions>();
        assert_send::<BatchOutcome>();
        assert_sync::<BatchOutcome>();
        assert_send::<BatchSummary>();
        assert_sync::<BatchSummary>();
    }

    #[test]
    fn report_doc_is_send_sync() {
        assert_send::<ScanReportDoc>();
        assert_sync::<ScanReportDoc>();
    }

    #[test]
    fn notifier_is_send_sync() {
        assert_send::<WebhookNotifier>();
        assert_sync::<WebhookNotifier>();
    }

    #[test]
    fn error_types_are_send_sync() {
        assert_send::<ConfigError>();
        assert_sync::<ConfigError>();
        assert_send::<NotifyError>();
        assert_sync::<NotifyError>();
    }
}
