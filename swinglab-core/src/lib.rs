//! SwingLab Core — domain types, pattern detection, shock filtering,
//! strategy simulation, and performance metrics.
//!
//! This crate contains the computational heart of the scanner/backtester:
//! - Domain types (bars, trades, open positions)
//! - Four local-extreme pattern predicates over 3-bar windows
//! - Extreme-event (shock) filtering of historical series
//! - Bar-by-bar long-only reversal simulator
//! - Pure metric functions and per-symbol backtest assembly
//! - Data collaborators: provider trait, Yahoo Finance, symbol lists,
//!   synthetic bars

pub mod backtest;
pub mod data;
pub mod domain;
pub mod filter;
pub mod metrics;
pub mod signals;
pub mod strategy;
