//! SwingLab CLI — reversal scan and profitability backtest commands.
//!
//! Commands:
//! - `scan` — detect yesterday's reversal patterns across a symbol roster
//! - `backtest` — backtest candidate symbols and rank them by returns

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use swinglab_core::data::{
    load_cboe_symbols, load_symbols, write_example_file, BarProvider, SilentProgress,
    StdoutProgress, SyntheticProvider, YahooProvider,
};
use swinglab_runner::{
    print_backtest_table, print_scan, run_backtest_batch, run_scan, save_results_json,
    scan_report_json, BatchOptions, Notifier, RunConfig, ScanOptions, WebhookNotifier,
};

#[derive(Parser)]
#[command(
    name = "swinglab",
    about = "SwingLab — daily reversal scanner and backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a symbol roster for yesterday's reversal patterns.
    Scan {
        /// Symbol CSV file.
        #[arg(long, default_value = "stock_symbols.csv")]
        file: PathBuf,

        /// Report format on stdout.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// POST the JSON report to this webhook after the scan.
        #[arg(long)]
        notify_url: Option<String>,

        /// Pause between symbol fetches, in milliseconds.
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Scan at most this many symbols.
        #[arg(long)]
        max_symbols: Option<usize>,

        /// Use generated bars instead of live data.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// TOML run configuration; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Backtest candidate symbols and rank them by profitability.
    Backtest {
        /// Candidate CSV file.
        #[arg(long, default_value = "candidate_stocks.csv")]
        file: PathBuf,

        /// Treat the file as a CBOE weekly-options directory.
        #[arg(long, default_value_t = false)]
        cboe: bool,

        /// Analysis period in days.
        #[arg(long)]
        days: Option<usize>,

        /// Shock threshold as a fraction (0.25 = 25%).
        #[arg(long)]
        threshold: Option<f64>,

        /// Disable extreme-move filtering.
        #[arg(long, default_value_t = false)]
        no_filter: bool,

        /// Backtest at most this many symbols.
        #[arg(long)]
        max_symbols: Option<usize>,

        /// Pause between symbol fetches, in milliseconds.
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Output directory for result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// TOML run configuration; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Use generated bars instead of live data.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            file,
            format,
            notify_url,
            delay_ms,
            max_symbols,
            synthetic,
            config,
        } => run_scan_cmd(
            file,
            format,
            notify_url,
            delay_ms,
            max_symbols,
            synthetic,
            config,
        ),
        Commands::Backtest {
            file,
            cboe,
            days,
            threshold,
            no_filter,
            max_symbols,
            delay_ms,
            output_dir,
            config,
            synthetic,
        } => run_backtest_cmd(
            file,
            cboe,
            days,
            threshold,
            no_filter,
            max_symbols,
            delay_ms,
            output_dir,
            config,
            synthetic,
        ),
    }
}

fn load_config(path: Option<&Path>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("failed to load config: {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

fn make_provider(synthetic: bool) -> Box<dyn BarProvider> {
    if synthetic {
        eprintln!("NOTE: using synthetic bars (demo mode)");
        Box::new(SyntheticProvider)
    } else {
        Box::new(YahooProvider::new())
    }
}

#[allow(clippy::too_many_arguments)]
fn run_scan_cmd(
    file: PathBuf,
    format: Format,
    notify_url: Option<String>,
    delay_ms: Option<u64>,
    max_symbols: Option<usize>,
    synthetic: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(ms) = delay_ms {
        config.scan.delay_ms = ms;
    }

    let symbols = load_symbols(&file)?;
    if symbols.is_empty() {
        bail!("no symbols found in {}", file.display());
    }

    let as_of = chrono::Local::now().date_naive();
    let mut opts = ScanOptions::from_config(&config.scan, as_of);
    opts.max_symbols = max_symbols;

    let provider = make_provider(synthetic);

    // In JSON mode stdout carries only the report, so progress is muted.
    let outcome = match format {
        Format::Text => {
            println!(
                "Scanning {} symbols for reversal patterns as of {as_of}...\n",
                symbols.len()
            );
            run_scan(provider.as_ref(), &symbols, &opts, &StdoutProgress)
        }
        Format::Json => run_scan(provider.as_ref(), &symbols, &opts, &SilentProgress),
    };

    match format {
        Format::Text => print_scan(&outcome),
        Format::Json => println!("{}", scan_report_json(&outcome)?),
    }

    // Delivery trouble must not fail a finished scan.
    if let Some(url) = notify_url {
        let notifier = WebhookNotifier::new(url);
        let subject = format!(
            "Daily reversal scan: {} patterns across {} symbols",
            outcome.total_hits(),
            outcome.distinct_hit_symbols()
        );
        let body = scan_report_json(&outcome)?;
        if let Err(e) = notifier.publish(&subject, &body) {
            eprintln!("WARNING: {} notification failed: {e}", notifier.name());
        }
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_backtest_cmd(
    file: PathBuf,
    cboe: bool,
    days: Option<usize>,
    threshold: Option<f64>,
    no_filter: bool,
    max_symbols: Option<usize>,
    delay_ms: Option<u64>,
    output_dir: PathBuf,
    config_path: Option<PathBuf>,
    synthetic: bool,
) -> Result<()> {
    let mut config = load_config(config_path.as_deref())?;
    if let Some(days) = days {
        config.backtest.lookback_days = days;
    }
    if let Some(threshold) = threshold {
        config.backtest.shock_threshold = threshold;
    }
    if no_filter {
        config.backtest.filter_shocks = false;
    }
    if let Some(ms) = delay_ms {
        config.batch.delay_ms = ms;
    }
    if max_symbols.is_some() {
        config.batch.max_symbols = max_symbols;
    }

    if !cboe && !file.exists() {
        write_example_file(&file)?;
        println!("Created example candidate file: {}", file.display());
        println!("Edit it with your candidates, then re-run the backtest.");
        return Ok(());
    }

    let symbols = if cboe {
        load_cboe_symbols(&file)?
    } else {
        load_symbols(&file)?
    };
    if symbols.is_empty() {
        bail!("no symbols found in {}", file.display());
    }

    let params = config.backtest_params();
    let as_of = chrono::Local::now().date_naive();
    let opts = BatchOptions::from_config(&config.batch, as_of);
    let provider = make_provider(synthetic);

    println!(
        "Backtesting {} candidates over {} days (run {})...\n",
        symbols.len(),
        params.lookback_days,
        &config.run_id()[..12]
    );

    let outcome = run_backtest_batch(provider.as_ref(), &symbols, &params, &opts, &StdoutProgress);
    print_backtest_table(&outcome);

    if outcome.results.is_empty() {
        return Ok(());
    }

    let path = save_results_json(&outcome.results, &output_dir)?;
    println!("\nResults saved to: {}", path.display());

    Ok(())
}
