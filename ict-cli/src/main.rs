//! Thin harness: loads bars plus a feature-flag config, runs the ICT
//! signal-generation pipeline for one `(symbol, timeframe)` call, and
//! prints the resulting `Signal` / `NoTradeMessage` as JSON. Analogous to
//! `trendlab-cli`'s role as a thin wrapper around its core crate — no
//! scheduler, no bot glue, no chart rendering (`spec.md` §1).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use ict_core::config::PipelineConfig;
use ict_core::domain::{Bar, BarSeries};
use ict_core::{Outcome, Pipeline, SignalRequest};

/// Generate one ICT trade signal (or diagnostic) from OHLCV bar files.
#[derive(Debug, Parser)]
#[command(name = "ict-cli", version, about)]
struct Cli {
    /// Instrument symbol, e.g. "BTCUSDT".
    #[arg(long)]
    symbol: String,

    /// Primary analysis timeframe, e.g. "4h".
    #[arg(long)]
    timeframe: String,

    /// JSON file containing the primary timeframe's bar array.
    #[arg(long)]
    bars: PathBuf,

    /// Directory of `{timeframe}.json` bar files for the higher/lower
    /// timeframe dictionary. Optional — an empty MTF set degrades
    /// gracefully to `missing` in the consensus breakdown.
    #[arg(long)]
    mtf_dir: Option<PathBuf>,

    /// TOML feature-flag config file. Falls back to `PipelineConfig::default()`
    /// when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Current price. Defaults to the primary series' last close.
    #[arg(long)]
    current_price: Option<f64>,

    /// Unix epoch seconds used for cache TTL bookkeeping and the emitted
    /// signal's timestamp. Defaults to the primary series' last bar time.
    #[arg(long)]
    now: Option<i64>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn load_bar_series(path: &Path) -> Result<BarSeries> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading bar file {}", path.display()))?;
    let bars: BarSeries = serde_json::from_str(&raw)
        .with_context(|| format!("parsing bar JSON {}", path.display()))?;
    Ok(bars)
}

fn load_mtf_bars(dir: Option<&Path>) -> Result<BTreeMap<String, BarSeries>> {
    let mut mtf_bars = BTreeMap::new();
    let Some(dir) = dir else {
        return Ok(mtf_bars);
    };
    for entry in fs::read_dir(dir).with_context(|| format!("reading mtf dir {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if label.is_empty() {
            continue;
        }
        mtf_bars.insert(label, load_bar_series(&path)?);
    }
    Ok(mtf_bars)
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        None => Ok(PipelineConfig::default()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            PipelineConfig::from_toml(&raw).with_context(|| "parsing pipeline config".to_string())
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let bars = load_bar_series(&cli.bars)?;
    let mtf_bars = load_mtf_bars(cli.mtf_dir.as_deref())?;
    let config = load_config(cli.config.as_deref())?;

    let last_bar: Option<&Bar> = bars.last();
    let current_price = cli
        .current_price
        .or_else(|| last_bar.map(|b| b.close))
        .context("no bars supplied and --current-price not given")?;
    let now_epoch_secs = cli
        .now
        .map(|n| n.max(0) as u64)
        .or_else(|| last_bar.map(|b| b.timestamp.timestamp().max(0) as u64))
        .unwrap_or(0);

    let mut pipeline = Pipeline::new(config)?;
    let request = SignalRequest {
        symbol: &cli.symbol,
        timeframe: &cli.timeframe,
        bars: &bars,
        mtf_bars: &mtf_bars,
        current_price,
        now_epoch_secs,
    };

    let outcome = pipeline.generate_signal(request);

    let json = match &outcome {
        Outcome::Signal(signal) => {
            tracing::info!(symbol = %cli.symbol, timeframe = %cli.timeframe, signal_type = ?signal.signal_type, "signal generated");
            serde_json::to_value(signal)?
        }
        Outcome::NoTrade(msg) => {
            tracing::info!(symbol = %cli.symbol, timeframe = %cli.timeframe, step = %msg.blocked_at_step, "no-trade");
            serde_json::to_value(msg)?
        }
        Outcome::None => {
            tracing::debug!(symbol = %cli.symbol, timeframe = %cli.timeframe, "admission gate declined silently");
            serde_json::json!({ "type": "NONE" })
        }
    };

    if cli.pretty {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", serde_json::to_string(&json)?);
    }

    Ok(())
}
