//! `parity-check`: run the reference engine in batch and streaming mode over
//! synthetic bars and report whether they agree.
//!
//! Exit codes: 0 parity, 1 divergence, 2 setup failure.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tickbar_core::{Config, Timeframe};
use tickbar_parity::{run_with_config, BarSource, Corruption, ParityReport};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "parity-check",
    about = "Check that batch and streaming engine runs agree on synthetic bars"
)]
struct Args {
    /// Bar timeframe (30s, 1m, 2m, 3m, 5m and aliases). Unknown values fall back to 30s.
    #[arg(short, long)]
    timeframe: Option<String>,

    /// Number of synthetic bars. Overrides the config file.
    #[arg(long)]
    bars: Option<usize>,

    /// JSON config file (partial files are fine).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build bars by aggregating synthetic ticks instead of generating them directly.
    #[arg(long, default_value_t = false)]
    via_aggregator: bool,

    /// Feed the streaming run in reverse order; the check is expected to fail.
    #[arg(long, default_value_t = false)]
    corrupt_order: bool,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(tf) = &args.timeframe {
        config.aggregator.timeframe = Some(Timeframe::normalize(Some(tf.as_str())).to_string());
    }
    if let Some(bars) = args.bars {
        config.synthetic.bars = bars;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<ParityReport> {
    let config = load_config(args)?;
    let source = if args.via_aggregator {
        BarSource::Aggregated
    } else {
        BarSource::Direct
    };
    let corruption = if args.corrupt_order {
        Corruption::ReverseStreamingOrder
    } else {
        Corruption::None
    };

    let report = run_with_config(&config, source, corruption);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(report)
}

/// Run and map the outcome to a process exit code.
fn execute(args: &Args) -> u8 {
    match run(args) {
        Ok(report) => report.exit_code(),
        Err(err) => {
            error!("{err:#}");
            2
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tickbar_parity=info,tickbar_backtest=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    ExitCode::from(execute(&args))
}
