//! Ebbtide CLI — replay, synthetic data, and paper trading commands.
//!
//! Commands:
//! - `backtest` — run a replay from a TOML config over a CSV candle file
//! - `synth` — generate a synthetic candle CSV for experimentation
//! - `paper` — paper-trade a candle file through the live polling loop

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ebbtide_runner::{
    load_candles_csv, run_replay, save_artifacts, synthetic_candles, write_candles_csv,
    InstantClock, LiveLoop, ReplayFeed, ReplayResult, RunConfig, SimExchange, SynthParams,
    SystemClock,
};

#[derive(Parser)]
#[command(name = "ebbtide", about = "Ebbtide — trend-following trading engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a replay over a CSV candle file and save run artifacts.
    Backtest {
        /// Path to a TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Candle CSV (timestamp_ms,open,high,low,close,volume).
        #[arg(long)]
        data: PathBuf,

        /// Output directory for artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,
    },
    /// Generate a synthetic candle CSV.
    Synth {
        /// Output CSV path.
        #[arg(long)]
        out: PathBuf,

        /// Number of candles.
        #[arg(long, default_value_t = 1_000)]
        count: usize,

        /// RNG seed; identical seeds give identical files.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Starting price.
        #[arg(long, default_value_t = 50_000.0)]
        start_price: f64,

        /// Candle interval in minutes.
        #[arg(long, default_value_t = 240)]
        interval_min: i64,
    },
    /// Paper-trade a candle file through the live polling loop.
    Paper {
        /// Path to a TOML run config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Candle CSV to poll through.
        #[arg(long)]
        data: PathBuf,

        /// Seconds to sleep between polls (0 replays instantly).
        #[arg(long, default_value_t = 0)]
        poll_secs: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            config,
            data,
            output_dir,
        } => run_backtest_cmd(config, &data, &output_dir),
        Commands::Synth {
            out,
            count,
            seed,
            start_price,
            interval_min,
        } => run_synth_cmd(&out, count, seed, start_price, interval_min),
        Commands::Paper {
            config,
            data,
            poll_secs,
        } => run_paper_cmd(config, &data, poll_secs),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<RunConfig> {
    match path {
        Some(path) => RunConfig::from_toml_path(&path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(RunConfig::default()),
    }
}

fn run_backtest_cmd(config: Option<PathBuf>, data: &PathBuf, output_dir: &PathBuf) -> Result<()> {
    let config = load_config(config)?;
    let candles =
        load_candles_csv(data).with_context(|| format!("loading candles {}", data.display()))?;

    let result = run_replay(&config, &candles)?;
    print_summary(&result);

    let run_dir = save_artifacts(&config, &result, output_dir)?;
    println!("Artifacts saved to: {}", run_dir.display());
    Ok(())
}

fn run_synth_cmd(
    out: &PathBuf,
    count: usize,
    seed: u64,
    start_price: f64,
    interval_min: i64,
) -> Result<()> {
    let params = SynthParams {
        count,
        seed,
        start_price,
        interval_ms: interval_min * 60_000,
        ..Default::default()
    };
    let candles = synthetic_candles(&params);
    write_candles_csv(out, &candles)?;
    println!("Wrote {} candles to {}", candles.len(), out.display());
    Ok(())
}

fn run_paper_cmd(config: Option<PathBuf>, data: &PathBuf, poll_secs: u64) -> Result<()> {
    let config = load_config(config)?;
    let candles =
        load_candles_csv(data).with_context(|| format!("loading candles {}", data.display()))?;
    let venue = SimExchange::new(
        config.initial_quote,
        config.initial_base,
        config.strategy.fee_rate,
    );
    let feed = ReplayFeed::new(candles);
    let interval = Duration::from_secs(poll_secs);

    // Zero interval replays instantly; anything else paces like live.
    let summary = if poll_secs == 0 {
        LiveLoop::new(&config, feed, venue, InstantClock, interval)?.run()
    } else {
        LiveLoop::new(&config, feed, venue, SystemClock, interval)?.run()
    };

    println!(
        "Paper session: {} cycles, {} fills, {} rejected, {} feed errors",
        summary.cycles,
        summary.trades.len(),
        summary.rejected_intents,
        summary.feed_errors
    );
    for trade in &summary.trades {
        println!(
            "  {:>13}  {:?} {:?}  price {:.2}  qty {:.8}",
            trade.timestamp_ms, trade.side, trade.reason, trade.price, trade.quantity
        );
    }
    Ok(())
}

fn print_summary(result: &ReplayResult) {
    println!("Run {}", &result.run_id[..12.min(result.run_id.len())]);
    println!(
        "  candles: {} ({} warm-up)",
        result.candle_count, result.warmup_candles
    );
    println!(
        "  equity: {:.2} -> {:.2} ({:+.2}%)",
        result.initial_equity,
        result.final_equity,
        result.metrics.cumulative_return * 100.0
    );
    println!(
        "  max drawdown: {:.2}%",
        result.metrics.max_drawdown * 100.0
    );
    println!(
        "  trades: {} ({} round trips, win rate {:.0}%)",
        result.metrics.trade_count,
        result.metrics.round_trips,
        result.metrics.win_rate * 100.0
    );
    if result.rejected_intents > 0 {
        println!("  rejected intents: {}", result.rejected_intents);
    }
    if !result.metrics.monthly.is_empty() {
        println!("  monthly returns:");
        for month in &result.metrics.monthly {
            println!(
                "    {:04}-{:02}  {:+.2}%",
                month.year,
                month.month,
                month.return_frac * 100.0
            );
        }
    }
}
