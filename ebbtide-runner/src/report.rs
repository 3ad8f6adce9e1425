//! Artifact export — the persisted record of a replay.
//!
//! A run directory holds three files:
//! - `manifest.json` — the full `ReplayResult` plus the producing config
//! - `trades.csv` — the trade tape
//! - `equity.csv` — the candle-by-candle equity curve
//!
//! Persisted JSON carries a `schema_version`; newer versions are rejected
//! on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::result::{EquityPoint, ReplayResult, TradeRecord, SCHEMA_VERSION};

/// Everything needed to interpret or reproduce the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub config: RunConfig,
    pub result: ReplayResult,
}

pub fn export_manifest_json(manifest: &RunManifest) -> Result<String> {
    serde_json::to_string_pretty(manifest).context("failed to serialize run manifest")
}

pub fn import_manifest_json(json: &str) -> Result<RunManifest> {
    let manifest: RunManifest =
        serde_json::from_str(json).context("failed to deserialize run manifest")?;
    if manifest.result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            manifest.result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(manifest)
}

/// Columns: timestamp_ms, datetime, side, reason, price, quantity,
/// notional, fee, equity_after.
pub fn export_trades_csv(trades: &[TradeRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "timestamp_ms",
        "datetime",
        "side",
        "reason",
        "price",
        "quantity",
        "notional",
        "fee",
        "equity_after",
    ])?;
    for t in trades {
        let datetime = t
            .datetime()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        wtr.write_record([
            &t.timestamp_ms.to_string(),
            &datetime,
            &format!("{:?}", t.side),
            &format!("{:?}", t.reason),
            &format!("{:.8}", t.price),
            &format!("{:.8}", t.quantity),
            &format!("{:.2}", t.notional),
            &format!("{:.4}", t.fee),
            &format!("{:.2}", t.equity_after),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn export_equity_csv(equity_curve: &[EquityPoint]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["timestamp_ms", "datetime", "equity"])?;
    for point in equity_curve {
        let datetime = Utc
            .timestamp_millis_opt(point.timestamp_ms)
            .single()
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        wtr.write_record([
            &point.timestamp_ms.to_string(),
            &datetime,
            &format!("{:.2}", point.equity),
        ])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Save the full artifact set under `output_dir`, in a directory named by
/// the short run id and wall-clock timestamp. Returns the created path.
pub fn save_artifacts(
    config: &RunConfig,
    result: &ReplayResult,
    output_dir: &Path,
) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        &result.run_id[..12.min(result.run_id.len())],
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let manifest = RunManifest {
        config: config.clone(),
        result: result.clone(),
    };
    std::fs::write(run_dir.join("manifest.json"), export_manifest_json(&manifest)?)?;
    std::fs::write(run_dir.join("trades.csv"), export_trades_csv(&result.trades)?)?;
    std::fs::write(
        run_dir.join("equity.csv"),
        export_equity_csv(&result.equity_curve)?,
    )?;

    Ok(run_dir)
}
