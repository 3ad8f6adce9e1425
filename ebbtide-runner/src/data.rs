//! Candle data: CSV ingest and a seeded synthetic generator.

use ebbtide_core::domain::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("bad CSV record at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("candles out of order at line {line}: {prev_ms} then {next_ms}")]
    OutOfOrder {
        line: usize,
        prev_ms: i64,
        next_ms: i64,
    },
    #[error("insane candle at line {line} (high < low or non-positive price)")]
    Insane { line: usize },
}

/// Load candles from a CSV file with columns
/// `timestamp_ms,open,high,low,close,volume` (header required).
///
/// Rejects out-of-order timestamps and candles that fail the sanity
/// check, with the offending line number.
pub fn load_candles_csv(path: &Path) -> Result<Vec<Candle>, DataError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut candles: Vec<Candle> = Vec::new();
    // Line 1 is the header.
    for (i, record) in reader.deserialize::<Candle>().enumerate() {
        let line = i + 2;
        let candle = record.map_err(|e| DataError::Parse {
            line,
            reason: e.to_string(),
        })?;
        if !candle.is_sane() {
            return Err(DataError::Insane { line });
        }
        if let Some(prev) = candles.last() {
            if candle.timestamp_ms <= prev.timestamp_ms {
                return Err(DataError::OutOfOrder {
                    line,
                    prev_ms: prev.timestamp_ms,
                    next_ms: candle.timestamp_ms,
                });
            }
        }
        candles.push(candle);
    }
    Ok(candles)
}

/// Write candles to CSV in the format `load_candles_csv` reads.
pub fn write_candles_csv(path: &Path, candles: &[Candle]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    for candle in candles {
        writer.serialize(candle).map_err(|e| DataError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    }
    writer.flush().map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parameters for the synthetic generator.
#[derive(Debug, Clone)]
pub struct SynthParams {
    pub count: usize,
    pub seed: u64,
    pub start_price: f64,
    pub start_ms: i64,
    pub interval_ms: i64,
    /// Per-candle return volatility, as a fraction of price.
    pub volatility: f64,
    /// Per-candle drift, as a fraction of price.
    pub drift: f64,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            count: 1_000,
            seed: 42,
            start_price: 50_000.0,
            start_ms: 0,
            interval_ms: 240 * 60_000,
            volatility: 0.01,
            drift: 0.0002,
        }
    }
}

/// Generate a random-walk candle series. Deterministic for a given seed.
pub fn synthetic_candles(params: &SynthParams) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut price = params.start_price;
    (0..params.count)
        .map(|i| {
            let open = price;
            let step: f64 = rng.gen_range(-1.0..1.0) * params.volatility + params.drift;
            let close = (open * (1.0 + step)).max(f64::MIN_POSITIVE);
            let wick_up: f64 = rng.gen_range(0.0..params.volatility * 0.5);
            let wick_down: f64 = rng.gen_range(0.0..params.volatility * 0.5);
            let high = open.max(close) * (1.0 + wick_up);
            let low = open.min(close) * (1.0 - wick_down);
            let volume = rng.gen_range(0.5..50.0);
            price = close;
            Candle {
                timestamp_ms: params.start_ms + i as i64 * params.interval_ms,
                open,
                high,
                low,
                close,
                volume,
            }
        })
        .collect()
}
