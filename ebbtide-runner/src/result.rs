//! Persisted result types for a replay run.

use chrono::{DateTime, TimeZone, Utc};
use ebbtide_core::domain::{Side, TradeReason};
use serde::{Deserialize, Serialize};

use crate::config::RunId;
use crate::metrics::PerformanceSummary;

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// One executed fill, as recorded by the replay driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub timestamp_ms: i64,
    pub side: Side,
    pub reason: TradeReason,
    pub price: f64,
    pub quantity: f64,
    /// Quote currency moved by the fill (spent on buys, received on sells).
    pub notional: f64,
    pub fee: f64,
    /// Mark-to-market equity right after the fill.
    pub equity_after: f64,
}

impl TradeRecord {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

/// Mark-to-market equity at one candle close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp_ms: i64,
    pub equity: f64,
}

/// Complete outcome of one replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    pub metrics: PerformanceSummary,
    pub initial_equity: f64,
    pub final_equity: f64,
    pub candle_count: usize,
    pub warmup_candles: usize,
    /// Intents the ledger refused (overdrafts); the engine retried later.
    pub rejected_intents: usize,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}
