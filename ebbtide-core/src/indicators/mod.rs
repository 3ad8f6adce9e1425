//! Streaming indicator engine.
//!
//! One snapshot per candle, derived only from candles up to and including
//! the current one — no look-ahead, and O(1) state per update instead of
//! rescanning history each cycle. A snapshot at candle t is only
//! signal-grade once the engine has seen the warm-up count of candles.

pub mod adx;
pub mod ema;
pub mod macd;
pub mod rsi;

pub use adx::{Dmi, DmiOutput};
pub use ema::Ema;
pub use macd::{Macd, MacdOutput};
pub use rsi::Rsi;

use crate::config::StrategyConfig;
use crate::domain::Candle;
use serde::{Deserialize, Serialize};

/// Derived indicator values for one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub ema_short: f64,
    pub ema_long: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub adx: f64,
    pub rsi: f64,
}

#[derive(Debug, Clone)]
pub struct IndicatorEngine {
    ema_short: Ema,
    ema_long: Ema,
    macd: Macd,
    dmi: Dmi,
    rsi: Rsi,
    warmup: usize,
    samples: usize,
}

impl IndicatorEngine {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            ema_short: Ema::new(config.ema_short_span),
            ema_long: Ema::new(config.ema_long_span),
            macd: Macd::new(
                config.macd_fast_span,
                config.macd_slow_span,
                config.macd_signal_span,
            ),
            dmi: Dmi::new(config.adx_window),
            rsi: Rsi::new(config.rsi_window),
            warmup: config.warmup_candles(),
            samples: 0,
        }
    }

    /// Fold in the next candle and return its snapshot.
    pub fn update(&mut self, candle: &Candle) -> IndicatorSnapshot {
        self.samples += 1;
        let macd = self.macd.update(candle.close);
        let dmi = self.dmi.update(candle);
        IndicatorSnapshot {
            ema_short: self.ema_short.update(candle.close),
            ema_long: self.ema_long.update(candle.close),
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_hist: macd.hist,
            plus_di: dmi.plus_di,
            minus_di: dmi.minus_di,
            adx: dmi.adx,
            rsi: self.rsi.update(candle.close),
        }
    }

    /// Candles seen so far.
    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Candles required before snapshots are signal-grade.
    pub fn warmup_candles(&self) -> usize {
        self.warmup
    }

    /// True once the warm-up requirement is met.
    pub fn is_warm(&self) -> bool {
        self.samples >= self.warmup
    }
}
