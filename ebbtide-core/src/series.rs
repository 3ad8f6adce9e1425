//! CandleSeries — append-only ordered candle storage.
//!
//! The series is the raw substrate for indicator computation. It enforces
//! strictly increasing timestamps on append and, when an expected interval
//! is configured, rejects gapped feeds instead of silently spanning them.

use crate::domain::Candle;
use crate::error::EngineError;

#[derive(Debug, Clone, Default)]
pub struct CandleSeries {
    candles: Vec<Candle>,
    /// Expected spacing between consecutive candles, if known.
    interval_ms: Option<i64>,
}

impl CandleSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Series that validates candle spacing against a fixed interval.
    pub fn with_interval(interval_ms: i64) -> Self {
        Self {
            candles: Vec::new(),
            interval_ms: Some(interval_ms),
        }
    }

    /// Append a candle, enforcing timestamp ordering and gap detection.
    pub fn push(&mut self, candle: Candle) -> Result<(), EngineError> {
        if let Some(last) = self.candles.last() {
            if candle.timestamp_ms <= last.timestamp_ms {
                return Err(EngineError::NonMonotonicFeed {
                    prev_ms: last.timestamp_ms,
                    next_ms: candle.timestamp_ms,
                });
            }
            if let Some(interval) = self.interval_ms {
                if candle.timestamp_ms - last.timestamp_ms > interval {
                    return Err(EngineError::FeedGap {
                        prev_ms: last.timestamp_ms,
                        next_ms: candle.timestamp_ms,
                        interval_ms: interval,
                    });
                }
            }
        }
        self.candles.push(candle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }
}
