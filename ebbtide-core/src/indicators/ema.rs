//! Exponential moving average — streaming recurrence.
//!
//! EMA[t] = EMA[t-1] + alpha * (x[t] - EMA[t-1]), alpha = 2 / (span + 1).
//! Seed: the first observed value. This matches adjust-free exponential
//! weighting, so early values differ from an SMA-seeded EMA; every smoothed
//! series in the engine (closes, MACD signal, TR, DM, DX) uses this rule.

#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span >= 1, "EMA span must be >= 1");
        Self {
            alpha: 2.0 / (span as f64 + 1.0),
            value: None,
        }
    }

    /// Wilder smoothing: alpha = 1 / window instead of 2 / (span + 1).
    /// Same recurrence and first-value seeding, heavier memory. Used by the
    /// RSI gain/loss averages.
    pub fn wilder(window: usize) -> Self {
        assert!(window >= 1, "Wilder window must be >= 1");
        Self {
            alpha: 1.0 / window as f64,
            value: None,
        }
    }

    /// Fold in the next observation and return the updated average.
    pub fn update(&mut self, x: f64) -> f64 {
        let next = match self.value {
            None => x,
            Some(prev) => prev + self.alpha * (x - prev),
        };
        self.value = Some(next);
        next
    }

    /// Current average, if at least one observation has been folded in.
    pub fn value(&self) -> Option<f64> {
        self.value
    }
}
