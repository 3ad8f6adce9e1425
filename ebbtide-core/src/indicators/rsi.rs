//! Relative strength index — streaming recurrence.
//!
//! Gains and losses are split from the close-to-close change and smoothed
//! with Wilder averages (alpha = 1/window, first-value seeded, see
//! [`Ema::wilder`]). RSI = 100 - 100 / (1 + avg_gain / avg_loss).
//!
//! Before the first price change there is nothing to average, so the first
//! close reads as a neutral 50. A zero loss average with positive gains
//! saturates at 100; an all-flat window stays at 50.

use super::ema::Ema;

#[derive(Debug, Clone)]
pub struct Rsi {
    avg_gain: Ema,
    avg_loss: Ema,
    prev_close: Option<f64>,
}

impl Rsi {
    pub fn new(window: usize) -> Self {
        Self {
            avg_gain: Ema::wilder(window),
            avg_loss: Ema::wilder(window),
            prev_close: None,
        }
    }

    /// Fold in the next close and return the updated index in [0, 100].
    pub fn update(&mut self, close: f64) -> f64 {
        let prev = match self.prev_close.replace(close) {
            Some(prev) => prev,
            None => return 50.0,
        };
        let change = close - prev;
        let gain = self.avg_gain.update(change.max(0.0));
        let loss = self.avg_loss.update((-change).max(0.0));

        if loss == 0.0 {
            if gain == 0.0 {
                50.0
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + gain / loss)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_close_is_neutral() {
        let mut rsi = Rsi::new(14);
        assert_eq!(rsi.update(100.0), 50.0);
    }

    #[test]
    fn window_2_known_values() {
        // alpha = 0.5. Gain seed 1 at the first change, then the loss pulls
        // the averages to parity.
        let mut rsi = Rsi::new(2);
        assert_eq!(rsi.update(10.0), 50.0);
        assert_eq!(rsi.update(11.0), 100.0); // avg_gain 1, avg_loss 0
        assert_eq!(rsi.update(10.0), 50.0); // both averages 0.5
        assert_eq!(rsi.update(10.0), 50.0); // both decay to 0.25
    }

    #[test]
    fn monotone_drop_reads_zero() {
        let mut rsi = Rsi::new(14);
        rsi.update(100.0);
        for i in 1..10 {
            assert_eq!(rsi.update(100.0 - i as f64), 0.0);
        }
    }

    #[test]
    fn flat_series_stays_neutral() {
        let mut rsi = Rsi::new(14);
        for _ in 0..20 {
            assert_eq!(rsi.update(42.0), 50.0);
        }
    }

    #[test]
    fn bounded_on_noisy_input() {
        let mut rsi = Rsi::new(5);
        for i in 0..200 {
            let close = 100.0 + ((i as f64) * 0.7).sin() * 15.0;
            let v = rsi.update(close);
            assert!((0.0..=100.0).contains(&v), "RSI out of range: {v}");
        }
    }

    #[test]
    fn rally_after_selloff_recovers_above_50() {
        let mut rsi = Rsi::new(2);
        for close in [100.0, 95.0, 94.0] {
            rsi.update(close);
        }
        assert!(rsi.update(108.0) > 50.0);
    }
}
