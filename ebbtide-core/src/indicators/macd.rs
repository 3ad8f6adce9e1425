//! MACD — moving average convergence/divergence, streaming.
//!
//! macd = EMA(fast) - EMA(slow); signal = EMA(signal_span) of macd;
//! hist = macd - signal.

use super::ema::Ema;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal: f64,
    pub hist: f64,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

impl Macd {
    pub fn new(fast_span: usize, slow_span: usize, signal_span: usize) -> Self {
        assert!(
            fast_span < slow_span,
            "MACD fast span must be < slow span"
        );
        Self {
            fast: Ema::new(fast_span),
            slow: Ema::new(slow_span),
            signal: Ema::new(signal_span),
        }
    }

    pub fn update(&mut self, close: f64) -> MacdOutput {
        let macd = self.fast.update(close) - self.slow.update(close);
        let signal = self.signal.update(macd);
        MacdOutput {
            macd,
            signal,
            hist: macd - signal,
        }
    }
}
