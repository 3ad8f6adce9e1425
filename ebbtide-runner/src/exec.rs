//! Execution and polling seams.
//!
//! The strategy engine proposes intents; everything that touches an
//! exchange, a balance, or a clock sits behind these traits. The replay
//! driver and the live loop are written against them, so a simulated
//! ledger and a real venue adapter are interchangeable.

use ebbtide_core::domain::{BalanceSnapshot, Candle, Fill, OrderIntent};
use ebbtide_core::EngineError;
use std::time::Duration;
use thiserror::Error;

/// Errors from a candle feed or balance source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    #[error("feed unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Submits an order intent at the given reference price and reports the
/// fill. An `OrderRejected` return means no fill happened and the engine
/// must be told via `order_rejected`.
pub trait ExecutionAdapter {
    fn execute(&mut self, intent: &OrderIntent, price: f64) -> Result<Fill, EngineError>;
}

/// Supplies the next closed candle, or `None` when the feed is exhausted
/// (replay feeds end; live feeds block in `sleep` between polls instead).
pub trait CandleFeed {
    fn next_candle(&mut self) -> Result<Option<Candle>, FeedError>;
}

/// Reports the free balances the sizing rules work from.
pub trait BalanceSource {
    fn balance(&mut self) -> Result<BalanceSnapshot, FeedError>;
}

/// Injected sleep so tests drive the live loop without real time.
pub trait Clock {
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock implementation of [`Clock`].
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
