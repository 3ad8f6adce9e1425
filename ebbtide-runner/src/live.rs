//! Live polling loop.
//!
//! One engine evaluation per poll. The loop owns no strategy logic: it
//! fetches a candle and a balance, steps the engine, and routes the
//! resulting intent to the execution adapter. A failed cycle is logged
//! and retried at the next poll; only configuration errors abort.

use std::time::Duration;

use ebbtide_core::domain::Side;
use ebbtide_core::{EngineError, StrategyEngine};
use tracing::{debug, info, warn};

use crate::config::{RunConfig, RunConfigError};
use crate::exec::{BalanceSource, CandleFeed, Clock, ExecutionAdapter};
use crate::result::TradeRecord;

/// What happened over a finished session (feed exhausted or cycle cap).
#[derive(Debug, Clone, PartialEq)]
pub struct LiveSummary {
    pub cycles: usize,
    pub trades: Vec<TradeRecord>,
    pub rejected_intents: usize,
    pub feed_errors: usize,
}

pub struct LiveLoop<F, E, C> {
    feed: F,
    venue: E,
    clock: C,
    engine: StrategyEngine,
    poll_interval: Duration,
    /// Stop after this many polls; `None` runs until the feed ends.
    max_cycles: Option<usize>,
}

impl<F, E, C> LiveLoop<F, E, C>
where
    F: CandleFeed,
    E: ExecutionAdapter + BalanceSource,
    C: Clock,
{
    pub fn new(
        config: &RunConfig,
        feed: F,
        venue: E,
        clock: C,
        poll_interval: Duration,
    ) -> Result<Self, RunConfigError> {
        config.validate()?;
        let engine = match config.interval_ms {
            Some(interval) => StrategyEngine::with_interval(&config.strategy, interval),
            None => StrategyEngine::new(&config.strategy),
        }
        .map_err(RunConfigError::Strategy)?;
        Ok(Self {
            feed,
            venue,
            clock,
            engine,
            poll_interval,
            max_cycles: None,
        })
    }

    pub fn with_max_cycles(mut self, max_cycles: usize) -> Self {
        self.max_cycles = Some(max_cycles);
        self
    }

    /// Poll until the feed is exhausted or the cycle cap is reached.
    pub fn run(mut self) -> LiveSummary {
        let mut summary = LiveSummary {
            cycles: 0,
            trades: Vec::new(),
            rejected_intents: 0,
            feed_errors: 0,
        };

        loop {
            if let Some(cap) = self.max_cycles {
                if summary.cycles >= cap {
                    info!(cycles = summary.cycles, "cycle cap reached");
                    break;
                }
            }
            summary.cycles += 1;

            match self.feed.next_candle() {
                Ok(Some(candle)) => self.evaluate(&candle, &mut summary),
                Ok(None) => {
                    info!(cycles = summary.cycles, "feed exhausted");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "candle fetch failed, retrying next poll");
                    summary.feed_errors += 1;
                }
            }

            self.clock.sleep(self.poll_interval);
        }
        summary
    }

    fn evaluate(&mut self, candle: &ebbtide_core::domain::Candle, summary: &mut LiveSummary) {
        let balance = match self.venue.balance() {
            Ok(balance) => balance,
            Err(e) => {
                warn!(error = %e, "balance fetch failed, retrying next poll");
                summary.feed_errors += 1;
                return;
            }
        };

        let decision = match self.engine.on_candle(candle, &balance) {
            Ok(decision) => decision,
            Err(EngineError::InsufficientData { have, need }) => {
                debug!(have, need, "warming up");
                return;
            }
            Err(e) => {
                // Duplicate or gapped poll; skip this cycle, the next
                // candle re-synchronizes the feed.
                warn!(error = %e, "cycle skipped");
                return;
            }
        };

        let Some(intent) = decision.intent else {
            return;
        };
        match self.venue.execute(&intent, candle.close) {
            Ok(fill) => {
                self.engine.apply_fill(&intent, &fill);
                let notional = match intent.side {
                    Side::Buy => fill.quantity * fill.price + fill.fee,
                    Side::Sell => fill.quantity * fill.price - fill.fee,
                };
                info!(
                    reason = ?intent.reason,
                    side = ?intent.side,
                    price = fill.price,
                    quantity = fill.quantity,
                    "fill"
                );
                let equity_after = self
                    .venue
                    .balance()
                    .map(|b| b.equity(candle.close))
                    .unwrap_or_else(|_| balance.equity(candle.close));
                summary.trades.push(TradeRecord {
                    timestamp_ms: candle.timestamp_ms,
                    side: intent.side,
                    reason: intent.reason,
                    price: fill.price,
                    quantity: fill.quantity,
                    notional,
                    fee: fill.fee,
                    equity_after,
                });
            }
            Err(e) => {
                warn!(reason = ?intent.reason, error = %e, "intent rejected");
                self.engine.order_rejected();
                summary.rejected_intents += 1;
            }
        }
    }
}

/// In-memory candle feed for paper trading and tests.
#[derive(Debug)]
pub struct ReplayFeed {
    candles: std::vec::IntoIter<ebbtide_core::domain::Candle>,
}

impl ReplayFeed {
    pub fn new(candles: Vec<ebbtide_core::domain::Candle>) -> Self {
        Self {
            candles: candles.into_iter(),
        }
    }
}

impl CandleFeed for ReplayFeed {
    fn next_candle(
        &mut self,
    ) -> Result<Option<ebbtide_core::domain::Candle>, crate::exec::FeedError> {
        Ok(self.candles.next())
    }
}

/// No-op clock for tests and paper replays.
#[derive(Debug, Default)]
pub struct InstantClock;

impl Clock for InstantClock {
    fn sleep(&mut self, _duration: Duration) {}
}
