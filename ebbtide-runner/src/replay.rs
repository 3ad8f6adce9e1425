//! Replay driver — runs the strategy engine over historical candles
//! against the simulated exchange ledger.
//!
//! The driver owns nothing the engine does not also see in a live run:
//! the same candles at the same boundaries produce the same decisions,
//! only the execution venue differs.

use ebbtide_core::domain::{Candle, Side};
use ebbtide_core::{EngineError, StrategyEngine};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{RunConfig, RunConfigError};
use crate::exec::ExecutionAdapter;
use crate::metrics::PerformanceSummary;
use crate::result::{EquityPoint, ReplayResult, TradeRecord, SCHEMA_VERSION};
use crate::sim::SimExchange;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("config error: {0}")]
    Config(#[from] RunConfigError),
    #[error("bad candle feed: {0}")]
    Feed(EngineError),
    #[error("empty candle feed")]
    EmptyFeed,
}

/// Run one replay over the candle slice.
///
/// Warm-up cycles contribute equity points but no decisions. A rejected
/// intent (ledger overdraft) is logged and counted; the engine stays in
/// its pre-attempt phase and may retry on a later candle.
pub fn run_replay(config: &RunConfig, candles: &[Candle]) -> Result<ReplayResult, ReplayError> {
    config.validate()?;
    if candles.is_empty() {
        return Err(ReplayError::EmptyFeed);
    }

    let mut engine = match config.interval_ms {
        Some(interval) => StrategyEngine::with_interval(&config.strategy, interval),
        None => StrategyEngine::new(&config.strategy),
    }
    .map_err(RunConfigError::Strategy)?;

    let mut exchange = SimExchange::new(
        config.initial_quote,
        config.initial_base,
        config.strategy.fee_rate,
    );

    let run_id = config.run_id();
    info!(run_id = %run_id, candles = candles.len(), "replay started");

    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut equity_curve: Vec<EquityPoint> = Vec::with_capacity(candles.len());
    let mut rejected_intents = 0usize;

    for candle in candles {
        let balance = exchange.balance();
        match engine.on_candle(candle, &balance) {
            Ok(decision) => {
                if let Some(intent) = decision.intent {
                    match exchange.execute(&intent, candle.close) {
                        Ok(fill) => {
                            engine.apply_fill(&intent, &fill);
                            let notional = match intent.side {
                                Side::Buy => fill.quantity * fill.price + fill.fee,
                                Side::Sell => fill.quantity * fill.price - fill.fee,
                            };
                            let equity_after = exchange.balance().equity(candle.close);
                            info!(
                                reason = ?intent.reason,
                                side = ?intent.side,
                                price = fill.price,
                                quantity = fill.quantity,
                                "fill"
                            );
                            trades.push(TradeRecord {
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
                            engine.order_rejected();
                            rejected_intents += 1;
                        }
                    }
                }
            }
            // Warm-up cycles still mark equity but produce no decision.
            Err(EngineError::InsufficientData { have, need }) => {
                debug!(have, need, "warming up");
            }
            Err(e) => return Err(ReplayError::Feed(e)),
        }
        equity_curve.push(EquityPoint {
            timestamp_ms: candle.timestamp_ms,
            equity: exchange.balance().equity(candle.close),
        });
    }

    let metrics = PerformanceSummary::compute(&equity_curve, &trades);
    let initial_equity = equity_curve[0].equity;
    let final_equity = equity_curve[equity_curve.len() - 1].equity;
    info!(
        final_equity,
        trades = trades.len(),
        rejected = rejected_intents,
        "replay finished"
    );

    Ok(ReplayResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        trades,
        equity_curve,
        metrics,
        initial_equity,
        final_equity,
        candle_count: candles.len(),
        warmup_candles: engine.warmup_candles(),
        rejected_intents,
    })
}
