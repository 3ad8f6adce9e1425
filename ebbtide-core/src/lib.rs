//! Ebbtide Core — candle series, streaming indicators, signal evaluation,
//! and the position state machine behind every trading variant.
//!
//! Data flows one way:
//! candle feed -> IndicatorEngine -> SignalEvaluator -> PositionStateMachine
//! -> OrderIntent -> execution adapter -> fill report -> PositionStateMachine.
//!
//! The engine performs no I/O and reads no clock; live polling and
//! historical replay drive it through the same [`engine::StrategyEngine`]
//! step and get the same trade sequence for the same candles.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod position;
pub mod series;
pub mod signal;

pub use config::{CrossPolicy, SignalRule, StrategyConfig};
pub use domain::{BalanceSnapshot, Candle, Fill, OrderAmount, OrderIntent, Side, TradeReason};
pub use engine::{Decision, StrategyEngine};
pub use error::EngineError;
pub use indicators::{IndicatorEngine, IndicatorSnapshot};
pub use position::{Phase, PositionState, PositionStateMachine};
pub use series::CandleSeries;
pub use signal::{ExitCause, Signal, SignalEvaluator};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: engine state types are Send + Sync so a worker
    /// thread can own a running engine.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Candle>();
        require_sync::<Candle>();
        require_send::<OrderIntent>();
        require_sync::<OrderIntent>();
        require_send::<Fill>();
        require_sync::<Fill>();
        require_send::<BalanceSnapshot>();
        require_sync::<BalanceSnapshot>();
        require_send::<IndicatorSnapshot>();
        require_sync::<IndicatorSnapshot>();
        require_send::<PositionState>();
        require_sync::<PositionState>();
        require_send::<StrategyEngine>();
        require_sync::<StrategyEngine>();
        require_send::<StrategyConfig>();
        require_sync::<StrategyConfig>();
        require_send::<EngineError>();
        require_sync::<EngineError>();
    }
}
