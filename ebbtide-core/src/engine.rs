//! Strategy engine — one decision per candle.
//!
//! Ties the candle series, indicator engine, signal evaluator and position
//! state machine into a single per-cycle step. The step is a function of
//! (candle, balance) and the engine's own state only — no wall clock, no
//! iteration counters — so a historical replay and a live run sampled at
//! the same candle boundaries produce the same trade sequence.

use crate::config::{ConfigError, StrategyConfig};
use crate::domain::{BalanceSnapshot, Candle, Fill, OrderIntent};
use crate::error::EngineError;
use crate::indicators::{IndicatorEngine, IndicatorSnapshot};
use crate::position::{PositionState, PositionStateMachine};
use crate::series::CandleSeries;
use crate::signal::{Signal, SignalEvaluator};

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub snapshot: IndicatorSnapshot,
    pub signal: Option<Signal>,
    pub intent: Option<OrderIntent>,
}

#[derive(Debug, Clone)]
pub struct StrategyEngine {
    series: CandleSeries,
    indicators: IndicatorEngine,
    evaluator: SignalEvaluator,
    machine: PositionStateMachine,
}

impl StrategyEngine {
    pub fn new(config: &StrategyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            series: CandleSeries::new(),
            indicators: IndicatorEngine::new(config),
            evaluator: SignalEvaluator::new(config),
            machine: PositionStateMachine::new(config),
        })
    }

    /// Engine that also validates candle spacing against a fixed interval.
    pub fn with_interval(config: &StrategyConfig, interval_ms: i64) -> Result<Self, ConfigError> {
        let mut engine = Self::new(config)?;
        engine.series = CandleSeries::with_interval(interval_ms);
        Ok(engine)
    }

    /// Evaluate one cycle: append the candle, update indicators, classify
    /// the signal, and let the state machine propose at most one intent.
    ///
    /// During warm-up the candle is still folded into the indicator state,
    /// but the cycle reports `InsufficientData` and no signal is acted on.
    pub fn on_candle(
        &mut self,
        candle: &Candle,
        balance: &BalanceSnapshot,
    ) -> Result<Decision, EngineError> {
        self.series.push(candle.clone())?;
        let snapshot = self.indicators.update(candle);

        let in_position = self.machine.state().is_entered();
        let signal = self.evaluator.evaluate(&snapshot, in_position);

        if !self.indicators.is_warm() {
            return Err(EngineError::InsufficientData {
                have: self.indicators.samples(),
                need: self.indicators.warmup_candles(),
            });
        }

        let intent = self.machine.evaluate(signal, candle.close, balance);
        Ok(Decision {
            snapshot,
            signal,
            intent,
        })
    }

    /// Report a confirmed fill for the intent proposed this cycle.
    pub fn apply_fill(&mut self, intent: &OrderIntent, fill: &Fill) {
        self.machine.apply_fill(intent, fill);
    }

    /// Report that the proposed intent was not filled; phase is unchanged.
    pub fn order_rejected(&mut self) {
        self.machine.order_rejected();
    }

    pub fn position(&self) -> &PositionState {
        self.machine.state()
    }

    pub fn candles_seen(&self) -> usize {
        self.series.len()
    }

    pub fn warmup_candles(&self) -> usize {
        self.indicators.warmup_candles()
    }
}
