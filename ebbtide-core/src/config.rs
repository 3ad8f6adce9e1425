//! Strategy configuration.
//!
//! One configurable engine replaces a family of near-identical parameter
//! variants: a variant is a value of this struct, not a separate program.
//! Defaults follow the 4-hour trend-following parameter set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How entry/exit crossover conditions are interpreted.
///
/// `FreshCross` fires only on the candle where the short EMA actually
/// crosses the long EMA. `CurrentlyAbove` also accepts the looser
/// "short is above long right now" predicate, which re-triggers entries
/// while a trend persists. The two produce materially different trade
/// frequency; the default is `FreshCross`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossPolicy {
    #[default]
    FreshCross,
    CurrentlyAbove,
}

fn default_rsi_entry() -> f64 {
    35.0
}

fn default_rsi_scale_in() -> f64 {
    30.0
}

fn default_rsi_exit() -> f64 {
    55.0
}

/// Which rule family turns indicator snapshots into signals.
///
/// `TrendCross` is the EMA crossover + MACD momentum + ADX gate described
/// on [`crate::signal::SignalEvaluator`]. `RsiThreshold` is the oversold
/// split-buy family: enter on the first oversold reading, scale in on the
/// deeper one, liquidate when the index recovers into overbought territory.
/// Under the RSI rule the second-step buy is signal-driven, so the
/// price-dip add is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SignalRule {
    #[default]
    TrendCross,
    RsiThreshold {
        /// Entry when RSI falls to this level or below while flat.
        #[serde(default = "default_rsi_entry")]
        entry_below: f64,
        /// Second-step buy when RSI falls to this level or below.
        #[serde(default = "default_rsi_scale_in")]
        scale_in_below: f64,
        /// Full exit when RSI recovers to this level or above.
        #[serde(default = "default_rsi_exit")]
        exit_above: f64,
    },
}

impl SignalRule {
    /// RSI rule with the stock 35 / 30 / 55 thresholds.
    pub fn rsi_default() -> Self {
        SignalRule::RsiThreshold {
            entry_below: default_rsi_entry(),
            scale_in_below: default_rsi_scale_in(),
            exit_above: default_rsi_exit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub ema_short_span: usize,
    pub ema_long_span: usize,
    pub macd_fast_span: usize,
    pub macd_slow_span: usize,
    pub macd_signal_span: usize,
    pub adx_window: usize,
    pub adx_entry_threshold: f64,
    pub adx_exit_threshold: f64,
    pub rsi_window: usize,
    /// Gain over average entry that arms the trailing stop.
    pub trailing_trigger_pct: f64,
    /// Drop from the ratcheted peak that fires the trailing stop.
    pub trailing_gap_pct: f64,
    /// Drop from average entry that fires the hard stop-loss.
    pub hard_stop_pct: f64,
    /// Dip below first entry that triggers the second-step buy.
    pub dip_buy_pct: f64,
    /// Fraction of the free quote balance committed per trade cycle.
    pub sizing_fraction_of_balance: f64,
    /// Exchange minimum order size in quote currency.
    pub min_order_notional: f64,
    /// Fee rate applied to both buys and sells.
    pub fee_rate: f64,
    pub cross_policy: CrossPolicy,
    pub signal_rule: SignalRule,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            ema_short_span: 20,
            ema_long_span: 60,
            macd_fast_span: 12,
            macd_slow_span: 26,
            macd_signal_span: 9,
            adx_window: 14,
            adx_entry_threshold: 25.0,
            adx_exit_threshold: 20.0,
            rsi_window: 14,
            trailing_trigger_pct: 0.0,
            trailing_gap_pct: 0.03,
            hard_stop_pct: 0.05,
            dip_buy_pct: 0.01,
            sizing_fraction_of_balance: 0.2,
            min_order_notional: 5_000.0,
            fee_rate: 0.0005,
            cross_policy: CrossPolicy::FreshCross,
            signal_rule: SignalRule::TrendCross,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be >= 1")]
    ZeroSpan { field: &'static str },
    #[error("ema_short_span ({short}) must be < ema_long_span ({long})")]
    EmaOrder { short: usize, long: usize },
    #[error("macd_fast_span ({fast}) must be < macd_slow_span ({slow})")]
    MacdOrder { fast: usize, slow: usize },
    #[error("{field} must be within (0, 1), got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error(
        "rsi thresholds must satisfy 0 <= scale_in ({scale_in}) <= entry ({entry}) < exit ({exit}) <= 100"
    )]
    RsiThresholdOrder {
        entry: f64,
        scale_in: f64,
        exit: f64,
    },
}

impl StrategyConfig {
    /// Candles required before snapshots are signal-grade.
    pub fn warmup_candles(&self) -> usize {
        // RSI needs one extra candle for the first close-to-close change.
        self.ema_long_span
            .max(self.macd_slow_span + self.macd_signal_span)
            .max(2 * self.adx_window)
            .max(self.rsi_window + 1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, span) in [
            ("ema_short_span", self.ema_short_span),
            ("ema_long_span", self.ema_long_span),
            ("macd_fast_span", self.macd_fast_span),
            ("macd_slow_span", self.macd_slow_span),
            ("macd_signal_span", self.macd_signal_span),
            ("adx_window", self.adx_window),
            ("rsi_window", self.rsi_window),
        ] {
            if span == 0 {
                return Err(ConfigError::ZeroSpan { field });
            }
        }
        if self.ema_short_span >= self.ema_long_span {
            return Err(ConfigError::EmaOrder {
                short: self.ema_short_span,
                long: self.ema_long_span,
            });
        }
        if self.macd_fast_span >= self.macd_slow_span {
            return Err(ConfigError::MacdOrder {
                fast: self.macd_fast_span,
                slow: self.macd_slow_span,
            });
        }
        for (field, value) in [
            (
                "sizing_fraction_of_balance",
                self.sizing_fraction_of_balance,
            ),
            ("trailing_gap_pct", self.trailing_gap_pct),
            ("hard_stop_pct", self.hard_stop_pct),
            ("dip_buy_pct", self.dip_buy_pct),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::FractionOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("fee_rate", self.fee_rate),
            ("trailing_trigger_pct", self.trailing_trigger_pct),
            ("min_order_notional", self.min_order_notional),
            ("adx_entry_threshold", self.adx_entry_threshold),
            ("adx_exit_threshold", self.adx_exit_threshold),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        if let SignalRule::RsiThreshold {
            entry_below,
            scale_in_below,
            exit_above,
        } = self.signal_rule
        {
            let ordered = 0.0 <= scale_in_below
                && scale_in_below <= entry_below
                && entry_below < exit_above
                && exit_above <= 100.0;
            if !ordered {
                return Err(ConfigError::RsiThresholdOrder {
                    entry: entry_below,
                    scale_in: scale_in_below,
                    exit: exit_above,
                });
            }
        }
        Ok(())
    }
}
