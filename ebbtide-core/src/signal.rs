//! Signal evaluation — classify indicator snapshots into discrete
//! entry/scale-in/exit events.
//!
//! Two rule families share the evaluator. The trend-cross rule compares
//! consecutive snapshots: entry requires a golden cross, MACD bullish
//! momentum and the ADX trend-strength gate on the same candle; exit fires
//! on a dead cross paired with MACD bearish momentum, or independently when
//! ADX drops below the exit threshold. The RSI-threshold rule reads only
//! the current snapshot: oversold levels trigger the entry and the
//! second-step scale-in, an overbought level liquidates.

use crate::config::{CrossPolicy, SignalRule, StrategyConfig};
use crate::indicators::IndicatorSnapshot;
use serde::{Deserialize, Serialize};

/// Why an exit signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitCause {
    /// Dead cross confirmed by MACD bearish momentum.
    TrendReversal,
    /// ADX fell below the exit threshold.
    WeakTrend,
    /// RSI recovered past the overbought exit threshold.
    Overbought,
}

/// Discrete trading signal for one candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Entry,
    /// Second-step buy while already entered (RSI rule only).
    ScaleIn,
    Exit(ExitCause),
}

#[derive(Debug, Clone)]
pub struct SignalEvaluator {
    rule: SignalRule,
    adx_entry_threshold: f64,
    adx_exit_threshold: f64,
    cross_policy: CrossPolicy,
    prev: Option<IndicatorSnapshot>,
}

impl SignalEvaluator {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            rule: config.signal_rule,
            adx_entry_threshold: config.adx_entry_threshold,
            adx_exit_threshold: config.adx_exit_threshold,
            cross_policy: config.cross_policy,
            prev: None,
        }
    }

    /// Classify the current snapshot.
    ///
    /// `in_position` selects which side is evaluated: entries only while
    /// flat, scale-ins and exits only while holding. Under the trend-cross
    /// rule the first snapshot ever seen yields no signal (there is nothing
    /// to compare against); the RSI rule needs no pair.
    pub fn evaluate(&mut self, snapshot: &IndicatorSnapshot, in_position: bool) -> Option<Signal> {
        let prev = self.prev.replace(*snapshot);

        match self.rule {
            SignalRule::TrendCross => {
                let prev = prev?;
                if in_position {
                    self.exit_signal(&prev, snapshot)
                } else {
                    self.entry_signal(&prev, snapshot)
                }
            }
            SignalRule::RsiThreshold {
                entry_below,
                scale_in_below,
                exit_above,
            } => {
                if in_position {
                    // The scale-in level sits well below the exit level, so
                    // at most one of the two can hold on a candle.
                    if snapshot.rsi <= scale_in_below {
                        Some(Signal::ScaleIn)
                    } else if snapshot.rsi >= exit_above {
                        Some(Signal::Exit(ExitCause::Overbought))
                    } else {
                        None
                    }
                } else if snapshot.rsi <= entry_below {
                    Some(Signal::Entry)
                } else {
                    None
                }
            }
        }
    }

    fn entry_signal(&self, prev: &IndicatorSnapshot, cur: &IndicatorSnapshot) -> Option<Signal> {
        let fresh_cross = prev.ema_short <= prev.ema_long && cur.ema_short > cur.ema_long;
        let golden = match self.cross_policy {
            CrossPolicy::FreshCross => fresh_cross,
            CrossPolicy::CurrentlyAbove => fresh_cross || cur.ema_short > cur.ema_long,
        };
        let macd_bullish =
            prev.macd < prev.macd_signal && cur.macd >= cur.macd_signal && cur.macd_hist > 0.0;
        let strong_trend = cur.adx >= self.adx_entry_threshold;

        if golden && macd_bullish && strong_trend {
            Some(Signal::Entry)
        } else {
            None
        }
    }

    fn exit_signal(&self, prev: &IndicatorSnapshot, cur: &IndicatorSnapshot) -> Option<Signal> {
        if cur.adx < self.adx_exit_threshold {
            return Some(Signal::Exit(ExitCause::WeakTrend));
        }

        let fresh_cross = prev.ema_short >= prev.ema_long && cur.ema_short < cur.ema_long;
        let dead = match self.cross_policy {
            CrossPolicy::FreshCross => fresh_cross,
            CrossPolicy::CurrentlyAbove => fresh_cross || cur.ema_short < cur.ema_long,
        };
        let macd_bearish =
            prev.macd >= prev.macd_signal && cur.macd < cur.macd_signal && cur.macd_hist < 0.0;

        if dead && macd_bearish {
            Some(Signal::Exit(ExitCause::TrendReversal))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(ema_short: f64, ema_long: f64, macd: f64, macd_signal: f64, adx: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            ema_short,
            ema_long,
            macd,
            macd_signal,
            macd_hist: macd - macd_signal,
            plus_di: 0.0,
            minus_di: 0.0,
            adx,
            rsi: 50.0,
        }
    }

    fn rsi_snap(rsi: f64) -> IndicatorSnapshot {
        IndicatorSnapshot { rsi, ..snap(100.0, 100.0, 0.0, 0.0, 25.0) }
    }

    fn evaluator(policy: CrossPolicy) -> SignalEvaluator {
        let cfg = StrategyConfig {
            cross_policy: policy,
            ..Default::default()
        };
        SignalEvaluator::new(&cfg)
    }

    fn rsi_evaluator() -> SignalEvaluator {
        let cfg = StrategyConfig {
            signal_rule: SignalRule::rsi_default(),
            ..Default::default()
        };
        SignalEvaluator::new(&cfg)
    }

    #[test]
    fn first_snapshot_yields_no_signal() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        let cur = snap(101.0, 100.0, 1.0, 0.5, 30.0);
        assert_eq!(eval.evaluate(&cur, false), None);
    }

    #[test]
    fn entry_on_aligned_cross_macd_and_adx() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        // Previous: short below long, macd below signal.
        eval.evaluate(&snap(99.0, 100.0, -0.5, 0.0, 30.0), false);
        // Current: golden cross, macd crossed up with positive hist, ADX >= 25.
        let sig = eval.evaluate(&snap(101.0, 100.0, 1.0, 0.5, 30.0), false);
        assert_eq!(sig, Some(Signal::Entry));
    }

    #[test]
    fn no_entry_without_macd_confirmation() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(99.0, 100.0, 1.0, 0.5, 30.0), false);
        // Golden cross but macd was already above signal (no fresh momentum).
        let sig = eval.evaluate(&snap(101.0, 100.0, 1.0, 0.5, 30.0), false);
        assert_eq!(sig, None);
    }

    #[test]
    fn no_entry_below_adx_gate() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(99.0, 100.0, -0.5, 0.0, 20.0), false);
        let sig = eval.evaluate(&snap(101.0, 100.0, 1.0, 0.5, 20.0), false);
        assert_eq!(sig, None);
    }

    #[test]
    fn fresh_cross_does_not_retrigger() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(99.0, 100.0, -0.5, 0.0, 30.0), false);
        assert_eq!(
            eval.evaluate(&snap(101.0, 100.0, 1.0, 0.5, 30.0), false),
            Some(Signal::Entry)
        );
        // Still above, macd crossing again: no fresh EMA cross, no entry.
        eval.evaluate(&snap(102.0, 100.0, 0.4, 0.5, 30.0), false);
        assert_eq!(
            eval.evaluate(&snap(103.0, 100.0, 1.0, 0.5, 30.0), false),
            None
        );
    }

    #[test]
    fn currently_above_policy_retriggers() {
        let mut eval = evaluator(CrossPolicy::CurrentlyAbove);
        eval.evaluate(&snap(102.0, 100.0, 0.4, 0.5, 30.0), false);
        // Short already above long; MACD momentum alone re-triggers entry.
        assert_eq!(
            eval.evaluate(&snap(103.0, 100.0, 1.0, 0.5, 30.0), false),
            Some(Signal::Entry)
        );
    }

    #[test]
    fn exit_on_dead_cross_with_macd() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(101.0, 100.0, 0.5, 0.0, 30.0), true);
        let sig = eval.evaluate(&snap(99.0, 100.0, -0.5, 0.0, 30.0), true);
        assert_eq!(sig, Some(Signal::Exit(ExitCause::TrendReversal)));
    }

    #[test]
    fn dead_cross_alone_does_not_exit() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(101.0, 100.0, -0.5, 0.0, 30.0), true);
        // Dead cross, but macd was already below signal on the prior candle.
        let sig = eval.evaluate(&snap(99.0, 100.0, -0.6, 0.0, 30.0), true);
        assert_eq!(sig, None);
    }

    #[test]
    fn exit_on_weak_adx_is_independent() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(101.0, 100.0, 0.5, 0.0, 30.0), true);
        // No crossover at all; ADX collapse still exits.
        let sig = eval.evaluate(&snap(101.5, 100.0, 0.5, 0.0, 15.0), true);
        assert_eq!(sig, Some(Signal::Exit(ExitCause::WeakTrend)));
    }

    #[test]
    fn entries_not_evaluated_while_holding() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&snap(99.0, 100.0, -0.5, 0.0, 30.0), true);
        // Would be a textbook entry, but we are in a position.
        let sig = eval.evaluate(&snap(101.0, 100.0, 1.0, 0.5, 30.0), true);
        assert_eq!(sig, None);
    }

    #[test]
    fn rsi_entry_at_threshold_while_flat() {
        let mut eval = rsi_evaluator();
        assert_eq!(eval.evaluate(&rsi_snap(36.0), false), None);
        assert_eq!(eval.evaluate(&rsi_snap(35.0), false), Some(Signal::Entry));
        assert_eq!(eval.evaluate(&rsi_snap(12.0), false), Some(Signal::Entry));
    }

    #[test]
    fn rsi_rule_fires_without_a_previous_snapshot() {
        // Unlike the cross rule, a single oversold reading is enough.
        let mut eval = rsi_evaluator();
        assert_eq!(eval.evaluate(&rsi_snap(20.0), false), Some(Signal::Entry));
    }

    #[test]
    fn rsi_scale_in_only_below_the_deeper_threshold() {
        let mut eval = rsi_evaluator();
        assert_eq!(eval.evaluate(&rsi_snap(34.0), true), None);
        assert_eq!(eval.evaluate(&rsi_snap(30.0), true), Some(Signal::ScaleIn));
    }

    #[test]
    fn rsi_exit_when_overbought() {
        let mut eval = rsi_evaluator();
        assert_eq!(eval.evaluate(&rsi_snap(54.0), true), None);
        assert_eq!(
            eval.evaluate(&rsi_snap(55.0), true),
            Some(Signal::Exit(ExitCause::Overbought))
        );
    }

    #[test]
    fn rsi_oversold_while_holding_is_not_a_fresh_entry() {
        let mut eval = rsi_evaluator();
        assert_eq!(eval.evaluate(&rsi_snap(33.0), true), None);
    }

    #[test]
    fn trend_rule_ignores_rsi() {
        let mut eval = evaluator(CrossPolicy::FreshCross);
        eval.evaluate(&rsi_snap(10.0), false);
        // Deeply oversold but no cross: the trend rule stays quiet.
        assert_eq!(eval.evaluate(&rsi_snap(5.0), false), None);
    }
}
