//! Position state machine — turns signals, prices and balances into order
//! intents under the risk rules.
//!
//! Phases cycle Idle -> Entered1 -> Entered2 -> Idle. The per-cycle
//! allocation is a fraction of the free quote balance, captured when the
//! first entry fills and split 50/50 across the two entry steps. The peak
//! price ratchets monotonically upward while entered and never decreases.
//!
//! A proposed intent never advances the phase. Only a confirmed fill does
//! (`apply_fill`); a rejected or unfilled intent leaves the machine in its
//! pre-attempt phase so the next cycle can retry.

use crate::config::{SignalRule, StrategyConfig};
use crate::domain::{BalanceSnapshot, Fill, OrderAmount, OrderIntent, TradeReason};
use crate::signal::{ExitCause, Signal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Entered1,
    Entered2,
}

/// Position bookkeeping, mutated only on confirmed fills.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PositionState {
    pub phase: Phase,
    /// Volume-weighted average price of the fills so far.
    pub entry_price: f64,
    /// Highest price seen since (re-)entry; ratchets up, never down.
    pub peak_price: f64,
    /// Base quantity held.
    pub quantity: f64,
    /// Quote currency spent so far in this cycle.
    pub quote_committed: f64,
    /// Total quote allocation for this cycle, fixed at first entry.
    pub cycle_allocation: f64,
}

impl PositionState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_entered(&self) -> bool {
        self.phase != Phase::Idle
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone)]
pub struct PositionStateMachine {
    sizing_fraction: f64,
    min_order_notional: f64,
    dip_buy_pct: f64,
    /// Whether the second-step buy triggers on the price dip. Off under the
    /// RSI rule, where the evaluator's scale-in signal drives it instead.
    price_dip_adds: bool,
    trailing_trigger_pct: f64,
    trailing_gap_pct: f64,
    hard_stop_pct: f64,
    state: PositionState,
    /// Allocation proposed with a pending first entry; captured into the
    /// state only if the fill confirms.
    proposed_allocation: Option<f64>,
}

impl PositionStateMachine {
    pub fn new(config: &StrategyConfig) -> Self {
        Self {
            sizing_fraction: config.sizing_fraction_of_balance,
            min_order_notional: config.min_order_notional,
            dip_buy_pct: config.dip_buy_pct,
            price_dip_adds: matches!(config.signal_rule, SignalRule::TrendCross),
            trailing_trigger_pct: config.trailing_trigger_pct,
            trailing_gap_pct: config.trailing_gap_pct,
            hard_stop_pct: config.hard_stop_pct,
            state: PositionState::idle(),
            proposed_allocation: None,
        }
    }

    pub fn state(&self) -> &PositionState {
        &self.state
    }

    /// One evaluation cycle: ratchet the peak, then propose at most one
    /// order intent. Phase does not change here.
    pub fn evaluate(
        &mut self,
        signal: Option<Signal>,
        price: f64,
        balance: &BalanceSnapshot,
    ) -> Option<OrderIntent> {
        self.proposed_allocation = None;

        match self.state.phase {
            Phase::Idle => self.evaluate_idle(signal, balance),
            Phase::Entered1 | Phase::Entered2 => {
                if price > self.state.peak_price {
                    self.state.peak_price = price;
                }
                self.evaluate_entered(signal, price, balance)
            }
        }
    }

    fn evaluate_idle(
        &mut self,
        signal: Option<Signal>,
        balance: &BalanceSnapshot,
    ) -> Option<OrderIntent> {
        if signal != Some(Signal::Entry) {
            return None;
        }
        let allocation = balance.quote * self.sizing_fraction;
        let half = self.floor_to_min(allocation * 0.5);
        // Refused outright when the free balance cannot cover the floored
        // half; retried on a later cycle if the signal repeats.
        if balance.quote < half {
            return None;
        }
        self.proposed_allocation = Some(allocation);
        Some(OrderIntent::buy(half, TradeReason::FirstEntry))
    }

    fn evaluate_entered(
        &mut self,
        signal: Option<Signal>,
        price: f64,
        balance: &BalanceSnapshot,
    ) -> Option<OrderIntent> {
        let state = &self.state;

        // Second-step buy, Entered1 only: the price dip under the trend
        // rule, the evaluator's scale-in signal under the RSI rule.
        let dipped =
            self.price_dip_adds && price <= state.entry_price * (1.0 - self.dip_buy_pct);
        if state.phase == Phase::Entered1 && (dipped || signal == Some(Signal::ScaleIn)) {
            let remaining = state.cycle_allocation - state.quote_committed;
            let amount = self.floor_to_min(remaining);
            if balance.quote >= amount {
                return Some(OrderIntent::buy(amount, TradeReason::DipAdd));
            }
            // Unaffordable second buy falls through to the risk exits.
        }

        // Hard stop-loss takes priority over the trailing stop when both
        // would fire.
        if price <= state.entry_price * (1.0 - self.hard_stop_pct) {
            return Some(OrderIntent::sell_all(state.quantity, TradeReason::HardStop));
        }

        // Trailing stop: armed once the peak has exceeded the profit
        // trigger, fires on the configured drop from the peak.
        let armed = state.peak_price > state.entry_price * (1.0 + self.trailing_trigger_pct);
        if armed && price <= state.peak_price * (1.0 - self.trailing_gap_pct) {
            return Some(OrderIntent::sell_all(
                state.quantity,
                TradeReason::TrailingStop,
            ));
        }

        if let Some(Signal::Exit(cause)) = signal {
            let reason = match cause {
                ExitCause::Overbought => TradeReason::Overbought,
                ExitCause::TrendReversal | ExitCause::WeakTrend => TradeReason::TrendReversal,
            };
            return Some(OrderIntent::sell_all(state.quantity, reason));
        }

        None
    }

    fn floor_to_min(&self, notional: f64) -> f64 {
        notional.max(self.min_order_notional)
    }

    /// Advance state on a confirmed fill of the given intent.
    pub fn apply_fill(&mut self, intent: &OrderIntent, fill: &Fill) {
        match intent.reason {
            TradeReason::FirstEntry => {
                self.state.phase = Phase::Entered1;
                self.state.entry_price = fill.price;
                self.state.peak_price = fill.price;
                self.state.quantity = fill.quantity;
                self.state.quote_committed = self.intent_notional(intent);
                self.state.cycle_allocation = self
                    .proposed_allocation
                    .take()
                    .unwrap_or(self.state.quote_committed * 2.0);
            }
            TradeReason::DipAdd => {
                let prev_qty = self.state.quantity;
                let total_qty = prev_qty + fill.quantity;
                if total_qty > 0.0 {
                    self.state.entry_price = (self.state.entry_price * prev_qty
                        + fill.price * fill.quantity)
                        / total_qty;
                }
                self.state.quantity = total_qty;
                self.state.peak_price = fill.price;
                self.state.quote_committed += self.intent_notional(intent);
                self.state.phase = Phase::Entered2;
            }
            TradeReason::TrailingStop
            | TradeReason::HardStop
            | TradeReason::TrendReversal
            | TradeReason::Overbought => {
                self.state.reset();
            }
        }
    }

    /// The adapter reported the intent unfilled or erroring: discard the
    /// proposal, keep the pre-attempt phase.
    pub fn order_rejected(&mut self) {
        self.proposed_allocation = None;
    }

    fn intent_notional(&self, intent: &OrderIntent) -> f64 {
        match intent.amount {
            OrderAmount::QuoteNotional(n) => n,
            OrderAmount::BaseQuantity(_) => 0.0,
        }
    }
}
