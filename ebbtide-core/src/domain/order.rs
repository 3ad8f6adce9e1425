//! Order intents — what the state machine asks the execution adapter to do.

use serde::{Deserialize, Serialize};

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// The rule that triggered an order intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeReason {
    /// First entry on a confirmed entry signal.
    FirstEntry,
    /// Second-step buy: post-entry price dip or an RSI scale-in signal.
    DipAdd,
    /// Trailing stop fired after the profit trigger armed.
    TrailingStop,
    /// Hard stop-loss below the average entry price.
    HardStop,
    /// Trend reversal exit from the signal evaluator.
    TrendReversal,
    /// RSI overbought exit from the signal evaluator.
    Overbought,
}

impl TradeReason {
    pub fn is_exit(&self) -> bool {
        matches!(
            self,
            TradeReason::TrailingStop
                | TradeReason::HardStop
                | TradeReason::TrendReversal
                | TradeReason::Overbought
        )
    }
}

/// How the order amount is denominated.
///
/// Market buys are placed by quote notional (spend N KRW); sells are placed
/// by base quantity (sell N coins). The adapter converts to whatever its
/// exchange expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderAmount {
    QuoteNotional(f64),
    BaseQuantity(f64),
}

/// Order intent produced by the position state machine.
///
/// Consumed exactly once by the execution adapter. The state machine does
/// not assume the intent executed until a fill is reported back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub side: Side,
    pub amount: OrderAmount,
    pub reason: TradeReason,
}

impl OrderIntent {
    pub fn buy(notional: f64, reason: TradeReason) -> Self {
        Self {
            side: Side::Buy,
            amount: OrderAmount::QuoteNotional(notional),
            reason,
        }
    }

    pub fn sell_all(quantity: f64, reason: TradeReason) -> Self {
        Self {
            side: Side::Sell,
            amount: OrderAmount::BaseQuantity(quantity),
            reason,
        }
    }
}
