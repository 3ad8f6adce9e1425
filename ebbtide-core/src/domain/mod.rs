//! Domain types: candles, balances, order intents, fills.

pub mod candle;
pub mod fill;
pub mod order;

pub use candle::Candle;
pub use fill::{BalanceSnapshot, Fill};
pub use order::{OrderAmount, OrderIntent, Side, TradeReason};
