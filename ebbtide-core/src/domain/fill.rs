//! Fills and balances — what the execution side reports back.

use serde::{Deserialize, Serialize};

/// Confirmed execution of an order intent.
///
/// `quantity` is the base quantity that changed hands; `fee` is denominated
/// in the quote currency. For buys the fee has already been carved out of
/// the spent notional; for sells it has been deducted from the proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub price: f64,
    pub quantity: f64,
    pub fee: f64,
}

/// Account balance snapshot, queried once per cycle before sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Free quote currency (e.g. KRW) available for buys.
    pub quote: f64,
    /// Free base currency (e.g. BTC) available for sells.
    pub base: f64,
}

impl BalanceSnapshot {
    pub fn new(quote: f64, base: f64) -> Self {
        Self { quote, base }
    }

    pub fn equity(&self, price: f64) -> f64 {
        self.quote + self.base * price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_marks_base_at_price() {
        let bal = BalanceSnapshot::new(100_000.0, 0.5);
        assert_eq!(bal.equity(1_000_000.0), 600_000.0);
    }

    #[test]
    fn fill_serialization_roundtrip() {
        let fill = Fill {
            price: 50_000_000.0,
            quantity: 0.0002,
            fee: 5.0,
        };
        let json = serde_json::to_string(&fill).unwrap();
        let deser: Fill = serde_json::from_str(&json).unwrap();
        assert_eq!(fill, deser);
    }
}
