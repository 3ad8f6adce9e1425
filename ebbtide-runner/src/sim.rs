//! Simulated exchange ledger.
//!
//! Fees mirror the venue convention the sizing math assumes: a buy spends
//! the full quote notional and the fee comes out of the base received, a
//! sell gives up the full base quantity and the fee comes out of the quote
//! proceeds. Overdrafts are rejected, never clamped.

use crate::exec::ExecutionAdapter;
use ebbtide_core::domain::{BalanceSnapshot, Fill, OrderAmount, OrderIntent, Side};
use ebbtide_core::EngineError;

#[derive(Debug, Clone)]
pub struct SimExchange {
    quote: f64,
    base: f64,
    fee_rate: f64,
    fees_paid: f64,
}

impl SimExchange {
    pub fn new(initial_quote: f64, initial_base: f64, fee_rate: f64) -> Self {
        Self {
            quote: initial_quote,
            base: initial_base,
            fee_rate,
            fees_paid: 0.0,
        }
    }

    pub fn balance(&self) -> BalanceSnapshot {
        BalanceSnapshot::new(self.quote, self.base)
    }

    /// Cumulative fees charged across all fills.
    pub fn fees_paid(&self) -> f64 {
        self.fees_paid
    }

    fn buy(&mut self, notional: f64, price: f64) -> Result<Fill, EngineError> {
        if notional > self.quote {
            return Err(EngineError::rejected(format!(
                "insufficient quote balance: need {notional:.2}, have {:.2}",
                self.quote
            )));
        }
        let quantity = (notional / price) / (1.0 + self.fee_rate);
        let fee = notional - quantity * price;
        self.quote -= notional;
        self.base += quantity;
        self.fees_paid += fee;
        Ok(Fill {
            price,
            quantity,
            fee,
        })
    }

    fn sell(&mut self, quantity: f64, price: f64) -> Result<Fill, EngineError> {
        if quantity > self.base {
            return Err(EngineError::rejected(format!(
                "insufficient base balance: need {quantity:.8}, have {:.8}",
                self.base
            )));
        }
        let gross = quantity * price;
        let fee = gross * self.fee_rate;
        self.base -= quantity;
        self.quote += gross - fee;
        self.fees_paid += fee;
        Ok(Fill {
            price,
            quantity,
            fee,
        })
    }
}

impl crate::exec::BalanceSource for SimExchange {
    fn balance(&mut self) -> Result<BalanceSnapshot, crate::exec::FeedError> {
        Ok(SimExchange::balance(self))
    }
}

impl ExecutionAdapter for SimExchange {
    fn execute(&mut self, intent: &OrderIntent, price: f64) -> Result<Fill, EngineError> {
        match (intent.side, intent.amount) {
            (Side::Buy, OrderAmount::QuoteNotional(n)) => self.buy(n, price),
            (Side::Sell, OrderAmount::BaseQuantity(q)) => self.sell(q, price),
            (Side::Buy, OrderAmount::BaseQuantity(q)) => self.buy(q * price, price),
            (Side::Sell, OrderAmount::QuoteNotional(n)) => self.sell(n / price, price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ebbtide_core::domain::TradeReason;

    #[test]
    fn buy_deducts_notional_and_fees_the_base() {
        let mut ex = SimExchange::new(100_000.0, 0.0, 0.0005);
        let intent = OrderIntent::buy(10_000.0, TradeReason::FirstEntry);
        let fill = ex.execute(&intent, 100.0).unwrap();
        assert!((fill.quantity - 100.0 / 1.0005).abs() < 1e-9);
        assert_eq!(ex.balance().quote, 90_000.0);
        assert!((ex.balance().base - fill.quantity).abs() < 1e-12);
        assert!((fill.fee - (10_000.0 - fill.quantity * 100.0)).abs() < 1e-9);
    }

    #[test]
    fn sell_credits_proceeds_net_of_fee() {
        let mut ex = SimExchange::new(0.0, 2.0, 0.0005);
        let intent = OrderIntent::sell_all(2.0, TradeReason::TrailingStop);
        let fill = ex.execute(&intent, 150.0).unwrap();
        assert_eq!(fill.quantity, 2.0);
        assert_eq!(ex.balance().base, 0.0);
        assert!((ex.balance().quote - 300.0 * (1.0 - 0.0005)).abs() < 1e-9);
    }

    #[test]
    fn overdraft_buy_is_rejected_without_side_effects() {
        let mut ex = SimExchange::new(5_000.0, 0.0, 0.0005);
        let intent = OrderIntent::buy(10_000.0, TradeReason::FirstEntry);
        let err = ex.execute(&intent, 100.0).unwrap_err();
        assert!(matches!(err, EngineError::OrderRejected { .. }));
        assert!(err.to_string().contains("insufficient quote"));
        assert_eq!(ex.balance().quote, 5_000.0);
        assert_eq!(ex.balance().base, 0.0);
    }

    #[test]
    fn overdraft_sell_is_rejected() {
        let mut ex = SimExchange::new(0.0, 0.5, 0.0005);
        let intent = OrderIntent::sell_all(1.0, TradeReason::HardStop);
        assert!(matches!(
            ex.execute(&intent, 100.0),
            Err(EngineError::OrderRejected { .. })
        ));
        assert_eq!(ex.balance().base, 0.5);
    }

    #[test]
    fn fees_accumulate_across_fills() {
        let mut ex = SimExchange::new(100_000.0, 0.0, 0.0005);
        let buy = OrderIntent::buy(10_000.0, TradeReason::FirstEntry);
        let fill = ex.execute(&buy, 100.0).unwrap();
        let sell = OrderIntent::sell_all(fill.quantity, TradeReason::HardStop);
        let fill2 = ex.execute(&sell, 95.0).unwrap();
        assert!((ex.fees_paid() - (fill.fee + fill2.fee)).abs() < 1e-9);
    }
}
