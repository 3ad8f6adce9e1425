//! Performance metrics — pure functions over the equity curve and trade
//! tape. No dependencies on the replay driver or the engine.

use chrono::{Datelike, TimeZone, Utc};
use ebbtide_core::domain::Side;
use serde::{Deserialize, Serialize};

use crate::result::{EquityPoint, TradeRecord};

/// Month-over-month return of the equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u32,
    /// Fractional return over the month (0.05 = +5%).
    pub return_frac: f64,
}

/// The figures a run report prints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// (final - initial) / initial over the whole run.
    pub cumulative_return: f64,
    /// Largest peak-to-trough equity drop, as a positive fraction.
    pub max_drawdown: f64,
    pub trade_count: usize,
    /// Completed buy-then-liquidate cycles.
    pub round_trips: usize,
    /// Fraction of round trips that closed with a profit.
    pub win_rate: f64,
    pub monthly: Vec<MonthlyReturn>,
}

impl PerformanceSummary {
    pub fn compute(equity_curve: &[EquityPoint], trades: &[TradeRecord]) -> Self {
        Self {
            cumulative_return: cumulative_return(equity_curve),
            max_drawdown: max_drawdown(equity_curve),
            trade_count: trades.len(),
            round_trips: round_trip_pnls(trades).len(),
            win_rate: win_rate(trades),
            monthly: monthly_returns(equity_curve),
        }
    }
}

pub fn cumulative_return(equity_curve: &[EquityPoint]) -> f64 {
    match (equity_curve.first(), equity_curve.last()) {
        (Some(first), Some(last)) if first.equity > 0.0 => {
            (last.equity - first.equity) / first.equity
        }
        _ => 0.0,
    }
}

/// Largest peak-to-trough drop, as a positive fraction of the peak.
pub fn max_drawdown(equity_curve: &[EquityPoint]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0f64;
    for point in equity_curve {
        peak = peak.max(point.equity);
        if peak > 0.0 {
            worst = worst.max((peak - point.equity) / peak);
        }
    }
    worst
}

/// PnL of each completed cycle: quote received at liquidation minus quote
/// spent on the buys since the ledger was last flat.
pub fn round_trip_pnls(trades: &[TradeRecord]) -> Vec<f64> {
    let mut pnls = Vec::new();
    let mut open_cost = 0.0;
    for trade in trades {
        match trade.side {
            Side::Buy => open_cost += trade.notional,
            Side::Sell => {
                pnls.push(trade.notional - open_cost);
                open_cost = 0.0;
            }
        }
    }
    pnls
}

pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    let pnls = round_trip_pnls(trades);
    if pnls.is_empty() {
        return 0.0;
    }
    let wins = pnls.iter().filter(|&&p| p > 0.0).count();
    wins as f64 / pnls.len() as f64
}

/// Month-over-month returns: each month's return is computed from the
/// last equity point of the previous month to the last of this month
/// (first month starts from its own first point).
pub fn monthly_returns(equity_curve: &[EquityPoint]) -> Vec<MonthlyReturn> {
    let mut out: Vec<MonthlyReturn> = Vec::new();
    let mut month_start: Option<f64> = None;
    let mut current: Option<(i32, u32)> = None;
    let mut last_equity = 0.0;

    for point in equity_curve {
        let Some(dt) = Utc.timestamp_millis_opt(point.timestamp_ms).single() else {
            continue;
        };
        let key = (dt.year(), dt.month());
        if current != Some(key) {
            if let (Some((year, month)), Some(start)) = (current, month_start) {
                out.push(month_entry(year, month, start, last_equity));
            }
            // New month opens at the previous month's closing equity.
            month_start = Some(if current.is_some() {
                last_equity
            } else {
                point.equity
            });
            current = Some(key);
        }
        last_equity = point.equity;
    }
    if let (Some((year, month)), Some(start)) = (current, month_start) {
        out.push(month_entry(year, month, start, last_equity));
    }
    out
}

fn month_entry(year: i32, month: u32, start: f64, end: f64) -> MonthlyReturn {
    MonthlyReturn {
        year,
        month,
        return_frac: if start > 0.0 { (end - start) / start } else { 0.0 },
    }
}
