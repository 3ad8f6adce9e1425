//! Directional movement system — +DI, -DI and ADX, streaming.
//!
//! Per candle:
//! 1. TR = max(high - low, |high - prev_close|, |low - prev_close|)
//! 2. +DM = up_move if up_move > down_move and up_move > 0, else 0
//!    -DM = down_move if down_move > up_move and down_move > 0, else 0
//!    (mutually exclusive by construction; both 0 on the first candle)
//! 3. ATR = EMA(TR), +DI = 100 * EMA(+DM) / ATR, -DI = 100 * EMA(-DM) / ATR
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI), defined 0 when the sum is 0
//! 5. ADX = EMA(DX)
//!
//! All smoothing is exponential with span = the ADX window. The usual
//! guidance of 2x the window applies before ADX is trustworthy.

use super::ema::Ema;
use crate::domain::Candle;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DmiOutput {
    pub plus_di: f64,
    pub minus_di: f64,
    pub adx: f64,
}

#[derive(Debug, Clone)]
pub struct Dmi {
    atr: Ema,
    plus_dm: Ema,
    minus_dm: Ema,
    adx: Ema,
    prev: Option<(f64, f64, f64)>, // (high, low, close)
}

impl Dmi {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "ADX window must be >= 1");
        Self {
            atr: Ema::new(window),
            plus_dm: Ema::new(window),
            minus_dm: Ema::new(window),
            adx: Ema::new(window),
            prev: None,
        }
    }

    pub fn update(&mut self, candle: &Candle) -> DmiOutput {
        let (tr, plus_dm, minus_dm) = match self.prev {
            None => (candle.high - candle.low, 0.0, 0.0),
            Some((prev_high, prev_low, prev_close)) => {
                let tr = (candle.high - candle.low)
                    .max((candle.high - prev_close).abs())
                    .max((candle.low - prev_close).abs());
                let up_move = candle.high - prev_high;
                let down_move = prev_low - candle.low;
                let plus_dm = if up_move > down_move && up_move > 0.0 {
                    up_move
                } else {
                    0.0
                };
                let minus_dm = if down_move > up_move && down_move > 0.0 {
                    down_move
                } else {
                    0.0
                };
                (tr, plus_dm, minus_dm)
            }
        };
        self.prev = Some((candle.high, candle.low, candle.close));

        let atr = self.atr.update(tr);
        let smooth_plus = self.plus_dm.update(plus_dm);
        let smooth_minus = self.minus_dm.update(minus_dm);

        let (plus_di, minus_di) = if atr > 0.0 {
            (100.0 * smooth_plus / atr, 100.0 * smooth_minus / atr)
        } else {
            (0.0, 0.0)
        };

        let di_sum = plus_di + minus_di;
        let dx = if di_sum == 0.0 {
            0.0
        } else {
            100.0 * (plus_di - minus_di).abs() / di_sum
        };

        DmiOutput {
            plus_di,
            minus_di,
            adx: self.adx.update(dx),
        }
    }
}
