use serde::{Deserialize, Serialize};

use crate::models::market::Timeframe;

/// The pipeline's only external-facing data product.
///
/// `price == 0.0` means no provider produced data; every other field is then
/// a neutral placeholder and must not be read as a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub price: f64,
    pub rsi: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    pub probability: u8,
    pub timeframe: Timeframe,
}

impl MarketSnapshot {
    pub fn no_data(timeframe: Timeframe) -> Self {
        Self {
            price: 0.0,
            rsi: 50.0,
            ema_short: 0.0,
            ema_long: 0.0,
            probability: 50,
            timeframe,
        }
    }

    pub fn has_data(&self) -> bool {
        self.price > 0.0
    }
}
