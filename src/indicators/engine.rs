//! Indicator engine: derives the per-candle indicator set from a series.

use serde::{Deserialize, Serialize};

use crate::indicators::momentum::{rsi_series, DEFAULT_RSI_PERIOD, NEUTRAL_RSI};
use crate::indicators::trend::ema_series;
use crate::models::{CandleSeries, IndicatorSet};

/// Below this many candles every indicator degrades to its neutral form.
pub const MIN_INDICATOR_CANDLES: usize = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: u32,
    pub ema_short: u32,
    pub ema_long: u32,
    /// `None` skips the long-horizon EMA and every rule that references it.
    pub ema_trend: Option<u32>,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: DEFAULT_RSI_PERIOD,
            ema_short: 9,
            ema_long: 21,
            ema_trend: Some(50),
        }
    }
}

impl IndicatorParams {
    /// Longest lookback any configured indicator needs to be meaningful.
    /// The pipeline refuses a minimum candle count below it.
    pub fn lookback(&self) -> usize {
        (self.rsi_period as usize).max(MIN_INDICATOR_CANDLES)
    }
}

pub struct IndicatorEngine;

impl IndicatorEngine {
    /// Pure function of the series; never panics, whatever its length.
    pub fn compute(series: &CandleSeries, params: &IndicatorParams) -> IndicatorSet {
        let closes = series.closes();

        if closes.len() < MIN_INDICATOR_CANDLES {
            return IndicatorSet {
                rsi: vec![NEUTRAL_RSI; closes.len()],
                ema_short: closes.clone(),
                ema_long: closes.clone(),
                ema_trend: params.ema_trend.map(|_| closes.clone()),
                closes,
            };
        }

        IndicatorSet {
            rsi: rsi_series(&closes, params.rsi_period),
            ema_short: ema_series(&closes, params.ema_short),
            ema_long: ema_series(&closes, params.ema_long),
            ema_trend: params.ema_trend.map(|period| ema_series(&closes, period)),
            closes,
        }
    }
}
