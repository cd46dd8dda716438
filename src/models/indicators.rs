use serde::{Deserialize, Serialize};

/// Which EMA line a scoring rule refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmaLine {
    /// EMA(9) by default
    Short,
    /// EMA(21) by default
    Long,
    /// EMA(50) by default, only present when configured
    Trend,
}

/// Per-candle indicator values aligned 1:1 with the source series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub closes: Vec<f64>,
    pub rsi: Vec<f64>,
    pub ema_short: Vec<f64>,
    pub ema_long: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_trend: Option<Vec<f64>>,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// Values of the final candle, the only ones surfaced downstream.
    pub fn latest(&self) -> Option<LatestIndicators> {
        Some(LatestIndicators {
            close: *self.closes.last()?,
            rsi: *self.rsi.last()?,
            ema_short: *self.ema_short.last()?,
            ema_long: *self.ema_long.last()?,
            ema_trend: self.ema_trend.as_ref().and_then(|v| v.last().copied()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatestIndicators {
    pub close: f64,
    pub rsi: f64,
    pub ema_short: f64,
    pub ema_long: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_trend: Option<f64>,
}

impl LatestIndicators {
    pub fn ema(&self, line: EmaLine) -> Option<f64> {
        match line {
            EmaLine::Short => Some(self.ema_short),
            EmaLine::Long => Some(self.ema_long),
            EmaLine::Trend => self.ema_trend,
        }
    }
}
