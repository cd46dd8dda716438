//! OHLCV candles and the validated series the indicator engine consumes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    fn check(&self) -> Result<(), SeriesError> {
        let prices = [self.open, self.high, self.low, self.close];
        if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return Err(SeriesError::InvalidPrice(self.timestamp));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(SeriesError::InvalidVolume(self.timestamp));
        }
        if self.high < self.open.max(self.close) || self.low > self.open.min(self.close) {
            return Err(SeriesError::InconsistentRange(self.timestamp));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("candle at {0} has a non-positive or non-finite price")]
    InvalidPrice(DateTime<Utc>),
    #[error("candle at {0} has a negative or non-finite volume")]
    InvalidVolume(DateTime<Utc>),
    #[error("candle at {0} has a high/low range that excludes its open or close")]
    InconsistentRange(DateTime<Utc>),
    #[error("duplicate candle timestamp {0}")]
    DuplicateTimestamp(DateTime<Utc>),
}

/// Candles ordered oldest first with strictly increasing timestamps.
///
/// Gaps between candles are neither detected nor repaired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    /// Sorts by timestamp and rejects duplicates or malformed samples.
    /// Exchanges disagree on ordering (Bybit and OKX answer newest first).
    pub fn new(mut candles: Vec<Candle>) -> Result<Self, SeriesError> {
        for candle in &candles {
            candle.check()?;
        }
        candles.sort_by_key(|c| c.timestamp);
        if let Some(pair) = candles.windows(2).find(|w| w[0].timestamp == w[1].timestamp) {
            return Err(SeriesError::DuplicateTimestamp(pair[1].timestamp));
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
