//! Market data provider interface and typed attempt failures.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::{CandleSeries, SeriesError, Timeframe, TradingPair};

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Stable identifier used in logs, metrics and provenance
    fn id(&self) -> &str;

    /// Fetch the `limit` most recent candles, oldest first
    async fn fetch_candles(
        &self,
        pair: &TradingPair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError>;
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("symbol {0} is not listed")]
    UnknownSymbol(String),
    #[error("exchange error {code}: {message}")]
    Exchange { code: String, message: String },
    #[error("undecodable payload: {0}")]
    Decode(String),
    #[error("invalid candle series: {0}")]
    Series(#[from] SeriesError),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::Status(status.as_u16())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

/// Why one provider/pair attempt was abandoned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    Timeout,
    Network { message: String },
    HttpStatus { status: u16 },
    UnknownSymbol,
    Exchange { code: String, message: String },
    Decode { message: String },
    InvalidSeries { message: String },
    Empty,
    Insufficient { received: usize, required: usize },
}

impl FailureReason {
    /// Short label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::Timeout => "timeout",
            FailureReason::Network { .. } => "network",
            FailureReason::HttpStatus { .. } => "http_status",
            FailureReason::UnknownSymbol => "unknown_symbol",
            FailureReason::Exchange { .. } => "exchange",
            FailureReason::Decode { .. } => "decode",
            FailureReason::InvalidSeries { .. } => "invalid_series",
            FailureReason::Empty => "empty",
            FailureReason::Insufficient { .. } => "insufficient",
        }
    }
}

impl From<&ProviderError> for FailureReason {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::Timeout => FailureReason::Timeout,
            ProviderError::Network(message) => FailureReason::Network {
                message: message.clone(),
            },
            ProviderError::Status(status) => FailureReason::HttpStatus { status: *status },
            ProviderError::UnknownSymbol(_) => FailureReason::UnknownSymbol,
            ProviderError::Exchange { code, message } => FailureReason::Exchange {
                code: code.clone(),
                message: message.clone(),
            },
            ProviderError::Decode(message) => FailureReason::Decode {
                message: message.clone(),
            },
            ProviderError::Series(err) => FailureReason::InvalidSeries {
                message: err.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptFailure {
    pub provider: String,
    pub pair: TradingPair,
    pub reason: FailureReason,
}
