//! Ordered provider pool with per-provider and per-candidate fallback.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::metrics::Metrics;
use crate::models::{CandleSeries, Timeframe, TradingPair};
use crate::services::market_data::{AttemptFailure, FailureReason, MarketDataProvider};

/// No series shorter than the RSI lookback is ever accepted.
pub const MIN_VIABLE_CANDLES: usize = 14;
pub const DEFAULT_MIN_CANDLES: usize = 50;
pub const DEFAULT_CANDLE_LIMIT: usize = 100;

/// First successful provider/pair combination.
#[derive(Debug)]
pub struct ProviderHit {
    pub series: CandleSeries,
    pub provider: String,
    pub pair: TradingPair,
    /// Attempts that failed before this one succeeded
    pub attempts: Vec<AttemptFailure>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no provider returned usable candles ({} failed attempts)", .attempts.len())]
    NoDataAvailable { attempts: Vec<AttemptFailure> },
    #[error("market data pool misconfigured: {0}")]
    Configuration(String),
}

pub struct ProviderPool {
    providers: Vec<Arc<dyn MarketDataProvider>>,
    min_candles: usize,
    lookback: usize,
    metrics: Option<Arc<Metrics>>,
}

impl ProviderPool {
    /// Providers are tried in the order given.
    pub fn new(providers: Vec<Arc<dyn MarketDataProvider>>, min_candles: usize) -> Self {
        Self {
            providers,
            min_candles,
            lookback: MIN_VIABLE_CANDLES,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Raise the minimum viable series length to an indicator lookback.
    pub fn with_lookback(mut self, lookback: usize) -> Self {
        self.lookback = lookback.max(MIN_VIABLE_CANDLES);
        self
    }

    fn validate(&self, candidates: &[TradingPair], limit: usize) -> Result<(), FetchError> {
        if self.providers.is_empty() {
            return Err(FetchError::Configuration("no providers configured".to_string()));
        }
        if self.min_candles < self.lookback {
            return Err(FetchError::Configuration(format!(
                "minimum candle count {} is below the indicator lookback {}",
                self.min_candles, self.lookback
            )));
        }
        if limit < self.min_candles {
            return Err(FetchError::Configuration(format!(
                "candle limit {} is below the minimum candle count {}",
                limit, self.min_candles
            )));
        }
        if candidates.is_empty() {
            return Err(FetchError::Configuration("no candidate pairs".to_string()));
        }
        Ok(())
    }

    /// Walk providers × candidates in order; the first series with at least
    /// `min_candles` candles ends the search.
    pub async fn fetch(
        &self,
        candidates: &[TradingPair],
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<ProviderHit, FetchError> {
        self.validate(candidates, limit)?;

        let mut attempts = Vec::new();
        for provider in &self.providers {
            for pair in candidates {
                let reason = match provider.fetch_candles(pair, timeframe, limit).await {
                    Ok(series) if series.is_empty() => FailureReason::Empty,
                    Ok(series) if series.len() < self.min_candles => FailureReason::Insufficient {
                        received: series.len(),
                        required: self.min_candles,
                    },
                    Ok(series) => {
                        debug!(
                            provider = provider.id(),
                            pair = %pair,
                            candles = series.len(),
                            "Provider returned usable candles"
                        );
                        self.record(provider.id(), "success");
                        return Ok(ProviderHit {
                            series,
                            provider: provider.id().to_string(),
                            pair: pair.clone(),
                            attempts,
                        });
                    }
                    Err(e) => FailureReason::from(&e),
                };

                warn!(
                    provider = provider.id(),
                    pair = %pair,
                    reason = ?reason,
                    "Candle fetch attempt failed, trying next"
                );
                self.record(provider.id(), reason.label());
                attempts.push(AttemptFailure {
                    provider: provider.id().to_string(),
                    pair: pair.clone(),
                    reason,
                });
            }
        }

        Err(FetchError::NoDataAvailable { attempts })
    }

    fn record(&self, provider: &str, outcome: &str) {
        if let Some(ref metrics) = self.metrics {
            metrics.record_attempt(provider, outcome);
        }
    }
}
