//! Pipeline orchestrator: resolve, fetch, compute, score.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::indicators::{IndicatorEngine, IndicatorParams};
use crate::metrics::Metrics;
use crate::models::{CandleSeries, MarketSnapshot, Timeframe, TradingPair};
use crate::services::providers::build_providers;
use crate::services::{resolve, AttemptFailure, FetchError, ProviderPool};
use crate::signals::ScoringRules;

/// Which provider and pair produced the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Provenance {
    pub provider: String,
    pub pair: TradingPair,
}

/// A snapshot plus how it was obtained
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotReport {
    pub symbol: String,
    pub candidates: Vec<TradingPair>,
    pub snapshot: MarketSnapshot,
    pub rsi_period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Provenance>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<AttemptFailure>,
}

pub struct MarketPipeline {
    pool: ProviderPool,
    candle_limit: usize,
    indicators: IndicatorParams,
    scoring: ScoringRules,
    metrics: Option<Arc<Metrics>>,
}

impl MarketPipeline {
    pub fn new(
        pool: ProviderPool,
        candle_limit: usize,
        indicators: IndicatorParams,
        scoring: ScoringRules,
    ) -> Self {
        Self {
            pool: pool.with_lookback(indicators.lookback()),
            candle_limit,
            indicators,
            scoring,
            metrics: None,
        }
    }

    /// Build the exchange providers described by the configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, reqwest::Error> {
        let providers = build_providers(&config.providers)?;
        Ok(Self::new(
            ProviderPool::new(providers, config.min_candles),
            config.candle_limit,
            config.indicators.clone(),
            config.scoring.clone(),
        ))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.pool = self.pool.with_metrics(metrics.clone());
        self.metrics = Some(metrics);
        self
    }

    /// Never fails: when no provider yields data the no-data sentinel is
    /// returned, which callers detect with [`MarketSnapshot::has_data`].
    pub async fn get_snapshot(&self, raw_symbol: &str, timeframe: Timeframe) -> MarketSnapshot {
        self.report(raw_symbol, timeframe).await.snapshot
    }

    pub async fn report(&self, raw_symbol: &str, timeframe: Timeframe) -> SnapshotReport {
        if let Some(ref metrics) = self.metrics {
            metrics.snapshot_requests_total.inc();
        }

        let candidates = resolve(raw_symbol);
        let fetched = self
            .pool
            .fetch(&candidates, timeframe, self.candle_limit)
            .await;

        let (snapshot, source, attempts) = match fetched {
            Ok(hit) => {
                info!(
                    symbol = %raw_symbol,
                    provider = %hit.provider,
                    pair = %hit.pair,
                    candles = hit.series.len(),
                    failed_attempts = hit.attempts.len(),
                    "Market data resolved via {} as {}",
                    hit.provider,
                    hit.pair
                );
                let snapshot =
                    snapshot_from_series(&hit.series, timeframe, &self.indicators, &self.scoring);
                let source = Provenance {
                    provider: hit.provider,
                    pair: hit.pair,
                };
                (snapshot, Some(source), hit.attempts)
            }
            Err(FetchError::NoDataAvailable { attempts }) => {
                warn!(
                    symbol = %raw_symbol,
                    attempts = attempts.len(),
                    "No provider returned data, serving the no-data snapshot"
                );
                (MarketSnapshot::no_data(timeframe), None, attempts)
            }
            Err(e @ FetchError::Configuration(_)) => {
                warn!(symbol = %raw_symbol, error = %e, "Market data pipeline misconfigured");
                (MarketSnapshot::no_data(timeframe), None, Vec::new())
            }
        };

        if !snapshot.has_data() {
            if let Some(ref metrics) = self.metrics {
                metrics.snapshot_no_data_total.inc();
            }
        }

        SnapshotReport {
            symbol: raw_symbol.to_string(),
            candidates,
            snapshot,
            rsi_period: self.indicators.rsi_period,
            source,
            attempts,
        }
    }
}

/// Reduce a fetched series to a snapshot. Pure.
pub fn snapshot_from_series(
    series: &CandleSeries,
    timeframe: Timeframe,
    params: &IndicatorParams,
    rules: &ScoringRules,
) -> MarketSnapshot {
    let indicators = IndicatorEngine::compute(series, params);
    match indicators.latest() {
        Some(latest) => MarketSnapshot {
            price: latest.close,
            rsi: latest.rsi,
            ema_short: latest.ema_short,
            ema_long: latest.ema_long,
            probability: rules.score(&latest),
            timeframe,
        },
        None => MarketSnapshot::no_data(timeframe),
    }
}
