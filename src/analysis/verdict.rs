//! Verdict generation with sequential model rotation and a local fallback.

use backon::{BackoffBuilder, ExponentialBuilder};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::gemini::{GeminiClient, VerdictBackend};
use super::prompt::build_prompt;
use crate::config::VerdictConfig;
use crate::metrics::Metrics;
use crate::models::MarketSnapshot;

pub const NO_DATA_VERDICT: &str =
    "INVALID DATA: market data could not be read. Check the symbol and try again.";
pub const UNCONFIGURED_VERDICT: &str = "Set GEMINI_API_KEY to enable AI analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    /// A backend model answered
    Backend,
    /// Every model failed; text was derived locally from the indicators
    LocalFallback,
    /// The snapshot carried no data, nothing was asked
    NoData,
    /// No credentials configured for the backend
    Unconfigured,
}

impl VerdictSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerdictSource::Backend => "backend",
            VerdictSource::LocalFallback => "local_fallback",
            VerdictSource::NoData => "no_data",
            VerdictSource::Unconfigured => "unconfigured",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub text: String,
    /// Backend model that answered, or a marker for local outcomes
    pub model: String,
    pub source: VerdictSource,
}

pub struct VerdictService {
    backend: Option<Arc<dyn VerdictBackend>>,
    models: Vec<String>,
    language: String,
    rsi_period: u32,
    min_retry_delay: Duration,
    max_retry_delay: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl VerdictService {
    /// `backend` is `None` when credentials are missing.
    pub fn new(backend: Option<Arc<dyn VerdictBackend>>, config: &VerdictConfig) -> Self {
        Self {
            backend,
            models: config.models.clone(),
            language: config.language.clone(),
            rsi_period: config.rsi_period,
            min_retry_delay: config.min_retry_delay,
            max_retry_delay: config.max_retry_delay,
            metrics: None,
        }
    }

    /// Gemini-backed service when an API key is configured.
    pub fn from_config(config: &VerdictConfig) -> Result<Self, reqwest::Error> {
        let backend = match config.api_key {
            Some(ref key) => {
                let client = reqwest::Client::builder()
                    .timeout(config.request_timeout)
                    .build()?;
                let gemini = GeminiClient::with_client(config.base_url.clone(), key.clone(), client);
                Some(Arc::new(gemini) as Arc<dyn VerdictBackend>)
            }
            None => None,
        };
        Ok(Self::new(backend, config))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Always yields a verdict; backend failures end in the local fallback.
    pub async fn analyze(&self, symbol: &str, snapshot: &MarketSnapshot) -> Verdict {
        let verdict = self.resolve_verdict(symbol, snapshot).await;
        if let Some(ref metrics) = self.metrics {
            metrics
                .verdicts_total
                .with_label_values(&[verdict.source.as_str()])
                .inc();
        }
        verdict
    }

    async fn resolve_verdict(&self, symbol: &str, snapshot: &MarketSnapshot) -> Verdict {
        if !snapshot.has_data() {
            return Verdict {
                text: NO_DATA_VERDICT.to_string(),
                model: "system".to_string(),
                source: VerdictSource::NoData,
            };
        }

        let Some(ref backend) = self.backend else {
            return Verdict {
                text: UNCONFIGURED_VERDICT.to_string(),
                model: "none".to_string(),
                source: VerdictSource::Unconfigured,
            };
        };

        let prompt = build_prompt(symbol, snapshot, self.rsi_period, &self.language);
        let mut delays = ExponentialBuilder::default()
            .with_min_delay(self.min_retry_delay)
            .with_max_delay(self.max_retry_delay)
            .with_max_times(self.models.len())
            .build();

        for (index, model) in self.models.iter().enumerate() {
            if index > 0 {
                if let Some(delay) = delays.next() {
                    tokio::time::sleep(delay).await;
                }
            }

            match backend.generate(model, &prompt).await {
                Ok(text) => {
                    info!(symbol = %symbol, model = %model, "Verdict generated");
                    return Verdict {
                        text,
                        model: model.clone(),
                        source: VerdictSource::Backend,
                    };
                }
                Err(e) => {
                    warn!(symbol = %symbol, model = %model, error = %e, "Verdict model failed, trying next");
                }
            }
        }

        warn!(symbol = %symbol, "All verdict models failed, using local fallback");
        Verdict {
            text: local_verdict(symbol, snapshot),
            model: "local".to_string(),
            source: VerdictSource::LocalFallback,
        }
    }
}

/// Deterministic verdict from RSI and EMA comparisons only, no network.
pub fn local_verdict(symbol: &str, snapshot: &MarketSnapshot) -> String {
    let above_long = snapshot.price > snapshot.ema_long;
    let short_over_long = snapshot.ema_short > snapshot.ema_long;

    let (call, reason) = if snapshot.rsi < 30.0 {
        if above_long {
            ("BUY", "RSI is oversold and price holds above EMA21")
        } else {
            ("BUY", "RSI is oversold, a rebound is possible but the trend is still down")
        }
    } else if snapshot.rsi > 70.0 {
        if above_long {
            ("SELL", "RSI is overbought, a pullback is possible despite the uptrend")
        } else {
            ("SELL", "RSI is overbought and price is below EMA21")
        }
    } else if above_long && short_over_long {
        ("BUY", "price is above EMA21 and EMA9 leads EMA21")
    } else if !above_long && !short_over_long {
        ("SELL", "price is below EMA21 and EMA9 trails EMA21")
    } else {
        ("NEUTRAL", "the averages disagree and RSI is in the neutral zone")
    };

    format!(
        "[Offline backup analysis] {}: {} because {} (RSI {:.1}, price {:.2} vs EMA21 {:.2}).",
        symbol,
        call,
        reason,
        snapshot.rsi,
        snapshot.price,
        snapshot.ema_long
    )
}
