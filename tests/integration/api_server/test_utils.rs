//! Test utilities for API server integration tests

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum_test::TestServer;
use market_pulse::analysis::VerdictService;
use market_pulse::config::{PipelineConfig, VerdictConfig};
use market_pulse::core::http::{create_router, AppState};
use market_pulse::core::pipeline::MarketPipeline;
use market_pulse::metrics::Metrics;
use market_pulse::models::Timeframe;
use market_pulse::services::providers::{ProviderKind, ProviderSettings};
use market_pulse::speech::{HttpSpeechClient, SpeechSynthesizer};
use url::Url;
use wiremock::MockServer;

use crate::test_utils::{base_url, mount_binance, rising_rows};

/// Router backed by a mocked Binance; verdicts and speech are off unless set.
#[allow(dead_code)]
pub struct TestApiServer {
    pub server: TestServer,
    pub metrics: Arc<Metrics>,
    pub exchange: MockServer,
}

pub struct Options {
    pub gemini: Option<Url>,
    pub speech: Option<Url>,
}

impl TestApiServer {
    pub async fn new() -> Self {
        Self::with_options(Options {
            gemini: None,
            speech: None,
        })
        .await
    }

    pub async fn with_options(options: Options) -> Self {
        let exchange = MockServer::start().await;
        mount_binance(&exchange, "BTCUSDT", &rising_rows(100, 100.0, 0.5)).await;

        let metrics = Arc::new(Metrics::new().expect("metrics initialization"));

        let pipeline_config = PipelineConfig {
            providers: vec![ProviderSettings {
                kind: ProviderKind::Binance,
                base_url: base_url(&exchange),
                timeout: Duration::from_secs(5),
            }],
            ..PipelineConfig::default()
        };
        let pipeline = MarketPipeline::from_config(&pipeline_config)
            .expect("pipeline")
            .with_metrics(metrics.clone());

        let verdict_config = match options.gemini {
            Some(url) => VerdictConfig {
                api_key: Some("test-key".to_string()),
                base_url: url,
                models: vec!["m1".to_string()],
                ..VerdictConfig::default()
            },
            None => VerdictConfig::default(),
        };
        let verdicts = VerdictService::from_config(&verdict_config)
            .expect("verdict service")
            .with_metrics(metrics.clone());

        let speech = options.speech.map(|endpoint| {
            Arc::new(HttpSpeechClient::with_client(
                endpoint,
                "test-voice".to_string(),
                reqwest::Client::new(),
            )) as Arc<dyn SpeechSynthesizer>
        });

        let state = AppState {
            metrics: metrics.clone(),
            start_time: Arc::new(Instant::now()),
            pipeline: Arc::new(pipeline),
            verdicts: Arc::new(verdicts),
            speech,
            default_timeframe: Timeframe::FifteenMinutes,
        };

        let app = create_router(state);
        let server = TestServer::new(app).expect("start test server");

        Self {
            server,
            metrics,
            exchange,
        }
    }
}
