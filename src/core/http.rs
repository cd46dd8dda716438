//! HTTP endpoint server using Axum

use axum::{
    extract::{Query, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use crate::analysis::VerdictService;
use crate::config::AppConfig;
use crate::core::pipeline::MarketPipeline;
use crate::display::DashboardView;
use crate::metrics::Metrics;
use crate::models::Timeframe;
use crate::speech::{spawn_narration, HttpSpeechClient, SpeechSynthesizer};

pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub pipeline: Arc<MarketPipeline>,
    pub verdicts: Arc<VerdictService>,
    pub speech: Option<Arc<dyn SpeechSynthesizer>>,
    pub default_timeframe: Timeframe,
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "market-pulse",
        "verdicts_configured": state.verdicts.is_configured(),
        "speech_configured": state.speech.is_some(),
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    symbol: Option<String>,
    timeframe: Option<String>,
}

impl MarketQuery {
    fn resolve(self, default_timeframe: Timeframe) -> Result<(String, Timeframe), Response> {
        let symbol = self
            .symbol
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
        let timeframe = match self.timeframe {
            Some(raw) => raw.parse::<Timeframe>().map_err(|e| {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
            })?,
            None => default_timeframe,
        };
        Ok((symbol, timeframe))
    }
}

/// Snapshot plus provenance; degraded data is still a 200
async fn get_snapshot(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> Response {
    let (symbol, timeframe) = match query.resolve(state.default_timeframe) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    let report = state.pipeline.report(&symbol, timeframe).await;
    Json(report).into_response()
}

/// Snapshot, verdict and presentation fields in one payload
async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<MarketQuery>,
) -> Response {
    let (symbol, timeframe) = match query.resolve(state.default_timeframe) {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };
    let report = state.pipeline.report(&symbol, timeframe).await;
    let verdict = state.verdicts.analyze(&symbol, &report.snapshot).await;
    Json(DashboardView::build(&report, verdict)).into_response()
}

#[derive(Debug, Deserialize)]
struct SpeechBody {
    text: String,
}

/// Narrate a verdict; any synthesis failure is a 204, never an error
async fn post_speech(State(state): State<AppState>, Json(body): Json<SpeechBody>) -> Response {
    let Some(ref synthesizer) = state.speech else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "speech synthesis is not configured" })),
        )
            .into_response();
    };

    match spawn_narration(synthesizer.clone(), &body.text).await {
        Ok(Some(audio)) => ([(header::CONTENT_TYPE, "audio/mpeg")], audio).into_response(),
        Ok(None) | Err(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/snapshot", get(get_snapshot))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/speech", post(post_speech))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Wire every collaborator from the configuration.
pub fn build_state(config: &AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let metrics = Arc::new(Metrics::new()?);
    let pipeline = MarketPipeline::from_config(&config.pipeline)?.with_metrics(metrics.clone());
    let verdicts = VerdictService::from_config(&config.verdict)?.with_metrics(metrics.clone());
    let speech = HttpSpeechClient::from_config(&config.speech)?
        .map(|client| Arc::new(client) as Arc<dyn SpeechSynthesizer>);

    Ok(AppState {
        metrics,
        start_time: Arc::new(Instant::now()),
        pipeline: Arc::new(pipeline),
        verdicts: Arc::new(verdicts),
        speech,
        default_timeframe: config.pipeline.default_timeframe,
    })
}

pub async fn start_server(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_state(config)?;
    if !state.verdicts.is_configured() {
        tracing::warn!("GEMINI_API_KEY is not set - verdicts will show a configuration message");
    }

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;

    info!(port = config.port, "HTTP server listening on port {}", config.port);
    info!(
        "Metrics endpoint available at http://0.0.0.0:{}/metrics",
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
