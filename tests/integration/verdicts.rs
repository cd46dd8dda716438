//! Gemini client and model rotation over HTTP

use std::time::Duration;

use crate::test_utils::*;
use market_pulse::analysis::{BackendError, GeminiClient, VerdictBackend, VerdictService, VerdictSource};
use market_pulse::config::VerdictConfig;
use market_pulse::models::{MarketSnapshot, Timeframe};
use wiremock::matchers::body_string_contains;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn snapshot() -> MarketSnapshot {
    MarketSnapshot {
        price: 64250.5,
        rsi: 28.4,
        ema_short: 64100.0,
        ema_long: 63900.0,
        probability: 85,
        timeframe: Timeframe::OneHour,
    }
}

fn config(server: &MockServer, models: &[&str]) -> VerdictConfig {
    VerdictConfig {
        api_key: Some("test-key".to_string()),
        base_url: base_url(server),
        models: models.iter().map(|m| m.to_string()).collect(),
        request_timeout: Duration::from_secs(5),
        min_retry_delay: Duration::from_millis(1),
        max_retry_delay: Duration::from_millis(5),
        ..VerdictConfig::default()
    }
}

#[tokio::test]
async fn gemini_parts_are_joined() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        "gemini-2.0-flash",
        ResponseTemplate::new(200).set_body_json(gemini_answer(&["BUY: ", "RSI oversold."])),
    )
    .await;

    let client = GeminiClient::with_client(base_url(&server), "test-key".to_string(), reqwest::Client::new());
    let text = client.generate("gemini-2.0-flash", "prompt").await.unwrap();
    assert_eq!(text, "BUY: RSI oversold.");
}

#[tokio::test]
async fn gemini_errors_are_typed() {
    let server = MockServer::start().await;
    mount_gemini(
        &server,
        "busy",
        ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"),
    )
    .await;
    mount_gemini(
        &server,
        "blocked",
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
    )
    .await;

    let client = GeminiClient::with_client(base_url(&server), "test-key".to_string(), reqwest::Client::new());
    assert!(matches!(
        client.generate("busy", "p").await,
        Err(BackendError::Status { status: 429, .. })
    ));
    assert!(matches!(
        client.generate("blocked", "p").await,
        Err(BackendError::EmptyResponse)
    ));
}

#[tokio::test]
async fn service_rotates_to_the_next_model() {
    let server = MockServer::start().await;
    mount_gemini(&server, "m1", ResponseTemplate::new(503)).await;
    mount_gemini(
        &server,
        "m2",
        ResponseTemplate::new(200).set_body_json(gemini_answer(&["NEUTRAL"])),
    )
    .await;

    let service = VerdictService::from_config(&config(&server, &["m1", "m2", "m3"])).unwrap();
    let verdict = service.analyze("BTCUSDT", &snapshot()).await;

    assert_eq!(verdict.source, VerdictSource::Backend);
    assert_eq!(verdict.model, "m2");
    assert_eq!(verdict.text, "NEUTRAL");
}

#[tokio::test]
async fn prompt_carries_the_snapshot() {
    let server = MockServer::start().await;
    Mock::given(body_string_contains("RSI (14 periods): 28.4"))
        .and(body_string_contains("BTCUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(&["BUY"])))
        .expect(1)
        .mount(&server)
        .await;

    let service = VerdictService::from_config(&config(&server, &["m1"])).unwrap();
    let verdict = service.analyze("BTCUSDT", &snapshot()).await;
    assert_eq!(verdict.text, "BUY");
}

#[tokio::test]
async fn prompt_quotes_the_configured_rsi_period() {
    let server = MockServer::start().await;
    Mock::given(body_string_contains("RSI (21 periods): 28.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gemini_answer(&["SELL"])))
        .expect(1)
        .mount(&server)
        .await;

    let config = VerdictConfig {
        rsi_period: 21,
        ..config(&server, &["m1"])
    };
    let service = VerdictService::from_config(&config).unwrap();
    let verdict = service.analyze("BTCUSDT", &snapshot()).await;
    assert_eq!(verdict.text, "SELL");
}

#[tokio::test]
async fn unreachable_backend_ends_in_local_fallback() {
    let server = MockServer::start().await;
    let service = VerdictService::from_config(&config(&server, &["m1", "m2"])).unwrap();

    let verdict = service.analyze("BTCUSDT", &snapshot()).await;

    assert_eq!(verdict.source, VerdictSource::LocalFallback);
    assert!(verdict.text.starts_with("[Offline backup analysis]"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
