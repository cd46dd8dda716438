//! Exchange and Gemini payloads served from wiremock

#![allow(dead_code)]

use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const START_MS: i64 = 1_700_000_000_000;

pub fn base_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).expect("mock server URL")
}

/// `(open time ms, close)` rows, oldest first, one hour apart.
pub fn rising_rows(count: usize, start: f64, step: f64) -> Vec<(i64, f64)> {
    (0..count)
        .map(|i| (START_MS + i as i64 * 3_600_000, start + i as f64 * step))
        .collect()
}

pub fn binance_klines(rows: &[(i64, f64)]) -> Value {
    Value::Array(
        rows.iter()
            .map(|&(t, close)| {
                json!([
                    t,
                    format!("{:.2}", close),
                    format!("{:.2}", close * 1.01),
                    format!("{:.2}", close * 0.99),
                    format!("{:.2}", close),
                    "12.5",
                    t + 3_599_999,
                    "1250.0",
                    42,
                    "6.0",
                    "600.0",
                    "0"
                ])
            })
            .collect(),
    )
}

/// Bybit lists newest first with string timestamps.
pub fn bybit_klines(rows: &[(i64, f64)]) -> Value {
    let list: Vec<Value> = rows
        .iter()
        .rev()
        .map(|&(t, close)| {
            json!([
                t.to_string(),
                format!("{:.2}", close),
                format!("{:.2}", close * 1.01),
                format!("{:.2}", close * 0.99),
                format!("{:.2}", close),
                "3.2",
                "320.0"
            ])
        })
        .collect();
    json!({
        "retCode": 0,
        "retMsg": "OK",
        "result": { "category": "spot", "symbol": "BTCUSDT", "list": list },
        "time": START_MS
    })
}

/// OKX also answers newest first.
pub fn okx_candles(rows: &[(i64, f64)]) -> Value {
    let data: Vec<Value> = rows
        .iter()
        .rev()
        .map(|&(t, close)| {
            json!([
                t.to_string(),
                format!("{:.2}", close),
                format!("{:.2}", close * 1.01),
                format!("{:.2}", close * 0.99),
                format!("{:.2}", close),
                "8.1",
                "810.0",
                "810.0",
                "1"
            ])
        })
        .collect();
    json!({ "code": "0", "msg": "", "data": data })
}

pub async fn mount_binance(server: &MockServer, symbol: &str, rows: &[(i64, f64)]) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(binance_klines(rows)))
        .mount(server)
        .await;
}

pub async fn mount_binance_invalid_symbol(server: &MockServer, symbol: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", symbol))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "code": -1121, "msg": "Invalid symbol." })),
        )
        .mount(server)
        .await;
}

pub async fn mount_bybit(server: &MockServer, symbol: &str, rows: &[(i64, f64)]) {
    Mock::given(method("GET"))
        .and(path("/v5/market/kline"))
        .and(query_param("category", "spot"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(bybit_klines(rows)))
        .mount(server)
        .await;
}

pub async fn mount_bybit_error(server: &MockServer, symbol: &str, code: i64, message: &str) {
    Mock::given(method("GET"))
        .and(path("/v5/market/kline"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "retCode": code,
            "retMsg": message,
            "result": {},
            "time": START_MS
        })))
        .mount(server)
        .await;
}

pub async fn mount_okx(server: &MockServer, inst_id: &str, rows: &[(i64, f64)]) {
    Mock::given(method("GET"))
        .and(path("/api/v5/market/candles"))
        .and(query_param("instId", inst_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(okx_candles(rows)))
        .mount(server)
        .await;
}

pub async fn mount_okx_unknown(server: &MockServer, inst_id: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v5/market/candles"))
        .and(query_param("instId", inst_id))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "51001",
            "msg": "Instrument ID does not exist",
            "data": []
        })))
        .mount(server)
        .await;
}

pub fn gemini_answer(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts.iter().map(|p| json!({ "text": p })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }]
    })
}

pub async fn mount_gemini(server: &MockServer, model: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", model)))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}
