//! Public REST candle endpoints of the supported exchanges

pub mod binance;
pub mod bybit;
pub mod okx;

pub use binance::BinanceProvider;
pub use bybit::BybitProvider;
pub use okx::OkxProvider;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::models::Candle;
use crate::services::market_data::{MarketDataProvider, ProviderError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Binance,
    Bybit,
    Okx,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Binance => "binance",
            ProviderKind::Bybit => "bybit",
            ProviderKind::Okx => "okx",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::Binance => "https://api.binance.com",
            ProviderKind::Bybit => "https://api.bybit.com",
            ProviderKind::Okx => "https://www.okx.com",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(ProviderKind::Binance),
            "bybit" => Ok(ProviderKind::Bybit),
            "okx" => Ok(ProviderKind::Okx),
            other => Err(format!("unknown market data provider '{}'", other)),
        }
    }
}

/// One configured provider: which exchange, where, and how long to wait.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub base_url: Url,
    pub timeout: Duration,
}

/// Instantiate providers in the configured priority order.
pub fn build_providers(
    settings: &[ProviderSettings],
) -> Result<Vec<Arc<dyn MarketDataProvider>>, reqwest::Error> {
    settings
        .iter()
        .map(|s| {
            let client = reqwest::Client::builder().timeout(s.timeout).build()?;
            let provider: Arc<dyn MarketDataProvider> = match s.kind {
                ProviderKind::Binance => {
                    Arc::new(BinanceProvider::with_client(s.base_url.clone(), client))
                }
                ProviderKind::Bybit => {
                    Arc::new(BybitProvider::with_client(s.base_url.clone(), client))
                }
                ProviderKind::Okx => Arc::new(OkxProvider::with_client(s.base_url.clone(), client)),
            };
            Ok(provider)
        })
        .collect()
}

pub(crate) fn endpoint(base: &Url, path: &str) -> Result<Url, ProviderError> {
    base.join(path)
        .map_err(|e| ProviderError::Network(format!("invalid endpoint {}{}: {}", base, path, e)))
}

/// Exchanges send prices as JSON strings, timestamps as strings or numbers.
pub(crate) fn number(value: &Value, field: &str) -> Result<f64, ProviderError> {
    match value {
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| ProviderError::Decode(format!("{} is not numeric: {:?}", field, s))),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ProviderError::Decode(format!("{} out of range", field))),
        other => Err(ProviderError::Decode(format!(
            "{} has unexpected type: {}",
            field, other
        ))),
    }
}

pub(crate) fn timestamp(value: &Value) -> Result<DateTime<Utc>, ProviderError> {
    let millis = number(value, "timestamp")? as i64;
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| ProviderError::Decode(format!("timestamp {} out of range", millis)))
}

/// Rows laid out as `[time, open, high, low, close, volume, ...]`, the shape
/// shared by all three exchanges.
pub(crate) fn candle_from_row(row: &[Value]) -> Result<Candle, ProviderError> {
    if row.len() < 6 {
        return Err(ProviderError::Decode(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }
    Ok(Candle::new(
        number(&row[1], "open")?,
        number(&row[2], "high")?,
        number(&row[3], "low")?,
        number(&row[4], "close")?,
        number(&row[5], "volume")?,
        timestamp(&row[0])?,
    ))
}
