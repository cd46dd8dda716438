//! Binance spot klines (`GET /api/v3/klines`)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{candle_from_row, endpoint};
use crate::models::{CandleSeries, Timeframe, TradingPair};
use crate::services::market_data::{MarketDataProvider, ProviderError};

const MAX_LIMIT: usize = 1000;
const INVALID_SYMBOL: i64 = -1121;

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

pub struct BinanceProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl BinanceProvider {
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    fn interval(timeframe: Timeframe) -> &'static str {
        timeframe.as_str()
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    fn id(&self) -> &str {
        "binance"
    }

    async fn fetch_candles(
        &self,
        pair: &TradingPair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let url = endpoint(&self.base_url, "/api/v3/klines")?;
        let symbol = pair.concatenated();
        debug!(provider = "binance", symbol = %symbol, interval = %timeframe, limit, "Requesting klines");

        let response = self
            .client
            .get(url)
            .query(&[
                ("symbol", symbol.clone()),
                ("interval", Self::interval(timeframe).to_string()),
                ("limit", limit.min(MAX_LIMIT).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ApiError>(&body) {
                Ok(err) if err.code == INVALID_SYMBOL => ProviderError::UnknownSymbol(symbol),
                Ok(err) => ProviderError::Exchange {
                    code: err.code.to_string(),
                    message: err.msg,
                },
                Err(_) => ProviderError::Status(status.as_u16()),
            });
        }

        let rows: Vec<Vec<Value>> = response.json().await?;
        let candles = rows
            .iter()
            .map(|row| candle_from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CandleSeries::new(candles)?)
    }
}
