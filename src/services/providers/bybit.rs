//! Bybit v5 spot klines (`GET /v5/market/kline`)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{candle_from_row, endpoint};
use crate::models::{CandleSeries, Timeframe, TradingPair};
use crate::services::market_data::{MarketDataProvider, ProviderError};

const MAX_LIMIT: usize = 1000;
const NOT_SUPPORTED_SYMBOL: i64 = 10001;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KlineResponse {
    ret_code: i64,
    ret_msg: String,
    #[serde(default)]
    result: Option<KlineResult>,
}

#[derive(Debug, Deserialize)]
struct KlineResult {
    #[serde(default)]
    list: Vec<Vec<Value>>,
}

pub struct BybitProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl BybitProvider {
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    /// Bybit intervals are minute counts
    fn interval(timeframe: Timeframe) -> String {
        timeframe.minutes().to_string()
    }
}

#[async_trait]
impl MarketDataProvider for BybitProvider {
    fn id(&self) -> &str {
        "bybit"
    }

    async fn fetch_candles(
        &self,
        pair: &TradingPair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let url = endpoint(&self.base_url, "/v5/market/kline")?;
        let symbol = pair.concatenated();
        debug!(provider = "bybit", symbol = %symbol, interval = %timeframe, limit, "Requesting klines");

        let response = self
            .client
            .get(url)
            .query(&[
                ("category", "spot".to_string()),
                ("symbol", symbol.clone()),
                ("interval", Self::interval(timeframe)),
                ("limit", limit.min(MAX_LIMIT).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        // Errors arrive as HTTP 200 with a non-zero retCode
        let body: KlineResponse = response.json().await?;
        match body.ret_code {
            0 => {}
            NOT_SUPPORTED_SYMBOL => return Err(ProviderError::UnknownSymbol(symbol)),
            code => {
                return Err(ProviderError::Exchange {
                    code: code.to_string(),
                    message: body.ret_msg,
                })
            }
        }

        let candles = body
            .result
            .map(|r| r.list)
            .unwrap_or_default()
            .iter()
            .map(|row| candle_from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CandleSeries::new(candles)?)
    }
}
