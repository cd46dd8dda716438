//! OKX candles (`GET /api/v5/market/candles`)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{candle_from_row, endpoint};
use crate::models::{CandleSeries, Timeframe, TradingPair};
use crate::services::market_data::{MarketDataProvider, ProviderError};

const MAX_LIMIT: usize = 300;
const INSTRUMENT_NOT_FOUND: &str = "51001";

#[derive(Debug, Deserialize)]
struct CandlesResponse {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

pub struct OkxProvider {
    base_url: Url,
    client: reqwest::Client,
}

impl OkxProvider {
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    /// Hour bars are uppercase on OKX
    fn bar(timeframe: Timeframe) -> &'static str {
        match timeframe {
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::ThirtyMinutes => "30m",
            Timeframe::OneHour => "1H",
            Timeframe::FourHours => "4H",
        }
    }
}

#[async_trait]
impl MarketDataProvider for OkxProvider {
    fn id(&self) -> &str {
        "okx"
    }

    async fn fetch_candles(
        &self,
        pair: &TradingPair,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<CandleSeries, ProviderError> {
        let url = endpoint(&self.base_url, "/api/v5/market/candles")?;
        let inst_id = pair.dashed();
        debug!(provider = "okx", inst_id = %inst_id, bar = Self::bar(timeframe), limit, "Requesting candles");

        let response = self
            .client
            .get(url)
            .query(&[
                ("instId", inst_id.clone()),
                ("bar", Self::bar(timeframe).to_string()),
                ("limit", limit.min(MAX_LIMIT).to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: CandlesResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => return Err(ProviderError::Status(status.as_u16())),
            Err(e) => return Err(ProviderError::Decode(e.to_string())),
        };

        match parsed.code.as_str() {
            "0" => {}
            INSTRUMENT_NOT_FOUND => return Err(ProviderError::UnknownSymbol(inst_id)),
            code => {
                return Err(ProviderError::Exchange {
                    code: code.to_string(),
                    message: parsed.msg,
                })
            }
        }

        let candles = parsed
            .data
            .iter()
            .map(|row| candle_from_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CandleSeries::new(candles)?)
    }
}
