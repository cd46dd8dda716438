//! Presentation model handed to the dashboard front end.
//!
//! Fields that only mean something with live data are `None` when the
//! snapshot is the no-data sentinel, so a front end cannot show zeros as
//! if they were prices.

use serde::Serialize;
use std::fmt::Write as _;

use crate::analysis::{Verdict, VerdictSource};
use crate::core::pipeline::SnapshotReport;
use crate::models::{Timeframe, TradingPair};
use crate::services::resolve;

/// Exchange prefix of the embedded chart widget
pub const CHART_EXCHANGE: &str = "BYBIT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Bullish,
    Neutral,
    Bearish,
}

impl Sentiment {
    pub fn from_probability(probability: u8) -> Self {
        if probability > 60 {
            Sentiment::Bullish
        } else if probability < 40 {
            Sentiment::Bearish
        } else {
            Sentiment::Neutral
        }
    }

    pub fn fear_greed_label(&self) -> &'static str {
        match self {
            Sentiment::Bullish => "Greed",
            Sentiment::Neutral => "Neutral",
            Sentiment::Bearish => "Fear",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub symbol: String,
    pub pair: TradingPair,
    pub timeframe: Timeframe,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    pub price: Option<f64>,
    pub rsi: Option<f64>,
    pub rsi_period: u32,
    pub ema_short: Option<f64>,
    pub ema_long: Option<f64>,
    /// Distance of price from EMA21 in percent
    pub ema_deviation_pct: Option<f64>,
    pub probability: u8,
    pub sentiment: Sentiment,
    pub fear_greed_label: &'static str,
    pub verdict: Verdict,
    pub verdict_label: String,
    pub chart_symbol: String,
    pub chart_interval: String,
}

impl DashboardView {
    pub fn build(report: &SnapshotReport, verdict: Verdict) -> Self {
        let snapshot = &report.snapshot;
        let has_data = snapshot.has_data();
        let pair = report
            .source
            .as_ref()
            .map(|s| s.pair.clone())
            .or_else(|| report.candidates.first().cloned())
            .unwrap_or_else(|| resolve(&report.symbol).remove(0));

        let live = |value: f64| has_data.then_some(value);
        let ema_deviation_pct = (has_data && snapshot.ema_long > 0.0)
            .then(|| (snapshot.price - snapshot.ema_long) / snapshot.ema_long * 100.0);
        let sentiment = if has_data {
            Sentiment::from_probability(snapshot.probability)
        } else {
            Sentiment::Neutral
        };
        let verdict_label = match verdict.source {
            VerdictSource::Backend => format!("AI analysis ({})", verdict.model),
            VerdictSource::LocalFallback => "Offline backup analysis".to_string(),
            VerdictSource::NoData => "No market data".to_string(),
            VerdictSource::Unconfigured => "AI analysis not configured".to_string(),
        };

        Self {
            symbol: report.symbol.clone(),
            chart_symbol: format!("{}:{}", CHART_EXCHANGE, pair.concatenated()),
            chart_interval: snapshot.timeframe.minutes().to_string(),
            pair,
            timeframe: snapshot.timeframe,
            has_data,
            provider: report.source.as_ref().map(|s| s.provider.clone()),
            price: live(snapshot.price),
            rsi: live(snapshot.rsi),
            rsi_period: report.rsi_period,
            ema_short: live(snapshot.ema_short),
            ema_long: live(snapshot.ema_long),
            ema_deviation_pct,
            probability: snapshot.probability,
            sentiment,
            fear_greed_label: sentiment.fear_greed_label(),
            verdict,
            verdict_label,
        }
    }

    /// Plain-text rendering for terminals
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.pair, self.timeframe);
        if !self.has_data {
            let _ = writeln!(out, "  No market data available for '{}'", self.symbol);
        } else {
            let fmt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_default();
            let _ = writeln!(
                out,
                "  Price: {}  (via {})",
                fmt(self.price),
                self.provider.as_deref().unwrap_or("-")
            );
            let _ = writeln!(out, "  RSI({}): {}", self.rsi_period, fmt(self.rsi));
            let _ = writeln!(
                out,
                "  EMA9: {}  EMA21: {}  ({:+.2}% from EMA21)",
                fmt(self.ema_short),
                fmt(self.ema_long),
                self.ema_deviation_pct.unwrap_or(0.0)
            );
            let _ = writeln!(
                out,
                "  Probability: {}%  Sentiment: {:?}  Fear & Greed: {}/100 {}",
                self.probability, self.sentiment, self.probability, self.fear_greed_label
            );
        }
        let _ = writeln!(out, "  [{}] {}", self.verdict_label, self.verdict.text);
        let _ = write!(out, "  Chart: {} @ {}", self.chart_symbol, self.chart_interval);
        out
    }
}
