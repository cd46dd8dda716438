//! Prometheus metrics for the HTTP surface and the market data pipeline

use prometheus::{
    Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};

pub struct Metrics {
    registry: Registry,
    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_in_flight: Gauge,
    pub snapshot_requests_total: IntCounter,
    pub snapshot_no_data_total: IntCounter,
    pub provider_attempts_total: IntCounterVec,
    pub verdicts_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_in_flight = Gauge::new(
            "http_requests_in_flight",
            "Number of HTTP requests currently being served",
        )?;
        let snapshot_requests_total = IntCounter::new(
            "snapshot_requests_total",
            "Market snapshots requested from the pipeline",
        )?;
        let snapshot_no_data_total = IntCounter::new(
            "snapshot_no_data_total",
            "Snapshots that degraded to the no-data sentinel",
        )?;
        let provider_attempts_total = IntCounterVec::new(
            Opts::new(
                "provider_attempts_total",
                "Candle fetch attempts by provider and outcome",
            ),
            &["provider", "outcome"],
        )?;
        let verdicts_total = IntCounterVec::new(
            Opts::new("verdicts_total", "Verdicts produced, by source"),
            &["source"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(snapshot_requests_total.clone()))?;
        registry.register(Box::new(snapshot_no_data_total.clone()))?;
        registry.register(Box::new(provider_attempts_total.clone()))?;
        registry.register(Box::new(verdicts_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_in_flight,
            snapshot_requests_total,
            snapshot_no_data_total,
            provider_attempts_total,
            verdicts_total,
        })
    }

    /// Render all metrics in the Prometheus text exposition format
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_attempt(&self, provider: &str, outcome: &str) {
        self.provider_attempts_total
            .with_label_values(&[provider, outcome])
            .inc();
    }
}
