//! Application configuration, built once at startup and passed down.
//!
//! Only this module reads the process environment. Binaries call
//! `dotenvy::dotenv()` first so a local `.env` file is honoured.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::indicators::momentum::DEFAULT_RSI_PERIOD;
use crate::indicators::IndicatorParams;
use crate::models::Timeframe;
use crate::services::pool::{DEFAULT_CANDLE_LIMIT, DEFAULT_MIN_CANDLES};
use crate::services::providers::{ProviderKind, ProviderSettings};
use crate::signals::ScoringRules;

pub const DEFAULT_PROVIDER_ORDER: [ProviderKind; 3] =
    [ProviderKind::Binance, ProviderKind::Bybit, ProviderKind::Okx];

pub const DEFAULT_GEMINI_MODELS: [&str; 4] = [
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-2.5-flash",
    "gemini-2.5-pro",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var}: {message}")]
    InvalidValue { var: &'static str, message: String },
    #[error("{var} is not a valid URL '{value}': {source}")]
    InvalidUrl {
        var: String,
        value: String,
        source: url::ParseError,
    },
    #[error("failed to read scoring rules from {path}: {source}")]
    RulesFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse scoring rules in {path}: {source}")]
    RulesParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Deployment environment name (`APP_ENV`), `sandbox` when unset
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub pipeline: PipelineConfig,
    pub verdict: VerdictConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Priority order; the first provider is tried first
    pub providers: Vec<ProviderSettings>,
    pub candle_limit: usize,
    pub min_candles: usize,
    pub default_timeframe: Timeframe,
    pub indicators: IndicatorParams,
    pub scoring: ScoringRules,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            providers: DEFAULT_PROVIDER_ORDER
                .iter()
                .map(|&kind| default_provider(kind, Duration::from_secs(10)))
                .collect(),
            candle_limit: DEFAULT_CANDLE_LIMIT,
            min_candles: DEFAULT_MIN_CANDLES,
            default_timeframe: Timeframe::default(),
            indicators: IndicatorParams::default(),
            scoring: ScoringRules::default(),
        }
    }
}

fn default_provider(kind: ProviderKind, timeout: Duration) -> ProviderSettings {
    ProviderSettings {
        kind,
        base_url: Url::parse(kind.default_base_url()).expect("static provider URL"),
        timeout,
    }
}

#[derive(Debug, Clone)]
pub struct VerdictConfig {
    /// Missing key disables backend calls; the dashboard shows a setup message
    pub api_key: Option<String>,
    pub base_url: Url,
    /// Tried in order until one answers
    pub models: Vec<String>,
    pub language: String,
    /// RSI period quoted in the prompt; follows the pipeline's indicators
    pub rsi_period: u32,
    pub request_timeout: Duration,
    pub min_retry_delay: Duration,
    pub max_retry_delay: Duration,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: Url::parse("https://generativelanguage.googleapis.com")
                .expect("static Gemini URL"),
            models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
            language: "Brazilian Portuguese (pt-BR)".to_string(),
            rsi_period: DEFAULT_RSI_PERIOD,
            request_timeout: Duration::from_secs(30),
            min_retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Speech is disabled when no endpoint is configured
    pub endpoint: Option<Url>,
    pub voice: String,
    pub timeout: Duration,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            voice: "pt-BR-FranciscaNeural".to_string(),
            timeout: Duration::from_secs(20),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; unset or blank variables
    /// fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider_timeout =
            Duration::from_secs(parse_or(&get, "PROVIDER_TIMEOUT_SECS", 10u64)?);
        let kinds = match get("MARKET_PROVIDERS") {
            Some(list) => list
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| {
                    ProviderKind::from_str(s).map_err(|message| ConfigError::InvalidValue {
                        var: "MARKET_PROVIDERS",
                        message,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_PROVIDER_ORDER.to_vec(),
        };
        let providers = kinds
            .into_iter()
            .map(|kind| {
                let var = format!("{}_BASE_URL", kind.as_str().to_ascii_uppercase());
                let base_url = match get(&var) {
                    Some(value) => parse_url(&var, &value)?,
                    None => default_provider(kind, provider_timeout).base_url,
                };
                Ok(ProviderSettings {
                    kind,
                    base_url,
                    timeout: provider_timeout,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let default_timeframe = match get("DEFAULT_TIMEFRAME") {
            Some(value) => value.parse().map_err(|e: crate::models::TimeframeError| {
                ConfigError::InvalidValue {
                    var: "DEFAULT_TIMEFRAME",
                    message: e.to_string(),
                }
            })?,
            None => Timeframe::default(),
        };

        let scoring = match get("SCORING_RULES_PATH") {
            Some(path) => load_scoring_rules(Path::new(&path))?,
            None => ScoringRules::default(),
        };

        let rsi_period: u32 = parse_or(&get, "RSI_PERIOD", DEFAULT_RSI_PERIOD)?;
        if rsi_period == 0 {
            return Err(ConfigError::InvalidValue {
                var: "RSI_PERIOD",
                message: "period must be at least 1".to_string(),
            });
        }
        let indicators = IndicatorParams {
            rsi_period,
            ..IndicatorParams::default()
        };

        let pipeline = PipelineConfig {
            providers,
            candle_limit: parse_or(&get, "CANDLE_LIMIT", DEFAULT_CANDLE_LIMIT)?,
            min_candles: parse_or(&get, "MIN_CANDLES", DEFAULT_MIN_CANDLES)?,
            default_timeframe,
            indicators,
            scoring,
        };

        let verdict_defaults = VerdictConfig::default();
        let verdict = VerdictConfig {
            api_key: get("GEMINI_API_KEY").map(|k| k.trim().to_string()),
            base_url: match get("GEMINI_BASE_URL") {
                Some(value) => parse_url("GEMINI_BASE_URL", &value)?,
                None => verdict_defaults.base_url,
            },
            models: match get("GEMINI_MODELS") {
                Some(list) => list
                    .split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect(),
                None => verdict_defaults.models,
            },
            language: get("VERDICT_LANGUAGE").unwrap_or(verdict_defaults.language),
            rsi_period,
            ..verdict_defaults
        };

        let speech_defaults = SpeechConfig::default();
        let speech = SpeechConfig {
            endpoint: get("TTS_ENDPOINT")
                .map(|value| parse_url("TTS_ENDPOINT", &value))
                .transpose()?,
            voice: get("TTS_VOICE").unwrap_or(speech_defaults.voice),
            ..speech_defaults
        };

        Ok(Self {
            environment: get("APP_ENV").unwrap_or_else(|| "sandbox".to_string()),
            port: parse_or(&get, "PORT", 8080u16)?,
            pipeline,
            verdict,
            speech,
        })
    }
}

pub fn load_scoring_rules(path: &Path) -> Result<ScoringRules, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::RulesFile {
        path: path.to_path_buf(),
        source,
    })?;
    ScoringRules::from_json(&json).map_err(|source| ConfigError::RulesParse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_or<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(default),
    }
}

fn parse_url(var: &str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        var: var.to_string(),
        value: value.to_string(),
        source,
    })
}
