//! Market pulse: candles from public exchanges, RSI/EMA indicators, a
//! rule-based probability score and a natural-language verdict.

pub mod analysis;
pub mod config;
pub mod core;
pub mod display;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod speech;
