//! Shared data models spanning the pipeline layers.

pub mod candle;
pub mod indicators;
pub mod market;
pub mod snapshot;

pub use candle::{Candle, CandleSeries, SeriesError};
pub use indicators::{EmaLine, IndicatorSet, LatestIndicators};
pub use market::{Timeframe, TimeframeError, TradingPair, DEFAULT_QUOTE};
pub use snapshot::MarketSnapshot;
