//! Market data acquisition: symbol resolution, exchange providers, fallback pool.

pub mod market_data;
pub mod pool;
pub mod providers;
pub mod symbols;

pub use market_data::{AttemptFailure, FailureReason, MarketDataProvider, ProviderError};
pub use pool::{FetchError, ProviderHit, ProviderPool};
pub use symbols::resolve;
