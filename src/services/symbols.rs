//! Free-form ticker text to exchange trading pairs.

use crate::models::{TradingPair, DEFAULT_QUOTE};

/// Base used when the input carries no usable ticker at all.
pub const FALLBACK_BASE: &str = "BTC";

const SEPARATORS: &[char] = &['/', '-', '_', ':'];

/// Renamed assets as (current ticker, legacy ticker). Venues migrate listings
/// at different times, so both names are tried, current first.
const RENAMED_ASSETS: &[(&str, &str)] = &[("POL", "MATIC"), ("RENDER", "RNDR")];

const COMMON_NAMES: &[(&str, &str)] = &[
    ("BITCOIN", "BTC"),
    ("ETHEREUM", "ETH"),
    ("ETHER", "ETH"),
    ("SOLANA", "SOL"),
    ("LITECOIN", "LTC"),
    ("DOGECOIN", "DOGE"),
    ("POLKADOT", "DOT"),
    ("CHAINLINK", "LINK"),
    ("POLYGON", "POL"),
    ("COSMOS", "ATOM"),
    ("UNISWAP", "UNI"),
    ("CARDANO", "ADA"),
    ("RIPPLE", "XRP"),
    ("AVALANCHE", "AVAX"),
];

/// Candidate pairs to try, most likely first. Never fails: the first element
/// is always a well-formed pair.
pub fn resolve(raw: &str) -> Vec<TradingPair> {
    let text = ticker_text(raw);
    let (base, quote) = split_pair(&text);

    let quote = if quote.is_empty() {
        DEFAULT_QUOTE.to_string()
    } else {
        quote
    };
    // A lone quote ticker ("USDT", "/USDT") names no asset.
    let base = match base.as_str() {
        "" => FALLBACK_BASE.to_string(),
        name if name == quote => FALLBACK_BASE.to_string(),
        name => common_name(name).unwrap_or(name).to_string(),
    };

    let mut candidates: Vec<TradingPair> = match renamed(&base) {
        Some((current, legacy)) => vec![
            TradingPair::new(current, &quote),
            TradingPair::new(legacy, &quote),
        ],
        None => vec![TradingPair::new(&base, &quote)],
    };
    candidates.dedup();
    candidates
}

/// Uppercased, whitespace-free text; a dashboard label such as
/// `"Bitcoin (BTC)"` reduces to the ticker in parentheses.
fn ticker_text(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    let inner = upper
        .rfind('(')
        .and_then(|open| {
            let rest = &upper[open + 1..];
            rest.find(')').map(|close| &rest[..close])
        })
        .filter(|inner| inner.chars().any(|c| c.is_ascii_alphanumeric()));

    inner
        .unwrap_or(&upper)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

fn split_pair(text: &str) -> (String, String) {
    if text.contains(SEPARATORS) {
        let mut parts = text
            .split(SEPARATORS)
            .map(clean)
            .filter(|part| !part.is_empty());
        let base = parts.next().unwrap_or_default();
        let quote = parts.next().unwrap_or_default();
        return (base, quote);
    }

    let text = clean(text);
    match text.strip_suffix(DEFAULT_QUOTE) {
        Some(base) if !base.is_empty() => (base.to_string(), DEFAULT_QUOTE.to_string()),
        _ => (text, DEFAULT_QUOTE.to_string()),
    }
}

fn clean(part: &str) -> String {
    part.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn common_name(name: &str) -> Option<&'static str> {
    COMMON_NAMES
        .iter()
        .find(|(common, _)| *common == name)
        .map(|(_, ticker)| *ticker)
}

fn renamed(base: &str) -> Option<(&'static str, &'static str)> {
    RENAMED_ASSETS
        .iter()
        .find(|(current, legacy)| *current == base || *legacy == base)
        .copied()
}
