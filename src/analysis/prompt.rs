use crate::models::MarketSnapshot;

/// Prompt embedding the indicator summary for the verdict backend.
pub fn build_prompt(
    symbol: &str,
    snapshot: &MarketSnapshot,
    rsi_period: u32,
    language: &str,
) -> String {
    format!(
        "Act as a professional trader. Analyse the pair {symbol} on the {timeframe} timeframe.\n\
         Current price: ${price}\n\
         RSI ({rsi_period} periods): {rsi:.1}\n\
         EMA 21: {ema:.2}\n\
         Heuristic probability of upward movement: {probability}%\n\
         \n\
         Answer in {language}.\n\
         Be direct (at most 3 lines).\n\
         Give a clear verdict: BUY, SELL or NEUTRAL, and explain the technical reason.",
        symbol = symbol,
        timeframe = snapshot.timeframe,
        price = snapshot.price,
        rsi_period = rsi_period,
        rsi = snapshot.rsi,
        ema = snapshot.ema_long,
        probability = snapshot.probability,
        language = language,
    )
}
