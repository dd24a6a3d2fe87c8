//! Prompt assembly for the daily XAUUSD report
//!
//! The instruction template is fixed: four parts (technical analysis, the
//! day's events and risks, a copy-paste Telegram signal, a visual setup),
//! Swedish as the main language with English technical terms.

use chrono::NaiveDate;

use crate::market::MarketSnapshot;

/// Market context line used when no live snapshot is available.
pub const NO_MARKET_DATA_CONTEXT: &str =
    "Please search for current XAUUSD price and market sentiment";

/// Four-part report instructions, sent verbatim every day.
pub const ANALYSIS_TEMPLATE: &str = r#"When analyzing XAUUSD, provide a comprehensive trading analysis following this exact 4-part structure. Always search for current market data and today's economic events.

PART 1: 📊 TEKNISK ANALYS
1. VOLUME-ANALYS: Analyze volume patterns vs price movements, identify spikes, look for divergences
2. KRITISKA NIVÅER: Major resistance, current support, key support, deeper support with specific price ranges
3. KONKRET STRATEGI: Primary bias, entry points, stop loss, targets with R/R ratios, timeframe
4. SANNOLIKHETER: Percentage probabilities for different scenarios with timeframes
5. WARNING SIGNALS: What would invalidate strategy, key levels, volume patterns, external factors
6. RIGHT NOW POSITION: Current recommendation (Long/Short/Neutral), size (1-10), reasoning

PART 2: 📅 DAGENS HÄNDELSER & RISKER
- 🚨 HIGH IMPACT: Major economic data, central bank speeches, geopolitical events
- 📊 MID IMPACT: Secondary indicators, technical tests, Fed rate changes, COT data
- ⚡ LOW IMPACT: Minor releases, retail sentiment, technical patterns
- 🎯 IMPACT PÅ XAUUSD: Positive/Negative/Neutral factors

PART 3: 📱 TELEGRAM SIGNAL
Format as copy-paste ready signal with:
- Current price & bias with probability
- Primary setup (entry/SL/TP)
- Alternative setup if applicable
- Key levels and timeframes
- Most likely outcome

PART 4: Brief description of the most likely visual setup for traders

Focus on actionable trading information with specific price levels, realistic probabilities, and short-term scalping/day trading setups. Use Swedish for main analysis, technical terms in English when appropriate."#;

/// Build the full prompt for `date`.
///
/// Deterministic: the same date and snapshot always give the same text.
pub fn build_prompt(date: NaiveDate, market: Option<&MarketSnapshot>) -> String {
    let context = market.map_or_else(|| NO_MARKET_DATA_CONTEXT.to_string(), ToString::to_string);

    format!(
        "Today is {date}. Please provide a complete XAUUSD analysis following the established 4-part structure.\n\
         \n\
         Current market context: {context}\n\
         \n\
         {ANALYSIS_TEMPLATE}\n\
         \n\
         Focus on actionable setups for the next 4-8 hours of trading.\n",
        date = date.format("%B %d, %Y"),
    )
}
