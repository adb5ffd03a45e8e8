//! Suggestion Chips
//!
//! Short follow-up prompts rendered as tappable chips under each reply.
//! Rule order is fixed: market follow-ups, then portfolio actions for a
//! connected wallet, then one educational prompt for the detected level;
//! the list is capped at three.

use crate::expertise::ExpertiseLevel;

const MAX_SUGGESTIONS: usize = 3;

/// Keywords that mark a prompt as market-related
const MARKET_KEYWORDS: &[&str] = &[
    "market",
    "price",
    "trend",
    "bull",
    "bear",
    "sentiment",
    "analysis",
    "rsi",
    "macd",
    "volume",
    "dominance",
    "pump",
    "dump",
    "rally",
    "dip",
    "up",
    "down",
];

const MARKET_SUGGESTIONS: &[&str] = &[
    "What's driving the current trend?",
    "Show me the technicals for SOL",
];

const PORTFOLIO_SUGGESTIONS: &[&str] = &[
    "How is my portfolio doing?",
    "Should I rebalance my holdings?",
];

/// Whether a prompt should pull the market analysis into the reply
pub fn is_market_query(text: &str) -> bool {
    let lowered = text.to_lowercase();
    MARKET_KEYWORDS
        .iter()
        .any(|kw| lowered.split(|c: char| !c.is_alphanumeric()).any(|w| w == *kw))
}

fn educational_suggestion(level: ExpertiseLevel) -> &'static str {
    match level {
        ExpertiseLevel::Beginner => "What is a token swap?",
        ExpertiseLevel::Intermediate => "How does staking yield work?",
        ExpertiseLevel::Advanced => "Explain the current funding-rate picture",
    }
}

/// Build the suggestion chips for one reply
pub fn build_suggestions(
    market_query: bool,
    wallet_connected: bool,
    level: ExpertiseLevel,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if market_query {
        suggestions.extend(MARKET_SUGGESTIONS.iter().map(ToString::to_string));
    }
    if wallet_connected {
        suggestions.extend(PORTFOLIO_SUGGESTIONS.iter().map(ToString::to_string));
    }
    suggestions.push(educational_suggestion(level).to_string());

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

/// Static chips shown alongside the apology when the LLM is unreachable
pub fn fallback_suggestions() -> Vec<String> {
    vec![
        "How's the market doing?".to_string(),
        "What is a token swap?".to_string(),
    ]
}
