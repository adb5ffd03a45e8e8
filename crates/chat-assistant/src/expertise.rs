//! Expertise Detection
//!
//! Classifies the user's crypto fluency from their recent utterances so the
//! system prompt can pitch explanations at the right level. Advanced terms
//! outrank intermediate ones; no matches defaults to beginner.

use serde::{Deserialize, Serialize};

/// Self-evident vocabulary tiers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpertiseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for ExpertiseLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpertiseLevel::Beginner => write!(f, "beginner"),
            ExpertiseLevel::Intermediate => write!(f, "intermediate"),
            ExpertiseLevel::Advanced => write!(f, "advanced"),
        }
    }
}

/// Vocabulary only experienced users reach for
const ADVANCED_TERMS: &[&str] = &[
    "impermanent loss",
    "liquidity pool",
    "arbitrage",
    "derivatives",
    "leverage",
    "slippage tolerance",
    "yield farming",
    "automated market maker",
    "order book",
    "perpetual",
    "funding rate",
];

/// Vocabulary picked up after some time in the space
const INTERMEDIATE_TERMS: &[&str] = &[
    "staking",
    "defi",
    "swap",
    "market cap",
    "volatility",
    "apy",
    "stablecoin",
    "gas fees",
    "liquidity",
    "airdrop",
];

/// Classify expertise from recent user utterances
///
/// Substring match over lowercased text; any advanced term wins outright.
pub fn detect(utterances: &[&str]) -> ExpertiseLevel {
    let combined = utterances.join(" ").to_lowercase();

    if ADVANCED_TERMS.iter().any(|term| combined.contains(term)) {
        ExpertiseLevel::Advanced
    } else if INTERMEDIATE_TERMS.iter().any(|term| combined.contains(term)) {
        ExpertiseLevel::Intermediate
    } else {
        ExpertiseLevel::Beginner
    }
}
