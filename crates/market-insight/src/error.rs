//! Error Types for Market Insight
//!
//! Provider failures are explicit result values with a tagged kind, so
//! callers choose whether to propagate or convert to conversational text.
//! There is no retry budget anywhere in this subsystem.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MarketError>;

#[derive(Error, Debug)]
pub enum MarketError {
    /// The upstream market data source could not be reached
    #[error("Market data provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered with a payload we could not decode
    #[error("Malformed provider payload: {0}")]
    MalformedPayload(String),

    /// Symbol outside the tracked set
    #[error("Unsupported symbol: {0}")]
    UnsupportedSymbol(String),
}

impl MarketError {
    /// Convert to a user-facing chat message
    pub fn user_message(&self) -> String {
        match self {
            MarketError::ProviderUnavailable(_) | MarketError::MalformedPayload(_) => {
                "I couldn't fetch fresh market data right now. Please try again in a moment.".into()
            }
            MarketError::UnsupportedSymbol(symbol) => {
                format!("I don't track {} yet, so I can't analyze it.", symbol)
            }
        }
    }
}

impl From<reqwest::Error> for MarketError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MarketError::MalformedPayload(err.to_string())
        } else {
            MarketError::ProviderUnavailable(err.to_string())
        }
    }
}
