//! Chat Request Context
//!
//! Wallet and session state supplied by the UI alongside every prompt.
//! Balances are `rust_decimal` - never use f64 for money.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A token position in the connected wallet
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenHolding {
    /// Ticker symbol (e.g., "SOL", "USDC")
    pub symbol: String,

    /// Quantity held
    pub amount: Decimal,
}

/// Per-request context from the chat UI
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChatContext {
    /// Whether a wallet is connected
    #[serde(default)]
    pub wallet_connected: bool,

    /// Connected wallet address
    #[serde(default)]
    pub wallet_address: Option<String>,

    /// Native balance of the connected wallet
    #[serde(default)]
    pub balance_sol: Option<Decimal>,

    /// Token holdings of the connected wallet
    #[serde(default)]
    pub holdings: Vec<TokenHolding>,

    /// Session identifier (assigned by the server when absent)
    #[serde(default)]
    pub session_id: Option<String>,

    /// When the session started
    #[serde(default)]
    pub session_started_at: Option<DateTime<Utc>>,
}

impl ChatContext {
    /// Short wallet description for prompt templating
    pub fn wallet_summary(&self) -> String {
        if !self.wallet_connected {
            return "not connected".into();
        }

        let mut summary = String::from("connected");
        if let Some(ref address) = self.wallet_address {
            summary.push_str(&format!(" ({})", abbreviate(address)));
        }
        if let Some(balance) = self.balance_sol {
            summary.push_str(&format!(", balance {} SOL", balance));
        }
        if !self.holdings.is_empty() {
            let tokens: Vec<String> = self
                .holdings
                .iter()
                .map(|h| format!("{} {}", h.amount, h.symbol))
                .collect();
            summary.push_str(&format!(", holding {}", tokens.join(", ")));
        }
        summary
    }
}

/// Shorten an address for display: first and last 4 characters
///
/// Counts characters, not bytes; the address comes straight from the
/// request JSON and is not guaranteed to be ASCII.
fn abbreviate(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        address.to_string()
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_disconnected_summary() {
        let ctx = ChatContext::default();
        assert_eq!(ctx.wallet_summary(), "not connected");
    }

    #[test]
    fn test_connected_summary() {
        let ctx = ChatContext {
            wallet_connected: true,
            wallet_address: Some("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU".into()),
            balance_sol: Some(dec!(12.5)),
            holdings: vec![TokenHolding {
                symbol: "USDC".into(),
                amount: dec!(250),
            }],
            ..ChatContext::default()
        };

        let summary = ctx.wallet_summary();
        assert!(summary.starts_with("connected (7xKX...gAsU)"));
        assert!(summary.contains("12.5 SOL"));
        assert!(summary.contains("250 USDC"));
    }

    #[test]
    fn test_multibyte_address_does_not_panic() {
        // 10 chars but 30 bytes: short enough to stay whole
        let ctx = ChatContext {
            wallet_connected: true,
            wallet_address: Some("€€€€€€€€€€".into()),
            ..ChatContext::default()
        };
        assert!(ctx.wallet_summary().contains("€€€€€€€€€€"));

        // Long enough to abbreviate, with multibyte chars at both cut points
        assert_eq!(abbreviate("€€€€€€€€€€€€"), "€€€€...€€€€");
    }
}
