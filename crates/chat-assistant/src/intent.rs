//! Wallet Intent Extraction
//!
//! Parses transaction intents out of an LLM reply and validates them into
//! typed variants. The assistant never executes these; it hands the typed
//! intent to the wallet UI, which confirms and signs.
//!
//! A reply carries at most one intent. Recognizes fenced ```intent blocks
//! first, then a single inline JSON object carrying an "action" key.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failure on an otherwise well-formed intent block
#[derive(Debug, Error)]
pub enum IntentError {
    #[error("intent is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("intent amount '{0}' is not a positive number")]
    InvalidAmount(String),

    #[error("unknown intent action '{0}'")]
    UnknownAction(String),

    #[error("intent block is not valid JSON")]
    Malformed,
}

impl IntentError {
    /// Conversational rendering shown in place of the assistant reply
    pub fn user_message(&self) -> String {
        match self {
            IntentError::MissingField(field) => format!(
                "I couldn't prepare that transaction: the {} is missing. \
                 Could you spell it out for me?",
                field.replace('_', " ")
            ),
            IntentError::InvalidAmount(raw) => format!(
                "I couldn't prepare that transaction: '{}' isn't a valid amount. \
                 Please give me a positive number.",
                raw
            ),
            IntentError::UnknownAction(action) => format!(
                "I couldn't prepare that transaction: I don't know how to '{}'. \
                 I can help with transfers and swaps.",
                action
            ),
            IntentError::Malformed => {
                "I tried to prepare a transaction but got the details wrong. \
                 Could you rephrase your request?"
                    .to_string()
            }
        }
    }
}

/// A validated transaction intent, ready for the wallet UI
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Intent {
    Transfer {
        recipient: String,
        token: String,
        amount: Decimal,
    },
    Swap {
        from_token: String,
        to_token: String,
        amount: Decimal,
    },
}

/// Unvalidated intent shape as the model emits it
///
/// Amounts arrive as JSON numbers; they go through a string round-trip into
/// `Decimal` so float representation never touches the value.
#[derive(Debug, Deserialize)]
struct RawIntent {
    action: Option<String>,
    recipient: Option<String>,
    token: Option<String>,
    from_token: Option<String>,
    to_token: Option<String>,
    amount: Option<serde_json::Number>,
}

impl RawIntent {
    fn validate(self) -> Result<Intent, IntentError> {
        let action = self.action.ok_or(IntentError::MissingField("action"))?;
        let amount = parse_amount(self.amount)?;

        match action.as_str() {
            "transfer" => Ok(Intent::Transfer {
                recipient: non_empty(self.recipient, "recipient")?,
                token: non_empty(self.token, "token")?.to_uppercase(),
                amount,
            }),
            "swap" => Ok(Intent::Swap {
                from_token: non_empty(self.from_token, "from_token")?.to_uppercase(),
                to_token: non_empty(self.to_token, "to_token")?.to_uppercase(),
                amount,
            }),
            other => Err(IntentError::UnknownAction(other.to_string())),
        }
    }
}

fn non_empty(value: Option<String>, field: &'static str) -> Result<String, IntentError> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(IntentError::MissingField(field)),
    }
}

fn parse_amount(raw: Option<serde_json::Number>) -> Result<Decimal, IntentError> {
    let number = raw.ok_or(IntentError::MissingField("amount"))?;
    let amount: Decimal = number
        .to_string()
        .parse()
        .map_err(|_| IntentError::InvalidAmount(number.to_string()))?;

    if amount <= Decimal::ZERO {
        return Err(IntentError::InvalidAmount(number.to_string()));
    }
    Ok(amount)
}

/// Extract the intent from a model reply, if one is present
///
/// `None` means the reply carries no intent at all; `Some(Err)` means an
/// intent block was found but failed validation.
pub fn extract(content: &str) -> Option<Result<Intent, IntentError>> {
    if let Some(start) = content.find("```intent") {
        let after = &content[start + "```intent".len()..];
        let end = after.find("```")?;
        let json_str = after[..end].trim();
        return Some(parse_block(json_str));
    }

    extract_inline(content)
}

fn parse_block(json_str: &str) -> Result<Intent, IntentError> {
    let raw: RawIntent = serde_json::from_str(json_str).map_err(|_| IntentError::Malformed)?;
    raw.validate()
}

fn extract_inline(content: &str) -> Option<Result<Intent, IntentError>> {
    if !content.contains(r#""action""#) {
        return None;
    }
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(parse_block(&content[start..=end]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_extract_fenced_transfer() {
        let content = r#"Sure, here it is:
```intent
{"action": "transfer", "recipient": "7xKX...gAsU", "token": "sol", "amount": 1.5}
```"#;

        let intent = extract(content).unwrap().unwrap();
        assert_eq!(
            intent,
            Intent::Transfer {
                recipient: "7xKX...gAsU".into(),
                token: "SOL".into(),
                amount: dec!(1.5),
            }
        );
    }

    #[test]
    fn test_extract_inline_swap() {
        let content = r#"{"action": "swap", "from_token": "SOL", "to_token": "USDC", "amount": 2}"#;

        let intent = extract(content).unwrap().unwrap();
        assert_eq!(
            intent,
            Intent::Swap {
                from_token: "SOL".into(),
                to_token: "USDC".into(),
                amount: dec!(2),
            }
        );
    }

    #[test]
    fn test_no_intent_in_plain_text() {
        assert!(extract("SOL is up 6% today.").is_none());
    }

    #[test]
    fn test_missing_recipient() {
        let content = r#"```intent
{"action": "transfer", "token": "SOL", "amount": 1}
```"#;

        let err = extract(content).unwrap().unwrap_err();
        assert!(matches!(err, IntentError::MissingField("recipient")));
        assert!(err.user_message().contains("recipient"));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let content = r#"```intent
{"action": "swap", "from_token": "SOL", "to_token": "USDC", "amount": -3}
```"#;

        let err = extract(content).unwrap().unwrap_err();
        assert!(matches!(err, IntentError::InvalidAmount(_)));
    }

    #[test]
    fn test_unknown_action() {
        let content = r#"```intent
{"action": "stake", "token": "SOL", "amount": 5}
```"#;

        let err = extract(content).unwrap().unwrap_err();
        assert!(matches!(err, IntentError::UnknownAction(_)));
    }

    #[test]
    fn test_malformed_block() {
        let content = "```intent\nnot json at all\n```";
        let err = extract(content).unwrap().unwrap_err();
        assert!(matches!(err, IntentError::Malformed));
    }

    #[test]
    fn test_amount_precision_survives() {
        let content = r#"{"action": "transfer", "recipient": "abc", "token": "SOL", "amount": 0.1}"#;
        let Intent::Transfer { amount, .. } = extract(content).unwrap().unwrap() else {
            panic!("expected transfer");
        };
        assert_eq!(amount, dec!(0.1));
    }
}
