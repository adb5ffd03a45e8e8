//! # chat-assistant
//!
//! Orchestration layer of the wallet chat assistant: builds an enriched
//! system prompt from wallet/session context plus the cached market
//! analysis, wraps a single LLM completion call, and reshapes the reply
//! with intent metadata, exposed tool invocations and suggestion chips.
//!
//! ## Flow
//!
//! ```text
//! UI ──{prompt, context}──▶ enrichment ──▶ LLM call ──▶ reshaping ──▶ UI
//!                              │                            │
//!                        AnalysisCache ◀────────────────────┘
//! ```
//!
//! Failure policy: a provider-fetch failure propagates to the caller; an
//! LLM failure becomes a fixed apology plus static suggestion chips; a
//! malformed intent becomes a validation chat message. No retries anywhere.

pub mod assistant;
pub mod context;
pub mod expertise;
pub mod intent;
pub mod prompt;
pub mod suggest;

pub use assistant::{AssistantConfig, ChatAssistant, ChatReply};
pub use context::{ChatContext, TokenHolding};
pub use expertise::ExpertiseLevel;
pub use intent::{Intent, IntentError};

/// Base system prompt for the wallet chat assistant
pub const ASSISTANT_PROMPT: &str = r#"You are a crypto-wallet assistant helping users understand market conditions and manage their tokens.

## What you can do

1. Answer questions about market data, trends and token technicals
2. Help the user prepare token transfers and swaps from their connected wallet
3. Explain crypto concepts at a level matching the user's expertise

## Preparing transactions

When the user asks to send or swap tokens, respond with a JSON block so the
wallet UI can take over. Never invent amounts or addresses; only use what the
user stated.

```intent
{"action": "transfer", "recipient": "<address>", "token": "SOL", "amount": 1.5}
```

```intent
{"action": "swap", "from_token": "SOL", "to_token": "USDC", "amount": 2.0}
```

A transfer needs recipient, token and amount. A swap needs from_token,
to_token and amount. If any of these are missing, ask the user instead of
guessing.

## Style

Be concise and accurate. Never promise returns and never pressure the user
into a trade. Transactions are always confirmed in the wallet UI before
anything is signed."#;
