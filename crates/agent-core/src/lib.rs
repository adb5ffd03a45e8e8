//! # agent-core
//!
//! Provider-agnostic LLM abstraction and tool declarations for the wallet
//! chat assistant.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Chat Orchestration                       │
//! │  ┌──────────────┐  ┌──────────────┐  ┌───────────────────┐  │
//! │  │ Conversation │  │    Tool      │  │   LlmProvider     │  │
//! │  │  / Session   │──│ Declarations │──│   (Strategy)      │  │
//! │  └──────────────┘  └──────────────┘  └───────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between Ollama, OpenAI,
//! Anthropic, or any other backend without changing orchestration logic.
//! Tools are declared to the model via `ToolRegistry`; whether a parsed
//! tool invocation is executed is the caller's decision.

pub mod provider;
pub mod tool;
pub mod message;
pub mod error;
pub mod session;

pub use error::{AgentError, Result};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use session::{MemorySessionStore, Session, SessionId, SessionStore};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
