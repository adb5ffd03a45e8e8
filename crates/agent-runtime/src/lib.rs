//! # agent-runtime
//!
//! Concrete LLM providers for the wallet chat assistant.
//!
//! ## Providers
//!
//! - **Ollama** (default): local inference via Ollama
//! - **OpenAI** (coming soon)
//! - **Anthropic** (coming soon)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::from_env();
//! let completion = provider.complete(&messages, &options).await?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaProvider;

// Re-export core types for convenience
pub use agent_core::{AgentError, Completion, GenerationOptions, LlmProvider, Message, Result, Role};
