//! Application State

use std::sync::Arc;

use agent_core::{LlmProvider, MemorySessionStore, ToolRegistry};
use chat_assistant::ChatAssistant;
use market_insight::AnalysisCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, etc.)
    pub provider: Arc<dyn LlmProvider>,

    /// Chat orchestrator
    pub assistant: Arc<ChatAssistant>,

    /// Process-wide market analysis cache
    pub cache: Arc<AnalysisCache>,

    /// Tool registry backing the direct analysis endpoints
    pub tools: Arc<ToolRegistry>,

    /// In-memory session store; sessions live for the process
    pub sessions: Arc<MemorySessionStore>,
}
