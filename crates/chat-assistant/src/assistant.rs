//! Chat Orchestration
//!
//! One completion call per user turn. The turn pipeline:
//!
//! 1. push the user message and detect expertise from recent utterances
//! 2. if the prompt is market-related, pull the cached analysis (a provider
//!    failure propagates here, before any LLM call)
//! 3. rebuild the system prompt with live context and tool declarations
//! 4. call the provider; an LLM failure becomes a fixed apology reply
//! 5. reshape the reply: parse tool calls (exposed, not executed), extract
//!    and validate the intent, attach suggestion chips

use std::sync::Arc;

use agent_core::{
    Conversation, GenerationOptions, LlmProvider, Message, Result as CoreResult, ToolCall,
    ToolRegistry,
};
use market_insight::{AnalysisCache, MarketAnalysis, MarketError};

use crate::context::ChatContext;
use crate::expertise::{self, ExpertiseLevel};
use crate::intent::{self, Intent};
use crate::prompt::build_system_prompt;
use crate::suggest;
use crate::ASSISTANT_PROMPT;

/// Reply shown when the LLM is unreachable; market data failures get a
/// different message and propagate instead
const APOLOGY: &str =
    "I'm having trouble thinking right now. Please give me a moment and try again.";

/// Assistant tuning knobs
#[derive(Clone, Debug)]
pub struct AssistantConfig {
    /// Base system prompt, prepended before the session context
    pub base_prompt: String,

    /// Generation options passed to every completion
    pub generation: GenerationOptions,

    /// How many trailing user utterances feed expertise detection
    pub recent_utterances: usize,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_prompt: ASSISTANT_PROMPT.to_string(),
            generation: GenerationOptions::default(),
            recent_utterances: 5,
        }
    }
}

/// Assembled reply for one turn
#[derive(Clone, Debug)]
pub struct ChatReply {
    /// Assistant text (or apology / validation message)
    pub message: String,

    /// Validated transaction intent, if the reply carried one
    pub intent: Option<Intent>,

    /// Follow-up suggestion chips, at most three
    pub suggestions: Vec<String>,

    /// Tool invocations parsed from the reply; exposed to the caller,
    /// never executed on this path
    pub tool_calls: Vec<ToolCall>,

    /// Market analysis snapshot, attached only for market-related prompts
    pub analysis: Option<Arc<MarketAnalysis>>,

    /// Model that produced the reply, when the LLM answered
    pub model: Option<String>,
}

/// The wallet chat assistant
pub struct ChatAssistant {
    provider: Arc<dyn LlmProvider>,
    cache: Arc<AnalysisCache>,
    tools: Arc<ToolRegistry>,
    config: AssistantConfig,
}

impl ChatAssistant {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        cache: Arc<AnalysisCache>,
        tools: Arc<ToolRegistry>,
        config: AssistantConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            tools,
            config,
        }
    }

    /// Handle one user turn
    ///
    /// Market data failures propagate as `MarketError` so the caller can
    /// render them; every other failure mode resolves to an `Ok` reply.
    pub async fn respond(
        &self,
        prompt: &str,
        ctx: &ChatContext,
        conversation: &mut Conversation,
    ) -> Result<ChatReply, MarketError> {
        conversation.push(Message::user(prompt));

        let level =
            expertise::detect(&conversation.recent_user_utterances(self.config.recent_utterances));
        let market_query = suggest::is_market_query(prompt);

        let analysis = if market_query {
            Some(self.cache.analysis().await?)
        } else {
            None
        };

        // Sentiment comes from the attached analysis when present; a plain
        // chat turn still gets it from the cache (fresh or previously
        // cached), but a cold-cache fetch failure there is not fatal.
        let sentiment = match &analysis {
            Some(a) => Some(a.sentiment.clone()),
            None => self.cache.analysis().await.ok().map(|a| a.sentiment.clone()),
        };

        let system_prompt = build_system_prompt(
            &self.config.base_prompt,
            ctx,
            &sentiment.unwrap_or_else(neutral_sentiment),
            level,
            &self.tools.prompt_section(),
        );
        conversation.set_system_prompt(system_prompt);

        match self.complete(conversation).await {
            Ok((content, model)) => {
                conversation.push(Message::assistant(content.clone()).with_model(model.clone()));
                Ok(self.reshape(content, model, market_query, ctx, level, analysis))
            }
            Err(error) => {
                tracing::warn!(%error, "llm completion failed, answering with apology");
                conversation.push(Message::assistant(APOLOGY));
                Ok(ChatReply {
                    message: APOLOGY.to_string(),
                    intent: None,
                    suggestions: suggest::fallback_suggestions(),
                    tool_calls: Vec::new(),
                    analysis: None,
                    model: None,
                })
            }
        }
    }

    async fn complete(&self, conversation: &Conversation) -> CoreResult<(String, String)> {
        let completion = self
            .provider
            .complete(conversation.messages(), &self.config.generation)
            .await?;
        Ok((completion.content, completion.model))
    }

    fn reshape(
        &self,
        content: String,
        model: String,
        market_query: bool,
        ctx: &ChatContext,
        level: ExpertiseLevel,
        analysis: Option<Arc<MarketAnalysis>>,
    ) -> ChatReply {
        let tool_calls = ToolCall::extract(&content);

        let (message, intent) = match intent::extract(&content) {
            Some(Ok(parsed)) => (content, Some(parsed)),
            Some(Err(error)) => {
                tracing::debug!(%error, "rejected malformed intent");
                (error.user_message(), None)
            }
            None => (content, None),
        };

        ChatReply {
            message,
            intent,
            suggestions: suggest::build_suggestions(market_query, ctx.wallet_connected, level),
            tool_calls,
            analysis: if market_query { analysis } else { None },
            model: Some(model),
        }
    }
}

fn neutral_sentiment() -> market_insight::SentimentSnapshot {
    market_insight::SentimentSnapshot {
        overall: market_insight::MarketMood::Neutral,
        fear_greed_index: 50.0,
        fear_greed_label: "Neutral".into(),
    }
}
