//! HTTP Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use agent_core::{provider::ModelInfo, SessionId, SessionStore, ToolCall};
use chat_assistant::{ChatContext, Intent};
use market_insight::MarketAnalysis;

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_connected: bool,
    pub market_provider_healthy: bool,
    pub analysis_computed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "prompt")]
    pub message: String,
    #[serde(default)]
    pub context: ChatContext,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub conversation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<MarketAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm_connected = state.provider.health_check().await.unwrap_or(false);
    let market_provider_healthy = state.cache.provider_healthy().await;
    let analysis_computed_at = state.cache.last_computed().await.map(|ts| ts.to_rfc3339());

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_connected,
        market_provider_healthy,
        analysis_computed_at,
    })
}

/// List available LLM models
pub async fn list_models(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelInfo>>, (StatusCode, Json<ErrorResponse>)> {
    let models = state.provider.list_models().await.map_err(|e| {
        tracing::error!("Model listing error: {}", e);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "PROVIDER_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(models))
}

/// Main chat endpoint
///
/// Market data failures are rendered as a conversational reply rather than
/// an HTTP error: the UI always has a message to show.
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let session_id = payload
        .conversation_id
        .map(SessionId::from_string)
        .unwrap_or_default();

    let mut session = state.sessions.load_or_create(&session_id).map_err(|e| {
        tracing::error!("Session error: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "SESSION_ERROR".into(),
            }),
        )
    })?;

    let response = match state
        .assistant
        .respond(&payload.message, &payload.context, &mut session.conversation)
        .await
    {
        Ok(reply) => ChatResponse {
            message: reply.message,
            conversation_id: session_id.to_string(),
            model: reply.model,
            intent: reply.intent,
            suggestions: reply.suggestions,
            tool_calls: reply.tool_calls,
            analysis: reply.analysis.map(|a| (*a).clone()),
        },
        Err(error) => {
            tracing::warn!(%error, "market data unavailable during chat turn");
            ChatResponse {
                message: error.user_message(),
                conversation_id: session_id.to_string(),
                model: None,
                intent: None,
                suggestions: Vec::new(),
                tool_calls: Vec::new(),
                analysis: None,
            }
        }
    };

    session.touch();
    if let Err(e) = state.sessions.save(&session) {
        tracing::error!("Failed to persist session: {}", e);
    }

    Ok(Json(response))
}

/// Full market analysis via the registered tool
pub async fn market_analysis(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    execute_tool(&state, ToolCall::new("analyze_market")).await
}

/// Per-token technical signal via the registered tool
pub async fn token_technical(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let call = ToolCall::new("token_technical")
        .with_arg("symbol", serde_json::json!(symbol.to_uppercase()));
    execute_tool(&state, call).await
}

async fn execute_tool(
    state: &AppState,
    call: ToolCall,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<ErrorResponse>)> {
    let result = state.tools.execute(&call).await.map_err(|e| {
        tracing::warn!("Tool execution error: {}", e);
        let status = match e {
            agent_core::AgentError::ToolValidation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(ErrorResponse {
                error: e.user_message(),
                code: "ANALYSIS_ERROR".into(),
            }),
        )
    })?;

    Ok(Json(serde_json::json!({
        "summary": result.output,
        "data": result.data,
    })))
}
