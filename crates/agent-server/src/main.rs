//! Wallet Chat Assistant HTTP Server
//!
//! Axum-based server exposing the chat endpoint plus direct market
//! analysis queries. One `AnalysisCache` is constructed here and shared
//! by the assistant and both analysis tools.

mod handlers;
mod state;

use std::sync::Arc;

use agent_core::LlmProvider;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{MemorySessionStore, ToolRegistry};
use agent_runtime::OllamaProvider;
use chat_assistant::{AssistantConfig, ChatAssistant};
use market_insight::{
    AnalysisCache, CacheConfig, CoinGeckoProvider, MarketAnalysisTool, MarketDataProvider,
    MockMarketProvider, TokenTechnicalTool,
};

use crate::handlers::{chat_handler, health_check, list_models, market_analysis, token_technical};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Initialize LLM provider
    let provider = Arc::new(OllamaProvider::from_env());

    // Verify Ollama connection
    match provider.health_check().await {
        Ok(true) => {
            tracing::info!("✓ Connected to Ollama");
            if let Ok(models) = provider.list_models().await {
                for model in models {
                    tracing::info!("  Model: {}", model.id);
                }
            }
        }
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Ollama not available - chat will answer with apologies");
            tracing::warn!("  Make sure Ollama is running: ollama serve");
        }
    }

    // Select market data provider
    let market_provider: Arc<dyn MarketDataProvider> =
        match std::env::var("MARKET_PROVIDER").as_deref() {
            Ok("mock") => {
                tracing::info!("Using mock market data provider");
                Arc::new(MockMarketProvider::new())
            }
            _ => Arc::new(CoinGeckoProvider::from_env()),
        };
    tracing::info!("Market data provider: {}", market_provider.name());

    // One analysis cache per process, shared by the assistant and tools
    let cache = Arc::new(AnalysisCache::new(
        Arc::clone(&market_provider),
        CacheConfig::from_env(),
    ));
    tracing::info!("Tracking symbols: {}", cache.symbols().join(", "));

    // Register analysis tools
    let mut tools = ToolRegistry::new();
    tools.register(MarketAnalysisTool::new(Arc::clone(&cache)));
    tools.register(TokenTechnicalTool::new(Arc::clone(&cache)));

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }
    let tools = Arc::new(tools);

    // Build the assistant and application state
    let assistant = Arc::new(ChatAssistant::new(
        provider.clone(),
        Arc::clone(&cache),
        Arc::clone(&tools),
        AssistantConfig::default(),
    ));

    let state = AppState {
        provider,
        assistant,
        cache,
        tools,
        sessions: Arc::new(MemorySessionStore::new()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        // Health & info
        .route("/health", get(health_check))
        .route("/api/models", get(list_models))
        // Chat API
        .route("/api/chat", post(chat_handler))
        // Direct analysis API
        .route("/api/analysis", get(market_analysis))
        .route("/api/analysis/{symbol}", get(token_technical))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 wallet chat assistant running on http://{}", addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                - Health check");
    tracing::info!("  GET  /api/models            - List available models");
    tracing::info!("  POST /api/chat              - Send a chat message");
    tracing::info!("  GET  /api/analysis          - Full market analysis");
    tracing::info!("  GET  /api/analysis/{{symbol}} - Per-token technicals");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
