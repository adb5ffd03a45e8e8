//! Token Technical Tool
//!
//! Per-symbol technical signal out of the cached analysis. The symbol
//! parameter is enumerated over the tracked set, so validation rejects
//! anything the cache will not know about.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{
    tool::{ParameterSchema, ToolSchema},
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult,
};

use crate::cache::AnalysisCache;

/// Tool answering "technical analysis for one token" queries
pub struct TokenTechnicalTool {
    cache: Arc<AnalysisCache>,
}

impl TokenTechnicalTool {
    pub fn new(cache: Arc<AnalysisCache>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl Tool for TokenTechnicalTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "token_technical".into(),
            description: "Get the technical analysis signal for a single tracked token.".into(),
            parameters: vec![ParameterSchema {
                name: "symbol".into(),
                param_type: "string".into(),
                description: "Token symbol to analyze".into(),
                required: true,
                enum_values: Some(self.cache.symbols().iter().map(|s| json!(s)).collect()),
            }],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = call
            .arguments
            .get("symbol")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::ToolValidation("Missing symbol".into()))?;

        let signal = self
            .cache
            .signal_for(symbol)
            .await
            .map_err(|e| AgentError::ToolExecution(e.user_message()))?;

        let output = format!(
            "{}: {} - RSI {:.0}, MACD {}, moving averages {}",
            symbol.to_uppercase(),
            signal.sentiment,
            signal.indicators.rsi,
            signal.indicators.macd_trend,
            signal.indicators.ma_trend
        );

        Ok(ToolResult::success("token_technical", output).with_data(serde_json::to_value(&signal)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::provider::MockMarketProvider;

    fn tool() -> TokenTechnicalTool {
        let cache = Arc::new(AnalysisCache::new(
            Arc::new(MockMarketProvider::new()),
            CacheConfig::default(),
        ));
        TokenTechnicalTool::new(cache)
    }

    #[tokio::test]
    async fn test_signal_output() {
        let call = ToolCall::new("token_technical").with_arg("symbol", json!("SOL"));
        let result = tool().execute(&call).await.unwrap();

        assert!(result.success);
        assert!(result.output.starts_with("SOL: strongly bullish"));
    }

    #[test]
    fn test_schema_enumerates_tracked_symbols() {
        let schema = tool().schema();
        let allowed = schema.parameters[0].enum_values.as_ref().unwrap();
        assert!(allowed.contains(&json!("SOL")));
        assert!(allowed.contains(&json!("USDC")));
    }

    #[test]
    fn test_validate_rejects_untracked_symbol() {
        let t = tool();
        let call = ToolCall::new("token_technical").with_arg("symbol", json!("DOGE"));
        assert!(t.validate(&call).is_err());
    }
}
