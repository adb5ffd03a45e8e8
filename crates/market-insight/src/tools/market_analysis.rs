//! Market Analysis Tool
//!
//! Renders the cached `MarketAnalysis` for the LLM or a direct query.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use agent_core::{
    tool::{ParameterSchema, ToolSchema},
    AgentError, Result as CoreResult, Tool, ToolCall, ToolResult,
};

use crate::cache::AnalysisCache;
use crate::model::MarketAnalysis;

/// Tool answering "analyze the market" queries from the cached snapshot
pub struct MarketAnalysisTool {
    cache: Arc<AnalysisCache>,
}

impl MarketAnalysisTool {
    pub fn new(cache: Arc<AnalysisCache>) -> Self {
        Self { cache }
    }

    fn render(analysis: &MarketAnalysis, focus: &str) -> String {
        let mut out = String::new();

        if matches!(focus, "full" | "overview") {
            out.push_str(&analysis.overview);
            out.push('\n');
        }

        if matches!(focus, "full" | "sentiment") {
            out.push_str(&format!(
                "Sentiment: {} (fear/greed {:.0}, {})\n",
                analysis.sentiment.overall,
                analysis.sentiment.fear_greed_index,
                analysis.sentiment.fear_greed_label
            ));
        }

        if matches!(focus, "full" | "trends") {
            let sections = [
                ("Short-term", &analysis.trends.short_term),
                ("Medium-term", &analysis.trends.medium_term),
                ("Emerging", &analysis.trends.emerging),
            ];
            for (title, list) in sections {
                if !list.is_empty() {
                    out.push_str(&format!("{}:\n", title));
                    for item in list {
                        out.push_str(&format!("  - {}\n", item));
                    }
                }
            }
        }

        if matches!(focus, "full" | "metrics") {
            out.push_str(&format!("{}\n", analysis.metrics.value_locked));
            out.push_str(&format!("{}\n", analysis.metrics.volume));

            let mut shares: Vec<_> = analysis.metrics.dominance.iter().collect();
            shares.sort_by(|a, b| b.1.total_cmp(a.1));
            for (symbol, share) in shares {
                out.push_str(&format!("  {} dominance: {:.2}%\n", symbol, share));
            }
        }

        if focus == "full" {
            let mut signals: Vec<_> = analysis.signals.iter().collect();
            signals.sort_by(|a, b| a.0.cmp(b.0));
            for (symbol, signal) in signals {
                out.push_str(&format!(
                    "  {}: {} (RSI {:.0}, MACD {}, MA {})\n",
                    symbol,
                    signal.sentiment,
                    signal.indicators.rsi,
                    signal.indicators.macd_trend,
                    signal.indicators.ma_trend
                ));
            }
        }

        out.trim_end().to_string()
    }
}

#[async_trait]
impl Tool for MarketAnalysisTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "analyze_market".into(),
            description:
                "Analyze the overall crypto market: sentiment, trends, dominance and per-token signals."
                    .into(),
            parameters: vec![ParameterSchema {
                name: "focus".into(),
                param_type: "string".into(),
                description: "Optional section to focus on".into(),
                required: false,
                enum_values: Some(vec![
                    json!("overview"),
                    json!("sentiment"),
                    json!("trends"),
                    json!("metrics"),
                ]),
            }],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let focus = call
            .arguments
            .get("focus")
            .and_then(|v| v.as_str())
            .unwrap_or("full");

        let analysis = self
            .cache
            .analysis()
            .await
            .map_err(|e| AgentError::ToolExecution(e.user_message()))?;

        let output = Self::render(&analysis, focus);
        let data = serde_json::to_value(&*analysis)?;

        Ok(ToolResult::success("analyze_market", output).with_data(data))
    }
}
