//! Tool Declarations
//!
//! Function-calling surface declared to the LLM. Tools are registered at
//! runtime; the registry renders their schemas into the system prompt and
//! into a JSON declaration payload. Parsing a tool invocation out of a
//! model reply and deciding whether to execute it are separate concerns:
//! the chat path only exposes parsed calls, while direct analysis queries
//! execute them through the registry.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request parsed from an LLM reply
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    #[serde(rename = "tool")]
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    /// Build a call directly (used by the direct analysis endpoints)
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            id: Some(uuid::Uuid::new_v4().to_string()),
        }
    }

    /// Attach an argument
    pub fn with_arg(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.arguments.insert(key.into(), value);
        self
    }

    /// Extract tool invocations from a model reply
    ///
    /// Recognizes fenced ```tool blocks first, then a single inline JSON
    /// object carrying a "tool" key. Unparseable blocks are skipped.
    pub fn extract(content: &str) -> Vec<ToolCall> {
        let mut calls = Vec::new();

        let mut rest = content;
        while let Some(start) = rest.find("```tool") {
            let after = &rest[start + "```tool".len()..];
            let Some(end) = after.find("```") else { break };
            let json_str = after[..end].trim();
            if let Ok(mut call) = serde_json::from_str::<ToolCall>(json_str) {
                if call.id.is_none() {
                    call.id = Some(uuid::Uuid::new_v4().to_string());
                }
                calls.push(call);
            }
            rest = &after[end + 3..];
        }

        if calls.is_empty() {
            if let Some(call) = Self::extract_inline(content) {
                calls.push(call);
            }
        }

        calls
    }

    fn extract_inline(content: &str) -> Option<ToolCall> {
        if !content.contains(r#""tool""#) {
            return None;
        }
        let start = content.find('{')?;
        let end = content.rfind('}')?;
        if end <= start {
            return None;
        }
        let mut call = serde_json::from_str::<ToolCall>(&content[start..=end]).ok()?;
        if call.id.is_none() {
            call.id = Some(uuid::Uuid::new_v4().to_string());
        }
        Some(call)
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments before execution
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            match call.arguments.get(&param.name) {
                None if param.required => {
                    return Err(AgentError::ToolValidation(format!(
                        "Missing required parameter: {}",
                        param.name
                    )));
                }
                Some(value) => {
                    if let Some(ref allowed) = param.enum_values {
                        if !allowed.contains(value) {
                            return Err(AgentError::ToolValidation(format!(
                                "Parameter '{}' must be one of the enumerated values",
                                param.name
                            )));
                        }
                    }
                }
                None => {}
            }
        }

        Ok(())
    }
}

/// Registry for available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Validate and execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self
            .get(&call.name)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        tool.validate(call)?;
        tool.execute(call).await
    }

    /// Get all tool schemas
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function-call declaration payload for providers that accept one
    pub fn declarations(&self) -> serde_json::Value {
        serde_json::json!({ "tools": self.schemas() })
    }

    /// System prompt section describing available tools
    pub fn prompt_section(&self) -> String {
        let mut prompt = String::from("## Available Tools\n\n");
        prompt.push_str("You can request a tool by responding with a JSON block:\n\n");
        prompt.push_str("```tool\n{\"tool\": \"tool_name\", \"arguments\": {\"arg\": \"value\"}}\n```\n\n");

        for schema in self.schemas() {
            prompt.push_str(&format!("### {}\n", schema.name));
            prompt.push_str(&format!("{}\n", schema.description));

            if !schema.parameters.is_empty() {
                prompt.push_str("**Parameters:**\n");
                for param in &schema.parameters {
                    let required = if param.required { " (required)" } else { "" };
                    prompt.push_str(&format!(
                        "- `{}` ({}){}: {}\n",
                        param.name, param.param_type, required, param.description
                    ));
                    if let Some(ref allowed) = param.enum_values {
                        let values: Vec<String> =
                            allowed.iter().map(ToString::to_string).collect();
                        prompt.push_str(&format!("  Allowed: {}\n", values.join(", ")));
                    }
                }
            }
            prompt.push('\n');
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo the input back".into(),
                parameters: vec![ParameterSchema {
                    name: "text".into(),
                    param_type: "string".into(),
                    description: "Text to echo".into(),
                    required: true,
                    enum_values: None,
                }],
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call
                .arguments
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or_default();
            Ok(ToolResult::success("echo", text))
        }
    }

    #[test]
    fn test_extract_fenced_tool_call() {
        let content = r#"Let me check.
```tool
{"tool": "analyze_market", "arguments": {"focus": "trends"}}
```"#;

        let calls = ToolCall::extract(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "analyze_market");
        assert!(calls[0].id.is_some());
    }

    #[test]
    fn test_extract_inline_tool_call() {
        let content = r#"{"tool": "token_technical", "arguments": {"symbol": "SOL"}}"#;
        let calls = ToolCall::extract(content);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "token_technical");
    }

    #[test]
    fn test_extract_none_from_plain_text() {
        assert!(ToolCall::extract("SOL is up 6% today.").is_empty());
    }

    #[tokio::test]
    async fn test_registry_validates_required_params() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let missing = ToolCall::new("echo");
        let err = registry.execute(&missing).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(_)));

        let ok = ToolCall::new("echo").with_arg("text", serde_json::json!("hi"));
        let result = registry.execute(&ok).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hi");
    }

    #[test]
    fn test_unknown_tool() {
        let registry = ToolRegistry::new();
        assert!(registry.get("unknown").is_none());
    }
}
