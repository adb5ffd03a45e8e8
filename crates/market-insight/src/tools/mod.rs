//! Analysis Tools
//!
//! The two function-call declarations exposed to the LLM. The chat path
//! only surfaces parsed invocations; direct analysis queries execute them
//! through the `ToolRegistry`.

mod market_analysis;
mod token_technical;

pub use market_analysis::MarketAnalysisTool;
pub use token_technical::TokenTechnicalTool;
