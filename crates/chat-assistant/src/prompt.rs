//! System Prompt Assembly
//!
//! Rebuilt on every turn from the base instructions plus live session
//! context: market sentiment, wallet state, detected expertise and the
//! tool declarations.

use market_insight::SentimentSnapshot;

use crate::context::ChatContext;
use crate::expertise::ExpertiseLevel;

/// Assemble the full system prompt for one turn
pub fn build_system_prompt(
    base: &str,
    ctx: &ChatContext,
    sentiment: &SentimentSnapshot,
    level: ExpertiseLevel,
    tool_section: &str,
) -> String {
    let mut prompt = String::with_capacity(base.len() + tool_section.len() + 512);
    prompt.push_str(base);

    prompt.push_str("\n\n## Session Context\n\n");
    prompt.push_str(&format!(
        "- Market sentiment: {} (fear/greed index {:.0}, {})\n",
        sentiment.overall, sentiment.fear_greed_index, sentiment.fear_greed_label
    ));
    prompt.push_str(&format!("- Wallet: {}\n", ctx.wallet_summary()));
    prompt.push_str(&format!(
        "- User expertise: {} (match your explanations to this level)\n",
        level
    ));

    if !tool_section.is_empty() {
        prompt.push('\n');
        prompt.push_str(tool_section);
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_insight::MarketMood;
    use rust_decimal_macros::dec;

    fn sentiment() -> SentimentSnapshot {
        SentimentSnapshot {
            overall: MarketMood::Bullish,
            fear_greed_index: 71.0,
            fear_greed_label: "Greed".into(),
        }
    }

    #[test]
    fn test_prompt_contains_context_sections() {
        let ctx = ChatContext {
            wallet_connected: true,
            balance_sol: Some(dec!(3.2)),
            ..ChatContext::default()
        };

        let prompt = build_system_prompt(
            "Base instructions.",
            &ctx,
            &sentiment(),
            ExpertiseLevel::Intermediate,
            "## Available Tools\n\n- analyze_market",
        );

        assert!(prompt.starts_with("Base instructions."));
        assert!(prompt.contains("Market sentiment: bullish (fear/greed index 71, Greed)"));
        assert!(prompt.contains("balance 3.2 SOL"));
        assert!(prompt.contains("User expertise: intermediate"));
        assert!(prompt.contains("## Available Tools"));
    }

    #[test]
    fn test_prompt_without_tools() {
        let prompt = build_system_prompt(
            "Base.",
            &ChatContext::default(),
            &sentiment(),
            ExpertiseLevel::Beginner,
            "",
        );

        assert!(prompt.contains("Wallet: not connected"));
        assert!(!prompt.contains("## Available Tools"));
    }
}
