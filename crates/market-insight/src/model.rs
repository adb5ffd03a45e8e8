//! Domain Models
//!
//! Closed record definitions for the market analysis pipeline. Shapes are
//! validated at the provider boundary; everything past it is typed.
//! Market percentages are plain `f64`, rounded only at presentation
//! boundaries.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw per-symbol record supplied by a market data provider
///
/// Immutable once fetched; one per symbol per batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketRecord {
    /// Ticker symbol (e.g., "SOL", "BTC"); unique within a batch
    pub symbol: String,

    /// Current price in USD
    pub price: f64,

    /// 24-hour price change percentage
    pub change_24h: f64,

    /// 7-day price change percentage
    pub change_7d: f64,

    /// 24-hour trading volume in USD
    pub volume_24h: f64,

    /// Previous 24-hour trading volume in USD
    pub volume_24h_prev: f64,

    /// Market capitalization in USD (absent for unlisted tokens)
    pub market_cap: Option<f64>,

    /// Social-mention growth percentage over 24h
    pub social_mentions_change: Option<f64>,

    /// Development-activity events over the last period
    pub dev_activity: Option<u32>,

    /// 50-period moving average (absent without price history)
    pub ma_50: Option<f64>,

    /// 200-period moving average (absent without price history)
    pub ma_200: Option<f64>,
}

impl MarketRecord {
    /// Create a record with neutral defaults; callers fill in the rest
    pub fn new(symbol: impl Into<String>, price: f64) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            price,
            change_24h: 0.0,
            change_7d: 0.0,
            volume_24h: 0.0,
            volume_24h_prev: 0.0,
            market_cap: None,
            social_mentions_change: None,
            dev_activity: None,
            ma_50: None,
            ma_200: None,
        }
    }
}

/// Coarse market mood
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMood {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for MarketMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketMood::Bullish => write!(f, "bullish"),
            MarketMood::Bearish => write!(f, "bearish"),
            MarketMood::Neutral => write!(f, "neutral"),
        }
    }
}

/// Market-wide sentiment supplied by an external source
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SentimentSnapshot {
    /// Overall trend label
    pub overall: MarketMood,

    /// Fear/greed index, 0-100 (higher = more bullish crowd sentiment)
    pub fear_greed_index: f64,

    /// Textual label for the index (e.g., "Greed", "Extreme Fear")
    pub fear_greed_label: String,
}

/// Per-symbol sentiment tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    StronglyBullish,
    Bullish,
    Neutral,
    Bearish,
    StronglyBearish,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::StronglyBullish => write!(f, "strongly bullish"),
            SentimentLabel::Bullish => write!(f, "bullish"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Bearish => write!(f, "bearish"),
            SentimentLabel::StronglyBearish => write!(f, "strongly bearish"),
        }
    }
}

/// Direction of the 24h-vs-7d trend crossover
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Bullish,
    Bearish,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Bullish => write!(f, "bullish"),
            TrendDirection::Bearish => write!(f, "bearish"),
        }
    }
}

/// Moving-average trend classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaTrend {
    StrongUptrend,
    Uptrend,
    Sideways,
    Downtrend,
    StrongDowntrend,
}

impl std::fmt::Display for MaTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MaTrend::StrongUptrend => write!(f, "strong uptrend"),
            MaTrend::Uptrend => write!(f, "uptrend"),
            MaTrend::Sideways => write!(f, "sideways"),
            MaTrend::Downtrend => write!(f, "downtrend"),
            MaTrend::StrongDowntrend => write!(f, "strong downtrend"),
        }
    }
}

/// Derived indicator bundle for one symbol
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndicatorBundle {
    /// Trend-crossover label (24h change vs 7d change)
    pub macd_trend: TrendDirection,

    /// Synthetic oscillator value, always within [0, 100]
    pub rsi: f64,

    /// Moving-average trend label
    pub ma_trend: MaTrend,
}

/// Per-symbol derived signal; recomputed on every refresh
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TechnicalSignal {
    pub sentiment: SentimentLabel,
    pub indicators: IndicatorBundle,
}

/// Narrative trend lists over three horizons
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrendReport {
    pub short_term: Vec<String>,
    pub medium_term: Vec<String>,
    pub emerging: Vec<String>,
}

/// Aggregate metrics block
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MarketMetrics {
    /// Locked-value summary string
    pub value_locked: String,

    /// Volume summary string
    pub volume: String,

    /// Per-symbol dominance percentage (market-cap share of the batch)
    pub dominance: HashMap<String, f64>,
}

/// On-chain aggregate metrics supplied by a provider
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainMetrics {
    /// Total value locked in USD
    pub total_value_locked: f64,

    /// 24-hour on-chain volume in USD
    pub volume_24h: f64,
}

/// The cached analysis artifact
///
/// Replaced wholesale on every refresh; readers never see a mix of fields
/// from two computations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarketAnalysis {
    /// Narrative overview (top gainer + coarse sentiment)
    pub overview: String,

    /// Market-wide sentiment block
    pub sentiment: SentimentSnapshot,

    /// Short/medium/emerging trend narratives
    pub trends: TrendReport,

    /// Locked-value/volume summaries and dominance mapping
    pub metrics: MarketMetrics,

    /// Per-symbol technical signals
    pub signals: HashMap<String, TechnicalSignal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_defaults() {
        let record = MarketRecord::new("sol", 195.0);
        assert_eq!(record.symbol, "SOL");
        assert!(record.market_cap.is_none());
        assert!(record.ma_50.is_none());
    }

    #[test]
    fn test_label_display() {
        assert_eq!(SentimentLabel::StronglyBullish.to_string(), "strongly bullish");
        assert_eq!(MaTrend::StrongDowntrend.to_string(), "strong downtrend");
        assert_eq!(MarketMood::Neutral.to_string(), "neutral");
    }

    #[test]
    fn test_signal_serde_roundtrip() {
        let signal = TechnicalSignal {
            sentiment: SentimentLabel::Bullish,
            indicators: IndicatorBundle {
                macd_trend: TrendDirection::Bullish,
                rsi: 76.0,
                ma_trend: MaTrend::Sideways,
            },
        };

        let json = serde_json::to_string(&signal).unwrap();
        assert!(json.contains("\"bullish\""));
        assert!(json.contains("\"sideways\""));
    }
}
