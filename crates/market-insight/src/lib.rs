//! # market-insight
//!
//! Market data providers, the technical scoring engine and the shared
//! analysis cache behind the wallet chat assistant.
//!
//! ## Pipeline
//!
//! ```text
//! ┌────────────────────┐   fan-out fetch    ┌───────────────────┐
//! │ MarketDataProvider │ ─────────────────▶ │  Scoring Engine   │
//! │ (CoinGecko / mock) │  records/sentiment │  (pure functions) │
//! └────────────────────┘   chain metrics    └─────────┬─────────┘
//!                                                     │
//!                                           ┌─────────▼─────────┐
//!                                           │   AnalysisCache   │
//!                                           │ (one snapshot per │
//!                                           │  process, 5 min)  │
//!                                           └───────────────────┘
//! ```
//!
//! The cached `MarketAnalysis` is consulted when building chat prompts and
//! when answering direct analysis queries via the two registered tools.

pub mod cache;
pub mod error;
pub mod model;
pub mod provider;
pub mod scoring;
pub mod tools;

pub use cache::{AnalysisCache, CacheConfig};
pub use error::{MarketError, Result};
pub use model::{
    ChainMetrics, IndicatorBundle, MarketAnalysis, MarketMetrics, MarketMood, MarketRecord,
    MaTrend, SentimentLabel, SentimentSnapshot, TechnicalSignal, TrendDirection, TrendReport,
};
pub use provider::{CoinGeckoProvider, MarketDataProvider, MockMarketProvider};
pub use tools::{MarketAnalysisTool, TokenTechnicalTool};
