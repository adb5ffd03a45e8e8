//! Market Data Providers
//!
//! Strategy trait over external market-data sources. Provider failures are
//! explicit results; the cache propagates them uncaught to the caller.

mod coingecko;
mod mock;

pub use coingecko::{CoinGeckoConfig, CoinGeckoProvider};
pub use mock::MockMarketProvider;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{ChainMetrics, MarketRecord, SentimentSnapshot};

/// Market data source (Strategy pattern)
///
/// Implement this per source: CoinGecko, an exchange API, a fixture set.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch raw records for the given symbols, one per symbol
    async fn market_data(&self, symbols: &[String]) -> Result<Vec<MarketRecord>>;

    /// Fetch the market-wide sentiment snapshot
    async fn market_sentiment(&self) -> Result<SentimentSnapshot>;

    /// Fetch aggregate on-chain metrics
    async fn chain_metrics(&self) -> Result<ChainMetrics>;

    /// Check if the source is reachable
    async fn health_check(&self) -> bool;

    /// Provider name
    fn name(&self) -> &str;
}
