//! Mock Market Provider
//!
//! For development and demos. Returns realistic static records so the
//! scoring engine produces plausible signals without network access.

use async_trait::async_trait;

use super::MarketDataProvider;
use crate::error::{MarketError, Result};
use crate::model::{ChainMetrics, MarketMood, MarketRecord, SentimentSnapshot};

/// Mock provider with a static symbol table
#[derive(Default)]
pub struct MockMarketProvider;

impl MockMarketProvider {
    pub fn new() -> Self {
        Self
    }

    /// (price, 24h %, 7d %, volume, prev volume, market cap, social %, dev events)
    #[allow(clippy::type_complexity)]
    fn row(
        symbol: &str,
    ) -> Option<(f64, f64, f64, f64, f64, Option<f64>, Option<f64>, Option<u32>)> {
        match symbol {
            "SOL" => Some((195.0, 6.1, 3.2, 3.2e9, 2.5e9, Some(9.2e10), Some(62.0), Some(14))),
            "BTC" => Some((97_500.0, 1.2, 2.4, 2.5e10, 2.6e10, Some(1.9e12), Some(10.0), Some(8))),
            "ETH" => Some((3_450.0, -1.4, 0.8, 1.5e10, 1.4e10, Some(4.2e11), None, Some(22))),
            "BONK" => Some((0.000_032, 12.4, 25.0, 8.0e8, 4.5e8, Some(2.1e9), Some(140.0), Some(3))),
            "JUP" => Some((1.15, -6.2, -11.0, 4.0e8, 3.1e8, Some(1.5e9), Some(-20.0), Some(12))),
            "USDC" => Some((1.0, 0.01, 0.0, 6.0e9, 6.1e9, Some(4.4e10), None, None)),
            _ => None,
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketProvider {
    async fn market_data(&self, symbols: &[String]) -> Result<Vec<MarketRecord>> {
        let mut records = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let upper = symbol.to_uppercase();
            let (price, change_24h, change_7d, volume, volume_prev, cap, social, dev) =
                Self::row(&upper).ok_or_else(|| MarketError::UnsupportedSymbol(upper.clone()))?;

            let mut record = MarketRecord::new(upper, price);
            record.change_24h = change_24h;
            record.change_7d = change_7d;
            record.volume_24h = volume;
            record.volume_24h_prev = volume_prev;
            record.market_cap = cap;
            record.social_mentions_change = social;
            record.dev_activity = dev;
            records.push(record);
        }

        Ok(records)
    }

    async fn market_sentiment(&self) -> Result<SentimentSnapshot> {
        Ok(SentimentSnapshot {
            overall: MarketMood::Bullish,
            fear_greed_index: 71.0,
            fear_greed_label: "Greed".into(),
        })
    }

    async fn chain_metrics(&self) -> Result<ChainMetrics> {
        Ok(ChainMetrics {
            total_value_locked: 8.9e9,
            volume_24h: 2.4e9,
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "MockMarket"
    }
}
