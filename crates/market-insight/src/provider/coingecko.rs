//! CoinGecko Market Provider
//!
//! Live records from the CoinGecko markets endpoint, fear/greed from the
//! alternative.me index, and DeFi aggregates for the chain metrics.
//!
//! The markets endpoint carries no intraday volume history, so the
//! previous-volume field falls back to the current volume (neutral tiers).
//! Moving averages are likewise left unset.

use async_trait::async_trait;
use serde::Deserialize;

use super::MarketDataProvider;
use crate::error::{MarketError, Result};
use crate::model::{ChainMetrics, MarketRecord, SentimentSnapshot};
use crate::scoring;

const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";
const DEFAULT_FNG_URL: &str = "https://api.alternative.me/fng/";

/// CoinGecko provider configuration
#[derive(Clone, Debug)]
pub struct CoinGeckoConfig {
    /// CoinGecko API base URL
    pub api_url: String,

    /// Fear/greed index URL
    pub fng_url: String,

    /// Optional demo/pro API key
    pub api_key: Option<String>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            fng_url: DEFAULT_FNG_URL.into(),
            api_key: None,
        }
    }
}

impl CoinGeckoConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("COINGECKO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            fng_url: std::env::var("FNG_API_URL").unwrap_or_else(|_| DEFAULT_FNG_URL.into()),
            api_key: std::env::var("COINGECKO_API_KEY").ok(),
        }
    }
}

/// CoinGecko-backed market data provider
pub struct CoinGeckoProvider {
    client: reqwest::Client,
    config: CoinGeckoConfig,
}

#[derive(Debug, Deserialize)]
struct MarketsRow {
    symbol: String,
    #[serde(default)]
    current_price: f64,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
    #[serde(rename = "price_change_percentage_24h_in_currency")]
    change_24h: Option<f64>,
    #[serde(rename = "price_change_percentage_7d_in_currency")]
    change_7d: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct FngResponse {
    data: Vec<FngEntry>,
}

#[derive(Debug, Deserialize)]
struct FngEntry {
    value: String,
    value_classification: String,
}

#[derive(Debug, Deserialize)]
struct DefiGlobalResponse {
    data: DefiGlobalData,
}

#[derive(Debug, Deserialize)]
struct DefiGlobalData {
    defi_market_cap: String,
    trading_volume_24h: String,
}

impl CoinGeckoProvider {
    pub fn new(config: CoinGeckoConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(CoinGeckoConfig::from_env())
    }

    /// Map a ticker symbol to a CoinGecko coin id
    fn coin_id(symbol: &str) -> Option<&'static str> {
        match symbol {
            "SOL" => Some("solana"),
            "BTC" => Some("bitcoin"),
            "ETH" => Some("ethereum"),
            "BONK" => Some("bonk"),
            "JUP" => Some("jupiter-exchange-solana"),
            "USDC" => Some("usd-coin"),
            "USDT" => Some("tether"),
            "RAY" => Some("raydium"),
            "ORCA" => Some("orca"),
            _ => None,
        }
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.get(url);
        if let Some(ref key) = self.config.api_key {
            builder = builder.header("x-cg-demo-api-key", key);
        }
        builder
    }

    fn row_to_record(row: MarketsRow) -> MarketRecord {
        let volume = row.total_volume.unwrap_or(0.0);

        let mut record = MarketRecord::new(row.symbol.to_uppercase(), row.current_price);
        record.change_24h = row.change_24h.unwrap_or(0.0);
        record.change_7d = row.change_7d.unwrap_or(0.0);
        record.volume_24h = volume;
        record.volume_24h_prev = volume; // no intraday history on this endpoint
        record.market_cap = row.market_cap;
        record
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn market_data(&self, symbols: &[String]) -> Result<Vec<MarketRecord>> {
        let mut ids = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let upper = symbol.to_uppercase();
            let id = Self::coin_id(&upper)
                .ok_or_else(|| MarketError::UnsupportedSymbol(upper.clone()))?;
            ids.push(id);
        }

        let url = format!(
            "{}/coins/markets?vs_currency=usd&ids={}&price_change_percentage=24h,7d",
            self.config.api_url,
            ids.join(",")
        );

        let rows: Vec<MarketsRow> = self.request(&url).send().await?.json().await?;

        if rows.is_empty() {
            return Err(MarketError::MalformedPayload(
                "markets endpoint returned an empty batch".into(),
            ));
        }

        Ok(rows.into_iter().map(Self::row_to_record).collect())
    }

    async fn market_sentiment(&self) -> Result<SentimentSnapshot> {
        let response: FngResponse = self
            .client
            .get(&self.config.fng_url)
            .send()
            .await?
            .json()
            .await?;

        let entry = response.data.into_iter().next().ok_or_else(|| {
            MarketError::MalformedPayload("fear/greed feed returned no entries".into())
        })?;

        let index: f64 = entry.value.parse().map_err(|_| {
            MarketError::MalformedPayload(format!("non-numeric fear/greed value: {}", entry.value))
        })?;

        Ok(SentimentSnapshot {
            overall: scoring::mood_from_index(index),
            fear_greed_index: index,
            fear_greed_label: entry.value_classification,
        })
    }

    async fn chain_metrics(&self) -> Result<ChainMetrics> {
        let url = format!("{}/global/decentralized_finance_defi", self.config.api_url);
        let response: DefiGlobalResponse = self.request(&url).send().await?.json().await?;

        let parse = |field: &str, raw: &str| -> Result<f64> {
            raw.parse().map_err(|_| {
                MarketError::MalformedPayload(format!("non-numeric {}: {}", field, raw))
            })
        };

        Ok(ChainMetrics {
            total_value_locked: parse("defi_market_cap", &response.data.defi_market_cap)?,
            volume_24h: parse("trading_volume_24h", &response.data.trading_volume_24h)?,
        })
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/ping", self.config.api_url);
        match self.request(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("CoinGecko health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "CoinGecko"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = CoinGeckoConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_coin_id_mapping() {
        assert_eq!(CoinGeckoProvider::coin_id("SOL"), Some("solana"));
        assert_eq!(CoinGeckoProvider::coin_id("NOTREAL"), None);
    }

    #[test]
    fn test_markets_row_decodes() {
        let json = r#"{
            "symbol": "sol",
            "current_price": 195.2,
            "market_cap": 92000000000.0,
            "total_volume": 3200000000.0,
            "price_change_percentage_24h_in_currency": 6.1,
            "price_change_percentage_7d_in_currency": 3.2
        }"#;

        let row: MarketsRow = serde_json::from_str(json).unwrap();
        let record = CoinGeckoProvider::row_to_record(row);

        assert_eq!(record.symbol, "SOL");
        assert_eq!(record.change_24h, 6.1);
        // No history on this endpoint: prev volume mirrors current
        assert_eq!(record.volume_24h, record.volume_24h_prev);
        assert!(record.ma_50.is_none());
    }

    #[test]
    fn test_fng_entry_decodes() {
        let json = r#"{"data": [{"value": "71", "value_classification": "Greed"}]}"#;
        let response: FngResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data[0].value, "71");
    }
}
