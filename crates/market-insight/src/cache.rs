//! Market Analysis Cache
//!
//! A single time-boxed slot holding the latest `MarketAnalysis`. One cache
//! per running process, constructed at startup and passed by `Arc` to every
//! consumer.
//!
//! The slot sits behind an async mutex that stays held across a
//! recomputation, so concurrent callers in a stale window trigger exactly
//! one provider round-trip and stragglers observe the fresh snapshot.
//! Snapshot and timestamp are overwritten together; a failed recomputation
//! leaves both untouched, so the next call retries.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::error::{MarketError, Result};
use crate::model::{MarketAnalysis, TechnicalSignal};
use crate::provider::MarketDataProvider;
use crate::scoring;

/// Default freshness window: analyses older than this are recomputed
pub const FRESHNESS_WINDOW_SECS: i64 = 5 * 60;

/// Symbols tracked when the environment does not override them
const DEFAULT_SYMBOLS: &[&str] = &["SOL", "BTC", "ETH", "BONK", "JUP", "USDC"];

/// Cache configuration
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Symbols included in every analysis batch
    pub symbols: Vec<String>,

    /// Freshness window
    pub freshness: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(ToString::to_string).collect(),
            freshness: Duration::seconds(FRESHNESS_WINDOW_SECS),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("TRACKED_SYMBOLS") {
            let symbols: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !symbols.is_empty() {
                config.symbols = symbols;
            }
        }
        config
    }
}

struct Slot {
    analysis: Option<Arc<MarketAnalysis>>,
    computed_at: Option<DateTime<Utc>>,
}

/// Process-wide analysis cache
pub struct AnalysisCache {
    provider: Arc<dyn MarketDataProvider>,
    config: CacheConfig,
    slot: Mutex<Slot>,
}

impl AnalysisCache {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: CacheConfig) -> Self {
        Self {
            provider,
            config,
            slot: Mutex::new(Slot {
                analysis: None,
                computed_at: None,
            }),
        }
    }

    /// The symbols included in every analysis batch
    pub fn symbols(&self) -> &[String] {
        &self.config.symbols
    }

    /// Return the current analysis, recomputing if absent or stale
    ///
    /// Fresh snapshots are returned without I/O. A provider failure
    /// propagates to the caller; the previous snapshot stays in place.
    pub async fn analysis(&self) -> Result<Arc<MarketAnalysis>> {
        let mut slot = self.slot.lock().await;

        if let (Some(analysis), Some(computed_at)) = (&slot.analysis, slot.computed_at) {
            if Utc::now() - computed_at < self.config.freshness {
                return Ok(Arc::clone(analysis));
            }
        }

        tracing::debug!(provider = self.provider.name(), "recomputing market analysis");

        let (records, sentiment, chain) = tokio::try_join!(
            self.provider.market_data(&self.config.symbols),
            self.provider.market_sentiment(),
            self.provider.chain_metrics(),
        )?;

        let analysis = Arc::new(scoring::analyze(&records, sentiment, &chain));
        slot.analysis = Some(Arc::clone(&analysis));
        slot.computed_at = Some(Utc::now());

        Ok(analysis)
    }

    /// The signal for one tracked symbol out of the current analysis
    pub async fn signal_for(&self, symbol: &str) -> Result<TechnicalSignal> {
        let upper = symbol.to_uppercase();
        let analysis = self.analysis().await?;
        analysis
            .signals
            .get(&upper)
            .cloned()
            .ok_or(MarketError::UnsupportedSymbol(upper))
    }

    /// When the current snapshot was computed (None before first fetch)
    pub async fn last_computed(&self) -> Option<DateTime<Utc>> {
        self.slot.lock().await.computed_at
    }

    /// Whether the underlying market data provider is reachable
    pub async fn provider_healthy(&self) -> bool {
        self.provider.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChainMetrics, MarketMood, MarketRecord, SentimentSnapshot};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts fetches; optionally fails on a chosen call number
    struct CountingProvider {
        calls: AtomicUsize,
        fail_on_call: Option<usize>,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: Some(call),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for CountingProvider {
        async fn market_data(&self, symbols: &[String]) -> Result<Vec<MarketRecord>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == Some(call) {
                return Err(MarketError::ProviderUnavailable("synthetic outage".into()));
            }

            Ok(symbols
                .iter()
                .map(|s| {
                    let mut r = MarketRecord::new(s.clone(), 100.0);
                    r.change_24h = 3.0;
                    r.volume_24h = 2.0;
                    r.volume_24h_prev = 1.0;
                    r.market_cap = Some(1.0e9);
                    r
                })
                .collect())
        }

        async fn market_sentiment(&self) -> Result<SentimentSnapshot> {
            Ok(SentimentSnapshot {
                overall: MarketMood::Neutral,
                fear_greed_index: 50.0,
                fear_greed_label: "Neutral".into(),
            })
        }

        async fn chain_metrics(&self) -> Result<ChainMetrics> {
            Ok(ChainMetrics {
                total_value_locked: 1.0e9,
                volume_24h: 5.0e8,
            })
        }

        async fn health_check(&self) -> bool {
            true
        }

        fn name(&self) -> &str {
            "Counting"
        }
    }

    fn cache_with(provider: Arc<CountingProvider>) -> AnalysisCache {
        AnalysisCache::new(
            provider,
            CacheConfig {
                symbols: vec!["SOL".into(), "BTC".into()],
                ..CacheConfig::default()
            },
        )
    }

    async fn backdate(cache: &AnalysisCache, seconds: i64) {
        let mut slot = cache.slot.lock().await;
        if let Some(ts) = slot.computed_at {
            slot.computed_at = Some(ts - Duration::seconds(seconds));
        }
    }

    #[tokio::test]
    async fn test_idempotent_within_window() {
        let provider = Arc::new(CountingProvider::new());
        let cache = cache_with(Arc::clone(&provider));

        let first = cache.analysis().await.unwrap();
        let second = cache.analysis().await.unwrap();

        // One fetch, and both callers hold the very same snapshot
        assert_eq!(provider.calls(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_refresh_after_window() {
        let provider = Arc::new(CountingProvider::new());
        let cache = cache_with(Arc::clone(&provider));

        cache.analysis().await.unwrap();
        let first_ts = cache.last_computed().await.unwrap();

        backdate(&cache, FRESHNESS_WINDOW_SECS + 1).await;
        let stale_ts = cache.last_computed().await.unwrap();

        cache.analysis().await.unwrap();

        assert_eq!(provider.calls(), 2);
        let new_ts = cache.last_computed().await.unwrap();
        assert!(new_ts > stale_ts);
        assert!(new_ts >= first_ts);
    }

    #[tokio::test]
    async fn test_failure_leaves_previous_snapshot() {
        let provider = Arc::new(CountingProvider::failing_on(2));
        let cache = cache_with(Arc::clone(&provider));

        let first = cache.analysis().await.unwrap();
        let first_ts = cache.last_computed().await.unwrap();

        backdate(&cache, FRESHNESS_WINDOW_SECS + 1).await;

        // Second fetch fails; the error propagates and the slot is untouched
        let err = cache.analysis().await.unwrap_err();
        assert!(matches!(err, MarketError::ProviderUnavailable(_)));
        assert_eq!(cache.last_computed().await.unwrap(), first_ts - Duration::seconds(FRESHNESS_WINDOW_SECS + 1));

        // Third call retries recomputation and succeeds with a new snapshot
        let third = cache.analysis().await.unwrap();
        assert_eq!(provider.calls(), 3);
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[tokio::test]
    async fn test_error_before_first_snapshot() {
        let provider = Arc::new(CountingProvider::failing_on(1));
        let cache = cache_with(Arc::clone(&provider));

        assert!(cache.analysis().await.is_err());
        assert!(cache.last_computed().await.is_none());
    }

    #[tokio::test]
    async fn test_signal_lookup() {
        let provider = Arc::new(CountingProvider::new());
        let cache = cache_with(Arc::clone(&provider));

        let signal = cache.signal_for("sol").await.unwrap();
        assert_eq!(signal.indicators.rsi, 75.0); // 100 - 100/(1 + 3)

        let err = cache.signal_for("NOTREAL").await.unwrap_err();
        assert!(matches!(err, MarketError::UnsupportedSymbol(_)));
    }
}
