//! Technical Scoring Engine
//!
//! Pure functions from a batch of `MarketRecord` to per-symbol signals,
//! trend narratives and the dominance index. All thresholds are fixed
//! constants; there is no configuration surface. Comparisons are strict
//! inequalities and the first matching tier wins.

use std::collections::HashMap;

use crate::model::{
    ChainMetrics, IndicatorBundle, MarketAnalysis, MarketMetrics, MarketMood, MarketRecord,
    MaTrend, SentimentLabel, SentimentSnapshot, TechnicalSignal, TrendDirection, TrendReport,
};

const STRONG_MOVE_PCT: f64 = 5.0;
const MOVE_PCT: f64 = 2.0;
const VOLUME_SPIKE_PCT: f64 = 20.0;
const BREADTH_RATIO: f64 = 0.6;
const WEEKLY_TREND_PCT: f64 = 10.0;
const SOCIAL_GROWTH_PCT: f64 = 50.0;
const DEV_ACTIVITY_MIN: u32 = 10;
const GREED_THRESHOLD: f64 = 65.0;
const FEAR_THRESHOLD: f64 = 35.0;

/// Classify a symbol's sentiment tier from 24h change and volume direction
pub fn classify_sentiment(record: &MarketRecord) -> SentimentLabel {
    let p = record.change_24h;
    let volume_up = record.volume_24h > record.volume_24h_prev;

    if p > STRONG_MOVE_PCT && volume_up {
        SentimentLabel::StronglyBullish
    } else if p > MOVE_PCT && volume_up {
        SentimentLabel::Bullish
    } else if p < -STRONG_MOVE_PCT && volume_up {
        SentimentLabel::StronglyBearish
    } else if p < -MOVE_PCT && volume_up {
        SentimentLabel::Bearish
    } else {
        SentimentLabel::Neutral
    }
}

/// Synthetic RSI-like oscillator over the 24h change
///
/// The denominator clamp keeps the value in [0, 100] for any finite input,
/// including a zero-loss day.
pub fn synthetic_rsi(change_24h: f64) -> f64 {
    let gains = change_24h.max(0.0);
    let losses = change_24h.min(0.0).abs();
    (100.0 - 100.0 / (1.0 + gains / losses.max(1.0))).round()
}

/// MACD-like trend crossover: 24h change against 7d change
pub fn macd_trend(record: &MarketRecord) -> TrendDirection {
    if record.change_24h > record.change_7d {
        TrendDirection::Bullish
    } else {
        TrendDirection::Bearish
    }
}

/// Moving-average trend classification
///
/// Missing averages default to the current price, which always classifies
/// as sideways. Known stub pending real price history.
pub fn ma_trend(record: &MarketRecord) -> MaTrend {
    let price = record.price;
    let ma_50 = record.ma_50.unwrap_or(price);
    let ma_200 = record.ma_200.unwrap_or(price);

    if price > ma_50 && ma_50 > ma_200 {
        MaTrend::StrongUptrend
    } else if price > ma_50 {
        MaTrend::Uptrend
    } else if price < ma_50 && ma_50 < ma_200 {
        MaTrend::StrongDowntrend
    } else if price < ma_50 {
        MaTrend::Downtrend
    } else {
        MaTrend::Sideways
    }
}

/// Full derived signal for one record
pub fn signal_for(record: &MarketRecord) -> TechnicalSignal {
    TechnicalSignal {
        sentiment: classify_sentiment(record),
        indicators: IndicatorBundle {
            macd_trend: macd_trend(record),
            rsi: synthetic_rsi(record.change_24h),
            ma_trend: ma_trend(record),
        },
    }
}

/// Market-cap share of the batch total, per symbol, rounded to 2 decimals
///
/// Symbols without a market cap are omitted.
pub fn dominance(records: &[MarketRecord]) -> HashMap<String, f64> {
    let total: f64 = records.iter().filter_map(|r| r.market_cap).sum();
    if total <= 0.0 {
        return HashMap::new();
    }

    records
        .iter()
        .filter_map(|r| {
            r.market_cap
                .map(|cap| (r.symbol.clone(), round2(cap / total * 100.0)))
        })
        .collect()
}

/// Short-term trend narratives (volume spikes and market breadth)
pub fn short_term_trends(records: &[MarketRecord]) -> Vec<String> {
    let mut trends = Vec::new();
    if records.is_empty() {
        return trends;
    }

    let avg_volume_change = records
        .iter()
        .map(|r| {
            if r.volume_24h_prev > 0.0 {
                (r.volume_24h - r.volume_24h_prev) / r.volume_24h_prev * 100.0
            } else {
                0.0
            }
        })
        .sum::<f64>()
        / records.len() as f64;

    if avg_volume_change > VOLUME_SPIKE_PCT {
        trends.push("High volume spike across tracked tokens".into());
    } else if avg_volume_change < -VOLUME_SPIKE_PCT {
        trends.push("Volume declining across the market".into());
    }

    let len = records.len() as f64;
    let gainers = records.iter().filter(|r| r.change_24h > STRONG_MOVE_PCT).count() as f64;
    let losers = records.iter().filter(|r| r.change_24h < -STRONG_MOVE_PCT).count() as f64;

    if gainers / len > BREADTH_RATIO {
        trends.push("Broad market rally in progress".into());
    }
    if losers / len > BREADTH_RATIO {
        trends.push("Market-wide correction in progress".into());
    }

    trends
}

/// Medium-term trend narratives (7-day average direction)
pub fn medium_term_trends(records: &[MarketRecord]) -> Vec<String> {
    let mut trends = Vec::new();
    if records.is_empty() {
        return trends;
    }

    let avg_7d = records.iter().map(|r| r.change_7d).sum::<f64>() / records.len() as f64;

    if avg_7d > WEEKLY_TREND_PCT {
        trends.push("Strong bullish week across the market".into());
    } else if avg_7d < -WEEKLY_TREND_PCT {
        trends.push("Bearish weekly trend in force".into());
    }

    trends
}

/// Emerging-trend call-outs (social momentum, development activity)
pub fn emerging_trends(records: &[MarketRecord]) -> Vec<String> {
    let mut trends = Vec::new();

    for record in records {
        if let Some(growth) = record.social_mentions_change {
            if growth > SOCIAL_GROWTH_PCT {
                trends.push(format!(
                    "{} seeing rising social momentum ({:+.2}% mentions)",
                    record.symbol, growth
                ));
            }
        }
    }

    for record in records {
        if let Some(activity) = record.dev_activity {
            if activity > DEV_ACTIVITY_MIN {
                trends.push(format!(
                    "{} shows strong development activity ({} recent events)",
                    record.symbol, activity
                ));
            }
        }
    }

    trends
}

/// Coarse mood derived from the fear/greed index
pub fn mood_from_index(fear_greed_index: f64) -> MarketMood {
    if fear_greed_index > GREED_THRESHOLD {
        MarketMood::Bullish
    } else if fear_greed_index < FEAR_THRESHOLD {
        MarketMood::Bearish
    } else {
        MarketMood::Neutral
    }
}

/// Narrative overview: the top 24h gainer plus the coarse sentiment label
pub fn overview(records: &[MarketRecord], sentiment: &SentimentSnapshot) -> String {
    let mood = mood_from_index(sentiment.fear_greed_index);

    match records
        .iter()
        .max_by(|a, b| a.change_24h.total_cmp(&b.change_24h))
    {
        Some(top) => format!(
            "Market sentiment is {}. {} leads the last 24h at {:+.2}%.",
            mood, top.symbol, top.change_24h
        ),
        None => format!("Market sentiment is {}. No market data available.", mood),
    }
}

/// Compose the full analysis artifact from one batch of fetches
pub fn analyze(
    records: &[MarketRecord],
    sentiment: SentimentSnapshot,
    chain: &ChainMetrics,
) -> MarketAnalysis {
    let signals = records
        .iter()
        .map(|r| (r.symbol.clone(), signal_for(r)))
        .collect();

    let overview = overview(records, &sentiment);

    MarketAnalysis {
        overview,
        sentiment,
        trends: TrendReport {
            short_term: short_term_trends(records),
            medium_term: medium_term_trends(records),
            emerging: emerging_trends(records),
        },
        metrics: MarketMetrics {
            value_locked: format!("Total value locked: {}", format_usd(chain.total_value_locked)),
            volume: format!("24h on-chain volume: {}", format_usd(chain.volume_24h)),
            dominance: dominance(records),
        },
        signals,
    }
}

/// Round to 2 decimal places (presentation boundary only)
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compact USD formatting for summary strings
fn format_usd(amount: f64) -> String {
    if amount >= 1e9 {
        format!("${:.1}B", amount / 1e9)
    } else if amount >= 1e6 {
        format!("${:.1}M", amount / 1e6)
    } else if amount >= 1e3 {
        format!("${:.1}K", amount / 1e3)
    } else {
        format!("${:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symbol: &str, change_24h: f64, volume: f64, volume_prev: f64) -> MarketRecord {
        let mut r = MarketRecord::new(symbol, 100.0);
        r.change_24h = change_24h;
        r.volume_24h = volume;
        r.volume_24h_prev = volume_prev;
        r
    }

    #[test]
    fn test_sentiment_tiers() {
        assert_eq!(
            classify_sentiment(&record("A", 6.0, 2.0, 1.0)),
            SentimentLabel::StronglyBullish
        );
        assert_eq!(
            classify_sentiment(&record("A", 3.0, 2.0, 1.0)),
            SentimentLabel::Bullish
        );
        assert_eq!(
            classify_sentiment(&record("A", -6.0, 2.0, 1.0)),
            SentimentLabel::StronglyBearish
        );
        assert_eq!(
            classify_sentiment(&record("A", -3.0, 2.0, 1.0)),
            SentimentLabel::Bearish
        );
        assert_eq!(
            classify_sentiment(&record("A", 1.0, 2.0, 1.0)),
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn test_sentiment_strict_inequality_edges() {
        // Exactly 5% falls through to the bullish tier, not strongly bullish
        assert_eq!(
            classify_sentiment(&record("A", 5.0, 2.0, 1.0)),
            SentimentLabel::Bullish
        );
        // Exactly 2% falls through to neutral
        assert_eq!(
            classify_sentiment(&record("A", 2.0, 2.0, 1.0)),
            SentimentLabel::Neutral
        );
        // Equal volumes are not "volume up": big gain stays neutral
        assert_eq!(
            classify_sentiment(&record("A", 6.0, 2.0, 2.0)),
            SentimentLabel::Neutral
        );
        // Same on the downside
        assert_eq!(
            classify_sentiment(&record("A", -5.0, 2.0, 1.0)),
            SentimentLabel::Bearish
        );
    }

    #[test]
    fn test_synthetic_rsi_bounds() {
        for p in [-5000.0, -100.0, -7.3, -0.1, 0.0, 0.1, 4.2, 99.0, 5000.0] {
            let value = synthetic_rsi(p);
            assert!((0.0..=100.0).contains(&value), "rsi out of range for {}", p);
        }
    }

    #[test]
    fn test_synthetic_rsi_zero_loss_clamp() {
        // losses = 0 clamps the denominator to 1 instead of dividing by zero
        assert_eq!(synthetic_rsi(0.0), 0.0);
        assert_eq!(synthetic_rsi(4.0), 80.0); // 100 - 100/(1 + 4)
        assert_eq!(synthetic_rsi(-3.0), 0.0); // no gains at all
    }

    #[test]
    fn test_macd_trend() {
        let mut r = record("A", 3.0, 1.0, 1.0);
        r.change_7d = 1.0;
        assert_eq!(macd_trend(&r), TrendDirection::Bullish);

        r.change_7d = 5.0;
        assert_eq!(macd_trend(&r), TrendDirection::Bearish);
    }

    #[test]
    fn test_ma_trend_defaults_to_sideways() {
        // Missing moving averages default to the current price
        let r = MarketRecord::new("A", 100.0);
        assert_eq!(ma_trend(&r), MaTrend::Sideways);
    }

    #[test]
    fn test_ma_trend_orderings() {
        let mut r = MarketRecord::new("A", 100.0);
        r.ma_50 = Some(90.0);
        r.ma_200 = Some(80.0);
        assert_eq!(ma_trend(&r), MaTrend::StrongUptrend);

        r.ma_200 = Some(95.0);
        assert_eq!(ma_trend(&r), MaTrend::Uptrend);

        r.ma_50 = Some(110.0);
        r.ma_200 = Some(120.0);
        assert_eq!(ma_trend(&r), MaTrend::StrongDowntrend);

        r.ma_200 = Some(105.0);
        assert_eq!(ma_trend(&r), MaTrend::Downtrend);
    }

    #[test]
    fn test_dominance_sums_to_hundred() {
        let mut a = record("A", 0.0, 1.0, 1.0);
        a.market_cap = Some(6.0e10);
        let mut b = record("B", 0.0, 1.0, 1.0);
        b.market_cap = Some(3.0e10);
        let mut c = record("C", 0.0, 1.0, 1.0);
        c.market_cap = Some(1.0e10);

        let shares = dominance(&[a, b, c]);
        let total: f64 = shares.values().sum();
        assert!((total - 100.0).abs() < 0.05, "sum was {}", total);
        assert_eq!(shares["A"], 60.0);
    }

    #[test]
    fn test_dominance_omits_missing_caps() {
        let mut a = record("A", 0.0, 1.0, 1.0);
        a.market_cap = Some(1.0e10);
        let b = record("B", 0.0, 1.0, 1.0); // no market cap

        let shares = dominance(&[a, b]);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares["A"], 100.0);
    }

    #[test]
    fn test_volume_spike_and_decline() {
        let spike = vec![record("A", 0.0, 150.0, 100.0), record("B", 0.0, 130.0, 100.0)];
        assert!(short_term_trends(&spike)
            .iter()
            .any(|t| t.contains("volume spike")));

        let decline = vec![record("A", 0.0, 60.0, 100.0), record("B", 0.0, 70.0, 100.0)];
        assert!(short_term_trends(&decline)
            .iter()
            .any(|t| t.contains("Volume declining")));
    }

    #[test]
    fn test_breadth_requires_strict_majority() {
        // 2 of 3 symbols down hard is ~66% -> correction fires
        let records = vec![
            record("A", -6.0, 1.0, 1.0),
            record("B", -7.0, 1.0, 1.0),
            record("C", 1.0, 1.0, 1.0),
        ];
        assert!(short_term_trends(&records)
            .iter()
            .any(|t| t.starts_with("Market-wide correction")));

        // Exactly 60% (3 of 5) does not clear the strict > 60% bar
        let records = vec![
            record("A", -6.0, 1.0, 1.0),
            record("B", -7.0, 1.0, 1.0),
            record("C", -8.0, 1.0, 1.0),
            record("D", 1.0, 1.0, 1.0),
            record("E", 1.0, 1.0, 1.0),
        ];
        assert!(!short_term_trends(&records)
            .iter()
            .any(|t| t.starts_with("Market-wide correction")));
    }

    #[test]
    fn test_medium_term_trends() {
        let mut bull = record("A", 0.0, 1.0, 1.0);
        bull.change_7d = 15.0;
        let mut flat = record("B", 0.0, 1.0, 1.0);
        flat.change_7d = 8.0;
        assert!(medium_term_trends(&[bull, flat])
            .iter()
            .any(|t| t.contains("bullish week")));

        let mut bear = record("A", 0.0, 1.0, 1.0);
        bear.change_7d = -25.0;
        assert!(medium_term_trends(&[bear])
            .iter()
            .any(|t| t.contains("Bearish weekly")));
    }

    #[test]
    fn test_emerging_trends() {
        let mut social = record("BONK", 0.0, 1.0, 1.0);
        social.social_mentions_change = Some(140.0);
        let mut dev = record("ETH", 0.0, 1.0, 1.0);
        dev.dev_activity = Some(22);
        let mut quiet = record("USDC", 0.0, 1.0, 1.0);
        quiet.social_mentions_change = Some(10.0);
        quiet.dev_activity = Some(10); // strict: exactly 10 does not fire

        let trends = emerging_trends(&[social, dev, quiet]);
        assert_eq!(trends.len(), 2);
        assert!(trends[0].contains("BONK"));
        assert!(trends[1].contains("ETH"));
    }

    #[test]
    fn test_overview_mood_thresholds() {
        let snapshot = |index: f64| SentimentSnapshot {
            overall: MarketMood::Neutral,
            fear_greed_index: index,
            fear_greed_label: String::new(),
        };

        let records = vec![record("SOL", 6.0, 1.0, 1.0)];
        assert!(overview(&records, &snapshot(70.0)).contains("bullish"));
        assert!(overview(&records, &snapshot(30.0)).contains("bearish"));
        assert!(overview(&records, &snapshot(50.0)).contains("neutral"));
        // Boundary: exactly 65 is neutral
        assert!(overview(&records, &snapshot(65.0)).contains("neutral"));
        assert!(overview(&records, &snapshot(70.0)).contains("SOL"));
    }

    #[test]
    fn test_end_to_end_scenario() {
        // SOL +6% volume up, BTC +1% volume down, ETH -7% volume up
        let mut sol = record("SOL", 6.0, 2.0, 1.0);
        sol.market_cap = Some(9.0e10);
        let mut btc = record("BTC", 1.0, 1.0, 2.0);
        btc.market_cap = Some(1.9e12);
        let mut eth = record("ETH", -7.0, 2.0, 1.0);
        eth.market_cap = Some(4.0e11);

        let sentiment = SentimentSnapshot {
            overall: MarketMood::Neutral,
            fear_greed_index: 50.0,
            fear_greed_label: "Neutral".into(),
        };
        let chain = ChainMetrics {
            total_value_locked: 8.9e9,
            volume_24h: 2.4e9,
        };

        let analysis = analyze(&[sol, btc, eth], sentiment, &chain);

        assert_eq!(analysis.signals["SOL"].sentiment, SentimentLabel::StronglyBullish);
        assert_eq!(analysis.signals["BTC"].sentiment, SentimentLabel::Neutral);
        assert_eq!(analysis.signals["ETH"].sentiment, SentimentLabel::StronglyBearish);

        // Only 1 of 3 dropped below -5%: no market-wide correction
        assert!(!analysis
            .trends
            .short_term
            .iter()
            .any(|t| t.starts_with("Market-wide correction")));

        let total: f64 = analysis.metrics.dominance.values().sum();
        assert!((total - 100.0).abs() < 0.05);
        assert!(analysis.metrics.value_locked.contains("$8.9B"));
        assert!(analysis.overview.contains("SOL"));
    }
}
