use crate::analyzer::ranking::{rank_by_market_cap, TOP_N};
use crate::model::{MarketRecord, SummaryStats};
use crate::utils::round2;
use chrono::Utc;
use std::cmp::Ordering;

/// Trait defining the interface for a market analyzer.
pub trait Analyzer {
    fn summarize(&self, records: &[MarketRecord]) -> SummaryStats;
}

pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Name of the extreme record by `key`; earlier records win ties.
fn pick_name(
    records: &[MarketRecord],
    key: impl Fn(&MarketRecord) -> f64,
    want: Ordering,
) -> Option<String> {
    records
        .iter()
        .fold(None::<&MarketRecord>, |best, r| match best {
            Some(b) if key(r).total_cmp(&key(b)) != want => Some(b),
            _ => Some(r),
        })
        .map(|r| r.name.clone())
}

impl Analyzer for AnalyzerImpl {
    /// Totals, two-decimal means, extremes and the market-cap top five.
    fn summarize(&self, records: &[MarketRecord]) -> SummaryStats {
        SummaryStats {
            total_count: records.len(),
            total_market_cap: records.iter().map(|r| r.market_cap).sum(),
            average_price: round2(mean(records.iter().map(|r| r.price))),
            average_change_24h: round2(mean(records.iter().map(|r| r.change_24h))),
            highest_priced: pick_name(records, |r| r.price, Ordering::Greater),
            top_gainer: pick_name(records, |r| r.change_24h, Ordering::Greater),
            top_loser: pick_name(records, |r| r.change_24h, Ordering::Less),
            top_by_market_cap: rank_by_market_cap(records, TOP_N),
            generated_at: Utc::now(),
        }
    }
}
