use crate::model::MarketRecord;
use std::cmp::Ordering;

pub const TOP_N: usize = 5;

/// Market cap descending, then name, then symbol ascending.
pub fn market_cap_order(a: &MarketRecord, b: &MarketRecord) -> Ordering {
    b.market_cap
        .total_cmp(&a.market_cap)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.symbol.cmp(&b.symbol))
}

/// The `n` largest records by market cap, sorted by [`market_cap_order`].
pub fn rank_by_market_cap(records: &[MarketRecord], n: usize) -> Vec<MarketRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(market_cap_order);
    ranked.truncate(n);
    ranked
}
