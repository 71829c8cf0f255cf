//! Timestamped key-value caches for the enrichment read path.
//!
//! Entries are never evicted; staleness is judged by the caller comparing
//! the returned age against a TTL at read time. That keeps closed-market
//! semantics simple: when the market is closed, an arbitrarily old price
//! entry is still the right answer.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;

use super::enrichment_model::FundamentalRatios;

/// A key-value store where every entry remembers when it was written.
///
/// `get` hands back the value together with its age and leaves the policy
/// to the caller. Writes overwrite unconditionally; the last writer wins.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, (V, Instant)>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value and its age, or `None` on a miss.
    pub fn get(&self, key: &str) -> Option<(V, Duration)> {
        let entries = self.entries.read().unwrap();
        entries
            .get(key)
            .map(|(value, stored_at)| (value.clone(), stored_at.elapsed()))
    }

    /// Stores `value` under `key`, overwriting any previous entry.
    pub fn put(&self, key: &str, value: V) {
        self.put_at(key, value, Instant::now());
    }

    /// Stores `value` with an explicit write instant.
    pub(crate) fn put_at(&self, key: &str, value: V, stored_at: Instant) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(key.to_string(), (value, stored_at));
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One cached price observation for a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub price: Decimal,
    pub day_change_amount: Decimal,
    pub day_change_percent: Decimal,
}

/// Short-TTL price cache, keyed by ticker.
pub type PriceCache = TtlCache<PriceTick>;

/// Long-TTL fundamentals cache, keyed by ticker.
pub type FundamentalsCache = TtlCache<FundamentalRatios>;
