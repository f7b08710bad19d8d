//! Search queries, product records and the aggregated dataset
//!
//! The [`Dataset`] is the aggregator: every page's records are folded into it
//! by product id, and on a collision the record merged last wins.

mod query;
mod record;

pub use query::SearchQuery;
pub use record::{PageAddress, ProductRecord};

use serde::Serialize;
use std::collections::BTreeMap;

/// Counts from a single [`Dataset::merge`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records whose id was new to the dataset
    pub inserted: usize,

    /// Records that overwrote an existing entry with the same id
    pub replaced: usize,
}

/// Products keyed by id
///
/// Serialises as a JSON object `{ id: record }`. Keys are kept sorted so
/// exports are stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    records: BTreeMap<String, ProductRecord>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds `incoming` into the dataset, last write wins
    ///
    /// # Example
    ///
    /// ```
    /// use search_harvester::{Dataset, ProductRecord};
    ///
    /// let record = |price: &str| ProductRecord {
    ///     id: "111".to_string(),
    ///     name: "iPad".to_string(),
    ///     price: price.to_string(),
    ///     rating: 0.0,
    ///     link: "http://example.com/product/111".to_string(),
    ///     search_term: "ipad".to_string(),
    ///     description: None,
    /// };
    ///
    /// let mut dataset = Dataset::new();
    /// dataset.merge(vec![record("£299.00")]);
    /// let stats = dataset.merge(vec![record("£279.00")]);
    ///
    /// assert_eq!(stats.replaced, 1);
    /// assert_eq!(dataset.get("111").unwrap().price, "£279.00");
    /// ```
    pub fn merge<I>(&mut self, incoming: I) -> MergeStats
    where
        I: IntoIterator<Item = ProductRecord>,
    {
        let mut stats = MergeStats::default();

        for record in incoming {
            match self.records.insert(record.id.clone(), record) {
                Some(previous) => {
                    tracing::debug!("Product {} replaced by a later listing", previous.id);
                    stats.replaced += 1;
                }
                None => stats.inserted += 1,
            }
        }

        stats
    }

    pub fn get(&self, id: &str) -> Option<&ProductRecord> {
        self.records.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut ProductRecord> {
        self.records.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates records in id order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProductRecord)> {
        self.records.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}
