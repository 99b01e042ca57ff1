//! Price history state containers — app-owned, SDK-provided update logic.

use super::PricePoint;
use crate::shared::ProductKey;
use std::collections::{HashMap, VecDeque};

/// Default number of points kept per product.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Bounded price history per product key.
///
/// Each sequence is kept in arrival order (not re-sorted by timestamp) and
/// never exceeds `limit` entries; the oldest points are evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceHistoryState {
    data: HashMap<ProductKey, VecDeque<PricePoint>>,
    limit: usize,
    revision: u64,
}

impl Default for PriceHistoryState {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl PriceHistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            data: HashMap::new(),
            limit: limit.max(1),
            revision: 0,
        }
    }

    /// Append a batch of points in arrival order, then truncate every touched key.
    ///
    /// Keys absent from the batch are left untouched. Counts as one revision.
    pub fn apply_batch(&mut self, points: impl IntoIterator<Item = (ProductKey, PricePoint)>) {
        let mut touched = false;
        for (key, point) in points {
            let entry = self.data.entry(key).or_default();
            entry.push_back(point);
            while entry.len() > self.limit {
                entry.pop_front();
            }
            touched = true;
        }
        if touched {
            self.revision += 1;
        }
    }

    /// Append a single point.
    pub fn apply(&mut self, key: ProductKey, point: PricePoint) {
        self.apply_batch([(key, point)]);
    }

    pub fn get(&self, key: &ProductKey) -> Option<&VecDeque<PricePoint>> {
        self.data.get(key)
    }

    pub fn latest(&self, key: &ProductKey) -> Option<&PricePoint> {
        self.data.get(key).and_then(|points| points.back())
    }

    pub fn keys(&self) -> impl Iterator<Item = &ProductKey> {
        self.data.keys()
    }

    /// Number of tracked product keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of batches applied since creation or the last [`clear`](Self::clear).
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.revision = 0;
    }
}
