//! In-memory bid catalog indexed two ways.
//!
//! Core features:
//! - Exact lookup by bid id
//! - Ascending listing by id or by amount
//! - Inclusive amount range queries
//! - Removal that keeps both indexes in step
//!
//! Both indexes are plain unbalanced binary search trees, so sorted input
//! produces linear-height trees. Traversal, removal and teardown are all
//! iterative, so chain depth never reaches the call stack.

mod amount_index;
pub mod error;
mod key_index;
mod tree;
pub mod types;

pub use amount_index::Range;
pub use error::{CatalogError, Result};
pub use tree::InOrder;
pub use types::{Bid, CatalogStats};

use amount_index::AmountIndex;
use key_index::KeyIndex;
use std::sync::Arc;
use tracing::debug;

/// Bid records indexed by id and by amount.
///
/// Every mutation goes through here so the two trees always hold the same
/// set of bids. Not synchronised - wrap in a lock for shared access.
pub struct Catalog {
    /// Ordered by id, serves lookups and id listings
    by_key: KeyIndex,
    /// Ordered by amount, serves amount listings and ranges
    by_amount: AmountIndex,
}

/// Outcome of [`Catalog::insert_all`].
#[derive(Debug, Default)]
pub struct LoadReport {
    pub accepted: usize,
    pub rejected: Vec<CatalogError>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            by_key: KeyIndex::new(),
            by_amount: AmountIndex::new(),
        }
    }

    /// Adds a bid to both indexes.
    ///
    /// Rejects empty ids, negative or non-finite amounts and ids already
    /// present. A rejected bid touches neither index.
    pub fn insert(&mut self, bid: Bid) -> Result<()> {
        if bid.id.is_empty() {
            return Err(CatalogError::EmptyId);
        }
        if !bid.amount.is_finite() || bid.amount < 0.0 {
            debug!(id = %bid.id, amount = bid.amount, "rejecting bid amount");
            return Err(CatalogError::InvalidAmount {
                id: bid.id,
                amount: bid.amount,
            });
        }
        if self.contains(&bid.id) {
            debug!(id = %bid.id, "rejecting duplicate bid id");
            return Err(CatalogError::DuplicateKey(bid.id));
        }

        let bid = Arc::new(bid);
        self.by_key.insert(Arc::clone(&bid));
        self.by_amount.insert(bid);
        debug_assert_eq!(self.by_key.len(), self.by_amount.len());
        Ok(())
    }

    /// Inserts every bid, collecting rejections instead of stopping.
    pub fn insert_all<I>(&mut self, bids: I) -> LoadReport
    where
        I: IntoIterator<Item = Bid>,
    {
        let mut report = LoadReport::default();
        for bid in bids {
            match self.insert(bid) {
                Ok(()) => report.accepted += 1,
                Err(e) => report.rejected.push(e),
            }
        }
        report
    }

    /// Removes a bid from both indexes and hands it back.
    pub fn remove(&mut self, id: &str) -> Result<Bid> {
        let amount = match self.by_key.lookup(id) {
            Some(bid) => bid.amount,
            None => return Err(CatalogError::NotFound(id.to_string())),
        };

        let removed = self
            .by_key
            .remove(id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let twin = self.by_amount.remove(amount, id);
        debug_assert!(twin.is_some(), "amount index out of step for {id}");
        debug_assert_eq!(self.by_key.len(), self.by_amount.len());
        drop(twin);
        debug!(id, amount, "removed bid");

        // both index references are gone now, unwrap without copying
        Ok(Arc::try_unwrap(removed).unwrap_or_else(|shared| (*shared).clone()))
    }

    /// Finds a bid by exact id.
    pub fn lookup(&self, id: &str) -> Option<&Bid> {
        self.by_key.lookup(id).map(|bid| bid.as_ref())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_key.lookup(id).is_some()
    }

    /// All bids, ascending by id.
    pub fn list_by_key(&self) -> InOrder<'_> {
        self.by_key.iter()
    }

    /// All bids, ascending by amount. Equal amounts keep insertion order.
    pub fn list_by_amount(&self) -> InOrder<'_> {
        self.by_amount.iter()
    }

    /// Bids with `low <= amount <= high`, ascending by amount.
    ///
    /// Fails with [`CatalogError::InvalidRange`] before walking anything if
    /// `low > high` or either bound is NaN.
    pub fn range_by_amount(&self, low: f64, high: f64) -> Result<Range<'_>> {
        if low.is_nan() || high.is_nan() || low > high {
            return Err(CatalogError::InvalidRange { low, high });
        }
        Ok(self.by_amount.range(low, high))
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record count plus the height of each tree.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            records: self.len(),
            key_height: self.by_key.height(),
            amount_height: self.by_amount.height(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}
