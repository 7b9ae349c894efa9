use serde::{Deserialize, Serialize};

/// A single auction bid.
///
/// Only `id` and `amount` take part in indexing, `title` and `fund`
/// are carried along untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    pub id: String,
    pub title: String,
    pub fund: String,
    pub amount: f64, // dollars, finite and >= 0 once stored
}

impl Bid {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        fund: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            fund: fund.into(),
            amount,
        }
    }
}

/// Snapshot of catalog size and tree shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub records: usize,
    pub key_height: usize,
    pub amount_height: usize,
}
