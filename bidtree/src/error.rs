use thiserror::Error;

/// Recoverable failures reported by [`Catalog`](crate::Catalog).
///
/// None of these leave either index partially updated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("bid {0} not found")]
    NotFound(String),

    #[error("bid {0} already exists")]
    DuplicateKey(String),

    #[error("invalid amount range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },

    #[error("bid {id} has invalid amount {amount}")]
    InvalidAmount { id: String, amount: f64 },

    #[error("bid id must not be empty")]
    EmptyId,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
