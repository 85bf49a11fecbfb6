use crate::error::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored long-URL record.
///
/// No short code is stored alongside the URL; the public token is
/// recomputed from the row id by the codec whenever it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened.
    pub long_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
}

/// Storage contract for long-URL records.
///
/// Implementations assign ids sequentially starting from 1 and enforce
/// uniqueness of `long_url`, so shortening the same URL twice yields the
/// same id (and therefore the same token).
#[async_trait]
pub trait Repository: Send + Sync + 'static {
    /// Returns the id of an existing record with this `long_url`, or
    /// inserts a new record and returns its freshly assigned id.
    async fn insert_or_get(&self, long_url: &str) -> Result<u64>;

    /// Retrieves the record with the given row id.
    /// Returns `None` if no such record exists.
    async fn get(&self, id: u64) -> Result<Option<UrlRecord>>;
}
