use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use sigil_core::error::Result;
use sigil_core::repository::{Repository, UrlRecord};
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory implementation of the repository contract using DashMap.
///
/// Rows are keyed by id; a second map indexes `long_url` back to the id so
/// `insert_or_get` can dedup without scanning. DashMap's sharded locks let
/// concurrent reads and writes on different buckets proceed without
/// blocking each other.
#[derive(Debug)]
pub struct InMemoryRepository {
    rows: DashMap<u64, UrlRecord>,
    url_index: DashMap<String, u64>,
    next_id: AtomicU64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository. Ids start at 1, matching the
    /// SQLite backend's autoincrement behavior.
    pub fn new() -> Self {
        Self {
            rows: DashMap::new(),
            url_index: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_or_get(&self, long_url: &str) -> Result<u64> {
        // The entry guard holds the index shard lock across the id
        // assignment, so two concurrent inserts of the same URL cannot
        // both allocate an id.
        match self.url_index.entry(long_url.to_owned()) {
            Entry::Occupied(existing) => Ok(*existing.get()),
            Entry::Vacant(slot) => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                self.rows.insert(
                    id,
                    UrlRecord {
                        long_url: long_url.to_owned(),
                        created_at: Timestamp::now(),
                    },
                );
                slot.insert(id);
                Ok(id)
            }
        }
    }

    async fn get(&self, id: u64) -> Result<Option<UrlRecord>> {
        Ok(self.rows.get(&id).map(|row| row.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_sequential_ids_from_one() {
        let repo = InMemoryRepository::new();

        assert_eq!(repo.insert_or_get("https://a.example").await.unwrap(), 1);
        assert_eq!(repo.insert_or_get("https://b.example").await.unwrap(), 2);
        assert_eq!(repo.insert_or_get("https://c.example").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn duplicate_url_reuses_the_existing_id() {
        let repo = InMemoryRepository::new();

        let first = repo.insert_or_get("https://example.com").await.unwrap();
        repo.insert_or_get("https://other.example").await.unwrap();
        let again = repo.insert_or_get("https://example.com").await.unwrap();

        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn get_returns_the_stored_record() {
        let repo = InMemoryRepository::new();

        let id = repo.insert_or_get("https://example.com").await.unwrap();
        let record = repo.get(id).await.unwrap().unwrap();

        assert_eq!(record.long_url, "https://example.com");
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let repo = InMemoryRepository::new();

        assert!(repo.get(42).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_inserts_of_the_same_url_agree_on_one_id() {
        use std::sync::Arc;

        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for _ in 0..16 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert_or_get("https://example.com").await.unwrap()
            }));
        }

        let mut ids = vec![];
        for handle in handles {
            ids.push(handle.await.unwrap());
        }

        let first = ids[0];
        assert!(ids.iter().all(|&id| id == first));
    }

    #[tokio::test]
    async fn concurrent_inserts_of_distinct_urls_get_distinct_ids() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert_or_get(&format!("https://example{i}.com"))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            assert!(ids.insert(handle.await.unwrap()));
        }
    }
}
