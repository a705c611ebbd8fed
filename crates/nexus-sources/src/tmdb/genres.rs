use std::collections::HashMap;
use std::future::Future;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use crate::error::SourceError;

/// TMDB genre id -> name table, loaded once and shared by the movie and tv adapters.
///
/// Concurrent first callers wait on the same in-flight fetch. A failed fetch
/// leaves the table empty so the next search tries again.
#[derive(Default)]
pub struct GenreTable {
    names: OnceCell<HashMap<u32, String>>,
}

impl GenreTable {
    pub fn new() -> Self {
        Self { names: OnceCell::new() }
    }

    pub fn is_loaded(&self) -> bool {
        self.names.initialized()
    }

    /// Run `fetch` unless the table is already loaded (or being loaded by another caller)
    pub async fn ensure_loaded<F, Fut>(&self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<HashMap<u32, String>, SourceError>>,
    {
        match self.names.get_or_try_init(fetch).await {
            Ok(names) => debug!("TMDB genre table ready ({} genres)", names.len()),
            Err(e) => warn!("Failed to fetch TMDB genres: {}", e),
        }
    }

    /// Name for a genre id, or a placeholder when the table is missing it
    pub fn name_for(&self, id: u32) -> String {
        self.names
            .get()
            .and_then(|names| names.get(&id).cloned())
            .unwrap_or_else(|| format!("Genre {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_first_use_fetches_once() {
        let table = Arc::new(GenreTable::new());
        let fetches = Arc::new(AtomicUsize::new(0));

        let loads = (0..8).map(|_| {
            let table = table.clone();
            let fetches = fetches.clone();
            async move {
                table
                    .ensure_loaded(|| async move {
                        fetches.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(HashMap::from([(28, "Action".to_string())]))
                    })
                    .await;
            }
        });
        futures::future::join_all(loads).await;

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(table.name_for(28), "Action");
        assert_eq!(table.name_for(99), "Genre 99");
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried() {
        let table = GenreTable::new();

        table
            .ensure_loaded(|| async {
                Err(SourceError::Transport {
                    catalog: "tmdb",
                    message: "connection reset".to_string(),
                })
            })
            .await;
        assert!(!table.is_loaded());
        assert_eq!(table.name_for(18), "Genre 18");

        table
            .ensure_loaded(|| async { Ok(HashMap::from([(18, "Drame".to_string())])) })
            .await;
        assert!(table.is_loaded());
        assert_eq!(table.name_for(18), "Drame");
    }
}
