use futures::future::join_all;
use nexus_models::{MediaType, NormalizedMedia, PaginatedResult};
use nexus_sources::{catalog_for, CatalogRegistry, CatalogSource, SourceError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of a fan-out search: one bucket per media type, plus the failure
/// behind every bucket that came back empty because its catalog failed.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub buckets: BTreeMap<MediaType, PaginatedResult>,
    pub failures: BTreeMap<MediaType, SourceError>,
}

impl SearchOutcome {
    /// Every type present with an empty bucket and no failure
    pub fn empty() -> Self {
        Self {
            buckets: MediaType::ALL
                .into_iter()
                .map(|t| (t, PaginatedResult::empty()))
                .collect(),
            failures: BTreeMap::new(),
        }
    }

    pub fn bucket(&self, media_type: MediaType) -> Option<&PaginatedResult> {
        self.buckets.get(&media_type)
    }

    pub fn total_results(&self) -> usize {
        self.buckets.values().map(|b| b.results.len()).sum()
    }
}

/// Fans a query out to every catalog and routes single-type calls to the
/// adapter registered for that type.
#[derive(Clone)]
pub struct Aggregator {
    registry: CatalogRegistry,
}

impl Aggregator {
    pub fn new(registry: CatalogRegistry) -> Self {
        Self { registry }
    }

    /// Search page 1 of every catalog at once.
    ///
    /// All branches run to completion; a failing catalog yields an empty
    /// bucket and a recorded failure, never an error for the whole call.
    /// A blank query returns empty buckets without touching any catalog.
    pub async fn search_all(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            debug!("Blank query, skipping catalog search");
            return SearchOutcome::empty();
        }

        let started = Instant::now();
        let searches = MediaType::ALL.into_iter().map(|media_type| async move {
            (media_type, self.search_by_type(media_type, query, 1).await)
        });
        let results = join_all(searches).await;

        let mut outcome = SearchOutcome::default();
        for (media_type, result) in results {
            let bucket = match result {
                Ok(page) => page,
                Err(e) => {
                    warn!("{} search failed for {}: {}", e.kind(), media_type, e);
                    outcome.failures.insert(media_type, e);
                    PaginatedResult::empty()
                }
            };
            outcome.buckets.insert(media_type, bucket);
        }

        info!(
            "Search '{}': {} results from {} catalogs ({} failed) in {:?}",
            query,
            outcome.total_results(),
            MediaType::ALL.len(),
            outcome.failures.len(),
            started.elapsed()
        );
        outcome
    }

    /// One page from the catalog serving `media_type`
    pub async fn search_by_type(
        &self,
        media_type: MediaType,
        query: &str,
        page: u32,
    ) -> Result<PaginatedResult, SourceError> {
        let source = self.source(media_type)?;
        source.search(query, page).await
    }

    /// Full record for one item; failures go straight back to the caller
    pub async fn get_media_details(&self, media_type: MediaType, id: &str) -> Result<NormalizedMedia, SourceError> {
        let source = self.source(media_type)?;
        source.get_details(id).await
    }

    fn source(&self, media_type: MediaType) -> Result<Arc<dyn CatalogSource>, SourceError> {
        self.registry.get(media_type).ok_or(SourceError::Disabled {
            catalog: catalog_for(media_type),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted adapter: `pages` total pages of `per_page` items, or a failure
    pub(crate) struct FakeSource {
        pub media_type: MediaType,
        pub pages: u32,
        pub per_page: usize,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl FakeSource {
        pub(crate) fn new(media_type: MediaType, pages: u32) -> Self {
            Self {
                media_type,
                pages,
                per_page: 2,
                fail: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing(media_type: MediaType) -> Self {
            Self { fail: true, ..Self::new(media_type, 1) }
        }
    }

    #[async_trait]
    impl CatalogSource for FakeSource {
        fn source_name(&self) -> &'static str {
            "fake"
        }

        fn media_type(&self) -> MediaType {
            self.media_type
        }

        async fn search(&self, query: &str, page: u32) -> Result<PaginatedResult, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::Transport {
                    catalog: "fake",
                    message: "connection refused".to_string(),
                });
            }
            let query = nexus_sources::validate_search(query, page)?;
            if page > self.pages {
                return Ok(PaginatedResult { results: Vec::new(), has_more: false, total_results: Some(0) });
            }

            let results = (0..self.per_page)
                .map(|i| {
                    NormalizedMedia::new(
                        format!("{}-p{}-{}", self.media_type, page, i),
                        self.media_type,
                        format!("{} {}", query, i),
                    )
                })
                .collect();
            Ok(PaginatedResult {
                results,
                has_more: page < self.pages,
                total_results: Some((self.pages as u64) * self.per_page as u64),
            })
        }

        async fn get_details(&self, id: &str) -> Result<NormalizedMedia, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if id == "missing" {
                return Err(SourceError::NotFound { catalog: "fake", id: id.to_string() });
            }
            Ok(NormalizedMedia::new(id, self.media_type, "Details"))
        }
    }

    pub(crate) fn registry_with(sources: Vec<Arc<FakeSource>>) -> CatalogRegistry {
        let mut registry = CatalogRegistry::new();
        for source in sources {
            registry.register(source);
        }
        registry
    }

    pub(crate) fn all_fakes() -> Vec<Arc<FakeSource>> {
        MediaType::ALL.into_iter().map(|t| Arc::new(FakeSource::new(t, 3))).collect()
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_calls() {
        let fakes = all_fakes();
        let aggregator = Aggregator::new(registry_with(fakes.clone()));

        for query in ["", "   ", "\t\n"] {
            let outcome = aggregator.search_all(query).await;
            assert_eq!(outcome.buckets.len(), 5);
            assert!(outcome.buckets.values().all(|b| b.results.is_empty() && !b.has_more));
            assert!(outcome.failures.is_empty());
        }
        assert!(fakes.iter().all(|f| f.calls.load(Ordering::SeqCst) == 0));
    }

    #[tokio::test]
    async fn test_one_failure_keeps_other_buckets() {
        let mut fakes = all_fakes();
        fakes[3] = Arc::new(FakeSource::failing(MediaType::Game));
        let aggregator = Aggregator::new(registry_with(fakes));

        let outcome = aggregator.search_all("zelda").await;

        assert_eq!(outcome.bucket(MediaType::Game), Some(&PaginatedResult::empty()));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[&MediaType::Game].kind(), "transport");
        for media_type in [MediaType::Movie, MediaType::Tv, MediaType::Book, MediaType::Music] {
            let bucket = outcome.bucket(media_type).unwrap();
            assert_eq!(bucket.results.len(), 2);
            assert!(bucket.has_more);
            assert!(bucket.results.iter().all(|m| m.media_type == media_type));
        }
    }

    #[tokio::test]
    async fn test_unregistered_type_is_recorded_as_disabled() {
        let fakes = vec![Arc::new(FakeSource::new(MediaType::Book, 1))];
        let aggregator = Aggregator::new(registry_with(fakes));

        let outcome = aggregator.search_all("dune").await;
        assert_eq!(outcome.bucket(MediaType::Book).unwrap().results.len(), 2);
        assert_eq!(outcome.failures.len(), 4);
        assert!(matches!(
            outcome.failures[&MediaType::Music],
            SourceError::Disabled { catalog: "musicbrainz" }
        ));
        assert_eq!(outcome.bucket(MediaType::Movie), Some(&PaginatedResult::empty()));
    }

    #[tokio::test]
    async fn test_details_errors_propagate() {
        let aggregator = Aggregator::new(registry_with(all_fakes()));

        let media = aggregator.get_media_details(MediaType::Tv, "1396").await.unwrap();
        assert!(media.is_same_item("1396", MediaType::Tv));

        let err = aggregator.get_media_details(MediaType::Tv, "missing").await.unwrap_err();
        assert!(err.is_not_found());

        let empty = Aggregator::new(CatalogRegistry::new());
        let err = empty.get_media_details(MediaType::Movie, "550").await.unwrap_err();
        assert_eq!(err.kind(), "disabled");
    }
}
