use nexus_models::{MediaType, PaginatedResult};
use nexus_sources::SourceError;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use crate::aggregator::{Aggregator, SearchOutcome};

/// State of one interactive search: the query, the per-type buckets, the
/// last page fetched for each type and the failures from the initial fan-out.
///
/// A new `search` replaces everything; `load_more` only ever appends to a
/// single bucket.
#[derive(Debug)]
pub struct SearchSession {
    query: String,
    outcome: SearchOutcome,
    pages: BTreeMap<MediaType, u32>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchSession {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            outcome: SearchOutcome::empty(),
            pages: BTreeMap::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn bucket(&self, media_type: MediaType) -> Option<&PaginatedResult> {
        self.outcome.bucket(media_type)
    }

    pub fn failures(&self) -> &BTreeMap<MediaType, SourceError> {
        &self.outcome.failures
    }

    pub fn has_more(&self, media_type: MediaType) -> bool {
        self.bucket(media_type).map(|b| b.has_more).unwrap_or(false)
    }

    /// Last page fetched for `media_type` (0 before any search)
    pub fn page(&self, media_type: MediaType) -> u32 {
        self.pages.get(&media_type).copied().unwrap_or(0)
    }

    /// Run a fresh fan-out search, discarding the previous results
    pub async fn search(&mut self, aggregator: &Aggregator, query: &str) -> &SearchOutcome {
        self.query = query.trim().to_string();
        self.outcome = aggregator.search_all(&self.query).await;
        self.pages = if self.query.is_empty() {
            BTreeMap::new()
        } else {
            MediaType::ALL.into_iter().map(|t| (t, 1)).collect()
        };
        &self.outcome
    }

    /// Append `page` of `query` to the `media_type` bucket.
    ///
    /// Returns the number of results appended. Nothing is fetched when the
    /// bucket has no more pages. On failure the bucket is left as it was and
    /// the error is returned.
    pub async fn load_more(
        &mut self,
        aggregator: &Aggregator,
        media_type: MediaType,
        query: &str,
        page: u32,
    ) -> Result<usize, SourceError> {
        if !self.has_more(media_type) {
            debug!("No more {} results to load", media_type);
            return Ok(0);
        }

        let next = match aggregator.search_by_type(media_type, query, page).await {
            Ok(next) => next,
            Err(e) => {
                warn!("Loading page {} of {} failed: {}", page, media_type, e);
                return Err(e);
            }
        };

        let bucket = self.outcome.buckets.entry(media_type).or_default();
        let added = next.results.len();
        bucket.results.extend(next.results);
        bucket.has_more = next.has_more;
        if next.total_results.is_some() {
            bucket.total_results = next.total_results;
        }
        self.pages.insert(media_type, page);

        info!("Loaded page {} of {}: {} more results", page, media_type, added);
        Ok(added)
    }

    /// `load_more` with the session's query and the page after the last one fetched
    pub async fn load_next(&mut self, aggregator: &Aggregator, media_type: MediaType) -> Result<usize, SourceError> {
        let query = self.query.clone();
        let page = self.page(media_type) + 1;
        self.load_more(aggregator, media_type, &query, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::tests::{all_fakes, registry_with, FakeSource};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_load_next_appends_in_order() {
        let aggregator = Aggregator::new(registry_with(all_fakes()));
        let mut session = SearchSession::new();
        session.search(&aggregator, "  dune ").await;
        assert_eq!(session.query(), "dune");
        assert_eq!(session.page(MediaType::Book), 1);

        assert_eq!(session.load_next(&aggregator, MediaType::Book).await.unwrap(), 2);
        assert_eq!(session.load_next(&aggregator, MediaType::Book).await.unwrap(), 2);

        let books = session.bucket(MediaType::Book).unwrap();
        let ids: Vec<&str> = books.results.iter().map(|m| m.external_id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["book-p1-0", "book-p1-1", "book-p2-0", "book-p2-1", "book-p3-0", "book-p3-1"]
        );
        assert!(!books.has_more);
        assert_eq!(session.page(MediaType::Book), 3);

        // Other types keep their own counters
        assert_eq!(session.page(MediaType::Movie), 1);
        assert_eq!(session.bucket(MediaType::Movie).unwrap().results.len(), 2);
    }

    #[tokio::test]
    async fn test_load_more_without_more_is_noop() {
        let single_page = Arc::new(FakeSource::new(MediaType::Music, 1));
        let aggregator = Aggregator::new(registry_with(vec![single_page.clone()]));
        let mut session = SearchSession::new();
        session.search(&aggregator, "ok computer").await;

        let before = session.bucket(MediaType::Music).cloned();
        assert_eq!(session.load_more(&aggregator, MediaType::Music, "ok computer", 2).await.unwrap(), 0);

        assert_eq!(session.bucket(MediaType::Music).cloned(), before);
        assert_eq!(single_page.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_more_leaves_bucket() {
        let games = Arc::new(FakeSource::new(MediaType::Game, 2));
        let aggregator = Aggregator::new(registry_with(vec![games]));
        let mut session = SearchSession::new();
        session.search(&aggregator, "hades").await;
        let before = session.bucket(MediaType::Game).cloned();

        // Swap in a failing adapter behind the same type
        let broken = Aggregator::new(registry_with(vec![Arc::new(FakeSource::failing(MediaType::Game))]));
        let err = session.load_next(&broken, MediaType::Game).await.unwrap_err();

        assert_eq!(err.kind(), "transport");
        assert_eq!(session.bucket(MediaType::Game).cloned(), before);
        assert_eq!(session.page(MediaType::Game), 1);
    }

    #[tokio::test]
    async fn test_new_search_replaces_state() {
        let aggregator = Aggregator::new(registry_with(all_fakes()));
        let mut session = SearchSession::new();
        session.search(&aggregator, "first").await;
        session.load_next(&aggregator, MediaType::Tv).await.unwrap();
        assert_eq!(session.bucket(MediaType::Tv).unwrap().results.len(), 4);

        session.search(&aggregator, "second").await;
        assert_eq!(session.query(), "second");
        assert_eq!(session.page(MediaType::Tv), 1);
        let tv = session.bucket(MediaType::Tv).unwrap();
        assert_eq!(tv.results.len(), 2);
        assert!(tv.results.iter().all(|m| m.title.starts_with("second")));

        session.search(&aggregator, "   ").await;
        assert_eq!(session.page(MediaType::Tv), 0);
        assert!(!session.has_more(MediaType::Tv));
    }
}
