use nexus_models::{MediaType, Metadata, NormalizedMedia, PaginatedResult, PAGE_SIZE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use crate::error::SourceError;
use crate::http::{fetch_json, path_segment};
use crate::normalize::{canonical_id, cap_genres, extract_year, non_empty};

pub(crate) const CATALOG: &str = "openlibrary";

pub const API_BASE: &str = "https://openlibrary.org";
pub const COVERS_BASE: &str = "https://covers.openlibrary.org/b/id";

/// Subjects at or above this length are sentences, not genres
const MAX_SUBJECT_LEN: usize = 30;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OpenLibraryDoc {
    key: String,
    #[serde(default)]
    title: String,
    first_publish_year: Option<i64>,
    #[serde(default)]
    author_name: Vec<String>,
    cover_i: Option<i64>,
    #[serde(default)]
    publisher: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    #[serde(default)]
    subject: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OpenLibrarySearchResponse {
    #[serde(default)]
    docs: Vec<OpenLibraryDoc>,
    #[serde(rename = "numFound", default)]
    num_found: u64,
}

/// Work descriptions come either as plain text or as `{"type": ..., "value": ...}`
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Description {
    Text(String),
    Typed { value: String },
}

impl Description {
    fn into_text(self) -> String {
        match self {
            Description::Text(text) | Description::Typed { value: text } => text,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OpenLibraryWork {
    #[serde(default)]
    title: String,
    first_publish_date: Option<String>,
    #[serde(default)]
    covers: Vec<i64>,
    description: Option<Description>,
    #[serde(default)]
    subjects: Vec<String>,
}

fn cover_url(cover_id: Option<i64>) -> Option<String> {
    cover_id
        .filter(|id| *id > 0)
        .map(|id| format!("{}/{}-M.jpg", COVERS_BASE, id))
}

fn subject_genres(subjects: &[String]) -> Vec<String> {
    cap_genres(
        subjects
            .iter()
            .filter(|s| s.chars().count() < MAX_SUBJECT_LEN)
            .cloned(),
    )
}

/// Work key without the `/works/` prefix, accepting either form
pub(crate) fn work_key(id: &str) -> &str {
    id.trim_start_matches("/works/")
}

pub(crate) async fn search(
    client: &Client,
    base_url: &str,
    query: &str,
    page: u32,
) -> Result<OpenLibrarySearchResponse, SourceError> {
    let page = page.to_string();
    let limit = PAGE_SIZE.to_string();
    let request = client
        .get(format!("{}/search.json", base_url))
        .query(&[("q", query), ("page", page.as_str()), ("limit", limit.as_str())]);

    fetch_json(request, CATALOG, None).await
}

pub(crate) async fn get_work(
    client: &Client,
    base_url: &str,
    id: &str,
) -> Result<OpenLibraryWork, SourceError> {
    let url = format!("{}/works/{}.json", base_url, path_segment(work_key(id)));
    fetch_json(client.get(url), CATALOG, Some(id)).await
}

pub(crate) fn normalize_search_response(response: OpenLibrarySearchResponse, page: u32) -> PaginatedResult {
    PaginatedResult {
        has_more: PaginatedResult::has_more_from_total(page, response.num_found),
        total_results: Some(response.num_found),
        results: response.docs.into_iter().map(normalize_doc).collect(),
    }
}

pub(crate) fn normalize_doc(doc: OpenLibraryDoc) -> NormalizedMedia {
    let mut metadata = Metadata::new();
    metadata.insert("authors".to_string(), json!(doc.author_name));
    metadata.insert(
        "publisher".to_string(),
        json!(doc.publisher.first().cloned().unwrap_or_default()),
    );
    metadata.insert("isbn".to_string(), json!(doc.isbn.first().cloned().unwrap_or_default()));

    NormalizedMedia {
        genres: subject_genres(&doc.subject),
        external_id: doc.key,
        media_type: MediaType::Book,
        title: doc.title,
        year: extract_year(doc.first_publish_year.map(|y| y.to_string()).as_deref()),
        poster_url: cover_url(doc.cover_i),
        metadata,
    }
}

/// The id is canonicalized to the `/works/…` form that search results carry
pub(crate) fn normalize_work(work: OpenLibraryWork, id: &str) -> NormalizedMedia {
    let description = work.description.map(Description::into_text).unwrap_or_default();
    let subjects: Vec<String> = work.subjects.iter().take(5).cloned().collect();

    let mut metadata = Metadata::new();
    metadata.insert("description".to_string(), json!(description));
    metadata.insert("subjects".to_string(), json!(subjects));

    NormalizedMedia {
        external_id: canonical_id(MediaType::Book, id),
        media_type: MediaType::Book,
        title: work.title,
        year: extract_year(non_empty(work.first_publish_date).as_deref()),
        poster_url: cover_url(work.covers.first().copied()),
        genres: subject_genres(&work.subjects),
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_doc() {
        let doc: OpenLibraryDoc = serde_json::from_value(json!({
            "key": "/works/OL893415W",
            "title": "Dune",
            "first_publish_year": 1965,
            "author_name": ["Frank Herbert"],
            "cover_i": 11481354,
            "publisher": ["Chilton Books", "Ace"],
            "isbn": ["9780441013593"],
            "subject": [
                "Science fiction",
                "Dune (Imaginary place) -- Fiction -- Juvenile literature",
                "Fiction",
                "Deserts",
                "Ecology",
                "Messiahs",
                "Politics"
            ]
        }))
        .unwrap();

        let media = normalize_doc(doc);
        assert_eq!(media.external_id, "/works/OL893415W");
        assert_eq!(media.media_type, MediaType::Book);
        assert_eq!(media.year.as_deref(), Some("1965"));
        assert_eq!(
            media.poster_url.as_deref(),
            Some("https://covers.openlibrary.org/b/id/11481354-M.jpg")
        );
        // The long subject is dropped before the cap of five
        assert_eq!(
            media.genres,
            vec!["Science fiction", "Fiction", "Deserts", "Ecology", "Messiahs"]
        );
        assert_eq!(media.metadata_list("authors"), vec!["Frank Herbert"]);
        assert_eq!(media.metadata_str("publisher"), Some("Chilton Books"));
        assert_eq!(media.metadata_str("isbn"), Some("9780441013593"));
    }

    #[test]
    fn test_doc_without_optional_fields() {
        let doc: OpenLibraryDoc = serde_json::from_value(json!({
            "key": "/works/OL1W",
            "title": "Untitled"
        }))
        .unwrap();

        let media = normalize_doc(doc);
        assert_eq!(media.year, None);
        assert_eq!(media.poster_url, None);
        assert!(media.genres.is_empty());
        assert_eq!(media.metadata_str("isbn"), None);
    }

    #[test]
    fn test_search_pagination() {
        let response: OpenLibrarySearchResponse =
            serde_json::from_value(json!({"numFound": 41, "docs": []})).unwrap();
        let page = normalize_search_response(response, 2);
        assert!(page.has_more);
        assert_eq!(page.total_results, Some(41));

        let response: OpenLibrarySearchResponse =
            serde_json::from_value(json!({"numFound": 41, "docs": []})).unwrap();
        assert!(!normalize_search_response(response, 3).has_more);
    }

    #[test]
    fn test_normalize_work_description_forms() {
        let typed: OpenLibraryWork = serde_json::from_value(json!({
            "title": "Dune",
            "first_publish_date": "August 1965",
            "covers": [11481354],
            "description": {"type": "/type/text", "value": "Set on the desert planet Arrakis"},
            "subjects": ["Science fiction"]
        }))
        .unwrap();
        let media = normalize_work(typed, "OL893415W");
        assert_eq!(media.external_id, "/works/OL893415W");
        assert_eq!(media.year.as_deref(), Some("1965"));
        assert_eq!(media.metadata_str("description"), Some("Set on the desert planet Arrakis"));
        assert_eq!(media.metadata_list("subjects"), vec!["Science fiction"]);

        let plain: OpenLibraryWork = serde_json::from_value(json!({
            "title": "Dune",
            "description": "Plain text"
        }))
        .unwrap();
        let media = normalize_work(plain, "/works/OL893415W");
        assert_eq!(media.external_id, "/works/OL893415W");
        assert_eq!(media.metadata_str("description"), Some("Plain text"));
        assert_eq!(media.poster_url, None);
    }

    #[test]
    fn test_work_key() {
        assert_eq!(work_key("/works/OL45804W"), "OL45804W");
        assert_eq!(work_key("OL45804W"), "OL45804W");
    }
}
