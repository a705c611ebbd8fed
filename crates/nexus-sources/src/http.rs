//! HTTP plumbing shared by the adapters: client construction and JSON
//! responses folded into `SourceError`.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use crate::error::SourceError;

/// Build a reqwest client with the catalog's User-Agent and a request timeout
pub fn create_client(user_agent: &str, timeout: Duration) -> Client {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Failed to build HTTP client ({}), falling back to defaults", e);
            Client::new()
        })
}

/// Send `request` and decode a JSON body.
///
/// When `lookup_id` is given, a 404 becomes `SourceError::NotFound` for that id.
pub async fn fetch_json<T>(
    request: RequestBuilder,
    catalog: &'static str,
    lookup_id: Option<&str>,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let response = request.send().await.map_err(|e| SourceError::Transport {
        catalog,
        message: e.to_string(),
    })?;

    let status = response.status();
    debug!(catalog, status = status.as_u16(), url = %response.url(), "Catalog response");

    if status == StatusCode::NOT_FOUND {
        if let Some(id) = lookup_id {
            return Err(SourceError::NotFound {
                catalog,
                id: id.to_string(),
            });
        }
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::Http {
            catalog,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await.map_err(|e| SourceError::Transport {
        catalog,
        message: e.to_string(),
    })?;

    serde_json::from_slice(&bytes).map_err(|e| SourceError::Decode {
        catalog,
        message: e.to_string(),
    })
}

/// Percent-encode an id used as a URL path segment
pub fn path_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
