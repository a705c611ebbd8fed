use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::media::NormalizedMedia;

/// Something the user wants to watch, read, play or listen to.
///
/// At most one item exists per `(external_id, type)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub user_id: String,
    pub media: NormalizedMedia,
    #[serde(default)]
    pub priority: i32,
    pub added_at: DateTime<Utc>,
}
