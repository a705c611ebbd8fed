use serde::{Deserialize, Serialize};
use crate::media::NormalizedMedia;

/// Page size every adapter maps its native pagination onto
pub const PAGE_SIZE: u32 = 20;

/// One page of normalized results from a single catalog.
///
/// `has_more` is local to the source that produced the page: it says whether
/// asking that same source for a higher page would return anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult {
    pub results: Vec<NormalizedMedia>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
}

impl PaginatedResult {
    /// Bucket used for a source that failed or was skipped
    pub fn empty() -> Self {
        Self {
            results: Vec::new(),
            has_more: false,
            total_results: Some(0),
        }
    }

    /// Number of pages needed for `total` results at `PAGE_SIZE` per page
    pub fn total_pages(total: u64) -> u64 {
        total.div_ceil(PAGE_SIZE as u64)
    }

    /// `has_more` for sources that report a total count rather than a next pointer
    pub fn has_more_from_total(page: u32, total: u64) -> bool {
        (page as u64) < Self::total_pages(total)
    }
}
