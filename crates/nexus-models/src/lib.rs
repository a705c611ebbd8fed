pub mod media;
pub mod pagination;
pub mod journal;
pub mod wishlist;
pub mod stats;

pub use media::{MediaType, Metadata, NormalizedMedia};
pub use pagination::{PaginatedResult, PAGE_SIZE};
pub use journal::{JournalEntry, JournalEntryDraft, JournalUpdate, normalize_tags};
pub use wishlist::WishlistItem;
pub use stats::{CulturalDnaStats, GenreCount, MonthCount};

/// Owner recorded on journal and wishlist records while accounts are out of scope
pub const LOCAL_USER_ID: &str = "local-user";
