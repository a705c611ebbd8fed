pub mod aggregator;
pub mod analytics;
pub mod journal;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use aggregator::{Aggregator, SearchOutcome};
pub use analytics::{compute_stats, compute_stats_with_locale, month_label, parse_locale, DEFAULT_LOCALE};
pub use journal::JournalStore;
pub use session::SearchSession;
pub use storage::RecordFile;
pub use wishlist::WishlistStore;
