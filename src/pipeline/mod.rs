//! Pipeline entry points for foodscores operations.
//!
//! - `run_download`: Scrape every zip code into one snapshot
//! - `run_union`: Merge CSV snapshots
//! - `run_feed`: Render a feed from a snapshot

pub mod download;
pub mod failures;
pub mod feed;
pub mod union;

pub use download::run_download;
pub use failures::reduce_failures;
pub use feed::{FeedEntry, FeedFlavor, FeedFormat, project_entry, run_feed, select_recent};
pub use union::{run_union, union_snapshots};
