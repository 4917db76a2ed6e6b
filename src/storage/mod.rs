//! Snapshot persistence.
//!
//! Every scrape run is stored as a flat CSV file. Snapshots are the only
//! persistent state: `union` merges them, `feed` renders from one.
//!
//! ```text
//! name,address_street,address_suite,address_zip,inspection_date,inspection_score,inspection_type
//! Taco Stand,123 Main St,,75201,2015-01-01,55,routine
//! ```

pub mod snapshot;

// Re-export for convenience
pub use snapshot::{load_snapshot, read_snapshot, write_snapshot};
