//! Service layer for the foodscores application.
//!
//! This module contains:
//! - Score scraping (`ScoreScraper`)
//! - Feed serialization (`FeedRenderer`)

mod render;
mod scores;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::InspectionRecord;

pub use render::FeedRenderer;
pub use scores::{ResultsPage, ScoreScraper, parse_results_page};

/// Anything that can produce the inspections recorded for a zip code.
#[async_trait]
pub trait InspectionSource: Send + Sync {
    /// Fetch every inspection for one zip code, across all result pages.
    async fn fetch_zip(&self, zip_code: &str) -> Result<Vec<InspectionRecord>>;
}
