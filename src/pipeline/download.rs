// src/pipeline/download.rs

//! Download pipeline: scrape every zip code and union the results.

use futures::stream::{self, StreamExt};

use crate::error::Result;
use crate::models::InspectionRecord;
use crate::pipeline::union_snapshots;
use crate::services::InspectionSource;

/// Fetch all zip codes, at most `concurrency` at a time.
///
/// The first failing zip code aborts the download. Completion order does not
/// affect the result.
pub async fn run_download(
    source: &dyn InspectionSource,
    zip_codes: &[String],
    concurrency: usize,
) -> Result<Vec<InspectionRecord>> {
    log::info!(
        "Downloading inspections for {} zip codes ({} at a time)",
        zip_codes.len(),
        concurrency.max(1)
    );

    let mut fetches = stream::iter(zip_codes)
        .map(|zip_code| async move { (zip_code, source.fetch_zip(zip_code).await) })
        .buffer_unordered(concurrency.max(1));

    let mut snapshots = Vec::with_capacity(zip_codes.len());
    while let Some((zip_code, result)) = fetches.next().await {
        let records = result?;
        log::info!("Fetched {} inspections for zip {}", records.len(), zip_code);
        snapshots.push(records);
    }

    let merged = union_snapshots(snapshots);
    log::info!("Downloaded {} unique inspections", merged.len());
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    /// Serves canned records per zip code.
    struct FakeSource {
        by_zip: HashMap<String, Vec<InspectionRecord>>,
    }

    #[async_trait]
    impl InspectionSource for FakeSource {
        async fn fetch_zip(&self, zip_code: &str) -> Result<Vec<InspectionRecord>> {
            self.by_zip
                .get(zip_code)
                .cloned()
                .ok_or_else(|| AppError::source_fetch(format!("zip {}", zip_code), "unreachable"))
        }
    }

    fn record(name: &str, zip: &str, day: u32) -> InspectionRecord {
        InspectionRecord::new(
            name,
            "1 Main St",
            "",
            zip,
            NaiveDate::from_ymd_opt(2015, 1, day).unwrap(),
            80,
            "routine",
        )
    }

    fn zips(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|z| z.to_string()).collect()
    }

    #[tokio::test]
    async fn test_download_unions_zip_results() {
        let shared = record("Border Cafe", "75201", 3);
        let source = FakeSource {
            by_zip: HashMap::from([
                ("75201".to_string(), vec![record("A", "75201", 2), shared.clone()]),
                ("75202".to_string(), vec![shared.clone(), record("B", "75202", 1)]),
            ]),
        };

        let merged = run_download(&source, &zips(&["75201", "75202"]), 2)
            .await
            .unwrap();
        assert_eq!(merged.len(), 3);
        assert!(merged.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(merged[0].name(), "B");
    }

    #[tokio::test]
    async fn test_download_fails_fast() {
        let source = FakeSource {
            by_zip: HashMap::from([("75201".to_string(), vec![record("A", "75201", 2)])]),
        };

        let err = run_download(&source, &zips(&["75201", "75299"]), 1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::SourceFetch { .. }));
        assert!(err.to_string().contains("75299"));
    }

    #[tokio::test]
    async fn test_download_zero_concurrency_still_runs() {
        let source = FakeSource {
            by_zip: HashMap::from([("75201".to_string(), vec![record("A", "75201", 2)])]),
        };
        let merged = run_download(&source, &zips(&["75201"]), 0).await.unwrap();
        assert_eq!(merged.len(), 1);
    }
}
