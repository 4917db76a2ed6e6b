// src/pipeline/feed.rs

//! Feed projection: pick the most recent records and turn each into a
//! feed entry.

use std::io::{Read, Write};

use chrono::{DateTime, FixedOffset, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{AppError, Result};
use crate::models::{FeedConfig, InspectionRecord};
use crate::pipeline::reduce_failures;
use crate::services::FeedRenderer;
use crate::storage::read_snapshot;

/// Output syndication format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FeedFormat {
    Rss,
    Atom,
}

/// Which records a feed draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum FeedFlavor {
    /// Every inspection
    All,
    /// Failing inspections with the inspection that preceded each
    Failures,
}

/// One display line handed to the feed renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// Stable entry id, also used as the entry link
    pub id: String,
    pub published: DateTime<FixedOffset>,
}

/// Select up to `count` records, most recent first.
pub fn select_recent(
    records: &[InspectionRecord],
    flavor: FeedFlavor,
    threshold: i32,
    count: usize,
) -> Vec<InspectionRecord> {
    let mut selected = match flavor {
        FeedFlavor::All => {
            let mut all = records.to_vec();
            all.sort_unstable_by(|a, b| b.cmp(a));
            all
        }
        FeedFlavor::Failures => reduce_failures(records, threshold),
    };
    selected.truncate(count);
    selected
}

/// Map a record to its feed entry.
///
/// The inspection date is placed at local midnight in `tz`.
pub fn project_entry(record: &InspectionRecord, feed_id: &str, tz: Tz) -> Result<FeedEntry> {
    let midnight = record.inspection_date().and_time(NaiveTime::MIN);
    let published = tz
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| {
            AppError::validation(format!(
                "{} has no local midnight in {}",
                record.inspection_date(),
                tz
            ))
        })?
        .fixed_offset();

    Ok(FeedEntry {
        title: format!(
            "{} at {} scored {}",
            record.name(),
            record.street_address(),
            record.score()
        ),
        id: format!("{}#!/{}", feed_id, record.external_id()),
        published,
    })
}

/// Read a CSV snapshot, project the requested slice, and write the feed.
///
/// Returns the number of entries rendered.
pub fn run_feed(
    config: &FeedConfig,
    input: impl Read,
    source: &str,
    mut out: impl Write,
    format: FeedFormat,
    flavor: FeedFlavor,
    count: usize,
) -> Result<usize> {
    let tz = config.timezone()?;
    let records = read_snapshot(input, source)?;

    let selected = select_recent(&records, flavor, config.failure_threshold, count);
    log::info!(
        "Selected {} of {} records for the {:?} feed",
        selected.len(),
        records.len(),
        flavor
    );

    let entries = selected
        .iter()
        .map(|record| project_entry(record, &config.id, tz))
        .collect::<Result<Vec<_>>>()?;

    let document = FeedRenderer::new(config).render(format, &entries)?;
    writeln!(out, "{}", document)?;
    Ok(entries.len())
}
