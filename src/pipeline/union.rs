// src/pipeline/union.rs

//! Snapshot union.
//!
//! Successive scrape runs overlap in time. Unioning them as sets of
//! structurally-equal records keeps every inspection exactly once, and the
//! canonical sort makes the result independent of input order.

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::InspectionRecord;
use crate::storage::{load_snapshot, write_snapshot};

/// Merge snapshots into one deduplicated collection, sorted ascending.
pub fn union_snapshots<I, S>(snapshots: I) -> Vec<InspectionRecord>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = InspectionRecord>,
{
    let merged: HashSet<InspectionRecord> = snapshots.into_iter().flatten().collect();
    let mut records: Vec<InspectionRecord> = merged.into_iter().collect();
    records.sort_unstable();
    records
}

/// Load every CSV snapshot, union them, and write the merged CSV.
///
/// Any unreadable file aborts the whole run. Returns the merged count.
pub fn run_union<P: AsRef<Path>>(paths: &[P], out: impl Write) -> Result<usize> {
    let mut snapshots = Vec::with_capacity(paths.len());
    for path in paths {
        let records = load_snapshot(path)?;
        log::info!(
            "Loaded {} records from {}",
            records.len(),
            path.as_ref().display()
        );
        snapshots.push(records);
    }

    let total: usize = snapshots.iter().map(Vec::len).sum();
    let merged = union_snapshots(snapshots);
    log::info!(
        "Merged {} records into {} unique inspections",
        total,
        merged.len()
    );

    write_snapshot(out, &merged)?;
    Ok(merged.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, score: i32, kind: &str) -> InspectionRecord {
        InspectionRecord::new(
            "Taco Stand",
            "123 Main St",
            "",
            "75201",
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            score,
            kind,
        )
    }

    #[test]
    fn test_empty_input() {
        let none: Vec<Vec<InspectionRecord>> = Vec::new();
        assert!(union_snapshots(none).is_empty());
        assert!(union_snapshots(vec![Vec::new(), Vec::new()]).is_empty());
    }

    #[test]
    fn test_exact_duplicates_collapse() {
        let a = record("2015-01-01", 55, "routine");
        let merged = union_snapshots(vec![vec![a.clone(), a.clone(), a.clone()]]);
        assert_eq!(merged, vec![a]);
    }

    #[test]
    fn test_overlapping_snapshots() {
        let january = record("2015-01-01", 55, "routine");
        let june = record("2015-06-01", 85, "routine");
        let a = vec![january.clone()];
        let b = vec![june.clone(), january.clone()];

        let merged = union_snapshots(vec![a, b]);
        assert_eq!(merged, vec![january, june]);
    }

    #[test]
    fn test_idempotent() {
        let a = vec![
            record("2015-06-01", 85, "routine"),
            record("2015-01-01", 55, "routine"),
        ];
        assert_eq!(
            union_snapshots(vec![a.clone()]),
            union_snapshots(vec![a.clone(), a])
        );
    }

    #[test]
    fn test_commutative() {
        let a = vec![
            record("2015-01-01", 55, "routine"),
            record("2015-03-01", 72, "follow-up"),
        ];
        let b = vec![
            record("2015-03-01", 72, "follow-up"),
            record("2014-12-01", 91, "routine"),
        ];
        let c = vec![record("2015-02-01", 64, "complaint")];

        let forward = union_snapshots(vec![a.clone(), b.clone(), c.clone()]);
        let backward = union_snapshots(vec![c, b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 4);
        assert!(forward.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_day_records_differ_by_type() {
        let routine = record("2015-01-01", 55, "routine");
        let complaint = record("2015-01-01", 55, "complaint");
        let merged = union_snapshots(vec![vec![routine.clone()], vec![complaint.clone()]]);
        assert_eq!(merged, vec![complaint, routine]);
    }
}
