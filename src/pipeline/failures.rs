// src/pipeline/failures.rs

//! Failure-history reduction for the `failures` feed.
//!
//! Scores below 70 require a re-inspection, and scores below 60 close the
//! establishment until it passes one. The feed shows every failure together
//! with the inspection that came immediately before it at the same location.

use std::collections::{HashMap, HashSet};

use crate::models::{InspectionRecord, LocationKey};

/// Fold state: the latest record seen per location and the records
/// selected so far.
#[derive(Debug, Default)]
struct FailureHistory<'a> {
    last_seen: HashMap<LocationKey<'a>, &'a InspectionRecord>,
    surfaced: HashSet<&'a InspectionRecord>,
}

impl<'a> FailureHistory<'a> {
    /// Advance the state by one record. Records must arrive oldest first.
    fn observe(mut self, record: &'a InspectionRecord, threshold: i32) -> Self {
        let key = record.location_key();

        if record.score() < threshold {
            if let Some(&previous) = self.last_seen.get(&key) {
                self.surfaced.insert(previous);
            }
            self.surfaced.insert(record);
        }

        // Only after the check, so a failure never pairs with itself.
        self.last_seen.insert(key, record);
        self
    }
}

/// Reduce a collection to its failures plus each failure's preceding
/// inspection at the same location, most recent first.
///
/// Input order does not matter. A record pulled in by several failures
/// appears once.
pub fn reduce_failures(records: &[InspectionRecord], threshold: i32) -> Vec<InspectionRecord> {
    let mut chronological: Vec<&InspectionRecord> = records.iter().collect();
    chronological.sort_unstable();

    let history = chronological
        .into_iter()
        .fold(FailureHistory::default(), |history, record| {
            history.observe(record, threshold)
        });

    let mut reduced: Vec<InspectionRecord> = history.surfaced.into_iter().cloned().collect();
    reduced.sort_unstable_by(|a, b| b.cmp(a));
    reduced
}
