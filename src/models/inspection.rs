// src/models/inspection.rs

//! The canonical inspection record.
//!
//! A record is an immutable value: equality and ordering cover all seven
//! attributes, and [`InspectionRecord::content_hash`] gives an identity that
//! is stable across processes, so the same inspection scraped on different
//! days maps to the same feed entry.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::num::ParseIntError;

use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Date format used in CSV snapshots.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Joins attributes in the hash input. ASCII unit separator, which never
/// occurs in scraped or CSV text.
const HASH_SEPARATOR: &str = "\u{1f}";

/// Date format used by the source website.
const SCRAPED_DATE_FORMAT: &str = "%m/%d/%Y";

/// CSV field names, in serialization order.
pub const FIELD_NAMES: [&str; 7] = [
    fields::NAME,
    fields::STREET,
    fields::SUITE,
    fields::ZIP,
    fields::DATE,
    fields::SCORE,
    fields::TYPE,
];

/// Canonical CSV column names.
pub mod fields {
    pub const NAME: &str = "name";
    pub const STREET: &str = "address_street";
    pub const SUITE: &str = "address_suite";
    pub const ZIP: &str = "address_zip";
    pub const DATE: &str = "inspection_date";
    pub const SCORE: &str = "inspection_score";
    pub const TYPE: &str = "inspection_type";
}

/// Column labels used by the source website's results table.
pub mod labels {
    pub const NAME: &str = "Name";
    pub const STREET: &str = "Address";
    pub const SUITE: &str = "Suite#";
    pub const ZIP: &str = "Zip";
    pub const DATE: &str = "Inspected";
    pub const SCORE: &str = "Score";
    pub const TYPE: &str = "Inspection Type";
}

/// Why a field mapping could not be turned into a record.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid date '{value}' in field '{field}': {source}")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid score '{value}' in field '{field}': {source}")]
    InvalidScore {
        field: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// A single food inspection at a single location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InspectionRecord {
    name: String,
    street_address: String,
    suite: String,
    zip_code: String,
    inspection_date: NaiveDate,
    score: i32,
    inspection_type: String,
}

/// Groups records that belong to the same physical location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationKey<'a> {
    pub name: &'a str,
    pub street_address: &'a str,
    pub suite: &'a str,
    pub zip_code: &'a str,
}

impl InspectionRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        street_address: impl Into<String>,
        suite: impl Into<String>,
        zip_code: impl Into<String>,
        inspection_date: NaiveDate,
        score: i32,
        inspection_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street_address: street_address.into(),
            suite: suite.into(),
            zip_code: zip_code.into(),
            inspection_date,
            score,
            inspection_type: inspection_type.into(),
        }
    }

    /// Build a record from canonical CSV fields, looked up by name.
    ///
    /// Extra fields are ignored.
    pub fn from_fields<'a, I>(row: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: HashMap<&str, &str> = row.into_iter().collect();
        let get = |field: &'static str| {
            map.get(field)
                .copied()
                .ok_or(RecordError::MissingField(field))
        };

        Ok(Self {
            name: get(fields::NAME)?.to_string(),
            street_address: get(fields::STREET)?.to_string(),
            suite: get(fields::SUITE)?.to_string(),
            zip_code: get(fields::ZIP)?.to_string(),
            inspection_date: parse_date(fields::DATE, get(fields::DATE)?, DATE_FORMAT)?,
            score: parse_score(fields::SCORE, get(fields::SCORE)?)?,
            inspection_type: get(fields::TYPE)?.to_string(),
        })
    }

    /// Build a record from one row of the source website's results table.
    ///
    /// The inspection type is lowercased; other text is kept as scraped.
    pub fn from_scraped<'a, I>(cells: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: HashMap<&str, &str> = cells.into_iter().collect();
        let get = |label: &'static str| {
            map.get(label)
                .copied()
                .ok_or(RecordError::MissingField(label))
        };

        Ok(Self {
            name: get(labels::NAME)?.to_string(),
            street_address: get(labels::STREET)?.to_string(),
            suite: get(labels::SUITE)?.to_string(),
            zip_code: get(labels::ZIP)?.to_string(),
            inspection_date: parse_date(labels::DATE, get(labels::DATE)?, SCRAPED_DATE_FORMAT)?,
            score: parse_score(labels::SCORE, get(labels::SCORE)?)?,
            inspection_type: get(labels::TYPE)?.to_lowercase(),
        })
    }

    /// Project the record onto canonical CSV fields, in [`FIELD_NAMES`] order.
    pub fn to_fields(&self) -> [(&'static str, String); 7] {
        [
            (fields::NAME, self.name.clone()),
            (fields::STREET, self.street_address.clone()),
            (fields::SUITE, self.suite.clone()),
            (fields::ZIP, self.zip_code.clone()),
            (fields::DATE, self.inspection_date.format(DATE_FORMAT).to_string()),
            (fields::SCORE, self.score.to_string()),
            (fields::TYPE, self.inspection_type.clone()),
        ]
    }

    /// Deterministic hash over all seven attributes.
    ///
    /// SHA-256 of the separator-joined attributes, folded into 64 bits by
    /// XOR of its big-endian words.
    pub fn content_hash(&self) -> i64 {
        let date = self.inspection_date.format(DATE_FORMAT).to_string();
        let score = self.score.to_string();
        let joined = [
            self.name.as_str(),
            self.street_address.as_str(),
            self.suite.as_str(),
            self.zip_code.as_str(),
            date.as_str(),
            score.as_str(),
            self.inspection_type.as_str(),
        ]
        .join(HASH_SEPARATOR);
        let digest = Sha256::digest(joined.as_bytes());

        let folded = digest.chunks_exact(8).fold(0u64, |acc, chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            acc ^ u64::from_be_bytes(word)
        });
        folded as i64
    }

    /// Non-negative decimal rendering of [`Self::content_hash`].
    pub fn external_id(&self) -> String {
        self.content_hash().unsigned_abs().to_string()
    }

    pub fn location_key(&self) -> LocationKey<'_> {
        LocationKey {
            name: &self.name,
            street_address: &self.street_address,
            suite: &self.suite,
            zip_code: &self.zip_code,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn street_address(&self) -> &str {
        &self.street_address
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    pub fn inspection_date(&self) -> NaiveDate {
        self.inspection_date
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn inspection_type(&self) -> &str {
        &self.inspection_type
    }
}

impl Ord for InspectionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inspection_date
            .cmp(&other.inspection_date)
            .then_with(|| self.inspection_type.cmp(&other.inspection_type))
            .then_with(|| self.score.cmp(&other.score))
            .then_with(|| self.name.cmp(&other.name))
            .then_with(|| self.street_address.cmp(&other.street_address))
            .then_with(|| self.suite.cmp(&other.suite))
            .then_with(|| self.zip_code.cmp(&other.zip_code))
    }
}

impl PartialOrd for InspectionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn parse_date(field: &'static str, value: &str, format: &str) -> Result<NaiveDate, RecordError> {
    NaiveDate::parse_from_str(value.trim(), format).map_err(|source| RecordError::InvalidDate {
        field,
        value: value.to_string(),
        source,
    })
}

fn parse_score(field: &'static str, value: &str) -> Result<i32, RecordError> {
    value
        .trim()
        .parse()
        .map_err(|source| RecordError::InvalidScore {
            field,
            value: value.to_string(),
            source,
        })
}
