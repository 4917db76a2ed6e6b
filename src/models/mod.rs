// src/models/mod.rs

//! Domain models for the foodscores application.

mod config;
mod inspection;

// Re-export all public types
pub use config::{Config, FeedConfig, ScraperConfig};
pub use inspection::{
    DATE_FORMAT, FIELD_NAMES, InspectionRecord, LocationKey, RecordError, fields, labels,
};
