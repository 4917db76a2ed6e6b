// src/lib.rs

//! foodscores Library
//!
//! Scrapes food inspection scores, unions CSV snapshots, and renders
//! RSS/Atom feeds of recent inspections or failures.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
