//! Utility functions and helpers.

pub mod http;

use std::sync::LazyLock;

use regex::Regex;

/// Permit numbers the source appends to some names, e.g. `App# 1234`.
static APP_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)app#\s*\d+").expect("valid permit number pattern"));

/// Clean a scraped table cell: drop permit numbers, collapse whitespace.
pub fn clean_text(text: &str) -> String {
    let stripped = APP_NUMBER.replace_all(text, "");
    normalize_whitespace(&stripped)
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
