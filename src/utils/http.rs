// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::ScraperConfig;

/// Create a configured asynchronous HTTP client with its own cookie jar.
///
/// The search site keeps pagination state in the session, so every
/// independent search needs a fresh client.
pub fn create_client(config: &ScraperConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .cookie_store(true)
        .build()?;
    Ok(client)
}
