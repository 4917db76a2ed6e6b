//! Application configuration structures.

use std::fs;
use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed identity and rendering settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// HTTP and scraping behavior settings
    #[serde(default)]
    pub scraper: ScraperConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.feed.id.trim().is_empty() {
            return Err(AppError::validation("feed.id is empty"));
        }
        if self.feed.title.trim().is_empty() {
            return Err(AppError::validation("feed.title is empty"));
        }
        self.feed.timezone()?;
        if self.scraper.base_url.trim().is_empty() {
            return Err(AppError::validation("scraper.base_url is empty"));
        }
        url::Url::parse(&self.scraper.base_url)?;
        if self.scraper.user_agent.trim().is_empty() {
            return Err(AppError::validation("scraper.user_agent is empty"));
        }
        if self.scraper.timeout_secs == 0 {
            return Err(AppError::validation("scraper.timeout_secs must be > 0"));
        }
        if self.scraper.max_concurrent == 0 {
            return Err(AppError::validation("scraper.max_concurrent must be > 0"));
        }
        if self.scraper.zip_codes.is_empty() {
            return Err(AppError::validation("No zip codes defined"));
        }
        Ok(())
    }
}

/// Feed identity and projection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Canonical feed URL, also the prefix of every entry id
    #[serde(default = "defaults::feed_id")]
    pub id: String,

    #[serde(default = "defaults::feed_title")]
    pub title: String,

    #[serde(default = "defaults::feed_subtitle")]
    pub subtitle: String,

    #[serde(default = "defaults::language")]
    pub language: String,

    #[serde(default = "defaults::author_name")]
    pub author_name: String,

    #[serde(default)]
    pub author_email: Option<String>,

    #[serde(default)]
    pub author_uri: Option<String>,

    /// IANA zone used to place inspection dates at local midnight
    #[serde(default = "defaults::timezone")]
    pub timezone: String,

    /// Scores strictly below this count as failures
    #[serde(default = "defaults::failure_threshold")]
    pub failure_threshold: i32,

    /// Entry count used when none is requested
    #[serde(default = "defaults::default_entries")]
    pub default_entries: usize,
}

impl FeedConfig {
    /// Parse the configured time zone.
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|e| {
            AppError::config(format!("Invalid feed.timezone '{}': {}", self.timezone, e))
        })
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            id: defaults::feed_id(),
            title: defaults::feed_title(),
            subtitle: defaults::feed_subtitle(),
            language: defaults::language(),
            author_name: defaults::author_name(),
            author_email: None,
            author_uri: None,
            timezone: defaults::timezone(),
            failure_threshold: defaults::failure_threshold(),
            default_entries: defaults::default_entries(),
        }
    }
}

/// HTTP client and scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Search endpoint of the inspection site
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between page requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum zip codes fetched at once
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Zip codes searched by `download`
    #[serde(default = "defaults::zip_codes")]
    pub zip_codes: Vec<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
            zip_codes: defaults::zip_codes(),
        }
    }
}

mod defaults {
    // Feed defaults
    pub fn feed_id() -> String {
        "http://pgriess.github.io/dallas-foodscores/".into()
    }
    pub fn feed_title() -> String {
        "Dallas Food Inspection Scores".into()
    }
    pub fn feed_subtitle() -> String {
        "Food inspection scores from the official City of Dallas dataset; updated daily".into()
    }
    pub fn language() -> String {
        "en".into()
    }
    pub fn author_name() -> String {
        "dallasdata".into()
    }
    pub fn timezone() -> String {
        "US/Central".into()
    }
    pub fn failure_threshold() -> i32 {
        70
    }
    pub fn default_entries() -> usize {
        10
    }

    // Scraper defaults
    pub fn base_url() -> String {
        "http://www2.dallascityhall.com/FoodInspection/SearchScoresAction.cfm".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; foodscores/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        0
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn zip_codes() -> Vec<String> {
        [
            "75201", "75202", "75203", "75204", "75205", "75206", "75207", "75208", "75209",
            "75210", "75211", "75212", "75214", "75215", "75216", "75217", "75218", "75219",
            "75220", "75221", "75223", "75224", "75225", "75226", "75227", "75228", "75229",
            "75230", "75231", "75232", "75233", "75234", "75235", "75236", "75237", "75238",
            "75240", "75241", "75243", "75244", "75246", "75247", "75248", "75249", "75250",
            "75251", "75252", "75253", "75254", "75287",
        ]
        .iter()
        .map(|z| z.to_string())
        .collect()
    }
}
