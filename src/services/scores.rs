// src/services/scores.rs

//! Inspection score scraper.
//!
//! The search endpoint takes a form POST for the first page of a zip code
//! and remembers the search in the session; later pages are plain GETs with
//! a page number.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{InspectionRecord, ScraperConfig};
use crate::services::InspectionSource;
use crate::utils::{clean_text, http};

const PAGE_PARAM: &str = "PageNum_q_search";

/// Records parsed from one results page.
#[derive(Debug, Default)]
pub struct ResultsPage {
    pub records: Vec<InspectionRecord>,
    pub has_next: bool,
}

/// Scrapes inspection results from the city search site.
pub struct ScoreScraper {
    config: ScraperConfig,
    base_url: Url,
}

impl ScoreScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self { config, base_url })
    }

    /// Build the request for one page of a zip code search.
    ///
    /// Page 1 submits the search form; later pages reuse the session's
    /// search and only pass a page number.
    fn page_request(&self, client: &Client, zip_code: &str, page_num: u32) -> RequestBuilder {
        if page_num > 1 {
            let mut url = self.base_url.clone();
            url.query_pairs_mut()
                .append_pair(PAGE_PARAM, &page_num.to_string());
            client.get(url)
        } else {
            client.post(self.base_url.clone()).form(&[
                ("NAME", ""),
                ("STNO", ""),
                ("STNAME", ""),
                ("ZIP", zip_code),
                ("Submit", "Search Scores"),
            ])
        }
    }

    async fn fetch_page(&self, client: &Client, zip_code: &str, page_num: u32) -> Result<String> {
        let response = self
            .page_request(client, zip_code, page_num)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl InspectionSource for ScoreScraper {
    async fn fetch_zip(&self, zip_code: &str) -> Result<Vec<InspectionRecord>> {
        let client = http::create_client(&self.config)?;
        let delay = Duration::from_millis(self.config.request_delay_ms);
        let client = &client;
        collect_pages(zip_code, delay, move |page_num| {
            self.fetch_page(client, zip_code, page_num)
        })
        .await
    }
}

/// Fetch and parse pages 1, 2, ... until a page has no `Next` link.
async fn collect_pages<F, Fut>(
    zip_code: &str,
    delay: Duration,
    mut fetch: F,
) -> Result<Vec<InspectionRecord>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut records = Vec::new();
    let mut page_num = 1;
    loop {
        let context = format!("zip {} page {}", zip_code, page_num);
        log::debug!("Fetching {}", context);

        let html = fetch(page_num)
            .await
            .map_err(|e| AppError::source_fetch(&context, e))?;
        let page = parse_results_page(&html).map_err(|e| AppError::source_fetch(&context, e))?;
        records.extend(page.records);

        if !page.has_next {
            break;
        }
        page_num += 1;

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(records)
}

/// Parse a results page.
///
/// The first table under `<body>` holds the results; its first row names
/// the columns. A page without that table has no results.
pub fn parse_results_page(html: &str) -> Result<ResultsPage> {
    let document = Html::parse_document(html);
    let table_sel = parse_selector("body > table")?;
    let row_sel = parse_selector("tr")?;
    let cell_sel = parse_selector("td")?;
    let link_sel = parse_selector("a")?;

    let has_next = document
        .select(&link_sel)
        .any(|a| a.text().collect::<String>().trim() == "Next");

    let Some(table) = document.select(&table_sel).next() else {
        log::debug!("No results table on page");
        return Ok(ResultsPage {
            records: Vec::new(),
            has_next,
        });
    };

    let mut rows = table.select(&row_sel);
    let Some(header_row) = rows.next() else {
        return Ok(ResultsPage {
            records: Vec::new(),
            has_next,
        });
    };
    let headers: Vec<String> = header_row
        .select(&cell_sel)
        .map(|td| cell_text(&td).trim().to_string())
        .collect();

    let mut records = Vec::new();
    for row in rows {
        let cells: Vec<String> = row
            .select(&cell_sel)
            .map(|td| clean_text(&cell_text(&td)))
            .collect();
        if cells.is_empty() {
            continue;
        }

        let record = InspectionRecord::from_scraped(
            headers
                .iter()
                .map(String::as_str)
                .zip(cells.iter().map(String::as_str)),
        )
        .map_err(|e| AppError::malformed("results table", e))?;
        records.push(record);
    }

    Ok(ResultsPage { records, has_next })
}

fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text().collect()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
