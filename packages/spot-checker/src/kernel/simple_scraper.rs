//! Simple page fetcher - local HTTP + HTML parsing
//!
//! - Uses reqwest for the HTTP request
//! - Uses the scraper crate to drop markup and keep the text nodes
//!
//! No JavaScript rendering, so the watched page must be static HTML.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use scraper::Html;
use std::time::Duration;
use tracing::{debug, warn};

use super::BaseWebScraper;

/// Elements whose text is never page content
const NON_CONTENT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Simple web scraper using reqwest + scraper
pub struct SimpleScraper {
    client: reqwest::Client,
}

impl SimpleScraper {
    pub fn new() -> Result<Self> {
        // Use a browser-like User-Agent to avoid bot detection
        let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch raw HTML from a URL
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }

    /// Concatenate every text node of the document, skipping scripts and styles
    pub fn page_text(html: &str) -> String {
        let document = Html::parse_document(html);

        document
            .root_element()
            .descendants()
            .filter(|node| {
                node.parent()
                    .and_then(|parent| parent.value().as_element())
                    .map_or(true, |element| {
                        !NON_CONTENT_ELEMENTS.iter().any(|name| *name == element.name())
                    })
            })
            .filter_map(|node| node.value().as_text().map(|text| (**text).to_owned()))
            .collect()
    }

    /// Normalize URL by adding https:// if no scheme is present
    fn normalize_url(url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{}", url)
        }
    }
}

#[async_trait]
impl BaseWebScraper for SimpleScraper {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = Self::normalize_url(url);
        debug!(url = %url, "Fetching page");

        let html = self.fetch_html(&url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Failed to fetch URL");
            e
        })?;
        let text = Self::page_text(&html);

        if text.trim().is_empty() {
            warn!(url = %url, "Page has no text content");
        }

        Ok(text)
    }
}
