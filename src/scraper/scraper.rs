// scraper.rs
use crate::domain::SubjectProperty;
use crate::scraper::parse::parse_listing_html;
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; PropertyEvaluator/0.1)";

const MAX_ATTEMPTS: u64 = 2;
const JITTER_MAX_MILLIS: u64 = 500;

/// Fetches a single listing page and pulls what facts it can out of it.
pub struct ListingScraper {
    client: Client,
}

impl ListingScraper {
    pub fn new(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Never fails: when the page can't be fetched the result is a bare
    /// subject whose description says what went wrong.
    pub fn scrape(&self, url: &str) -> SubjectProperty {
        match self.fetch_html(url) {
            Ok(html) => {
                let subject = parse_listing_html(&html, url);
                info!(
                    %url,
                    price = ?subject.list_price,
                    sqft = ?subject.sqft,
                    photos = subject.photos.len(),
                    "listing scraped"
                );
                subject
            }
            Err(e) => {
                warn!(%url, error = %e, "listing scrape failed, using minimal facts");
                SubjectProperty {
                    description: Some(format!("Unable to fetch listing details: {e}")),
                    ..SubjectProperty::with_address(format!("Property from {url}"))
                }
            }
        }
    }

    pub fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScraperError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let start = Instant::now();

            match self.try_fetch_html(parsed.as_str()) {
                Ok(html) => return Ok(html),
                Err(e) => {
                    warn!(%url, attempt, elapsed = ?start.elapsed(), error = %e, "listing fetch failed");

                    if !e.is_transient() {
                        return Err(e);
                    }
                    last_err = Some(e);

                    if attempt < MAX_ATTEMPTS {
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MILLIS);
                        std::thread::sleep(Duration::from_millis(250 * attempt + jitter));
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("retry loop failed".into())))
    }

    fn try_fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let resp = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status(status.as_u16()));
        }

        resp.text()
            .map_err(|e| ScraperError::Network(e.to_string()))
    }
}
