//! Page-scrape adapter for the club site's rendered news page.
//!
//! The page's markup is not contractually stable (it is produced by a page
//! builder and changes with theme updates), so every extraction step runs
//! through a cascade of selectors: try the most specific one first and fall
//! back to progressively looser ones, first non-empty result wins. Dates
//! are not trusted to sit in one element either; the text of the container
//! is scanned for a dd/mm/yyyy pattern instead.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::SourceError;
use crate::models::RawRecord;
use crate::normalize::collapse_whitespace;

/// Repeating article containers, most specific first.
const CONTAINER_SELECTORS: &[&str] = &[
    "div.elementor-posts-container article.elementor-post",
    "article.elementor-post",
    "main article",
];

/// The article link inside a container: prefer the one wrapping the
/// heading, else any link at all.
const LINK_SELECTORS: &[&str] = &["h3.elementor-post__title a", "a[href]"];

/// Fallback title element for containers whose anchor carries no text.
const TITLE_SELECTORS: &[&str] = &["h3.elementor-post__title", "h3"];

/// Where the post date usually sits; the full container text is the last
/// resort before the date scan gives up.
const DATE_SELECTORS: &[&str] = &[
    "div.elementor-post__meta-data span.elementor-post-date",
    "span.elementor-post-date",
];

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap());

/// One scraped HTML page listing news items.
#[derive(Debug, Clone)]
pub struct PageSource {
    pub label: String,
    pub url: String,
}

impl PageSource {
    /// Scrape up to `limit` article containers from the page.
    ///
    /// Transport failures and pages where no container selector matches
    /// are logged and yield an empty batch.
    #[instrument(level = "info", skip_all, fields(label = %self.label))]
    pub async fn fetch(&self, client: &Client, limit: usize) -> Vec<RawRecord> {
        match self.try_fetch(client, limit).await {
            Ok(records) => {
                info!(count = records.len(), url = %self.url, "Scraped page items");
                records
            }
            Err(e) => {
                warn!(error = %e, url = %self.url, "Page source failed; treating as empty");
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, client: &Client, limit: usize) -> Result<Vec<RawRecord>, SourceError> {
        let body = client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_page(&body, &self.url, &self.label, limit)
    }
}

/// Extract raw records from the page markup.
pub fn parse_page(
    html: &str,
    page_url: &str,
    label: &str,
    limit: usize,
) -> Result<Vec<RawRecord>, SourceError> {
    let base = Url::parse(page_url).map_err(|e| SourceError::parse(label, e))?;
    let document = Html::parse_document(html);

    let containers = select_cascade(&document, CONTAINER_SELECTORS);
    if containers.is_empty() {
        return Err(SourceError::parse(
            label,
            "no article containers matched any selector",
        ));
    }

    Ok(containers
        .into_iter()
        .take(limit)
        .filter_map(|item| extract_record(item, &base, label))
        .collect())
}

/// Apply container selectors in priority order; first non-empty match wins.
fn select_cascade<'a>(document: &'a Html, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for css in selectors {
        let selector = Selector::parse(css).unwrap();
        let matches: Vec<ElementRef> = document.select(&selector).collect();
        if !matches.is_empty() {
            debug!(selector = %css, count = matches.len(), "Container selector matched");
            return matches;
        }
    }
    Vec::new()
}

/// First element matched by any selector in the cascade, scoped to `scope`.
fn select_first<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|css| {
        let selector = Selector::parse(css).unwrap();
        scope.select(&selector).next()
    })
}

fn extract_record(item: ElementRef, base: &Url, label: &str) -> Option<RawRecord> {
    let anchor = select_first(item, LINK_SELECTORS)?;
    let href = anchor.value().attr("href")?;
    let link = base
        .join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string());

    let mut title = element_text(anchor);
    if title.is_empty()
        && let Some(heading) = select_first(item, TITLE_SELECTORS)
    {
        title = element_text(heading);
    }

    let date_text = select_first(item, DATE_SELECTORS)
        .map(element_text)
        .unwrap_or_else(|| element_text(item));

    Some(RawRecord {
        title,
        link: Some(link),
        published_at: scan_date(&date_text),
        source_label: label.to_string(),
    })
}

fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Scan free text for the first dd/mm/yyyy occurrence.
fn scan_date(text: &str) -> Option<NaiveDate> {
    let hit = DATE_RE.find(text)?;
    NaiveDate::parse_from_str(hit.as_str(), "%d/%m/%Y").ok()
}
