//! Structured-feed adapter for RSS 2.0 and Atom sources.
//!
//! The official club feed is RSS, the third-party outlets are a mix of
//! RSS and Atom, so the parser handles both: `item`/`entry` elements,
//! plain-text and CDATA titles, RSS text links and Atom `href` links.
//! For timestamps an explicit `pubDate`/`published` is preferred over
//! `updated`, which Atom feeds bump on any edit.

use chrono::{DateTime, NaiveDate};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::error::SourceError;
use crate::models::RawRecord;

/// One RSS/Atom feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub label: String,
    pub url: String,
}

impl FeedSource {
    /// Fetch and parse up to `limit` feed items.
    ///
    /// Any transport or parse failure is logged and yields an empty batch;
    /// a feed problem must never abort the whole run.
    #[instrument(level = "info", skip_all, fields(label = %self.label))]
    pub async fn fetch(&self, client: &Client, limit: usize) -> Vec<RawRecord> {
        match self.try_fetch(client, limit).await {
            Ok(records) => {
                info!(count = records.len(), url = %self.url, "Fetched feed items");
                records
            }
            Err(e) => {
                warn!(error = %e, url = %self.url, "Feed source failed; treating as empty");
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
        parse_feed(&body, &self.label, limit)
    }
}

/// Which element's character data we are currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    None,
    Title,
    Link,
    Published,
    Updated,
}

#[derive(Debug, Default)]
struct ItemAccum {
    title: String,
    link: Option<String>,
    published: Option<String>,
    updated: Option<String>,
}

impl ItemAccum {
    fn push(&mut self, field: Field, text: &str) {
        match field {
            Field::Title => self.title.push_str(text),
            Field::Link => {
                let link = self.link.get_or_insert_with(String::new);
                link.push_str(text.trim());
            }
            Field::Published => {
                self.published.get_or_insert_with(String::new).push_str(text);
            }
            Field::Updated => {
                self.updated.get_or_insert_with(String::new).push_str(text);
            }
            Field::None => {}
        }
    }

    fn take_record(&mut self, label: &str) -> RawRecord {
        // Prefer the explicit publication timestamp over the edit stamp.
        let date_text = self.published.take().or_else(|| self.updated.take());
        RawRecord {
            title: std::mem::take(&mut self.title),
            link: self.link.take().filter(|l| !l.is_empty()),
            published_at: date_text.as_deref().and_then(parse_feed_date),
            source_label: label.to_string(),
        }
    }
}

/// Pull `item`/`entry` elements out of a feed payload.
pub fn parse_feed(xml: &str, label: &str, limit: usize) -> Result<Vec<RawRecord>, SourceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut records = Vec::new();
    let mut in_item = false;
    let mut field = Field::None;
    let mut item = ItemAccum::default();

    loop {
        match reader
            .read_event()
            .map_err(|e| SourceError::parse(label, e))?
        {
            Event::Start(e) => match e.local_name().as_ref() {
                b"item" | b"entry" => {
                    in_item = true;
                    item = ItemAccum::default();
                }
                // Prefixed lookalikes (media:title, dc:date) are not the
                // fields we collect.
                b"title" if in_item && e.name().prefix().is_none() => field = Field::Title,
                b"link" if in_item && e.name().prefix().is_none() => {
                    // Atom puts the URL in an href attribute even on
                    // non-self-closing link elements.
                    if let Some(href) = atom_link_href(&e) {
                        item.link.get_or_insert(href);
                    }
                    field = Field::Link;
                }
                b"pubDate" | b"published" if in_item && e.name().prefix().is_none() => {
                    field = Field::Published
                }
                b"updated" if in_item && e.name().prefix().is_none() => field = Field::Updated,
                _ => field = Field::None,
            },
            Event::Empty(e) => {
                if in_item
                    && e.local_name().as_ref() == b"link"
                    && let Some(href) = atom_link_href(&e)
                {
                    item.link.get_or_insert(href);
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| SourceError::parse(label, e))?;
                item.push(field, &text);
            }
            Event::CData(t) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                item.push(field, &text);
            }
            Event::End(e) => {
                if matches!(e.local_name().as_ref(), b"item" | b"entry") && in_item {
                    in_item = false;
                    records.push(item.take_record(label));
                    if records.len() >= limit {
                        break;
                    }
                }
                field = Field::None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(records)
}

/// Extract the article URL from an Atom `link` element.
///
/// Links carrying a `rel` other than `alternate` (self, enclosure, ...)
/// are not article links.
fn atom_link_href(e: &BytesStart) -> Option<String> {
    match e.try_get_attribute("rel") {
        Ok(Some(rel)) => {
            let rel_ok = rel.unescape_value().map(|v| v == "alternate").unwrap_or(false);
            if !rel_ok {
                return None;
            }
        }
        Ok(None) => {}
        Err(_) => return None,
    }
    e.try_get_attribute("href")
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Parse a feed timestamp down to its calendar date.
///
/// RFC 2822 (RSS `pubDate`), then RFC 3339 (Atom), then a bare
/// `YYYY-MM-DD`. Anything else is an absent date.
fn parse_feed_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
