//! Record normalization: raw source output to canonical [`Record`]s.
//!
//! The club site's markup echoes some titles twice inside the same anchor
//! (title text appears both in the heading and in an aria label rendered
//! as text), so beyond whitespace and markup cleanup this module carries a
//! targeted echoed-title repair. Repair triggers only when the first and
//! second halves of the token list are exactly identical, never on short
//! or naturally repetitive titles.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::{LINK_SENTINEL, RawRecord, Record, TITLE_SENTINEL};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Placeholder phrases the sources emit where a real title should be.
const PLACEHOLDER_TITLES: &[&str] = &["read more", "leggi tutto", "senza titolo", "untitled"];

/// Link extensions that mark a non-article resource (match reports as PDF,
/// press-kit archives). Dropping these is a scrape-quality filter.
const NON_ARTICLE_EXTENSIONS: &[&str] = &[
    ".pdf", ".zip", ".rar", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
];

/// Clean one raw record into a canonical [`Record`].
///
/// Returns `None` when the record should be dropped entirely (its link
/// points at a non-article resource). Title and link are always
/// sentinel-filled, never empty.
pub fn normalize(raw: RawRecord) -> Option<Record> {
    let link = raw.link.filter(|l| !l.trim().is_empty());
    if let Some(link) = link.as_deref()
        && is_non_article_link(link)
    {
        debug!(%link, "Dropping non-article resource");
        return None;
    }

    let mut title = collapse_whitespace(&strip_tags(&raw.title));
    title = repair_echoed_title(&title);
    if title.is_empty() || is_placeholder_title(&title) {
        title = TITLE_SENTINEL.to_string();
    }

    Some(Record {
        title,
        link: link.unwrap_or_else(|| LINK_SENTINEL.to_string()),
        published_at: raw.published_at,
        display_date: Record::format_display_date(raw.published_at),
        source_label: raw.source_label,
    })
}

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove HTML tags from title text, keeping only the character data.
fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, " ").into_owned()
}

/// Undo the doubled-title artifact of the club site's markup.
///
/// Splits the title into whitespace tokens and compares the first half
/// against the second (floor-division midpoint). Only exact token-for-token
/// equality triggers the repair; anything else is returned unchanged.
pub fn repair_echoed_title(title: &str) -> String {
    let tokens: Vec<&str> = title.split_whitespace().collect();
    let mid = tokens.len() / 2;
    if mid > 0 && tokens[..mid] == tokens[mid..] {
        tokens[..mid].join(" ")
    } else {
        title.to_string()
    }
}

fn is_placeholder_title(title: &str) -> bool {
    let folded = title.to_lowercase();
    PLACEHOLDER_TITLES.iter().any(|p| folded == *p)
}

fn is_non_article_link(link: &str) -> bool {
    // Compare against the path only so query strings don't hide extensions.
    let path = link.split(['?', '#']).next().unwrap_or(link).to_lowercase();
    NON_ARTICLE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(title: &str, link: Option<&str>) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            link: link.map(String::from),
            published_at: NaiveDate::from_ymd_opt(2025, 8, 1),
            source_label: "SSC Napoli".to_string(),
        }
    }

    #[test]
    fn test_echoed_title_is_repaired() {
        assert_eq!(repair_echoed_title("Match Report Match Report"), "Match Report");
        assert_eq!(repair_echoed_title("A A"), "A");
    }

    #[test]
    fn test_non_echoed_title_is_unchanged() {
        assert_eq!(repair_echoed_title("Match Report"), "Match Report");
        // Repetitive but not half-for-half identical.
        assert_eq!(repair_echoed_title("so so so good"), "so so so good");
        assert_eq!(repair_echoed_title(""), "");
    }

    #[test]
    fn test_whitespace_and_markup_are_cleaned() {
        let record = normalize(raw("  Conte:\n\t<em>le parole</em>  ", Some("https://x.it/a"))).unwrap();
        assert_eq!(record.title, "Conte: le parole");
    }

    #[test]
    fn test_placeholder_titles_get_sentinel() {
        for placeholder in ["Leggi tutto", "READ MORE", "", "   "] {
            let record = normalize(raw(placeholder, Some("https://x.it/a"))).unwrap();
            assert_eq!(record.title, TITLE_SENTINEL);
        }
    }

    #[test]
    fn test_missing_link_gets_sentinel() {
        let record = normalize(raw("Title", None)).unwrap();
        assert_eq!(record.link, LINK_SENTINEL);
        let record = normalize(raw("Title", Some("  "))).unwrap();
        assert_eq!(record.link, LINK_SENTINEL);
    }

    #[test]
    fn test_non_article_links_are_dropped() {
        assert!(normalize(raw("Report", Some("https://x.it/report.pdf"))).is_none());
        assert!(normalize(raw("Kit", Some("https://x.it/kit.ZIP?v=2"))).is_none());
        assert!(normalize(raw("Story", Some("https://x.it/pdf-guide"))).is_some());
    }

    #[test]
    fn test_display_date_follows_published_at() {
        let record = normalize(raw("Title", None)).unwrap();
        assert_eq!(record.display_date, "01/08/2025");

        let mut no_date = raw("Title", None);
        no_date.published_at = None;
        let record = normalize(no_date).unwrap();
        assert_eq!(record.display_date, crate::models::DATE_SENTINEL);
    }
}
