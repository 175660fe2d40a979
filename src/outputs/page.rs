//! Convergent region patch of the persisted site page.
//!
//! The page is one text blob containing a region bounded by two literal
//! marker strings. This module rewrites that region with a freshly
//! rendered fragment while leaving every byte outside it untouched, and
//! it must converge no matter what state a previous (possibly buggy) run
//! left behind:
//!
//! - zero marker pairs: return the page unchanged and report it, never
//!   invent an insertion point
//! - one pair: splice the fragment between the markers
//! - several pairs: collapse everything from the first start marker
//!   through the end marker following the last start marker into a single
//!   clean region, discarding the stale copies
//!
//! Patching is plain indexed substring search. The markers are opaque
//! literals; nothing here parses the page as HTML, which keeps
//! "structural" and "literal" matches from ever being confused.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::config::RegionMarkers;
use crate::error::PersistError;
use crate::models::Record;
use crate::outputs::write_atomic;

/// Terminal state of one patch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// No marker pair in the document; nothing was written.
    NoAnchor,
    /// Exactly one pair found and its content replaced.
    Replaced,
    /// Several pairs collapsed into a single fresh region.
    Collapsed { stale_pairs: usize },
}

/// Render the merged collection as the HTML fragment for the region.
pub fn render_fragment(records: &[Record]) -> String {
    if records.is_empty() {
        return "\n<p class=\"news-empty\">Nessuna notizia disponibile.</p>\n".to_string();
    }

    let mut out = String::from("\n<ul class=\"news-list\">\n");
    for record in records {
        let _ = writeln!(
            out,
            "  <li><a href=\"{}\">{}</a> <span class=\"news-meta\">{} &middot; {}</span></li>",
            escape_html(&record.link),
            escape_html(&record.title),
            escape_html(&record.display_date),
            escape_html(&record.source_label),
        );
    }
    out.push_str("</ul>\n");
    out
}

/// Rewrite the marker-bounded region of `document` with `fragment`.
///
/// Returns the patched document and the outcome. The input is returned
/// unchanged for [`PatchOutcome::NoAnchor`]. Repeated application with the
/// same fragment is a fixed point.
pub fn patch_region(
    document: &str,
    markers: &RegionMarkers,
    fragment: &str,
) -> (String, PatchOutcome) {
    let starts: Vec<usize> = document
        .match_indices(&markers.start)
        .map(|(i, _)| i)
        .collect();
    if starts.is_empty() {
        return (document.to_string(), PatchOutcome::NoAnchor);
    }

    // The last pair is assumed to be the one wired into the live layout;
    // its end marker bounds the span to rewrite.
    let last_start = starts[starts.len() - 1];
    let scan_from = last_start + markers.start.len();
    let Some(end_offset) = document[scan_from..].find(&markers.end) else {
        // A start without a closing end is as unusable as no anchor.
        return (document.to_string(), PatchOutcome::NoAnchor);
    };
    let region_end = scan_from + end_offset + markers.end.len();
    let first_start = starts[0];

    let mut patched = String::with_capacity(document.len() + fragment.len());
    patched.push_str(&document[..first_start]);
    patched.push_str(&markers.start);
    patched.push_str(fragment);
    patched.push_str(&markers.end);
    patched.push_str(&document[region_end..]);

    let outcome = if starts.len() == 1 {
        PatchOutcome::Replaced
    } else {
        PatchOutcome::Collapsed {
            stale_pairs: starts.len() - 1,
        }
    };
    (patched, outcome)
}

/// Read the persisted page, patch its region, and write it back.
///
/// The write is skipped (and the run not failed) when the page carries no
/// anchor markers; a read or write failure is the caller's problem.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn publish_page(
    path: &Path,
    markers: &RegionMarkers,
    fragment: &str,
) -> Result<PatchOutcome, PersistError> {
    let document = tokio::fs::read_to_string(path).await?;
    let (patched, outcome) = patch_region(&document, markers, fragment);

    match outcome {
        PatchOutcome::NoAnchor => {
            warn!(start = %markers.start, "Page has no anchor markers; leaving it untouched");
        }
        PatchOutcome::Replaced => {
            write_atomic(path, &patched).await?;
            info!("Replaced page region");
        }
        PatchOutcome::Collapsed { stale_pairs } => {
            write_atomic(path, &patched).await?;
            info!(stale_pairs, "Collapsed stale page regions and replaced");
        }
    }
    Ok(outcome)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn markers() -> RegionMarkers {
        RegionMarkers::default()
    }

    fn doc(region: &str) -> String {
        format!(
            "<html><body><h1>News</h1>{}{}{}<footer>fine</footer></body></html>",
            markers().start,
            region,
            markers().end
        )
    }

    fn count_pairs(document: &str) -> usize {
        document.matches(&markers().start).count()
    }

    #[test]
    fn test_single_region_is_replaced() {
        let (patched, outcome) = patch_region(&doc("<p>stale</p>"), &markers(), "<p>fresh</p>");
        assert_eq!(outcome, PatchOutcome::Replaced);
        assert!(patched.contains("<p>fresh</p>"));
        assert!(!patched.contains("stale"));
        assert!(patched.starts_with("<html><body><h1>News</h1>"));
        assert!(patched.ends_with("<footer>fine</footer></body></html>"));
    }

    #[test]
    fn test_patch_is_idempotent() {
        let original = doc("<p>old</p>");
        let (once, _) = patch_region(&original, &markers(), "F1");
        let (twice, _) = patch_region(&once, &markers(), "F2");
        let (direct, _) = patch_region(&original, &markers(), "F2");
        assert_eq!(twice, direct);
    }

    #[test]
    fn test_no_anchor_returns_document_byte_identical() {
        let document = "<html><body>no markers here</body></html>";
        let (patched, outcome) = patch_region(document, &markers(), "F");
        assert_eq!(outcome, PatchOutcome::NoAnchor);
        assert_eq!(patched, document);
    }

    #[test]
    fn test_unterminated_region_is_treated_as_no_anchor() {
        let document = format!("<html>{} dangling</html>", markers().start);
        let (patched, outcome) = patch_region(&document, &markers(), "F");
        assert_eq!(outcome, PatchOutcome::NoAnchor);
        assert_eq!(patched, document);
    }

    #[test]
    fn test_multiple_regions_collapse_to_one() {
        let m = markers();
        let document = format!(
            "head {s}one{e} middle {s}two{e} tail {s}three{e} end",
            s = m.start,
            e = m.end
        );
        let (patched, outcome) = patch_region(&document, &m, "fresh");
        assert_eq!(outcome, PatchOutcome::Collapsed { stale_pairs: 2 });
        assert_eq!(count_pairs(&patched), 1);
        // The clean region sits where the span began; stale content and
        // whatever separated the pairs is gone, the tail survives.
        assert_eq!(
            patched,
            format!("head {s}fresh{e} end", s = m.start, e = m.end)
        );
    }

    #[test]
    fn test_collapsed_document_patches_like_a_clean_one() {
        let m = markers();
        let document = format!("a {s}1{e} b {s}2{e} c", s = m.start, e = m.end);
        let (collapsed, _) = patch_region(&document, &m, "F1");
        let (again, outcome) = patch_region(&collapsed, &m, "F2");
        assert_eq!(outcome, PatchOutcome::Replaced);
        assert_eq!(count_pairs(&again), 1);
        assert!(again.contains("F2"));
    }

    #[test]
    fn test_empty_region_between_adjacent_markers() {
        let m = markers();
        let document = format!("x{}{}y", m.start, m.end);
        let (patched, outcome) = patch_region(&document, &m, "F");
        assert_eq!(outcome, PatchOutcome::Replaced);
        assert_eq!(patched, format!("x{}F{}y", m.start, m.end));
    }

    #[test]
    fn test_render_fragment_lists_records() {
        let records = vec![Record {
            title: "Conte & co: \"avanti\"".to_string(),
            link: "https://www.sscnapoli.it/a?x=1&y=2".to_string(),
            published_at: NaiveDate::from_ymd_opt(2025, 8, 3),
            display_date: "03/08/2025".to_string(),
            source_label: "SSC Napoli".to_string(),
        }];
        let fragment = render_fragment(&records);
        assert!(fragment.contains("Conte &amp; co: &quot;avanti&quot;"));
        assert!(fragment.contains("https://www.sscnapoli.it/a?x=1&amp;y=2"));
        assert!(fragment.contains("03/08/2025"));
        assert!(fragment.contains("news-list"));
    }

    #[test]
    fn test_render_fragment_empty_collection() {
        let fragment = render_fragment(&[]);
        assert!(fragment.contains("news-empty"));
    }

    #[tokio::test]
    async fn test_publish_page_writes_patched_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, doc("<p>old</p>")).unwrap();

        let outcome = publish_page(&path, &markers(), "<p>new</p>").await.unwrap();
        assert_eq!(outcome, PatchOutcome::Replaced);

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("<p>new</p>"));
        assert!(!on_disk.contains("<p>old</p>"));
    }

    #[tokio::test]
    async fn test_publish_page_skips_write_without_anchor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        std::fs::write(&path, "<html>plain</html>").unwrap();

        let outcome = publish_page(&path, &markers(), "F").await.unwrap();
        assert_eq!(outcome, PatchOutcome::NoAnchor);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html>plain</html>");
    }

    #[tokio::test]
    async fn test_publish_page_missing_file_is_a_persist_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.html");
        let err = publish_page(&path, &markers(), "F").await.unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
    }
}
