//! Directory-listing parser
//!
//! Static file servers answer a GET on a folder with an HTML index page,
//! one anchor per entry. This module turns that HTML into structured
//! entries: image files and sub-folders. No network I/O happens here.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

/// Extensions recognized as images (matched case-insensitively)
const IMAGE_EXTENSIONS: [&str; 8] = [
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".bmp", ".tiff",
];

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").unwrap());

/// Folder names that identify a per-paper image folder: digits plus a
/// trailing slash, nothing else ("12a/", "/12/" and "12" all fail)
static PAPER_FOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)/$").unwrap());

/// One entry from a directory index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// The anchor's href, verbatim (folders keep their trailing slash)
    pub name: String,
    pub is_folder: bool,
}

/// Check whether a file name looks like an image
pub fn is_image_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Parse a directory index into entries: sub-folders plus image files.
///
/// The parent-directory marker (`../`) is skipped, as are files without an
/// image extension. Entries come back in listing order. Malformed HTML
/// never fails; the html5ever parser recovers and we return whatever
/// anchors survived.
pub fn parse_entries(html: &str) -> Vec<ListingEntry> {
    let doc = Html::parse_document(html);
    if !doc.errors.is_empty() {
        eprintln!(
            "[Listing] {} parse warning(s) in directory index, continuing with recovered tree",
            doc.errors.len()
        );
    }

    let mut entries = Vec::new();
    for anchor in doc.select(&ANCHOR_SELECTOR) {
        let href = match anchor.value().attr("href") {
            Some(h) if !h.is_empty() && h != "../" => h,
            _ => continue,
        };
        if href.ends_with('/') {
            entries.push(ListingEntry {
                name: href.to_string(),
                is_folder: true,
            });
        } else if is_image_file(href) {
            entries.push(ListingEntry {
                name: href.to_string(),
                is_folder: false,
            });
        }
    }
    entries
}

/// Extract per-paper folder ids from a directory index of `images/papers/`.
///
/// Only folder names fully matching digits + `/` count; anything else is
/// silently excluded. Duplicates are dropped, first occurrence wins.
pub fn paper_folder_ids(html: &str) -> Vec<u64> {
    let mut ids = Vec::new();
    for entry in parse_entries(html) {
        if !entry.is_folder {
            continue;
        }
        if let Some(caps) = PAPER_FOLDER_RE.captures(&entry.name) {
            if let Ok(id) = caps[1].parse::<u64>() {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body><h1>Index of /images/homepage</h1><pre>
        <a href="../">../</a>
        <a href="cover.JPG">cover.JPG</a>
        <a href="diagram.png">diagram.png</a>
        <a href="notes.txt">notes.txt</a>
        <a href="thumbs/">thumbs/</a>
        </pre></body></html>
    "#;

    #[test]
    fn test_parse_entries_files_and_folders() {
        let entries = parse_entries(LISTING);
        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0],
            ListingEntry { name: "cover.JPG".to_string(), is_folder: false }
        );
        assert_eq!(
            entries[1],
            ListingEntry { name: "diagram.png".to_string(), is_folder: false }
        );
        assert_eq!(
            entries[2],
            ListingEntry { name: "thumbs/".to_string(), is_folder: true }
        );
    }

    #[test]
    fn test_parent_marker_excluded() {
        let entries = parse_entries(r#"<a href="../">../</a>"#);
        assert!(entries.is_empty());
    }

    #[test]
    fn test_extension_match_is_case_insensitive() {
        assert!(is_image_file("photo.WEBP"));
        assert!(is_image_file("scan.Tiff"));
        assert!(!is_image_file("paper.pdf"));
        assert!(!is_image_file("jpg")); // no dot, not an extension
    }

    #[test]
    fn test_malformed_html_does_not_fail() {
        let entries = parse_entries("<<<not <a really html <a href=");
        assert!(entries.is_empty());

        // Unclosed elements still yield the anchors the parser recovers
        let entries = parse_entries(r#"<pre><a href="x.png">x<a href="y/">"#);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "x.png");
        assert_eq!(entries[1].name, "y/");
    }

    #[test]
    fn test_paper_folder_ids_strict_pattern() {
        let html = r#"
            <a href="../">../</a>
            <a href="3/">3/</a>
            <a href="12a/">12a/</a>
            <a href="/12/">/12/</a>
            <a href="7/">7/</a>
            <a href="archive/">archive/</a>
        "#;
        assert_eq!(paper_folder_ids(html), vec![3, 7]);
    }

    #[test]
    fn test_paper_folder_ids_file_named_like_id_rejected() {
        // "12" without trailing slash is a file candidate, not a folder
        let html = r#"<a href="12">12</a><a href="12.png">12.png</a>"#;
        assert!(paper_folder_ids(html).is_empty());
    }

    #[test]
    fn test_paper_folder_ids_duplicates_dropped() {
        let html = r#"<a href="5/">5/</a><a href="5/">5/</a><a href="2/">2/</a>"#;
        assert_eq!(paper_folder_ids(html), vec![5, 2]);
    }
}
