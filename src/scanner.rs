//! Image asset scanner
//!
//! Walks a fixed folder topology on the site (`images/homepage`,
//! `images/key`, and one `homepage`/`key` pair per numeric folder under
//! `images/papers/`) by fetching each folder's directory index and parsing
//! it. Scanning is best-effort: a folder that cannot be listed simply
//! contributes nothing, siblings are unaffected.

use crate::fetch::{self, FetchError};
use crate::listing;
use reqwest::Client;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

/// Snapshot of one completed scan: folder key -> image URLs in listing order
pub type ScanIndex = HashMap<String, Vec<String>>;

/// Which of the two image folders a lookup targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Homepage,
    Key,
}

impl ImageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageKind::Homepage => "homepage",
            ImageKind::Key => "key",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct AssetScanner {
    client: Client,
    base_url: String,
    index: RwLock<ScanIndex>,
    scanning: AtomicBool,
}

impl AssetScanner {
    pub fn new(base_url: &str) -> Result<Self, String> {
        Ok(Self {
            client: fetch::build_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: RwLock::new(ScanIndex::new()),
            scanning: AtomicBool::new(false),
        })
    }

    /// Run a full scan and return the resulting index.
    ///
    /// A scan already in progress makes this call return the current
    /// (possibly stale or empty) index immediately instead of starting a
    /// second traversal. The fresh index replaces the old one in a single
    /// write once the traversal finishes, so accessors never observe a
    /// partially built index.
    pub async fn scan(&self) -> ScanIndex {
        if self.scanning.swap(true, Ordering::SeqCst) {
            println!("[Scanner] Scan already in progress, returning current index");
            return self.snapshot();
        }

        println!("[Scanner] Starting image scan at {}", self.base_url);
        let mut fresh = ScanIndex::new();
        self.scan_folder(&mut fresh, "images/homepage").await;
        self.scan_folder(&mut fresh, "images/key").await;
        self.scan_paper_folders(&mut fresh).await;

        let total: usize = fresh.values().map(|v| v.len()).sum();
        println!(
            "[Scanner] Scan complete: {} images across {} folders",
            total,
            fresh.len()
        );

        match self.index.write() {
            Ok(mut guard) => *guard = fresh,
            Err(e) => eprintln!("[Scanner] Failed to publish scan index: {}", e),
        }
        self.scanning.store(false, Ordering::SeqCst);
        self.snapshot()
    }

    /// Scan one folder and record its images under the folder key
    async fn scan_folder(&self, index: &mut ScanIndex, folder_key: &str) {
        let url = format!("{}/{}", self.base_url, folder_key);
        match fetch::fetch_text(&self.client, &url).await {
            Ok(html) => {
                let images = collect_image_urls(&html, folder_key);
                println!(
                    "[Scanner] Folder {}: found {} image(s)",
                    folder_key,
                    images.len()
                );
                index.insert(folder_key.to_string(), images);
            }
            Err(e) => warn_unlistable(folder_key, &e),
        }
    }

    /// Discover numeric paper folders under `images/papers/` and scan the
    /// `homepage`/`key` pair inside each
    async fn scan_paper_folders(&self, index: &mut ScanIndex) {
        let url = format!("{}/images/papers/", self.base_url);
        let html = match fetch::fetch_text(&self.client, &url).await {
            Ok(html) => html,
            Err(e) => {
                warn_unlistable("images/papers/", &e);
                return;
            }
        };

        let paper_ids = listing::paper_folder_ids(&html);
        println!("[Scanner] Found {} paper folder(s)", paper_ids.len());

        for paper_id in paper_ids {
            self.scan_folder(index, &format!("images/papers/{}/homepage", paper_id))
                .await;
            self.scan_folder(index, &format!("images/papers/{}/key", paper_id))
                .await;
        }
    }

    /// Images scanned for one paper's folder, empty if never scanned
    pub fn get_paper_images(&self, paper_id: &str, kind: ImageKind) -> Vec<String> {
        self.lookup(&format!("images/papers/{}/{}", paper_id, kind.as_str()))
    }

    /// Images scanned for one of the site-wide folders
    pub fn get_common_images(&self, kind: ImageKind) -> Vec<String> {
        self.lookup(&format!("images/{}", kind.as_str()))
    }

    /// True iff either of the paper's two folders yielded images
    pub fn has_paper_images(&self, paper_id: &str) -> bool {
        !self.get_paper_images(paper_id, ImageKind::Homepage).is_empty()
            || !self.get_paper_images(paper_id, ImageKind::Key).is_empty()
    }

    /// Clone of the current index
    pub fn snapshot(&self) -> ScanIndex {
        self.index
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    fn lookup(&self, folder_key: &str) -> Vec<String> {
        self.index
            .read()
            .ok()
            .and_then(|guard| guard.get(folder_key).cloned())
            .unwrap_or_default()
    }
}

/// Turn a folder's directory index into asset URLs, listing order preserved.
/// Scheme-qualified hrefs are kept verbatim, everything else is joined onto
/// the folder key.
fn collect_image_urls(html: &str, folder_key: &str) -> Vec<String> {
    listing::parse_entries(html)
        .into_iter()
        .filter(|entry| !entry.is_folder)
        .map(|entry| {
            if entry.name.starts_with("http://") || entry.name.starts_with("https://") {
                entry.name
            } else {
                format!("{}/{}", folder_key, entry.name)
            }
        })
        .collect()
}

fn warn_unlistable(folder_key: &str, err: &FetchError) {
    eprintln!("[Scanner] Cannot list folder {}: {}", folder_key, err);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_image_urls_joins_folder_key() {
        let html = r#"<a href="a.jpg">a.jpg</a><a href="b.png">b.png</a>"#;
        assert_eq!(
            collect_image_urls(html, "images/homepage"),
            vec!["images/homepage/a.jpg", "images/homepage/b.png"]
        );
    }

    #[test]
    fn test_collect_image_urls_absolute_kept_verbatim() {
        let html = r#"<a href="https://cdn.example.org/x.png">x.png</a><a href="y.gif">y</a>"#;
        assert_eq!(
            collect_image_urls(html, "images/key"),
            vec!["https://cdn.example.org/x.png", "images/key/y.gif"]
        );
    }

    #[test]
    fn test_collect_image_urls_ignores_folders() {
        let html = r#"<a href="sub/">sub/</a><a href="c.webp">c.webp</a>"#;
        assert_eq!(collect_image_urls(html, "images/key"), vec!["images/key/c.webp"]);
    }

    #[test]
    fn test_lookups_empty_before_any_scan() {
        let scanner = AssetScanner::new("http://localhost:1").unwrap();
        assert!(scanner.get_common_images(ImageKind::Homepage).is_empty());
        assert!(scanner.get_paper_images("3", ImageKind::Key).is_empty());
        assert!(!scanner.has_paper_images("3"));
    }
}
