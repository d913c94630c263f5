//! Detail page assembly
//!
//! Pulls together basic metadata, the resolved detail record and scanned
//! images for one paper, and builds the fragments the detail page renders.
//! Session state (paper id, login flag) is explicit; nothing here touches
//! ambient globals.

use crate::details::{PaperBasicInfo, PaperDetail, PaperDetailResolver};
use crate::render;
use crate::scanner::{AssetScanner, ImageKind};
use serde::Serialize;

/// Per-page-view state: which paper, and whether editing controls show
#[derive(Debug, Clone)]
pub struct PageSession {
    pub paper_id: String,
    pub logged_in: bool,
}

impl PageSession {
    pub fn new(paper_id: &str, logged_in: bool) -> Self {
        Self {
            paper_id: paper_id.to_string(),
            logged_in,
        }
    }

    /// Build a session from the page URL, taking the paper id from the
    /// `id` query parameter. A missing or empty id falls back to "1".
    pub fn from_page_url(page_url: &str, logged_in: bool) -> Self {
        let paper_id = url::Url::parse(page_url)
            .ok()
            .and_then(|u| {
                u.query_pairs()
                    .find(|(key, _)| key == "id")
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| "1".to_string());
        Self {
            paper_id,
            logged_in,
        }
    }

    /// Edit buttons and upload controls are shown only when logged in
    pub fn editing_enabled(&self) -> bool {
        self.logged_in
    }
}

/// Everything the detail page renders, as ready-made fragments
#[derive(Debug, Clone, Serialize)]
pub struct PageContent {
    pub title: String,
    pub journal: String,
    pub time: String,
    pub authors: String,
    pub background_html: String,
    pub main_html: String,
    pub conclusion_html: String,
    pub link_html: String,
    pub homepage_images_html: String,
    pub key_images_html: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Error,
}

/// Structured notification event; the embedding shell decides how to
/// surface it (toast, status line, ...)
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Assemble the page fragments from resolved data. Pure.
pub fn build_page_content(basic: &PaperBasicInfo, detail: &PaperDetail) -> PageContent {
    PageContent {
        title: basic.title.clone(),
        journal: basic.journal.clone(),
        time: basic.time.clone(),
        authors: basic.authors.clone(),
        background_html: render::format_paragraphs(&detail.background_content),
        main_html: render::format_paragraphs(&detail.main_content),
        conclusion_html: render::format_paragraphs(&detail.conclusion_content),
        link_html: render::format_link(&detail.link_content),
        homepage_images_html: render::render_image_grid(&detail.homepage_images),
        key_images_html: render::render_image_grid(&detail.key_images),
    }
}

/// Resolve and assemble the full page for one paper.
///
/// When a scanner is supplied, detail records without images fall back to
/// the scanned per-paper folders. Never fails; notifications report what
/// was synthesized.
pub async fn load_page(
    resolver: &PaperDetailResolver,
    scanner: Option<&AssetScanner>,
    session: &PageSession,
) -> (PageContent, Vec<Notification>) {
    let mut notifications = Vec::new();

    let basic = resolver.resolve_basic_info(&session.paper_id).await;
    let mut detail = resolver.resolve_details(&session.paper_id).await;

    if let Some(scanner) = scanner {
        if detail.homepage_images.is_empty() {
            detail.homepage_images = scanner.get_paper_images(&session.paper_id, ImageKind::Homepage);
        }
        if detail.key_images.is_empty() {
            detail.key_images = scanner.get_paper_images(&session.paper_id, ImageKind::Key);
        }
    }

    if detail == PaperDetail::default() {
        notifications.push(Notification {
            level: NotificationLevel::Info,
            message: format!(
                "No stored detail for paper {}; showing placeholders",
                session.paper_id
            ),
        });
    }

    (build_page_content(&basic, &detail), notifications)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::details::{PLACEHOLDER_LINK, PLACEHOLDER_MAIN};
    use crate::render::{NO_CONTENT_MARKER, NO_IMAGES_MARKER};

    #[test]
    fn test_session_from_page_url() {
        let s = PageSession::from_page_url("https://site.test/paper-detail.html?id=7", false);
        assert_eq!(s.paper_id, "7");
        assert!(!s.editing_enabled());
    }

    #[test]
    fn test_session_missing_id_defaults_to_one() {
        let s = PageSession::from_page_url("https://site.test/paper-detail.html", true);
        assert_eq!(s.paper_id, "1");
        assert!(s.editing_enabled());

        let s = PageSession::from_page_url("https://site.test/p.html?id=", false);
        assert_eq!(s.paper_id, "1");

        let s = PageSession::from_page_url("not a url", false);
        assert_eq!(s.paper_id, "1");
    }

    #[test]
    fn test_build_page_content_defaults() {
        let basic = PaperBasicInfo::fallback("5");
        let detail = PaperDetail::default();
        let content = build_page_content(&basic, &detail);

        assert_eq!(content.title, "Paper #5");
        assert!(content.background_html.contains(NO_CONTENT_MARKER));
        assert!(content.main_html.contains(NO_CONTENT_MARKER));
        assert!(content.conclusion_html.contains(NO_CONTENT_MARKER));
        assert_eq!(content.link_html, PLACEHOLDER_LINK);
        assert!(content.homepage_images_html.contains(NO_IMAGES_MARKER));
        assert!(content.key_images_html.contains(NO_IMAGES_MARKER));
    }

    #[test]
    fn test_build_page_content_with_data() {
        let basic = PaperBasicInfo {
            title: "T".to_string(),
            journal: "J".to_string(),
            time: "2024".to_string(),
            authors: "A".to_string(),
        };
        let detail = PaperDetail {
            background_content: "b1\nb2".to_string(),
            main_content: PLACEHOLDER_MAIN.to_string(),
            conclusion_content: "c".to_string(),
            link_content: "https://example.org".to_string(),
            homepage_images: vec!["images/papers/1/homepage/a.png".to_string()],
            key_images: vec![],
        };
        let content = build_page_content(&basic, &detail);

        assert_eq!(content.journal, "J");
        assert!(content.background_html.contains("b1"));
        assert!(content.background_html.contains("b2"));
        assert!(content.main_html.contains(NO_CONTENT_MARKER));
        assert!(content.link_html.starts_with("<a href="));
        assert!(content.homepage_images_html.contains("a.png"));
        assert!(content.key_images_html.contains(NO_IMAGES_MARKER));
    }
}
