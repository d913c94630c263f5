//! HTML fragment builders for resolved paper details
//!
//! Pure functions from data to markup strings; applying the fragments to a
//! page is the embedding shell's job. Class names match the site's
//! stylesheet.

use crate::details::{
    PLACEHOLDER_BACKGROUND, PLACEHOLDER_CONCLUSION, PLACEHOLDER_LINK, PLACEHOLDER_MAIN,
};
use html_escape::{encode_double_quoted_attribute, encode_text};

pub const NO_CONTENT_MARKER: &str = "No content";
pub const NO_IMAGES_MARKER: &str = "No images";

fn is_text_placeholder(text: &str) -> bool {
    text == PLACEHOLDER_BACKGROUND || text == PLACEHOLDER_MAIN || text == PLACEHOLDER_CONCLUSION
}

fn no_content_fragment() -> String {
    format!(
        "<p class=\"text-gray-500 italic\">{}</p>",
        NO_CONTENT_MARKER
    )
}

/// Format a text field as paragraphs: one `<p>` per non-blank line, in
/// order. Empty or placeholder-equal input renders the "no content" marker.
pub fn format_paragraphs(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() || is_text_placeholder(trimmed) {
        return no_content_fragment();
    }

    let paragraphs: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if paragraphs.is_empty() {
        return no_content_fragment();
    }

    paragraphs
        .iter()
        .map(|line| format!("<p class=\"paragraph-content\">{}</p>", encode_text(line)))
        .collect::<Vec<_>>()
        .join("")
}

/// Format the full-text link field. An http(s) value becomes an anchor
/// opening in a new tab; any other non-empty value renders as literal text;
/// empty or placeholder input renders the "no link" marker.
pub fn format_link(content: &str) -> String {
    let content = content.trim();
    if content.is_empty() || content == PLACEHOLDER_LINK {
        return PLACEHOLDER_LINK.to_string();
    }

    if content.starts_with("http://") || content.starts_with("https://") {
        let href = encode_double_quoted_attribute(content);
        return format!(
            "<a href=\"{}\" target=\"_blank\" class=\"text-blue-600 hover:text-blue-800 underline break-all\">{}</a>",
            href,
            encode_text(content)
        );
    }

    encode_text(content).to_string()
}

/// Render an image list as a grid of clickable items, stored order
/// preserved. Clicking an item opens the full-size viewer.
pub fn render_image_grid(images: &[String]) -> String {
    if images.is_empty() {
        return format!(
            "<p class=\"text-gray-500 text-center py-8\">{}</p>",
            NO_IMAGES_MARKER
        );
    }

    images
        .iter()
        .map(|url| {
            let src = encode_double_quoted_attribute(url.as_str()).into_owned();
            // The viewer call sits inside a single-quoted JS string
            let viewer_arg = src.replace('\'', "\\'");
            format!(
                "<div class=\"image-item bg-gray-100 rounded-lg overflow-hidden relative group mb-4\">\
                 <img src=\"{}\" alt=\"Paper figure\" class=\"w-full h-auto cursor-pointer\" \
                 onclick=\"openImageModal('{}')\"></div>",
                src, viewer_arg
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
