use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use crate::browser::RESULT_ITEM_CLASS;

/// Class carried by the caption element inside a result container.
const CAPTION_CLASS: &str = "PinAttributionTitle__title";

/// One scraped search result, before its image has been probed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub image_src: String,
    pub title: String,
}

/// Walk the rendered search page for result containers and derive one
/// candidate per container, in document order, without deduplication.
///
/// Both the inner image and the caption are optional: a container
/// missing either still yields a candidate with empty fields. When the
/// caption is absent or empty, the title falls back to the first
/// comma-separated tag from the image's alt text.
pub fn extract_candidates(html: &str) -> Vec<ImageCandidate> {
    let document = Html::parse_document(html);

    let item_selector = Selector::parse(&format!("div.{}", RESULT_ITEM_CLASS)).unwrap();
    let image_selector = Selector::parse("img").unwrap();
    let caption_selector = Selector::parse(&format!(".{}", CAPTION_CLASS)).unwrap();

    document
        .select(&item_selector)
        .map(|item| {
            let image = item.select(&image_selector).next();
            let caption = item.select(&caption_selector).next();

            let tags = image
                .and_then(|img| img.value().attr("alt"))
                .map(collapse_whitespace)
                .unwrap_or_default();

            let image_url = image.and_then(|img| img.value().attr("src")).unwrap_or("");

            let caption_text = caption
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .unwrap_or_default();

            let title = if caption_text.is_empty() {
                tags.split(',').next().unwrap_or("").to_string()
            } else {
                caption_text
            };

            ImageCandidate {
                image_src: rewrite_image_src(image_url),
                title,
            }
        })
        .collect()
}

/// Replace the first thumbnail size token (`236x314`, `736x`, ...) in a
/// source URL with the `originals` path segment, leaving the rest of
/// the URL untouched.
pub fn rewrite_image_src(src: &str) -> String {
    let size_token = Regex::new(r"\d+x\d*").unwrap();
    size_token.replace(src, "originals").into_owned()
}

/// Trim and collapse every whitespace run to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
