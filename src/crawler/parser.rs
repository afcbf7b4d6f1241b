//! HTML attribute extraction
//!
//! A scraped page records four collections of raw attribute values:
//! - `a[href]` anchors, which the crawler follows
//! - `img[src]` images
//! - `link[href]` stylesheets, icons and other linked resources
//! - `script[src]` scripts
//!
//! Values are kept exactly as written in the markup. Empty values are dropped and
//! repeats collapse to their first occurrence.

use scraper::{Html, Selector};
use std::collections::HashSet;

/// Attribute values extracted from one HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extracted {
    pub anchors: Vec<String>,
    pub images: Vec<String>,
    pub links: Vec<String>,
    pub scripts: Vec<String>,
}

/// Extracts anchors, images, links and scripts from an HTML document
///
/// # Example
///
/// ```
/// use lame_sitemapper::crawler::extract_attributes;
///
/// let html = r#"<html><body><a href="/a"></a><a href="/a"></a><img src="x.png"></body></html>"#;
/// let extracted = extract_attributes(html);
/// assert_eq!(extracted.anchors, vec!["/a".to_string()]);
/// assert_eq!(extracted.images, vec!["x.png".to_string()]);
/// ```
pub fn extract_attributes(html: &str) -> Extracted {
    let document = Html::parse_document(html);

    Extracted {
        anchors: collect_attribute(&document, "a[href]", "href"),
        images: collect_attribute(&document, "img[src]", "src"),
        links: collect_attribute(&document, "link[href]", "href"),
        scripts: collect_attribute(&document, "script[src]", "src"),
    }
}

/// Collects non-empty, first-seen values of `attribute` on elements matching `selector`
fn collect_attribute(document: &Html, selector: &str, attribute: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attribute))
        .filter(|value| !value.is_empty())
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
