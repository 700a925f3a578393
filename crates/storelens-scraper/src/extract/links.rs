//! Navigation links a shopper would look for: order tracking, blog, support.

use super::html::{clean_text, ANCHOR};
use super::social::is_social_url;
use super::{Extractor, Page, PartialInsights};
use crate::client::resolve_url;
use crate::page::PageKind;

pub const MAX_IMPORTANT_LINKS: usize = 15;
const MAX_LABEL_CHARS: usize = 60;

const KEYWORDS: &[&str] = &[
    "track",
    "order",
    "blog",
    "news",
    "contact",
    "support",
    "help",
    "shipping",
    "size-guide",
    "careers",
    "about",
];

pub struct LinkExtractor;

impl Extractor for LinkExtractor {
    fn name(&self) -> &'static str {
        "links"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        matches!(kind, PageKind::Home | PageKind::Contact | PageKind::About)
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let mut partial = PartialInsights::default();
        let mut seen_urls: Vec<String> = Vec::new();

        for anchor in page.document().select(&ANCHOR) {
            if partial.important_links.len() >= MAX_IMPORTANT_LINKS {
                break;
            }
            let Some(href) = anchor.value().attr("href").map(str::trim) else {
                continue;
            };
            if href.starts_with('#') {
                continue;
            }
            let text = clean_text(&anchor.text().collect::<String>());
            let haystack = format!("{} {}", text.to_lowercase(), href.to_lowercase());
            let Some(keyword) = KEYWORDS.iter().find(|k| haystack.contains(*k)) else {
                continue;
            };
            // `resolve_url` drops mailto:, tel: and javascript: targets.
            let Some(url) = resolve_url(page.url, href) else {
                continue;
            };
            if is_social_url(&url) || seen_urls.contains(&url) {
                continue;
            }

            let label = if text.is_empty() || text.chars().count() > MAX_LABEL_CHARS {
                title_case(keyword)
            } else {
                text
            };
            if partial.important_links.contains_key(&label) {
                continue;
            }
            seen_urls.push(url.clone());
            partial.important_links.insert(label, url);
        }
        partial
    }
}

/// `"size-guide"` becomes `"Size Guide"`.
fn title_case(keyword: &str) -> String {
    keyword
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}
