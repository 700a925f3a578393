//! Store identity from the home and about pages.

use super::html::{main_text, meta_content, title_text, truncate_chars, ANCHOR};
use super::products::handle_from_url;
use super::{Extractor, Page, PartialInsights};
use crate::client::resolve_url;
use crate::page::PageKind;

/// Most product handles taken from the home page.
pub const MAX_HERO_PRODUCTS: usize = 10;

const MAX_ABOUT_CHARS: usize = 1000;
const MIN_ABOUT_CHARS: usize = 50;

/// Home page: store name, brand description, and featured product handles.
pub struct StorefrontExtractor;

impl Extractor for StorefrontExtractor {
    fn name(&self) -> &'static str {
        "storefront"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind == PageKind::Home
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let document = page.document();
        let store_name = meta_content(document, "property", "og:site_name")
            .or_else(|| title_text(document).and_then(|t| store_name_from_title(&t)));
        let brand_context = meta_content(document, "name", "description")
            .or_else(|| meta_content(document, "property", "og:description"));

        let mut hero_handles: Vec<String> = Vec::new();
        for href in document.select(&ANCHOR).filter_map(|a| a.value().attr("href")) {
            if !href.contains("/products/") {
                continue;
            }
            let Some(handle) = resolve_url(page.url, href).and_then(|u| handle_from_url(&u))
            else {
                continue;
            };
            if !hero_handles.contains(&handle) {
                hero_handles.push(handle);
            }
            if hero_handles.len() == MAX_HERO_PRODUCTS {
                break;
            }
        }

        PartialInsights {
            store_name,
            brand_context,
            hero_handles,
            ..PartialInsights::default()
        }
    }
}

/// First segment of a `<title>` such as `"Acme Goods – Home"`.
fn store_name_from_title(title: &str) -> Option<String> {
    let name = [" | ", " – ", " — ", " - "]
        .iter()
        .find_map(|sep| title.split_once(sep).map(|(head, _)| head))
        .unwrap_or(title)
        .trim();
    (!name.is_empty()).then(|| name.to_owned())
}

/// About page: its main text, as a fallback brand description.
pub struct AboutExtractor;

impl Extractor for AboutExtractor {
    fn name(&self) -> &'static str {
        "about"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind == PageKind::About
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let text = main_text(page.document());
        if text.chars().count() < MIN_ABOUT_CHARS {
            return PartialInsights::default();
        }
        PartialInsights {
            brand_context: Some(truncate_chars(&text, MAX_ABOUT_CHARS)),
            ..PartialInsights::default()
        }
    }
}
