//! Page extractors.
//!
//! Each extractor declares which [`PageKind`]s it understands and turns one
//! page into a [`PartialInsights`]. Extraction is synchronous: a page's DOM
//! is parsed once, lazily, and shared by every extractor that runs on it.

mod contact;
mod faq;
pub(crate) mod html;
mod links;
mod policy;
mod products;
mod social;
mod storefront;

use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};

use scraper::Html;
use storelens_core::{Faq, Product, SocialHandle};

use crate::page::{FetchedPage, PageKind};

pub use contact::ContactExtractor;
pub use faq::FaqExtractor;
pub use links::{LinkExtractor, MAX_IMPORTANT_LINKS};
pub use policy::PolicyExtractor;
pub use products::{
    convert_product, ProductCatalogExtractor, ProductJsonExtractor, ProductPageExtractor,
};
pub use social::{parse_social_profile, SocialExtractor};
pub use storefront::{AboutExtractor, StorefrontExtractor};

/// One fetched page as seen by the extractors.
pub struct Page<'a> {
    pub kind: PageKind,
    /// Absolute URL of the page.
    pub url: &'a str,
    /// Store origin, e.g. `https://shop.example.com`.
    pub origin: &'a str,
    pub body: &'a str,
    document: OnceCell<Html>,
}

impl<'a> Page<'a> {
    #[must_use]
    pub fn new(kind: PageKind, url: &'a str, origin: &'a str, body: &'a str) -> Self {
        Self {
            kind,
            url,
            origin,
            body,
            document: OnceCell::new(),
        }
    }

    /// Parsed DOM, built on first use.
    pub fn document(&self) -> &Html {
        self.document.get_or_init(|| Html::parse_document(self.body))
    }
}

/// Fields one extractor found on one page. Empty means "nothing found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialInsights {
    pub store_name: Option<String>,
    pub brand_context: Option<String>,
    pub products: Vec<Product>,
    /// Handles of products linked from the page, in page order.
    pub hero_handles: Vec<String>,
    pub hero_products: Vec<Product>,
    pub policies: BTreeMap<String, String>,
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub address: Option<String>,
    pub social_handles: BTreeMap<String, SocialHandle>,
    pub faqs: Vec<Faq>,
    pub important_links: BTreeMap<String, String>,
}

impl PartialInsights {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A unit of page-level extraction.
pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn applies_to(&self, kind: PageKind) -> bool;

    fn extract(&self, page: &Page<'_>) -> PartialInsights;
}

/// Every extractor, in a stable order.
#[must_use]
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(ProductCatalogExtractor),
        Box::new(ProductJsonExtractor),
        Box::new(ProductPageExtractor),
        Box::new(StorefrontExtractor),
        Box::new(AboutExtractor),
        Box::new(PolicyExtractor),
        Box::new(ContactExtractor),
        Box::new(SocialExtractor),
        Box::new(FaqExtractor),
        Box::new(LinkExtractor),
    ]
}

/// Runs every applicable extractor over every successful page.
///
/// Output order follows `pages` first and `extractors` second, so callers
/// that merge "first wins" get page-order precedence. Empty partials are
/// dropped.
#[must_use]
pub fn extract_pages(
    extractors: &[Box<dyn Extractor>],
    origin: &str,
    pages: &[FetchedPage],
) -> Vec<PartialInsights> {
    let mut partials = Vec::new();
    for fetched in pages {
        let Some(body) = fetched.body() else {
            continue;
        };
        let page = Page::new(fetched.request.kind, &fetched.url, origin, body);
        for extractor in extractors.iter().filter(|e| e.applies_to(page.kind)) {
            let partial = extractor.extract(&page);
            if partial.is_empty() {
                continue;
            }
            tracing::trace!(
                extractor = extractor.name(),
                url = %fetched.url,
                "extractor produced fields"
            );
            partials.push(partial);
        }
    }
    partials
}
