//! Storefront fetching and extraction.
//!
//! [`analyze_store`] runs the whole pass for one store: the fixed page plan
//! and the product catalog are fetched concurrently, every page is run
//! through the [`extract`] extractors, and the partial results are merged by
//! [`aggregate::aggregate`].

pub mod aggregate;
pub mod catalog;
pub mod client;
pub mod error;
pub mod extract;
pub mod page;
pub mod pagination;
pub mod pipeline;
pub mod sitemap;
pub mod types;

pub use aggregate::aggregate;
pub use client::{
    extract_store_origin, normalize_store_url, resolve_url, RawPage, StorefrontClient,
};
pub use error::ScraperError;
pub use extract::{default_extractors, extract_pages, Extractor, Page, PartialInsights};
pub use page::{default_fetch_plan, FetchedPage, PageKind, PageOutcome, PageRequest, PolicyKind};
pub use pipeline::analyze_store;
