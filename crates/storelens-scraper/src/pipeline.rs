//! One store, end to end: fetch, extract, aggregate.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use storelens_core::{BrandInsights, Product};

use crate::aggregate::aggregate;
use crate::catalog::fetch_catalog;
use crate::client::{extract_store_origin, normalize_store_url, StorefrontClient};
use crate::error::ScraperError;
use crate::extract::{default_extractors, extract_pages, Extractor, PartialInsights};
use crate::page::{default_fetch_plan, PageKind, PageRequest};

/// Analyzes the storefront at `store_url`.
///
/// Page failures are skipped, so a store with nothing reachable still yields
/// a record, with empty collections everywhere.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidStoreUrl`] when `store_url` is not a usable
/// http(s) URL. Nothing else fails the analysis.
pub async fn analyze_store(
    client: &StorefrontClient,
    store_url: &str,
    analyzed_at: DateTime<Utc>,
) -> Result<BrandInsights, ScraperError> {
    let store_url = normalize_store_url(store_url)?;
    let origin = extract_store_origin(&store_url);
    let plan = default_fetch_plan();

    let (pages, catalog) = tokio::join!(
        client.fetch_pages(&origin, &plan),
        fetch_catalog(client, &origin)
    );
    let reachable = pages.iter().filter(|p| p.is_success()).count();
    tracing::info!(
        store_url = %store_url,
        pages = pages.len(),
        reachable,
        catalog_pages = catalog.len(),
        "storefront fetched"
    );

    let extractors = default_extractors();
    let page_partials = extract_pages(&extractors, &origin, &pages);
    let catalog_partials = extract_pages(&extractors, &origin, &catalog);

    let hero_handles = page_partials
        .iter()
        .find(|p| !p.hero_handles.is_empty())
        .map(|p| p.hero_handles.clone())
        .unwrap_or_default();
    let hero_products =
        resolve_hero_products(client, &extractors, &origin, &hero_handles, &catalog_partials)
            .await;

    let hero = PartialInsights {
        hero_products,
        ..PartialInsights::default()
    };
    let record = aggregate(
        &store_url,
        analyzed_at,
        page_partials
            .into_iter()
            .chain(catalog_partials)
            .chain(std::iter::once(hero)),
    );

    tracing::info!(
        store_url = %record.store_url,
        total_products = record.total_products,
        policies = record.policies.len(),
        faqs = record.faqs.len(),
        "storefront analyzed"
    );
    Ok(record)
}

/// Looks each handle up in the fetched catalog and fetches
/// `/products/<handle>.json` for the ones it does not contain.
///
/// Handles whose product cannot be found either way are dropped; the result
/// keeps the order of `handles`.
async fn resolve_hero_products(
    client: &StorefrontClient,
    extractors: &[Box<dyn Extractor>],
    origin: &str,
    handles: &[String],
    catalog: &[PartialInsights],
) -> Vec<Product> {
    if handles.is_empty() {
        return Vec::new();
    }

    let mut by_handle: HashMap<String, Product> = catalog
        .iter()
        .flat_map(|p| p.products.iter())
        .filter_map(|p| Some((p.handle.clone()?, p.clone())))
        .collect();

    let missing: Vec<PageRequest> = handles
        .iter()
        .filter(|h| !by_handle.contains_key(h.as_str()))
        .map(|h| PageRequest::new(format!("/products/{h}.json"), PageKind::ProductJson))
        .collect();
    if !missing.is_empty() {
        let pages = client.fetch_pages(origin, &missing).await;
        for product in extract_pages(extractors, origin, &pages)
            .into_iter()
            .flat_map(|p| p.products)
        {
            if let Some(handle) = product.handle.clone() {
                by_handle.entry(handle).or_insert(product);
            }
        }
    }

    handles
        .iter()
        .filter_map(|h| by_handle.get(h).cloned())
        .collect()
}
