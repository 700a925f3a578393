//! Catalog discovery: `/products.json` pagination with a sitemap fallback.
//!
//! The result is a list of fetched pages, not products. Product conversion
//! happens in the extractors like for every other page.

use futures::future::join_all;

use crate::client::StorefrontClient;
use crate::error::ScraperError;
use crate::page::{FetchedPage, PageKind, PageOutcome, PageRequest};
use crate::pagination::{catalog_page_url, next_page_cursor, MAX_PAGES};
use crate::sitemap::{
    parse_locs, product_sitemap_url, product_urls, PRODUCT_SITEMAP_PATH, SITEMAP_INDEX_PATH,
};
use crate::types::ShopifyProductsResponse;

/// Fetches the store catalog.
///
/// Follows `Link` cursors from the first `/products.json` page until the last
/// page, an empty page, a failed page, or [`MAX_PAGES`]. Pages fetched before
/// a mid-pagination failure are kept.
///
/// When the first page fails or lists no products, product HTML pages are
/// discovered through the sitemap instead and returned as
/// [`PageKind::ProductPage`] pages.
pub async fn fetch_catalog(client: &StorefrontClient, origin: &str) -> Vec<FetchedPage> {
    let mut pages = Vec::new();
    let mut cursor: Option<String> = None;

    for page_number in 1..=MAX_PAGES {
        let url = catalog_page_url(origin, cursor.as_deref());
        let path = url.strip_prefix(origin).unwrap_or(&url).to_owned();
        let page = client
            .fetch_request(PageRequest::new(path, PageKind::Catalog), url)
            .await;

        let parsed = page
            .body()
            .map(|body| catalog_product_count(body, &page.url));
        let Some(Ok(count)) = parsed else {
            if let Some(Err(e)) = &parsed {
                tracing::debug!(error = %e, "catalog page is not a products listing");
            }
            if page_number == 1 {
                tracing::info!(origin, "products.json unavailable; trying sitemap");
            } else {
                tracing::warn!(origin, page_number, "catalog page failed; keeping earlier pages");
            }
            break;
        };
        if count == 0 {
            break;
        }

        cursor = match &page.outcome {
            PageOutcome::Fetched { link_header, .. } => {
                next_page_cursor(link_header.as_deref())
            }
            PageOutcome::Failed { .. } => None,
        };
        pages.push(page);

        if cursor.is_none() {
            break;
        }
        if page_number == MAX_PAGES {
            tracing::warn!(origin, max_pages = MAX_PAGES, "catalog pagination limit reached");
        }
    }

    if pages.is_empty() {
        return fetch_sitemap_products(client, origin).await;
    }
    pages
}

fn catalog_product_count(body: &str, url: &str) -> Result<usize, ScraperError> {
    serde_json::from_str::<ShopifyProductsResponse>(body)
        .map(|response| response.products.len())
        .map_err(|source| ScraperError::Deserialize {
            context: url.to_owned(),
            source,
        })
}

/// Fetches up to [`crate::sitemap::MAX_SITEMAP_PRODUCTS`] product pages
/// listed in the store's product sitemap.
async fn fetch_sitemap_products(client: &StorefrontClient, origin: &str) -> Vec<FetchedPage> {
    let Some(locs) = product_sitemap_locs(client, origin).await else {
        tracing::info!(origin, "no product sitemap found");
        return Vec::new();
    };

    let fetches = product_urls(&locs).into_iter().map(|url| {
        let path = reqwest::Url::parse(&url).map_or_else(|_| url.clone(), |u| u.path().to_owned());
        client.fetch_request(PageRequest::new(path, PageKind::ProductPage), url)
    });
    join_all(fetches).await
}

async fn product_sitemap_locs(client: &StorefrontClient, origin: &str) -> Option<Vec<String>> {
    let direct = format!("{origin}{PRODUCT_SITEMAP_PATH}");
    if let Some(locs) = fetch_locs(client, &direct).await {
        return Some(locs);
    }

    let index_url = format!("{origin}{SITEMAP_INDEX_PATH}");
    let index = fetch_locs(client, &index_url).await?;
    let child = product_sitemap_url(&index)?;
    fetch_locs(client, child).await
}

async fn fetch_locs(client: &StorefrontClient, url: &str) -> Option<Vec<String>> {
    let raw = client
        .fetch_page(url)
        .await
        .map_err(|e| tracing::debug!(url, error = %e, "sitemap fetch failed"))
        .ok()?;
    parse_locs(&raw.body, url)
        .map_err(|e| tracing::debug!(url, error = %e, "sitemap parse failed"))
        .ok()
}
