//! Merges per-page partial results into one [`BrandInsights`].
//!
//! Partials are consumed in order, and the order is the precedence:
//!
//! | field                                         | rule                               |
//! |-----------------------------------------------|------------------------------------|
//! | `store_name`, `brand_context`, `address`      | first non-empty value wins         |
//! | `hero_products`, `faqs`                       | first non-empty list wins          |
//! | `product_catalog`                             | concatenated, deduplicated, capped |
//! | `policies`, `social_handles`                  | union by key, first value wins     |
//! | `important_links`                             | union by label and URL, capped     |
//! | `emails`, `phones`                            | union                              |

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use storelens_core::{BrandInsights, Product, MAX_CATALOG_PRODUCTS};

use crate::extract::{PartialInsights, MAX_IMPORTANT_LINKS};

/// Builds the record for `store_url` from `partials`.
///
/// With no partials every collection is empty and every scalar is `None`.
#[must_use]
pub fn aggregate<I>(store_url: &str, analyzed_at: DateTime<Utc>, partials: I) -> BrandInsights
where
    I: IntoIterator<Item = PartialInsights>,
{
    let mut record = BrandInsights::empty(store_url, analyzed_at);
    let mut seen_products: HashSet<String> = HashSet::new();
    let mut seen_link_urls: HashSet<String> = HashSet::new();

    for partial in partials {
        first_non_empty(&mut record.store_name, partial.store_name);
        first_non_empty(&mut record.brand_context, partial.brand_context);
        first_non_empty(&mut record.contact_info.address, partial.address);

        if record.hero_products.is_empty() {
            record.hero_products = partial.hero_products;
        }
        if record.faqs.is_empty() {
            record.faqs = partial.faqs;
        }

        for product in partial.products {
            if seen_products.insert(product_key(&product)) {
                record.product_catalog.push(product);
            }
        }

        for (key, value) in partial.policies {
            record.policies.entry(key).or_insert(value);
        }
        for (key, value) in partial.social_handles {
            record.social_handles.entry(key).or_insert(value);
        }
        for (label, url) in partial.important_links {
            if record.important_links.len() >= MAX_IMPORTANT_LINKS
                || record.important_links.contains_key(&label)
                || seen_link_urls.contains(&url)
            {
                continue;
            }
            seen_link_urls.insert(url.clone());
            record.important_links.insert(label, url);
        }

        record.contact_info.emails.extend(partial.emails);
        record.contact_info.phones.extend(partial.phones);
    }

    record.total_products = record.product_catalog.len();
    record.product_catalog.truncate(MAX_CATALOG_PRODUCTS);
    record
}

fn first_non_empty(slot: &mut Option<String>, candidate: Option<String>) {
    if slot.is_some() {
        return;
    }
    *slot = candidate
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty());
}

fn product_key(product: &Product) -> String {
    product
        .handle
        .clone()
        .or_else(|| product.url.clone())
        .unwrap_or_else(|| product.title.to_lowercase())
}
