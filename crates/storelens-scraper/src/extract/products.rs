//! Product extraction from the JSON endpoints and from product HTML pages.

use std::sync::LazyLock;

use scraper::Selector;
use serde_json::Value;
use storelens_core::Product;

use super::html::{clean_text, meta_content, strip_tags, truncate_chars};
use super::{Extractor, Page, PartialInsights};
use crate::page::PageKind;
use crate::types::{ShopifyProduct, ShopifyProductResponse, ShopifyProductsResponse};

/// Longest product description kept, in characters.
const MAX_DESCRIPTION_CHARS: usize = 1000;

static LD_JSON: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid ld+json selector")
});
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));

/// Converts a storefront JSON product into the catalog shape.
///
/// Price comes from the first variant. The product is available when any
/// variant is.
#[must_use]
pub fn convert_product(product: ShopifyProduct, origin: &str) -> Product {
    let price = product.variants.first().and_then(|v| v.price.clone());
    let available = product.variants.is_empty() || product.variants.iter().any(|v| v.available);
    let image_url = product
        .image
        .map(|i| i.src)
        .or_else(|| product.images.into_iter().next().map(|i| i.src));
    let description = product
        .body_html
        .as_deref()
        .map(strip_tags)
        .filter(|d| !d.is_empty())
        .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS));

    Product {
        url: Some(format!("{origin}/products/{}", product.handle)),
        handle: Some(product.handle),
        title: clean_text(&product.title),
        price,
        image_url,
        description,
        vendor: product.vendor.filter(|v| !v.trim().is_empty()),
        product_type: product.product_type.filter(|t| !t.trim().is_empty()),
        available,
        tags: product.tags,
    }
}

/// `/products.json` catalog pages.
pub struct ProductCatalogExtractor;

impl Extractor for ProductCatalogExtractor {
    fn name(&self) -> &'static str {
        "product_catalog"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind == PageKind::Catalog
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let response: ShopifyProductsResponse = match serde_json::from_str(page.body) {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(url = page.url, error = %e, "catalog page did not parse");
                return PartialInsights::default();
            }
        };
        PartialInsights {
            products: response
                .products
                .into_iter()
                .map(|p| convert_product(p, page.origin))
                .collect(),
            ..PartialInsights::default()
        }
    }
}

/// `/products/<handle>.json` single-product documents.
pub struct ProductJsonExtractor;

impl Extractor for ProductJsonExtractor {
    fn name(&self) -> &'static str {
        "product_json"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind == PageKind::ProductJson
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        match serde_json::from_str::<ShopifyProductResponse>(page.body) {
            Ok(r) => PartialInsights {
                products: vec![convert_product(r.product, page.origin)],
                ..PartialInsights::default()
            },
            Err(e) => {
                tracing::debug!(url = page.url, error = %e, "product document did not parse");
                PartialInsights::default()
            }
        }
    }
}

/// Product HTML pages, read through their `schema.org/Product` JSON-LD or,
/// failing that, the page heading and price meta tags.
pub struct ProductPageExtractor;

impl Extractor for ProductPageExtractor {
    fn name(&self) -> &'static str {
        "product_page"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind == PageKind::ProductPage
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let product = product_from_ld_json(page).or_else(|| product_from_markup(page));
        PartialInsights {
            products: product.into_iter().collect(),
            ..PartialInsights::default()
        }
    }
}

/// Product handle from a `/products/<handle>` URL, also inside collections.
pub(crate) fn handle_from_url(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    segments.find(|s| *s == "products")?;
    segments
        .next()
        .filter(|h| !h.is_empty())
        .map(|h| h.trim_end_matches(".json").to_owned())
}

fn product_from_ld_json(page: &Page<'_>) -> Option<Product> {
    page.document()
        .select(&LD_JSON)
        .filter_map(|script| serde_json::from_str::<Value>(&script.text().collect::<String>()).ok())
        .find_map(|value| find_product_node(&value).cloned())
        .and_then(|node| ld_product(&node, page.url))
}

/// Finds the first node typed `Product` in a JSON-LD value, looking through
/// top-level arrays and `@graph`.
fn find_product_node(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_product_node),
        Value::Object(map) => {
            let is_product = match map.get("@type") {
                Some(Value::String(t)) => t == "Product",
                Some(Value::Array(types)) => types.iter().any(|t| t == "Product"),
                _ => false,
            };
            if is_product {
                Some(value)
            } else {
                map.get("@graph").and_then(find_product_node)
            }
        }
        _ => None,
    }
}

fn ld_product(node: &Value, url: &str) -> Option<Product> {
    let title = clean_text(node.get("name")?.as_str()?);
    if title.is_empty() {
        return None;
    }
    let offer = match node.get("offers") {
        Some(Value::Array(offers)) => offers.first(),
        other => other,
    };
    let price = offer.and_then(|o| o.get("price")).and_then(|p| match p {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let available = offer
        .and_then(|o| o.get("availability"))
        .and_then(Value::as_str)
        .map_or(true, |a| !a.ends_with("OutOfStock"));
    let image_url = match node.get("image") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(images)) => images.first().and_then(|i| match i {
            Value::String(s) => Some(s.clone()),
            other => other.get("url").and_then(Value::as_str).map(str::to_owned),
        }),
        Some(obj @ Value::Object(_)) => obj.get("url").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    };
    let description = node
        .get("description")
        .and_then(Value::as_str)
        .map(strip_tags)
        .filter(|d| !d.is_empty())
        .map(|d| truncate_chars(&d, MAX_DESCRIPTION_CHARS));
    let vendor = match node.get("brand") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(b) => b.get("name").and_then(Value::as_str).map(str::to_owned),
        None => None,
    };

    Some(Product {
        title,
        handle: handle_from_url(url),
        price,
        url: Some(url.to_owned()),
        image_url,
        description,
        vendor,
        product_type: None,
        available,
        tags: Vec::new(),
    })
}

fn product_from_markup(page: &Page<'_>) -> Option<Product> {
    let document = page.document();
    let title = document
        .select(&H1)
        .next()
        .map(|h| clean_text(&h.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .or_else(|| meta_content(document, "property", "og:title"))?;

    Some(Product {
        title,
        handle: handle_from_url(page.url),
        price: meta_content(document, "property", "product:price:amount")
            .or_else(|| meta_content(document, "property", "og:price:amount")),
        url: Some(page.url.to_owned()),
        image_url: meta_content(document, "property", "og:image"),
        description: meta_content(document, "property", "og:description"),
        vendor: None,
        product_type: None,
        available: true,
        tags: Vec::new(),
    })
}
