//! Product discovery through the storefront sitemap.
//!
//! Used when `/products.json` is unavailable. Shopify publishes product URLs
//! in `/sitemap_products_1.xml`, which is also linked from the `/sitemap.xml`
//! index.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ScraperError;

/// Most product URLs taken from a sitemap.
pub const MAX_SITEMAP_PRODUCTS: usize = 50;

pub const PRODUCT_SITEMAP_PATH: &str = "/sitemap_products_1.xml";
pub const SITEMAP_INDEX_PATH: &str = "/sitemap.xml";

/// Every `<loc>` value in a sitemap or sitemap index, in document order.
///
/// # Errors
///
/// Returns [`ScraperError::Xml`] if the document is malformed.
pub fn parse_locs(xml: &str, context: &str) -> Result<Vec<String>, ScraperError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                in_loc = e.local_name().as_ref() == b"loc";
            }
            Ok(Event::End(_)) => in_loc = false,
            Ok(Event::Text(e)) if in_loc => {
                let text = e.unescape().unwrap_or_default().trim().to_owned();
                if !text.is_empty() {
                    locs.push(text);
                }
            }
            Ok(Event::CData(e)) if in_loc => {
                let text = String::from_utf8_lossy(e.as_ref()).trim().to_owned();
                if !text.is_empty() {
                    locs.push(text);
                }
            }
            Ok(Event::Eof) => break,
            Err(source) => {
                return Err(ScraperError::Xml {
                    context: context.to_owned(),
                    source,
                })
            }
            _ => {}
        }
    }

    Ok(locs)
}

/// Product page URLs from a product sitemap, capped at
/// [`MAX_SITEMAP_PRODUCTS`] and deduplicated.
#[must_use]
pub fn product_urls(locs: &[String]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for loc in locs.iter().filter(|l| l.contains("/products/")) {
        if !urls.contains(loc) {
            urls.push(loc.clone());
        }
        if urls.len() == MAX_SITEMAP_PRODUCTS {
            break;
        }
    }
    urls
}

/// The first child sitemap of an index that lists products.
#[must_use]
pub fn product_sitemap_url(index_locs: &[String]) -> Option<&str> {
    index_locs
        .iter()
        .map(String::as_str)
        .find(|loc| loc.contains("sitemap_products"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCT_SITEMAP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"
        xmlns:image="http://www.google.com/schemas/sitemap-image/1.1">
  <url><loc>https://shop.example.com/</loc></url>
  <url>
    <loc>https://shop.example.com/products/linen-shirt</loc>
    <image:image><image:loc>https://cdn.example.com/shirt.jpg</image:loc></image:image>
  </url>
  <url><loc>https://shop.example.com/products/canvas-tote</loc></url>
  <url><loc>https://shop.example.com/products/linen-shirt</loc></url>
</urlset>"#;

    #[test]
    fn extracts_product_locs_only() {
        let locs = parse_locs(PRODUCT_SITEMAP, "test").unwrap();
        assert_eq!(
            product_urls(&locs),
            vec![
                "https://shop.example.com/products/linen-shirt",
                "https://shop.example.com/products/canvas-tote",
            ]
        );
    }

    #[test]
    fn finds_product_sitemap_in_index() {
        let index = r#"<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap><loc>https://shop.example.com/sitemap_pages_1.xml</loc></sitemap>
  <sitemap><loc>https://shop.example.com/sitemap_products_1.xml?from=1&amp;to=9</loc></sitemap>
</sitemapindex>"#;
        let locs = parse_locs(index, "test").unwrap();
        assert_eq!(
            product_sitemap_url(&locs),
            Some("https://shop.example.com/sitemap_products_1.xml?from=1&to=9")
        );
    }

    #[test]
    fn caps_product_urls() {
        let locs: Vec<String> = (0..80)
            .map(|i| format!("https://shop.example.com/products/p{i}"))
            .collect();
        assert_eq!(product_urls(&locs).len(), MAX_SITEMAP_PRODUCTS);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let result = parse_locs("<urlset><url><loc>x</url></urlset>", "broken");
        assert!(matches!(result, Err(ScraperError::Xml { .. })));
    }
}
