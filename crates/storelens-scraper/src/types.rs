//! Shopify storefront JSON shapes.
//!
//! `/products.json` wraps a list in `{"products": [...]}` and returns `tags`
//! as an array of strings. `/products/<handle>.json` wraps one product in
//! `{"product": {...}}` and returns `tags` as a single comma-separated
//! string. [`ShopifyProduct::tags`] accepts both.
//!
//! Variant `available` is absent from the single-product endpoint; it
//! defaults to `true`.

use serde::{Deserialize, Deserializer};

/// Top-level response from `GET /products.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductsResponse {
    pub products: Vec<ShopifyProduct>,
}

/// Top-level response from `GET /products/<handle>.json`.
#[derive(Debug, Deserialize)]
pub struct ShopifyProductResponse {
    pub product: ShopifyProduct,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyProduct {
    pub id: i64,
    pub title: String,
    pub handle: String,
    /// Raw HTML description. May be `null` or absent.
    #[serde(default)]
    pub body_html: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    /// May be an empty string; treated as absent during conversion.
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<ShopifyImage>,
    #[serde(default)]
    pub images: Vec<ShopifyImage>,
    #[serde(default)]
    pub variants: Vec<ShopifyVariant>,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyVariant {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    /// Decimal string, e.g. `"30.00"`.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub compare_at_price: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct ShopifyImage {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

fn default_available() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsRepr {
    List(Vec<String>),
    Joined(String),
    Missing(()),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match TagsRepr::deserialize(deserializer)? {
        TagsRepr::List(list) => list,
        TagsRepr::Joined(joined) => joined.split(',').map(str::to_owned).collect(),
        TagsRepr::Missing(()) => Vec::new(),
    };
    Ok(tags
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_accept_array_form() {
        let product: ShopifyProduct = serde_json::from_str(
            r#"{"id":1,"title":"Tee","handle":"tee","tags":["cotton"," summer "]}"#,
        )
        .unwrap();
        assert_eq!(product.tags, vec!["cotton", "summer"]);
    }

    #[test]
    fn tags_accept_comma_separated_form() {
        let product: ShopifyProduct = serde_json::from_str(
            r#"{"id":1,"title":"Tee","handle":"tee","tags":"cotton, summer,"}"#,
        )
        .unwrap();
        assert_eq!(product.tags, vec!["cotton", "summer"]);
    }

    #[test]
    fn tags_accept_null() {
        let product: ShopifyProduct =
            serde_json::from_str(r#"{"id":1,"title":"Tee","handle":"tee","tags":null}"#).unwrap();
        assert!(product.tags.is_empty());
    }

    #[test]
    fn variant_availability_defaults_to_true() {
        let variant: ShopifyVariant = serde_json::from_str(r#"{"id":7,"price":"12.00"}"#).unwrap();
        assert!(variant.available);
        assert_eq!(variant.price.as_deref(), Some("12.00"));
    }
}
