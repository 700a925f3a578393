//! The aggregated record describing one analyzed storefront.
//!
//! `BrandInsights` is what the pipeline produces, what the store persists as
//! a single JSON document, and what the API returns. Keyed collections use
//! `BTreeMap`/`BTreeSet` so serialized output is stable across runs.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound on `product_catalog` length. `total_products` keeps the
/// uncapped count.
pub const MAX_CATALOG_PRODUCTS: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrandInsights {
    /// Normalized storefront URL; the record's unique key.
    pub store_url: String,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub product_catalog: Vec<Product>,
    #[serde(default)]
    pub total_products: usize,
    /// Products linked from the storefront home page.
    #[serde(default)]
    pub hero_products: Vec<Product>,
    /// Policy name (`privacy`, `refund`, `terms`, `shipping`) to page text.
    #[serde(default)]
    pub policies: BTreeMap<String, String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    /// Platform name (`instagram`, `tiktok`, ...) to profile.
    #[serde(default)]
    pub social_handles: BTreeMap<String, SocialHandle>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    /// Link label to absolute URL.
    #[serde(default)]
    pub important_links: BTreeMap<String, String>,
    #[serde(default)]
    pub brand_context: Option<String>,
    #[serde(default)]
    pub currencies_accepted: Vec<String>,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    /// `true` only when an LLM pass succeeded on this record.
    #[serde(default)]
    pub enhanced: bool,
    pub analyzed_at: DateTime<Utc>,
}

impl BrandInsights {
    /// A record with every collection empty.
    #[must_use]
    pub fn empty(store_url: impl Into<String>, analyzed_at: DateTime<Utc>) -> Self {
        Self {
            store_url: store_url.into(),
            store_name: None,
            product_catalog: Vec::new(),
            total_products: 0,
            hero_products: Vec::new(),
            policies: BTreeMap::new(),
            contact_info: ContactInfo::default(),
            social_handles: BTreeMap::new(),
            faqs: Vec::new(),
            important_links: BTreeMap::new(),
            brand_context: None,
            currencies_accepted: Vec::new(),
            payment_methods: Vec::new(),
            enhanced: false,
            analyzed_at,
        }
    }

    /// Returns `true` when the record was analyzed less than `ttl` ago.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.analyzed_at) < ttl
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    #[serde(default)]
    pub handle: Option<String>,
    /// Price as the storefront reports it, e.g. `"24.99"`.
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_available() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub emails: BTreeSet<String>,
    #[serde(default)]
    pub phones: BTreeSet<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl ContactInfo {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty() && self.address.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialHandle {
    pub url: String,
    /// Account name parsed from the profile URL, when recognizable.
    #[serde(default)]
    pub handle: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hours_ago: i64) -> DateTime<Utc> {
        Utc::now() - chrono::Duration::hours(hours_ago)
    }

    #[test]
    fn empty_record_has_no_collections() {
        let record = BrandInsights::empty("https://example.com", Utc::now());
        assert!(record.product_catalog.is_empty());
        assert!(record.policies.is_empty());
        assert!(record.contact_info.is_empty());
        assert!(record.social_handles.is_empty());
        assert!(record.faqs.is_empty());
        assert!(record.important_links.is_empty());
        assert!(!record.enhanced);
    }

    #[test]
    fn freshness_respects_ttl() {
        let ttl = chrono::Duration::hours(24);
        assert!(BrandInsights::empty("https://a.com", at(2)).is_fresh(Utc::now(), ttl));
        assert!(!BrandInsights::empty("https://a.com", at(30)).is_fresh(Utc::now(), ttl));
    }

    #[test]
    fn deserializes_sparse_document_with_defaults() {
        let raw = r#"{"store_url":"https://a.com","analyzed_at":"2026-01-01T00:00:00Z",
            "product_catalog":[{"title":"Tee"}]}"#;
        let record: BrandInsights = serde_json::from_str(raw).expect("valid document");
        assert_eq!(record.product_catalog.len(), 1);
        assert!(record.product_catalog[0].available);
        assert!(record.product_catalog[0].price.is_none());
        assert!(record.contact_info.emails.is_empty());
    }

    #[test]
    fn keyed_collections_serialize_in_key_order() {
        let mut record = BrandInsights::empty("https://a.com", Utc::now());
        record
            .important_links
            .insert("Track Order".into(), "https://a.com/track".into());
        record
            .important_links
            .insert("Blog".into(), "https://a.com/blogs/news".into());
        let json = serde_json::to_string(&record.important_links).expect("serialize");
        assert!(json.find("Blog").unwrap() < json.find("Track Order").unwrap());
    }
}
