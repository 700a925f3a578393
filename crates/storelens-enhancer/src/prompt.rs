//! The fixed prompt sent for every enhancement.

use std::fmt::Write as _;

use serde_json::{json, Value};
use storelens_core::BrandInsights;

/// Products included in the prompt.
const PRODUCT_SAMPLE: usize = 20;
/// Characters of each policy included in the prompt.
const POLICY_EXCERPT_CHARS: usize = 600;

const SYSTEM_PROMPT: &str = "You are an e-commerce analyst reviewing data scraped from a \
Shopify storefront. Respond with a JSON object with exactly these keys: \
\"brand_context\" (string, a concise professional brand summary under 300 words), \
\"faqs\" (array of objects with \"question\" and \"answer\" strings, cleaned up for \
readability, keeping the original meaning), \"payment_methods\" (array of strings), \
\"currencies\" (array of ISO 4217 codes). Use empty values when the data gives no basis \
for an answer.";

/// Request body for `POST {base_url}/chat/completions`.
pub(crate) fn request_body(model: &str, record: &BrandInsights) -> Value {
    json!({
        "model": model,
        "response_format": { "type": "json_object" },
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": user_prompt(record) }
        ],
        "temperature": 0.1
    })
}

pub(crate) fn user_prompt(record: &BrandInsights) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Store URL: {}", record.store_url);
    if let Some(name) = &record.store_name {
        let _ = writeln!(out, "Store name: {name}");
    }
    let _ = writeln!(
        out,
        "\nBrand context:\n{}",
        record.brand_context.as_deref().unwrap_or("(none found)")
    );

    out.push_str("\nProducts:\n");
    if record.product_catalog.is_empty() {
        out.push_str("(none found)\n");
    }
    for product in record.product_catalog.iter().take(PRODUCT_SAMPLE) {
        let _ = write!(out, "- {}", product.title);
        if let Some(vendor) = &product.vendor {
            let _ = write!(out, " by {vendor}");
        }
        if let Some(price) = &product.price {
            let _ = write!(out, " ({price})");
        }
        out.push('\n');
    }

    if !record.faqs.is_empty() {
        out.push_str("\nFAQs:\n");
        for faq in &record.faqs {
            let _ = writeln!(out, "Q: {}\nA: {}", faq.question, faq.answer);
        }
    }

    for (name, text) in &record.policies {
        let excerpt: String = text.chars().take(POLICY_EXCERPT_CHARS).collect();
        let _ = writeln!(out, "\n{name} policy excerpt:\n{excerpt}");
    }

    out
}
