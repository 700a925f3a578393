//! Parsing the model's reply and folding it into the record.

use serde::Deserialize;
use serde_json::Value;
use storelens_core::{BrandInsights, Faq};

use crate::error::EnhancerError;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Enhancement {
    #[serde(default)]
    pub brand_context: Option<String>,
    #[serde(default)]
    pub faqs: Vec<EnhancedFaq>,
    #[serde(default)]
    pub payment_methods: Vec<String>,
    #[serde(default)]
    pub currencies: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EnhancedFaq {
    pub question: String,
    pub answer: String,
}

/// Pulls `choices[0].message.content` out of a chat completion.
pub(crate) fn message_content(completion: &Value) -> Result<&str, EnhancerError> {
    completion
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .ok_or(EnhancerError::EmptyResponse)
}

/// Parses the JSON object the model was asked for. A fenced code block
/// around the object is tolerated.
pub(crate) fn parse_enhancement(content: &str) -> Result<Enhancement, EnhancerError> {
    let trimmed = content.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(unfenced.trim())?)
}

/// Applies the non-empty parts of `enhancement` to `record`.
pub(crate) fn apply(mut record: BrandInsights, enhancement: Enhancement) -> BrandInsights {
    if let Some(context) = enhancement
        .brand_context
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
    {
        record.brand_context = Some(context);
    }

    let faqs: Vec<Faq> = enhancement
        .faqs
        .into_iter()
        .map(|f| Faq {
            question: f.question.trim().to_owned(),
            answer: f.answer.trim().to_owned(),
        })
        .filter(|f| !f.question.is_empty() && !f.answer.is_empty())
        .collect();
    if !faqs.is_empty() {
        record.faqs = faqs;
    }

    let payment_methods = clean_list(enhancement.payment_methods, false);
    if !payment_methods.is_empty() {
        record.payment_methods = payment_methods;
    }
    let currencies = clean_list(enhancement.currencies, true);
    if !currencies.is_empty() {
        record.currencies_accepted = currencies;
    }

    record.enhanced = true;
    record
}

fn clean_list(items: Vec<String>, uppercase: bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let item = if uppercase {
            item.to_ascii_uppercase()
        } else {
            item.to_owned()
        };
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
