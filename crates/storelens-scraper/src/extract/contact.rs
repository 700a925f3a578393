//! Emails, phone numbers and a postal address.

use std::sync::LazyLock;

use regex::Regex;

use super::html::{clean_text, visible_text, ANCHOR};
use super::{Extractor, Page, PartialInsights};
use crate::page::PageKind;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.-]?)?\(?\b\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}\b").expect("valid regex")
});
static US_ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,6}\s+[A-Za-z0-9.,'# -]{3,80}?\b[A-Z]{2}\s+\d{5}(?:-\d{4})?\b")
        .expect("valid regex")
});

/// File suffixes that look like emails in `srcset` values (`logo@2x.png`).
const IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg"];

pub struct ContactExtractor;

impl Extractor for ContactExtractor {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        matches!(kind, PageKind::Home | PageKind::Contact | PageKind::About)
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let document = page.document();
        let text = visible_text(document.root_element());
        let mut partial = PartialInsights::default();

        for href in document.select(&ANCHOR).filter_map(|a| a.value().attr("href")) {
            if let Some(address) = strip_scheme(href, "mailto:") {
                let address = address.split('?').next().unwrap_or_default();
                if let Some(email) = normalize_email(address) {
                    partial.emails.insert(email);
                }
            } else if let Some(number) = strip_scheme(href, "tel:") {
                if let Some(phone) = normalize_phone(number) {
                    partial.phones.insert(phone);
                }
            }
        }

        partial
            .emails
            .extend(EMAIL.find_iter(&text).filter_map(|m| normalize_email(m.as_str())));
        partial
            .phones
            .extend(PHONE.find_iter(&text).filter_map(|m| normalize_phone(m.as_str())));
        partial.address = US_ADDRESS
            .find(&text)
            .map(|m| clean_text(m.as_str()));

        partial
    }
}

fn strip_scheme<'a>(href: &'a str, scheme: &str) -> Option<&'a str> {
    let href = href.trim();
    href.get(..scheme.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(scheme))
        .map(|_| &href[scheme.len()..])
}

fn normalize_email(candidate: &str) -> Option<String> {
    let email = candidate.trim().trim_end_matches('.').to_ascii_lowercase();
    if !EMAIL.is_match(&email) || IMAGE_SUFFIXES.iter().any(|s| email.ends_with(s)) {
        return None;
    }
    Some(email)
}

/// Keeps numbers with 10 to 15 digits, whitespace-collapsed.
fn normalize_phone(candidate: &str) -> Option<String> {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if !(10..=15).contains(&digits) {
        return None;
    }
    let phone = clean_text(candidate.trim());
    (!phone.is_empty()).then_some(phone)
}
