//! Store policy pages (privacy, refund, terms, shipping) kept as plain text.

use super::html::{main_text, truncate_chars};
use super::{Extractor, Page, PartialInsights};
use crate::page::PageKind;

/// Policy text shorter than this is treated as a stub or error page.
const MIN_POLICY_CHARS: usize = 100;
const MAX_POLICY_CHARS: usize = 2000;

/// Stores the visible text of a policy page under its policy key.
pub struct PolicyExtractor;

impl Extractor for PolicyExtractor {
    fn name(&self) -> &'static str {
        "policy"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        matches!(kind, PageKind::Policy(_))
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let PageKind::Policy(policy) = page.kind else {
            return PartialInsights::default();
        };
        let text = main_text(page.document());
        if text.chars().count() <= MIN_POLICY_CHARS {
            return PartialInsights::default();
        }

        let mut partial = PartialInsights::default();
        partial.policies.insert(
            policy.as_str().to_owned(),
            truncate_chars(&text, MAX_POLICY_CHARS),
        );
        partial
    }
}
