//! Question and answer pairs from FAQ-style markup.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use storelens_core::Faq;

use super::html::{truncate_chars, visible_text};
use super::{Extractor, Page, PartialInsights};
use crate::page::PageKind;

pub const MAX_FAQS: usize = 20;
const MAX_ANSWER_CHARS: usize = 500;
const MIN_QUESTION_CHARS: usize = 10;
const MIN_FALLBACK_ANSWER_CHARS: usize = 20;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid faq selector")
}

static DETAILS: LazyLock<Selector> = LazyLock::new(|| selector("details"));
static SUMMARY: LazyLock<Selector> = LazyLock::new(|| selector("summary"));
static FAQ_BLOCK: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="faq"], [class*="Faq"], [class*="question"], [class*="accordion"]"#)
});
static BLOCK_QUESTION: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="question"], [class*="title"], summary, button, h2, h3, h4, h5"#)
});
static BLOCK_ANSWER: LazyLock<Selector> = LazyLock::new(|| {
    selector(r#"[class*="answer"], [class*="content"], [class*="body"], [class*="panel"], p"#)
});
static QUESTION_HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h3, h4, h5"));

pub struct FaqExtractor;

impl Extractor for FaqExtractor {
    fn name(&self) -> &'static str {
        "faq"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind == PageKind::Faq
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let document = page.document();
        let mut faqs = Vec::new();
        collect_details(document, &mut faqs);
        collect_blocks(document, &mut faqs);
        if faqs.is_empty() {
            collect_headings(document, &mut faqs);
        }
        PartialInsights {
            faqs,
            ..PartialInsights::default()
        }
    }
}

/// Adds a pair unless the question is too short, already present, or the
/// list is full.
fn push_faq(faqs: &mut Vec<Faq>, question: String, answer: &str) {
    if faqs.len() >= MAX_FAQS
        || question.chars().count() <= MIN_QUESTION_CHARS
        || answer.is_empty()
        || faqs.iter().any(|f| f.question == question)
    {
        return;
    }
    faqs.push(Faq {
        question,
        answer: truncate_chars(answer, MAX_ANSWER_CHARS),
    });
}

fn collect_details(document: &Html, faqs: &mut Vec<Faq>) {
    for details in document.select(&DETAILS) {
        let Some(summary) = details.select(&SUMMARY).next() else {
            continue;
        };
        let question = visible_text(summary);
        let full = visible_text(details);
        let answer = full.strip_prefix(question.as_str()).unwrap_or(&full).trim();
        push_faq(faqs, question, answer);
    }
}

fn collect_blocks(document: &Html, faqs: &mut Vec<Faq>) {
    for block in document.select(&FAQ_BLOCK) {
        let Some(question_el) = block.select(&BLOCK_QUESTION).next() else {
            continue;
        };
        let Some(answer_el) = block
            .select(&BLOCK_ANSWER)
            .find(|el| el.id() != question_el.id() && !is_ancestor(*el, question_el))
        else {
            continue;
        };
        push_faq(faqs, visible_text(question_el), &visible_text(answer_el));
    }
}

fn is_ancestor(candidate: ElementRef<'_>, of: ElementRef<'_>) -> bool {
    of.ancestors().any(|a| a.id() == candidate.id())
}

fn collect_headings(document: &Html, faqs: &mut Vec<Faq>) {
    for heading in document.select(&QUESTION_HEADING) {
        let question = visible_text(heading);
        if !question.contains('?') {
            continue;
        }
        let Some(answer_el) = heading
            .next_siblings()
            .find_map(ElementRef::wrap)
            .filter(|el| matches!(el.value().name(), "p" | "div"))
        else {
            continue;
        };
        let answer = visible_text(answer_el);
        if answer.chars().count() > MIN_FALLBACK_ANSWER_CHARS {
            push_faq(faqs, question, &answer);
        }
    }
}
