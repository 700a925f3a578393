//! DOM helpers shared by the HTML extractors.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static META: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("meta").expect("valid meta selector"));
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));
pub(crate) static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Containers tried in order when looking for a page's main content.
static MAIN_CONTENT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        ".shopify-policy__container",
        "main",
        "#MainContent",
        "article",
        "[role='main']",
        ".rte",
        "body",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("valid main content selector"))
    .collect()
});

/// Collapses runs of whitespace into single spaces and trims.
pub(crate) fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(input: &str, max: usize) -> String {
    match input.char_indices().nth(max) {
        Some((idx, _)) => input[..idx].trim_end().to_owned(),
        None => input.to_owned(),
    }
}

/// Visible text under `element`, skipping `script`, `style`, `noscript`
/// and `template` subtrees, whitespace-collapsed.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value().as_element().is_some_and(|e| {
                matches!(e.name(), "script" | "style" | "noscript" | "template")
            })
        });
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    clean_text(&out)
}

/// Text of the first main-content container that has any.
pub(crate) fn main_text(document: &Html) -> String {
    MAIN_CONTENT
        .iter()
        .filter_map(|sel| document.select(sel).next())
        .map(visible_text)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

/// `content` of the first `<meta>` whose `key_attr` equals `key_value`
/// (case-insensitive).
pub(crate) fn meta_content(document: &Html, key_attr: &str, key_value: &str) -> Option<String> {
    document.select(&META).find_map(|meta| {
        let el = meta.value();
        let key = el.attr(key_attr)?;
        if !key.eq_ignore_ascii_case(key_value) {
            return None;
        }
        let content = clean_text(el.attr("content")?);
        (!content.is_empty()).then_some(content)
    })
}

pub(crate) fn title_text(document: &Html) -> Option<String> {
    let title = clean_text(&document.select(&TITLE).next()?.text().collect::<String>());
    (!title.is_empty()).then_some(title)
}

/// Strips markup from an HTML fragment such as a product `body_html`.
pub(crate) fn strip_tags(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);
    visible_text(parsed.root_element())
}
