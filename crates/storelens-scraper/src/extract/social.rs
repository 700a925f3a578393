//! Social profile links.

use storelens_core::SocialHandle;

use super::html::ANCHOR;
use super::{Extractor, Page, PartialInsights};
use crate::client::{bare_host, resolve_url};
use crate::page::PageKind;

const PLATFORMS: &[(&str, &[&str])] = &[
    ("instagram", &["instagram.com"]),
    ("facebook", &["facebook.com", "fb.com"]),
    ("twitter", &["twitter.com", "x.com"]),
    ("tiktok", &["tiktok.com"]),
    ("youtube", &["youtube.com"]),
    ("linkedin", &["linkedin.com"]),
    ("pinterest", &["pinterest.com"]),
];

/// First path segments that mark share widgets or content, not profiles.
const NON_PROFILE_SEGMENTS: &[&str] = &[
    "share", "sharer", "sharer.php", "intent", "dialog", "plugins", "tr", "p", "reel", "pin",
    "watch", "embed", "hashtag", "explore", "home",
];

fn platform_for(url: &reqwest::Url) -> Option<&'static str> {
    let host = bare_host(url)?;
    PLATFORMS.iter().find_map(|(name, domains)| {
        domains
            .iter()
            .any(|d| host == *d || host.ends_with(&format!(".{d}")))
            .then_some(*name)
    })
}

/// Whether `url` points at any known social network, profile or not.
pub(crate) fn is_social_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .is_some_and(|u| platform_for(&u).is_some())
}

/// Recognizes a social profile URL.
///
/// Returns the platform name and the profile, or `None` for non-social
/// URLs and for share/intent links.
#[must_use]
pub fn parse_social_profile(url: &str) -> Option<(&'static str, SocialHandle)> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let platform = platform_for(&parsed)?;

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();
    if segments
        .first()
        .is_some_and(|first| NON_PROFILE_SEGMENTS.contains(&first.to_ascii_lowercase().as_str()))
    {
        return None;
    }

    let handle = match (platform, segments.as_slice()) {
        ("youtube", ["c" | "channel" | "user", name, ..])
        | ("linkedin", ["company" | "in" | "school", name, ..]) => Some(*name),
        ("linkedin", _) => None,
        (_, [first, ..]) => Some(*first),
        (_, []) => None,
    }
    .map(|h| h.trim_start_matches('@').to_owned())
    .filter(|h| !h.is_empty());

    Some((
        platform,
        SocialHandle {
            url: url.to_owned(),
            handle,
        },
    ))
}

/// Keeps the first profile link found for each platform.
pub struct SocialExtractor;

impl Extractor for SocialExtractor {
    fn name(&self) -> &'static str {
        "social"
    }

    fn applies_to(&self, kind: PageKind) -> bool {
        kind.is_html() && kind != PageKind::ProductPage
    }

    fn extract(&self, page: &Page<'_>) -> PartialInsights {
        let mut partial = PartialInsights::default();
        for href in page
            .document()
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
        {
            let Some((platform, profile)) =
                resolve_url(page.url, href).and_then(|u| parse_social_profile(&u))
            else {
                continue;
            };
            partial
                .social_handles
                .entry(platform.to_owned())
                .or_insert(profile);
        }
        partial
    }
}
