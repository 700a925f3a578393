//! Store URL normalization and resolution helpers.

use crate::error::ScraperError;

/// Normalizes a user-supplied store URL.
///
/// A missing scheme defaults to `https://`; only `http` and `https` with a
/// host are accepted. The trailing slash is dropped so
/// `"https://shop.example.com/"` and `"shop.example.com"` both normalize to
/// `"https://shop.example.com"`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidStoreUrl`] when the input does not parse or
/// is not an http(s) URL with a host.
pub fn normalize_store_url(input: &str) -> Result<String, ScraperError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| ScraperError::InvalidStoreUrl {
        store_url: input.to_owned(),
        reason: reason.to_owned(),
    };

    if trimmed.is_empty() {
        return Err(invalid("URL is empty"));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    };

    let url = reqwest::Url::parse(&candidate).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    match url.host_str() {
        Some(host) if host.contains('.') || host == "localhost" || url.port().is_some() => {}
        _ => return Err(invalid("URL has no usable host")),
    }

    Ok(url.as_str().trim_end_matches('/').to_owned())
}

/// Extracts the scheme+host origin from a store URL.
///
/// Given `"https://shop.example.com/collections/all"`, returns
/// `"https://shop.example.com"`. Page paths are always requested from the
/// origin, whatever path the caller supplied.
#[must_use]
pub fn extract_store_origin(store_url: &str) -> String {
    reqwest::Url::parse(store_url).map_or_else(
        |e| {
            tracing::warn!(
                store_url,
                error = %e,
                "could not parse store URL; falling back to string split for origin"
            );
            store_url
                .trim_end_matches('/')
                .splitn(4, '/')
                .take(3)
                .collect::<Vec<_>>()
                .join("/")
        },
        |u| u.origin().ascii_serialization(),
    )
}

/// Resolves `href` against `base`, decoding `&amp;` first.
///
/// Returns `None` for unparseable input and for non-http(s) results such as
/// `mailto:` or `javascript:` links.
#[must_use]
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim().replace("&amp;", "&");
    let base = reqwest::Url::parse(base).ok()?;
    let joined = base.join(&href).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}

/// Hostname of `url` with any leading `www.` or `m.` removed.
pub(crate) fn bare_host(url: &reqwest::Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host)
        .to_owned();
    Some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_https_scheme() {
        assert_eq!(
            normalize_store_url("examplestore.myshopify.com").unwrap(),
            "https://examplestore.myshopify.com"
        );
    }

    #[test]
    fn normalize_keeps_input_without_trailing_slash() {
        assert_eq!(
            normalize_store_url("https://examplestore.myshopify.com").unwrap(),
            "https://examplestore.myshopify.com"
        );
        assert_eq!(
            normalize_store_url("https://examplestore.myshopify.com/").unwrap(),
            "https://examplestore.myshopify.com"
        );
    }

    #[test]
    fn normalize_keeps_path() {
        assert_eq!(
            normalize_store_url("https://shop.example.com/collections/all").unwrap(),
            "https://shop.example.com/collections/all"
        );
    }

    #[test]
    fn normalize_accepts_local_host_with_port() {
        assert_eq!(
            normalize_store_url("http://127.0.0.1:4010").unwrap(),
            "http://127.0.0.1:4010"
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        for input in ["", "   ", "ftp://shop.example.com", "https://", "not a url"] {
            let result = normalize_store_url(input);
            assert!(
                matches!(result, Err(ScraperError::InvalidStoreUrl { .. })),
                "expected InvalidStoreUrl for {input:?}, got: {result:?}"
            );
        }
    }

    #[test]
    fn origin_strips_path() {
        assert_eq!(
            extract_store_origin("https://shop.example.com/collections/all"),
            "https://shop.example.com"
        );
    }

    #[test]
    fn resolve_relative_and_absolute_links() {
        let base = "https://shop.example.com/pages/contact";
        assert_eq!(
            resolve_url(base, "/blogs/news").as_deref(),
            Some("https://shop.example.com/blogs/news")
        );
        assert_eq!(
            resolve_url(base, "https://other.example.com/x?a=1&amp;b=2").as_deref(),
            Some("https://other.example.com/x?a=1&b=2")
        );
        assert_eq!(resolve_url(base, "mailto:hi@example.com"), None);
    }

    #[test]
    fn bare_host_strips_www_and_mobile_prefixes() {
        let url = reqwest::Url::parse("https://www.instagram.com/brand").unwrap();
        assert_eq!(bare_host(&url).as_deref(), Some("instagram.com"));
        let url = reqwest::Url::parse("https://m.facebook.com/brand").unwrap();
        assert_eq!(bare_host(&url).as_deref(), Some("facebook.com"));
    }
}
