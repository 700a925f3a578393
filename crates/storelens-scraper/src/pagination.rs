//! Cursor pagination for `/products.json`.
//!
//! Each catalog page may carry a `Link` header listing adjacent pages:
//!
//! ```text
//! <https://shop.example.com/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.example.com/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```
//!
//! Only the `rel="next"` cursor is followed.

/// Hard stop on the number of catalog pages requested for one store.
pub const MAX_PAGES: usize = 20;

/// Products requested per catalog page.
pub const PAGE_LIMIT: u32 = 250;

/// Returns the `page_info` cursor of the `rel="next"` link, if any.
#[must_use]
pub fn next_page_cursor(link_header: Option<&str>) -> Option<String> {
    link_header?
        .split(',')
        .map(str::trim)
        .find(|segment| segment.contains(r#"rel="next""#))
        .and_then(|segment| {
            let start = segment.find('<')? + 1;
            let end = segment.find('>')?;
            (start < end).then(|| &segment[start..end])
        })
        .and_then(|target| reqwest::Url::parse(target).ok())
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "page_info")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|cursor| !cursor.is_empty())
}

/// Builds the catalog URL for `origin`, with the cursor if one is given.
#[must_use]
pub fn catalog_page_url(origin: &str, page_info: Option<&str>) -> String {
    let base = format!("{origin}/products.json");
    let Ok(mut url) = reqwest::Url::parse(&base) else {
        return match page_info {
            Some(cursor) => format!("{base}?limit={PAGE_LIMIT}&page_info={cursor}"),
            None => format!("{base}?limit={PAGE_LIMIT}"),
        };
    };
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("limit", &PAGE_LIMIT.to_string());
        if let Some(cursor) = page_info {
            query.append_pair("page_info", cursor);
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_header_means_no_next_page() {
        assert!(next_page_cursor(None).is_none());
        assert!(next_page_cursor(Some("")).is_none());
    }

    #[test]
    fn picks_next_cursor_from_combined_header() {
        let header = concat!(
            r#"<https://shop.example.com/products.json?limit=250&page_info=PREV>; rel="previous", "#,
            r#"<https://shop.example.com/products.json?limit=250&page_info=NEXT>; rel="next""#
        );
        assert_eq!(next_page_cursor(Some(header)).as_deref(), Some("NEXT"));
    }

    #[test]
    fn previous_only_header_ends_pagination() {
        let header = r#"<https://shop.example.com/products.json?page_info=PREV>; rel="previous""#;
        assert!(next_page_cursor(Some(header)).is_none());
    }

    #[test]
    fn next_link_without_cursor_ends_pagination() {
        let header = r#"<https://shop.example.com/products.json?limit=250>; rel="next""#;
        assert!(next_page_cursor(Some(header)).is_none());
    }

    #[test]
    fn catalog_url_includes_limit_and_cursor() {
        assert_eq!(
            catalog_page_url("https://shop.example.com", None),
            "https://shop.example.com/products.json?limit=250"
        );
        assert_eq!(
            catalog_page_url("https://shop.example.com", Some("abc")),
            "https://shop.example.com/products.json?limit=250&page_info=abc"
        );
    }
}
