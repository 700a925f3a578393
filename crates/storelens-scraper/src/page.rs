//! Page kinds and the per-store fetch plan.
//!
//! The plan is an ordered list. Its order is also the merge precedence used
//! by [`crate::aggregate`]: when two pages yield the same scalar field, the
//! page requested earlier wins.

/// Policy pages the extractor knows how to label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Privacy,
    Refund,
    Terms,
    Shipping,
}

impl PolicyKind {
    /// Key used in `BrandInsights::policies`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::Privacy => "privacy",
            PolicyKind::Refund => "refund",
            PolicyKind::Terms => "terms",
            PolicyKind::Shipping => "shipping",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    /// One page of `/products.json`.
    Catalog,
    /// A single product as `/products/<handle>.json`.
    ProductJson,
    /// A product's HTML page.
    ProductPage,
    Policy(PolicyKind),
    Contact,
    About,
    Faq,
}

impl PageKind {
    #[must_use]
    pub fn is_html(self) -> bool {
        !matches!(self, PageKind::Catalog | PageKind::ProductJson)
    }
}

/// One path to request, relative to the store origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub path: String,
    pub kind: PageKind,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, kind: PageKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Result of fetching a single [`PageRequest`].
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub request: PageRequest,
    /// Absolute URL the page was served from, after redirects.
    pub url: String,
    pub outcome: PageOutcome,
}

#[derive(Debug, Clone)]
pub enum PageOutcome {
    Fetched {
        body: String,
        /// Raw `Link` response header, used for catalog pagination.
        link_header: Option<String>,
    },
    Failed {
        reason: String,
    },
}

impl FetchedPage {
    /// Body of a successful fetch, `None` for failures.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match &self.outcome {
            PageOutcome::Fetched { body, .. } => Some(body),
            PageOutcome::Failed { .. } => None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PageOutcome::Fetched { .. })
    }
}

const POLICY_PATHS: &[(PolicyKind, &[&str])] = &[
    (
        PolicyKind::Privacy,
        &[
            "/policies/privacy-policy",
            "/pages/privacy-policy",
            "/privacy",
        ],
    ),
    (
        PolicyKind::Refund,
        &[
            "/policies/refund-policy",
            "/pages/refund-policy",
            "/pages/returns",
            "/refund-policy",
        ],
    ),
    (
        PolicyKind::Terms,
        &["/policies/terms-of-service", "/pages/terms-of-service"],
    ),
    (
        PolicyKind::Shipping,
        &["/policies/shipping-policy", "/pages/shipping"],
    ),
];

const CONTACT_PATHS: &[&str] = &["/pages/contact", "/contact", "/pages/contact-us"];
const ABOUT_PATHS: &[&str] = &["/pages/about", "/pages/about-us"];
const FAQ_PATHS: &[&str] = &[
    "/pages/faq",
    "/faq",
    "/pages/frequently-asked-questions",
    "/help",
];

/// HTML pages requested for every store, in merge-precedence order.
///
/// The product catalog is not listed: it is paginated and driven by
/// [`crate::catalog::fetch_catalog`].
#[must_use]
pub fn default_fetch_plan() -> Vec<PageRequest> {
    let mut plan = vec![PageRequest::new("/", PageKind::Home)];
    for (kind, paths) in POLICY_PATHS {
        plan.extend(
            paths
                .iter()
                .map(|p| PageRequest::new(*p, PageKind::Policy(*kind))),
        );
    }
    plan.extend(CONTACT_PATHS.iter().map(|p| PageRequest::new(*p, PageKind::Contact)));
    plan.extend(ABOUT_PATHS.iter().map(|p| PageRequest::new(*p, PageKind::About)));
    plan.extend(FAQ_PATHS.iter().map(|p| PageRequest::new(*p, PageKind::Faq)));
    plan
}
