//! Route classification shared by the request gate and the page guard.

use serde::Serialize;

use crate::error::AppResult;
use crate::routes::pattern::RoutePattern;

/// Paths that are reachable without a session.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/blogs",
    "/ecom",
    "/team",
    "/login",
    "/signup",
    "/api/webhooks/(.*)",
];

/// Paths excluded from authentication processing entirely.
pub const DEFAULT_IGNORED_ROUTES: &[&str] = &[
    "/api/webhooks/(.*)",
    "/_next/(.*)",
    "/favicon.ico",
    "/images/(.*)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Skips auth processing altogether.
    Ignored,
    /// Passes without a session.
    Public,
    /// Requires a valid session.
    Protected,
}

impl RouteClass {
    pub fn requires_session(&self) -> bool {
        matches!(self, RouteClass::Protected)
    }
}

/// The public and ignored pattern lists. Anything matching neither is protected.
///
/// The two lists may overlap (the webhook wildcard appears in both by
/// default); ignored wins over public, public wins over protected.
#[derive(Debug, Clone)]
pub struct RouteTable {
    ignored: Vec<RoutePattern>,
    public: Vec<RoutePattern>,
}

impl RouteTable {
    pub fn new<S: AsRef<str>>(public: &[S], ignored: &[S]) -> AppResult<Self> {
        Ok(Self {
            ignored: compile(ignored)?,
            public: compile(public)?,
        })
    }

    pub fn classify(&self, path: &str) -> RouteClass {
        if self.ignored.iter().any(|p| p.matches(path)) {
            RouteClass::Ignored
        } else if self.public.iter().any(|p| p.matches(path)) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }

    pub fn public_patterns(&self) -> impl Iterator<Item = &str> {
        self.public.iter().map(RoutePattern::as_str)
    }

    pub fn ignored_patterns(&self) -> impl Iterator<Item = &str> {
        self.ignored.iter().map(RoutePattern::as_str)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            ignored: DEFAULT_IGNORED_ROUTES
                .iter()
                .filter_map(|p| RoutePattern::new(p).ok())
                .collect(),
            public: DEFAULT_PUBLIC_ROUTES
                .iter()
                .filter_map(|p| RoutePattern::new(p).ok())
                .collect(),
        }
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> AppResult<Vec<RoutePattern>> {
    patterns
        .iter()
        .map(|p| RoutePattern::new(p.as_ref()))
        .collect()
}
