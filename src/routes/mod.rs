//! Route classification: pattern syntax, public/ignored lists, request matcher.

pub mod classify;
pub mod matcher;
pub mod pattern;

pub use classify::{RouteClass, RouteTable, DEFAULT_IGNORED_ROUTES, DEFAULT_PUBLIC_ROUTES};
pub use matcher::{is_api_path, RequestMatcher};
pub use pattern::RoutePattern;
