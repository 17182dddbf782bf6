//! HTTP request handlers.

pub mod http;
pub mod pages;

pub use http::*;
pub use pages::{guarded, guarded_routes, landing, login, signup};
