//! Middleware: the request gate and the extractors it feeds.

pub mod auth;
pub mod gate;

pub use auth::{AuthUser, CurrentAuthState};
pub use gate::{gate_middleware, Gate, GateDecision};
