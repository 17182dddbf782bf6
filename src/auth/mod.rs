//! Authentication: session tokens, auth state, request verification.

mod jwt;
mod session;
mod verifier;

pub use jwt::{Claims, JwtSecret};
pub use session::{AuthState, AuthStateHandle, AuthStateProvider, Session, WatchedAuthState};
pub use verifier::{JwtSessionVerifier, SessionVerifier, DEFAULT_SESSION_COOKIE};
