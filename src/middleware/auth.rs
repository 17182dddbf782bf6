//! Extractors for the session attached by the gate.

use axum::http::request::Parts;

use crate::auth::{AuthState, Session};
use crate::error::AppError;
use crate::handlers::http::AppState;

/// Extractor: the verified session. Rejects with 401 when the gate did not
/// attach one.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Session);

#[axum::async_trait]
impl<S: Send + Sync> axum::extract::FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Auth("No active session".to_string()))
    }
}

/// Extractor: the auth state seen by a page handler.
///
/// Uses the session the gate attached when there is one; otherwise asks the
/// verifier again, so pages stay guarded even when the gate let the request
/// through as public or the page is mounted outside the gate.
#[derive(Clone, Copy, Debug)]
pub struct CurrentAuthState(pub AuthState);

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for CurrentAuthState {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(CurrentAuthState(AuthState::from_session(Some(session))));
        }
        let session = state.gate().verifier().verify(parts).await?;
        Ok(CurrentAuthState(AuthState::from_session(session.as_ref())))
    }
}
