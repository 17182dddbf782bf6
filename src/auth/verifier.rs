//! Request-level session verification.

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use crate::auth::jwt::JwtSecret;
use crate::auth::session::Session;
use crate::error::{AppError, AppResult};

const BEARER_PREFIX: &str = "Bearer ";

/// Cookie the identity provider stores the session token in.
pub const DEFAULT_SESSION_COOKIE: &str = "__session";

/// Checks whether a request carries a valid session.
///
/// `Ok(None)` means "no valid session". `Err` means the provider itself
/// failed, and callers surface it unchanged.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, parts: &Parts) -> AppResult<Option<Session>>;
}

/// Verifies HS256 session tokens from the session cookie or a Bearer header.
#[derive(Clone)]
pub struct JwtSessionVerifier {
    secret: JwtSecret,
    cookie_name: String,
}

impl JwtSessionVerifier {
    pub fn new(secret: JwtSecret, cookie_name: impl Into<String>) -> Self {
        Self {
            secret,
            cookie_name: cookie_name.into(),
        }
    }

    fn token<'a>(&self, headers: &'a HeaderMap, jar: &'a CookieJar) -> Option<&'a str> {
        jar.get(&self.cookie_name)
            .map(|c| c.value())
            .or_else(|| {
                headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.strip_prefix(BEARER_PREFIX))
            })
            .filter(|t| !t.is_empty())
    }
}

#[async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify(&self, parts: &Parts) -> AppResult<Option<Session>> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(token) = self.token(&parts.headers, &jar) else {
            return Ok(None);
        };
        match self.secret.validate(token) {
            Ok(session) => Ok(Some(session)),
            Err(AppError::Jwt(reason)) => {
                debug!(%reason, "session token rejected");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
