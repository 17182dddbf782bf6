//! Request gate: classify the path, then allow, skip or deny before any handler runs.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::auth::{Session, SessionVerifier};
use crate::error::AppResult;
use crate::guard::NavigationIntent;
use crate::handlers::http::AppState;
use crate::routes::{is_api_path, RequestMatcher, RouteClass, RouteTable};

/// Outcome of gating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Outside the request matcher; the gate does not apply.
    Bypass,
    /// No auth processing at all; the verifier is never consulted.
    Ignored,
    /// Never denied. Carries the session when the request has a valid one.
    Public(Option<Session>),
    Allow(Session),
    Deny,
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, GateDecision::Deny)
    }
}

pub struct Gate {
    routes: RouteTable,
    matcher: RequestMatcher,
    verifier: Arc<dyn SessionVerifier>,
    sign_in_path: String,
}

impl Gate {
    pub fn new(
        routes: RouteTable,
        verifier: Arc<dyn SessionVerifier>,
        sign_in_path: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            matcher: RequestMatcher::new(),
            verifier,
            sign_in_path: sign_in_path.into(),
        }
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn verifier(&self) -> &dyn SessionVerifier {
        self.verifier.as_ref()
    }

    /// Ignored paths never reach the verifier. On protected paths its errors
    /// are returned as-is; on public paths a failure only drops the session.
    pub async fn decide(&self, parts: &Parts) -> AppResult<GateDecision> {
        let path = parts.uri.path();
        if !self.matcher.applies(path) {
            return Ok(GateDecision::Bypass);
        }
        let decision = match self.routes.classify(path) {
            RouteClass::Ignored => GateDecision::Ignored,
            RouteClass::Public => match self.verifier.verify(parts).await {
                Ok(session) => GateDecision::Public(session),
                Err(e) => {
                    warn!(%path, error = %e, "session lookup failed on public path");
                    GateDecision::Public(None)
                }
            },
            RouteClass::Protected => match self.verifier.verify(parts).await? {
                Some(session) => GateDecision::Allow(session),
                None => GateDecision::Deny,
            },
        };
        debug!(%path, ?decision, "gate decision");
        Ok(decision)
    }

    /// API paths get a 401; pages are sent to sign-in with their location attached.
    pub fn deny(&self, parts: &Parts) -> Response {
        let path = parts.uri.path();
        if is_api_path(path) {
            info!(%path, "unauthenticated api request");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthenticated" })),
            )
                .into_response();
        }

        let origin = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or(path);
        let intent = NavigationIntent {
            target_path: self.sign_in_path.clone(),
            origin_path: origin.to_string(),
        };
        info!(%path, to = %self.sign_in_path, "redirecting unauthenticated request");
        match intent.to_url() {
            Ok(url) => Redirect::temporary(&url).into_response(),
            Err(e) => e.into_response(),
        }
    }
}

/// Middleware: run the gate for every request under the layer.
pub async fn gate_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let gate = state.gate();
    let (parts, body) = request.into_parts();
    let decision = match gate.decide(&parts).await {
        Ok(d) => d,
        Err(e) => return e.into_response(),
    };

    match decision {
        GateDecision::Deny => gate.deny(&parts),
        GateDecision::Allow(session) | GateDecision::Public(Some(session)) => {
            let mut request = Request::from_parts(parts, body);
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        GateDecision::Bypass | GateDecision::Ignored | GateDecision::Public(None) => {
            next.run(Request::from_parts(parts, body)).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use async_trait::async_trait;
    use axum::http::{header::LOCATION, Request};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    /// Counts lookups and answers with a fixed result.
    struct StubVerifier {
        calls: AtomicUsize,
        signed_in: bool,
        fail: bool,
    }

    impl StubVerifier {
        fn new(signed_in: bool) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                signed_in,
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                signed_in: false,
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionVerifier for StubVerifier {
        async fn verify(&self, _parts: &Parts) -> AppResult<Option<Session>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(AppError::Provider("upstream timeout".to_string()));
            }
            Ok(self.signed_in.then(|| Session {
                user_id: Uuid::new_v4(),
                expires_at: Utc::now(),
            }))
        }
    }

    fn gate(verifier: Arc<StubVerifier>) -> Gate {
        Gate::new(RouteTable::default(), verifier, "/login")
    }

    fn parts(uri: &str) -> Parts {
        Request::builder().uri(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn ignored_paths_never_consult_the_verifier() {
        let v = StubVerifier::new(false);
        let g = gate(v.clone());
        let d = g.decide(&parts("/api/webhooks/stripe")).await.unwrap();
        assert_eq!(d, GateDecision::Ignored);
        assert_eq!(v.calls(), 0);
    }

    #[tokio::test]
    async fn public_paths_pass_without_session() {
        let v = StubVerifier::new(false);
        let g = gate(v.clone());
        let paths = ["/", "/blogs", "/ecom", "/team", "/login", "/signup"];
        for path in paths {
            let d = g.decide(&parts(path)).await.unwrap();
            assert_eq!(d, GateDecision::Public(None), "{path}");
            assert!(d.is_allowed());
        }
        assert_eq!(v.calls(), paths.len());
    }

    #[tokio::test]
    async fn public_paths_carry_the_session_when_signed_in() {
        let v = StubVerifier::new(true);
        let g = gate(v.clone());
        let d = g.decide(&parts("/blogs")).await.unwrap();
        assert!(matches!(d, GateDecision::Public(Some(_))));
        assert_eq!(v.calls(), 1);

        // The webhook wildcard is also public, but ignored takes precedence.
        let d = g.decide(&parts("/api/webhooks/stripe")).await.unwrap();
        assert_eq!(d, GateDecision::Ignored);
        assert_eq!(v.calls(), 1);
    }

    #[tokio::test]
    async fn verifier_failure_on_public_path_is_not_a_denial() {
        let g = gate(StubVerifier::failing());
        let d = g.decide(&parts("/team")).await.unwrap();
        assert_eq!(d, GateDecision::Public(None));
    }

    #[tokio::test]
    async fn middleware_attaches_session_on_public_but_not_ignored_paths() {
        use axum::{body::Body, routing::get, Extension, Router};
        use tower::util::ServiceExt;

        async fn report(session: Option<Extension<Session>>) -> &'static str {
            if session.is_some() {
                "session"
            } else {
                "none"
            }
        }

        let state = AppState::new(gate(StubVerifier::new(true)), Default::default());
        let app = Router::new()
            .route("/", get(report))
            .route("/api/webhooks/:provider", get(report))
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                gate_middleware,
            ))
            .with_state(state);

        for (uri, expected) in [("/", "session"), ("/api/webhooks/stripe", "none")] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let res = app.clone().oneshot(req).await.unwrap();
            let body = axum::body::to_bytes(res.into_body(), usize::MAX)
                .await
                .unwrap();
            assert_eq!(&body[..], expected.as_bytes(), "{uri}");
        }
    }

    #[tokio::test]
    async fn static_files_bypass_the_gate() {
        let v = StubVerifier::new(false);
        let g = gate(v.clone());
        for path in ["/favicon.ico", "/images/logo.png", "/_next/static/a.js", "/robots.txt"] {
            assert_eq!(g.decide(&parts(path)).await.unwrap(), GateDecision::Bypass);
        }
        assert_eq!(v.calls(), 0);
    }

    #[tokio::test]
    async fn protected_path_without_session_is_denied() {
        let v = StubVerifier::new(false);
        let g = gate(v.clone());
        let d = g.decide(&parts("/tracker")).await.unwrap();
        assert_eq!(d, GateDecision::Deny);
        assert!(!d.is_allowed());
        assert_eq!(v.calls(), 1);
    }

    #[tokio::test]
    async fn protected_path_with_session_is_allowed() {
        let g = gate(StubVerifier::new(true));
        let d = g.decide(&parts("/consultations")).await.unwrap();
        assert!(matches!(d, GateDecision::Allow(_)));
    }

    #[tokio::test]
    async fn verifier_failure_propagates() {
        let g = gate(StubVerifier::failing());
        let err = g.decide(&parts("/forums")).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[test]
    fn deny_page_redirects_with_origin() {
        let g = gate(StubVerifier::new(false));
        let res = g.deny(&parts("/tracker?view=month"));
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            res.headers().get(LOCATION).unwrap(),
            "/login?redirect_url=%2Ftracker%3Fview%3Dmonth"
        );
    }

    #[test]
    fn deny_api_is_unauthorized() {
        let g = gate(StubVerifier::new(false));
        let res = g.deny(&parts("/api/cycles"));
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
