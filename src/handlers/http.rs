//! HTTP handlers: shared state, health, webhook receiver.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Path,
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::guard::RouteGuard;
use crate::middleware::auth::AuthUser;
use crate::middleware::Gate;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<Gate>,
    pub guard: RouteGuard,
}

impl AppState {
    pub fn new(gate: Gate, guard: RouteGuard) -> Self {
        Self {
            gate: Arc::new(gate),
            guard,
        }
    }

    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }
}

/// POST /api/webhooks/:provider: acknowledge a provider callback.
///
/// Webhook senders authenticate with their own signatures, so these paths
/// are ignored by the gate. Payload handling belongs to the feature services.
pub async fn webhook(
    Path(provider): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    info!(%provider, bytes = body.len(), "webhook received");
    (
        StatusCode::ACCEPTED,
        Json(json!({ "received": true, "provider": provider })),
    )
}

/// GET /api/me: the session the gate attached.
pub async fn me(AuthUser(session): AuthUser) -> Json<serde_json::Value> {
    Json(json!({
        "user_id": session.user_id,
        "expires_at": session.expires_at.to_rfc3339(),
    }))
}

/// GET /health: liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "wellgate" })),
    )
}
