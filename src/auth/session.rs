//! Session and auth-state types observed from the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A verified session. Inserted into request extensions by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// Progress and outcome of the provider's session check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_loaded: bool,
    pub is_signed_in: bool,
}

impl AuthState {
    pub const fn loading() -> Self {
        Self {
            is_loaded: false,
            is_signed_in: false,
        }
    }

    pub const fn signed_in() -> Self {
        Self {
            is_loaded: true,
            is_signed_in: true,
        }
    }

    pub const fn signed_out() -> Self {
        Self {
            is_loaded: true,
            is_signed_in: false,
        }
    }

    /// State once a server-side check has completed.
    pub fn from_session(session: Option<&Session>) -> Self {
        if session.is_some() {
            Self::signed_in()
        } else {
            Self::signed_out()
        }
    }
}

/// Injected capability answering "is the session check done, and who is signed in".
pub trait AuthStateProvider: Send + Sync {
    fn auth_state(&self) -> AuthState;
}

impl AuthStateProvider for AuthState {
    fn auth_state(&self) -> AuthState {
        *self
    }
}

/// Auth state that resolves over time, backed by a `watch` channel.
///
/// The provider side pushes updates through [`AuthStateHandle`]; the view
/// side reads the latest value and awaits [`WatchedAuthState::changed`] to
/// know when to render again. Dropping the view side discards any pending
/// check.
#[derive(Debug, Clone)]
pub struct WatchedAuthState {
    rx: watch::Receiver<AuthState>,
}

/// Provider side of a [`WatchedAuthState`].
#[derive(Debug)]
pub struct AuthStateHandle {
    tx: watch::Sender<AuthState>,
}

impl WatchedAuthState {
    /// Starts in the loading state.
    pub fn channel() -> (AuthStateHandle, Self) {
        let (tx, rx) = watch::channel(AuthState::loading());
        (AuthStateHandle { tx }, Self { rx })
    }

    /// Waits for the next state update and returns it.
    pub async fn changed(&mut self) -> AppResult<AuthState> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::AuthStateClosed)?;
        Ok(*self.rx.borrow_and_update())
    }
}

impl AuthStateProvider for WatchedAuthState {
    fn auth_state(&self) -> AuthState {
        *self.rx.borrow()
    }
}

impl AuthStateHandle {
    pub fn set(&self, state: AuthState) {
        // No receivers left means every view unmounted; nothing to notify.
        let _ = self.tx.send(state);
    }

    pub fn resolve(&self, session: Option<&Session>) {
        self.set(AuthState::from_session(session));
    }
}
