//! Protected-page guard: loading, redirect to sign-in, or render.
//!
//! The guard is evaluated on every render. It never remembers a previous
//! decision, so a page that first rendered as loading (or redirected) renders
//! its content as soon as the provider reports a signed-in session.

use serde::{Deserialize, Serialize};

use crate::auth::{AuthState, AuthStateProvider};
use crate::error::AppResult;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const LOADING_STATUS: &str = "Checking authentication...";
/// Query parameter carrying the originally requested location.
pub const REDIRECT_PARAM: &str = "redirect_url";

/// Where a redirect is going and where it came from, so sign-in can send
/// the user back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub target_path: String,
    pub origin_path: String,
}

impl NavigationIntent {
    /// `target?redirect_url=<origin>`.
    pub fn to_url(&self) -> AppResult<String> {
        let query = serde_urlencoded::to_string([(REDIRECT_PARAM, self.origin_path.as_str())])?;
        let sep = if self.target_path.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.target_path, sep, query))
    }
}

/// A navigation the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub to: String,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
    pub intent: NavigationIntent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<V> {
    Loading { status: &'static str },
    Redirect(Navigation),
    Render(V),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    redirect_to: String,
}

impl RouteGuard {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
        }
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    pub fn render<V>(
        &self,
        provider: &dyn AuthStateProvider,
        location: &str,
        child: V,
    ) -> GuardOutcome<V> {
        self.decide(provider.auth_state(), location, child)
    }

    pub fn decide<V>(&self, state: AuthState, location: &str, child: V) -> GuardOutcome<V> {
        if !state.is_loaded {
            return GuardOutcome::Loading {
                status: LOADING_STATUS,
            };
        }
        if !state.is_signed_in {
            return GuardOutcome::Redirect(Navigation {
                to: self.redirect_to.clone(),
                replace: true,
                intent: NavigationIntent {
                    target_path: self.redirect_to.clone(),
                    origin_path: location.to_string(),
                },
            });
        }
        GuardOutcome::Render(child)
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH)
    }
}

/// Only same-origin absolute paths are accepted as a post-login destination.
/// Anything else (absolute URLs, protocol-relative `//host`, empty) becomes `/`.
/// Control characters are refused outright: browsers strip tabs and newlines,
/// which turns `/\t/host` into `//host`.
pub fn safe_return_path(raw: Option<&str>) -> String {
    match raw {
        Some(p)
            if p.starts_with('/')
                && !p.starts_with("//")
                && !p.starts_with("/\\")
                && !p.chars().any(|c| c.is_ascii_control()) =>
        {
            p.to_string()
        }
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::WatchedAuthState;

    const PROTECTED: &[&str] = &[
        "/chatbot",
        "/consultations",
        "/forums",
        "/parents",
        "/partner",
        "/symptomsanalyzer",
        "/tracker",
    ];

    #[test]
    fn unloaded_state_shows_loader_and_never_redirects() {
        let guard = RouteGuard::default();
        for signed_in in [false, true] {
            let state = AuthState {
                is_loaded: false,
                is_signed_in: signed_in,
            };
            for page in PROTECTED {
                assert_eq!(
                    guard.render(&state, page, "child"),
                    GuardOutcome::Loading {
                        status: LOADING_STATUS
                    }
                );
            }
        }
    }

    #[test]
    fn signed_out_redirects_to_login_replacing_history() {
        let guard = RouteGuard::default();
        for page in PROTECTED {
            match guard.render(&AuthState::signed_out(), page, "child") {
                GuardOutcome::Redirect(nav) => {
                    assert_eq!(nav.to, "/login");
                    assert!(nav.replace);
                    assert_eq!(nav.intent.origin_path, *page);
                    assert_eq!(nav.intent.target_path, "/login");
                }
                other => panic!("expected redirect for {page}, got {other:?}"),
            }
        }
    }

    #[test]
    fn signed_in_renders_child_unchanged() {
        let guard = RouteGuard::default();
        let child = vec![1, 2, 3];
        assert_eq!(
            guard.render(&AuthState::signed_in(), "/tracker", child.clone()),
            GuardOutcome::Render(child)
        );
    }

    #[test]
    fn custom_redirect_target_is_used() {
        let guard = RouteGuard::new("/signup");
        let GuardOutcome::Redirect(nav) = guard.render(&AuthState::signed_out(), "/forums", ())
        else {
            panic!("expected redirect");
        };
        assert_eq!(nav.to, "/signup");
    }

    #[test]
    fn decision_follows_state_across_renders() {
        let guard = RouteGuard::default();
        let (handle, watched) = WatchedAuthState::channel();

        let first = guard.render(&watched, "/partner", "PartnerDashboard");
        assert!(matches!(first, GuardOutcome::Loading { .. }));

        handle.set(AuthState::signed_out());
        let second = guard.render(&watched, "/partner", "PartnerDashboard");
        assert!(matches!(second, GuardOutcome::Redirect(_)));

        handle.set(AuthState::signed_in());
        let third = guard.render(&watched, "/partner", "PartnerDashboard");
        assert_eq!(third, GuardOutcome::Render("PartnerDashboard"));
    }

    #[test]
    fn intent_url_encodes_origin_with_query() {
        let intent = NavigationIntent {
            target_path: "/login".to_string(),
            origin_path: "/tracker?month=2026-10&view=cal".to_string(),
        };
        assert_eq!(
            intent.to_url().unwrap(),
            "/login?redirect_url=%2Ftracker%3Fmonth%3D2026-10%26view%3Dcal"
        );
    }

    #[test]
    fn safe_return_path_rejects_offsite_targets() {
        assert_eq!(safe_return_path(Some("/tracker")), "/tracker");
        assert_eq!(safe_return_path(Some("https://evil.test")), "/");
        assert_eq!(safe_return_path(Some("//evil.test/x")), "/");
        assert_eq!(safe_return_path(Some("/\\evil.test")), "/");
        assert_eq!(safe_return_path(Some("")), "/");
        assert_eq!(safe_return_path(None), "/");
    }

    #[test]
    fn safe_return_path_rejects_control_characters() {
        assert_eq!(safe_return_path(Some("/\t/evil.test")), "/");
        assert_eq!(safe_return_path(Some("/\n/evil.test")), "/");
        assert_eq!(safe_return_path(Some("/\r\n/evil.test")), "/");
        assert_eq!(safe_return_path(Some("/tracker\u{7f}")), "/");
        assert_eq!(safe_return_path(Some("/tracker?view=month")), "/tracker?view=month");
    }
}
