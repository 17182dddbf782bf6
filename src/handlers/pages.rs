//! Page handlers: landing, sign-in entry points and guarded feature pages.

use axum::{
    extract::{Query, State},
    http::Uri,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::debug;

use crate::error::AppResult;
use crate::guard::{safe_return_path, GuardOutcome};
use crate::handlers::http::AppState;
use crate::middleware::CurrentAuthState;
use crate::pages::Page;

#[derive(Debug, Deserialize)]
pub struct ReturnQuery {
    pub redirect_url: Option<String>,
}

/// GET /: landing page, not guarded.
pub async fn landing() -> Html<String> {
    Html(shell(Page::Home.title(), &mount(Page::Home.component())))
}

/// Render a guarded page. The guard is asked on every request.
pub async fn guarded(
    page: Page,
    state: AppState,
    CurrentAuthState(auth): CurrentAuthState,
    uri: Uri,
) -> AppResult<Response> {
    let location = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(page.path());
    match state.guard().decide(auth, location, page) {
        GuardOutcome::Loading { status } => Ok(Html(shell(
            "Loading",
            &format!(
                r#"<div class="loading" role="status"><span class="spinner"></span><p>{}</p></div>"#,
                status
            ),
        ))
        .into_response()),
        GuardOutcome::Redirect(nav) => {
            debug!(from = %nav.intent.origin_path, to = %nav.to, "guard redirect");
            // A redirect response never becomes a history entry of its own.
            Ok(Redirect::to(&nav.intent.to_url()?).into_response())
        }
        GuardOutcome::Render(page) => {
            Ok(Html(shell(page.title(), &mount(page.component()))).into_response())
        }
    }
}

/// GET /login
pub async fn login(Query(q): Query<ReturnQuery>) -> Html<String> {
    entry_page("Sign in", "SignIn", q)
}

/// GET /signup
pub async fn signup(Query(q): Query<ReturnQuery>) -> Html<String> {
    entry_page("Sign up", "SignUp", q)
}

fn entry_page(title: &str, component: &str, q: ReturnQuery) -> Html<String> {
    let return_to = safe_return_path(q.redirect_url.as_deref());
    Html(shell(
        title,
        &format!(
            r#"<div id="app" data-component="{}" data-return-to="{}"></div>"#,
            component,
            escape(&return_to)
        ),
    ))
}

fn mount(component: &str) -> String {
    format!(r#"<div id="app" data-component="{}"></div>"#, component)
}

fn shell(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title></head><body>{}</body></html>",
        escape(title),
        body
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Routes for every guarded page, each bound to its own [`Page`].
pub fn guarded_routes() -> axum::Router<AppState> {
    Page::ALL
        .into_iter()
        .filter(Page::is_guarded)
        .fold(axum::Router::new(), |router, page| {
            router.route(
                page.path(),
                axum::routing::get(
                    move |State(state): State<AppState>, auth: CurrentAuthState, uri: Uri| {
                        guarded(page, state, auth, uri)
                    },
                ),
            )
        })
}
