//! Application configuration loaded from environment.

use std::net::SocketAddr;

use crate::auth::DEFAULT_SESSION_COOKIE;
use crate::guard::DEFAULT_LOGIN_PATH;
use crate::routes::{RouteTable, DEFAULT_IGNORED_ROUTES, DEFAULT_PUBLIC_ROUTES};

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// Secret the identity provider signs session tokens with.
    pub jwt_secret: String,
    /// Cookie carrying the session token.
    pub session_cookie: String,
    /// Where unauthenticated page requests are sent.
    pub login_path: String,
    /// Patterns reachable without a session.
    pub public_routes: Vec<String>,
    /// Patterns skipped by auth processing.
    pub ignored_routes: Vec<String>,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr = get("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let server_addr: SocketAddr = server_addr
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let jwt_secret = get("JWT_SECRET")
            .unwrap_or_else(|| "wellgate_jwt_secret_change_in_production".to_string());
        if jwt_secret.len() < 32 {
            return Err(ConfigLoadError::WeakJwtSecret);
        }
        let session_cookie =
            get("SESSION_COOKIE").unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
        let login_path = get("LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string());
        if !login_path.starts_with('/') {
            return Err(ConfigLoadError::InvalidLoginPath(login_path));
        }
        let public_routes = list(get("PUBLIC_ROUTES"), DEFAULT_PUBLIC_ROUTES);
        let ignored_routes = list(get("IGNORED_ROUTES"), DEFAULT_IGNORED_ROUTES);
        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            jwt_secret,
            session_cookie,
            login_path,
            public_routes,
            ignored_routes,
            log_level,
        })
    }

    /// Compile the route lists. The login path must not be protected, or
    /// every denied page would redirect to it forever.
    pub fn route_table(&self) -> Result<RouteTable, ConfigLoadError> {
        let table = RouteTable::new(&self.public_routes, &self.ignored_routes)
            .map_err(|e| ConfigLoadError::InvalidRoutes(e.to_string()))?;
        if table.classify(&self.login_path).requires_session() {
            return Err(ConfigLoadError::ProtectedLoginPath(self.login_path.clone()));
        }
        Ok(table)
    }
}

fn list(raw: Option<String>, default: &[&str]) -> Vec<String> {
    match raw {
        Some(s) => s
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect(),
        None => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,
    #[error("JWT_SECRET must be at least 32 characters")]
    WeakJwtSecret,
    #[error("LOGIN_PATH must start with `/`, got `{0}`")]
    InvalidLoginPath(String),
    #[error("Invalid route list: {0}")]
    InvalidRoutes(String),
    #[error("LOGIN_PATH `{0}` is protected; it must be public or ignored")]
    ProtectedLoginPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigLoadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_addr.port(), 3000);
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.session_cookie, "__session");
        assert_eq!(config.public_routes.len(), DEFAULT_PUBLIC_ROUTES.len());
        assert_eq!(config.ignored_routes.len(), DEFAULT_IGNORED_ROUTES.len());
        assert!(config.route_table().is_ok());
    }

    #[test]
    fn route_lists_are_comma_separated() {
        let config = load(&[("PUBLIC_ROUTES", "/, /about ,"), ("IGNORED_ROUTES", "")]).unwrap();
        assert_eq!(config.public_routes, vec!["/", "/about"]);
        assert!(config.ignored_routes.is_empty());
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            load(&[("SERVER_ADDR", "nope")]),
            Err(ConfigLoadError::InvalidServerAddr)
        ));
        assert!(matches!(
            load(&[("JWT_SECRET", "short")]),
            Err(ConfigLoadError::WeakJwtSecret)
        ));
        assert!(matches!(
            load(&[("LOGIN_PATH", "login")]),
            Err(ConfigLoadError::InvalidLoginPath(_))
        ));
        let config = load(&[("PUBLIC_ROUTES", "/api/(.*")]).unwrap();
        assert!(matches!(
            config.route_table(),
            Err(ConfigLoadError::InvalidRoutes(_))
        ));
    }

    #[test]
    fn login_path_must_not_be_protected() {
        let config = load(&[("LOGIN_PATH", "/tracker")]).unwrap();
        assert!(matches!(
            config.route_table(),
            Err(ConfigLoadError::ProtectedLoginPath(p)) if p == "/tracker"
        ));

        let config = load(&[("LOGIN_PATH", "/signup")]).unwrap();
        assert!(config.route_table().is_ok());

        let config = load(&[("LOGIN_PATH", "/sign-in"), ("PUBLIC_ROUTES", "/, /sign-in")]).unwrap();
        assert!(config.route_table().is_ok());
    }
}
