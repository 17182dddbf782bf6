//! Entry point: load config, wire the gate, and run the server.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wellgate::auth::{JwtSecret, JwtSessionVerifier};
use wellgate::config::Config;
use wellgate::{create_app, AppState, Gate, RouteGuard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let routes = config
        .route_table()
        .map_err(|e| anyhow::anyhow!("config: {}", e))?;
    let verifier = JwtSessionVerifier::new(
        JwtSecret::new(config.jwt_secret.clone()),
        config.session_cookie.clone(),
    );
    let gate = Gate::new(routes, Arc::new(verifier), config.login_path.clone());
    let state = AppState::new(gate, RouteGuard::new(config.login_path.clone()));

    let app = create_app(state);

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
