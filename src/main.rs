use chrono::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cipherstudio::{auth::TokenSigner, config::Config, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cipherstudio=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();

    tracing::info!("Using database at {}", config.database_path.display());
    let pool = db::init_db(&config.database_path).expect("Failed to initialize database");

    let lifetime = Duration::days(config.token_days);
    let tokens = match &config.token_secret {
        Some(secret) => TokenSigner::new(secret.as_bytes(), lifetime),
        None => {
            tracing::warn!("TOKEN_SECRET not set; sessions will not survive a restart");
            TokenSigner::ephemeral(lifetime)
        }
    }
    .expect("Failed to initialize token signer");

    if !config.secure_cookies {
        tracing::warn!("Session cookies are not marked Secure");
    }

    let state = AppState::new(pool, tokens, config.secure_cookies);
    let app = handlers::router(state).layer(handlers::cors_layer(&config.cors_origins));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

    tracing::info!("Server running on http://{}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
