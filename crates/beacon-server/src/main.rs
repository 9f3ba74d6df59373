mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use beacon_api::auth::{AppState, AppStateInner};
use beacon_api::routes::router;
use beacon_gateway::chat::ChatSession;
use beacon_gateway::dispatcher::Dispatcher;
use beacon_push::{FcmTopicClient, MemoryPushProvider, PushProvider, TopicRelay};

use crate::config::{Config, DEV_JWT_SECRET};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beacon=debug,analytics=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.jwt_secret == DEV_JWT_SECRET {
        warn!("BEACON_JWT_SECRET is unset; using the development secret");
    }
    if !config.relay_requires_auth {
        warn!("Relay endpoints accept unauthenticated requests");
    }

    // Init database
    let db = Arc::new(beacon_db::Database::open(&config.db_path)?);

    let provider: Arc<dyn PushProvider> = match &config.fcm_server_key {
        Some(key) => Arc::new(FcmTopicClient::with_endpoint(&config.fcm_endpoint, key)),
        None => {
            warn!("BEACON_FCM_SERVER_KEY is unset; topic bindings are kept in memory only");
            Arc::new(MemoryPushProvider::new())
        }
    };
    info!("Push provider: {}", provider.name());

    // Shared state
    let dispatcher = Dispatcher::new();
    let state: AppState = Arc::new(AppStateInner {
        db: db.clone(),
        chat: ChatSession::new(db, dispatcher),
        relay: TopicRelay::new(provider),
        jwt_secret: config.jwt_secret.clone(),
        relay_requires_auth: config.relay_requires_auth,
    });

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Beacon server listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
