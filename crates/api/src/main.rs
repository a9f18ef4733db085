use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use roombrief_api::config::{ServerConfig, StoreBackend};
use roombrief_api::router::build_app_router;
use roombrief_api::session::Session;
use roombrief_api::state::AppState;
use roombrief_api::ws;
use roombrief_db::{MemoryStore, PgProjectStore, ProjectStore};
use roombrief_events::{ChangeListener, EventBus};
use roombrief_genai::{Advisor, GenAiConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roombrief_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Loaded server configuration"
    );

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- Project store ---
    let mut listener_handle = None;
    let store: Arc<dyn ProjectStore> = match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory project store; data is lost on restart");
            Arc::new(MemoryStore::with_bus(Arc::clone(&event_bus)))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .expect("DATABASE_URL must be set when STORE_BACKEND=postgres");

            let pool = roombrief_db::create_pool(database_url)
                .await
                .expect("Failed to connect to database");
            tracing::info!("Database connection pool created");

            roombrief_db::health_check(&pool)
                .await
                .expect("Database health check failed");
            tracing::info!("Database health check passed");

            roombrief_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Database migrations applied");

            // Spawn the change listener (NOTIFY -> event bus).
            let pg_listener = ChangeListener::connect(&pool)
                .await
                .expect("Failed to listen for project changes");
            listener_handle = Some(tokio::spawn(ChangeListener::run(
                pg_listener,
                Arc::clone(&event_bus),
            )));
            tracing::info!("Project change listener started");

            Arc::new(PgProjectStore::new(pool, Arc::clone(&event_bus)))
        }
    };

    // --- WebSocket manager ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager));

    // --- Session ---
    let session = Session::new(Arc::clone(&store), Arc::clone(&ws_manager));
    let subscription = session.start_subscription(Arc::clone(&store));

    // --- Advisor ---
    let advisor = Advisor::from_config(&GenAiConfig::from_env());
    if !advisor.is_enabled() {
        tracing::warn!("GEMINI_API_KEY is not set; AI advice will return fallback text");
    }

    // --- App state ---
    let state = AppState {
        store,
        session,
        advisor,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    subscription.unsubscribe();
    tracing::info!("Project subscription closed");

    if let Some(handle) = listener_handle {
        handle.abort();
        let _ = tokio::time::timeout(
            Duration::from_secs(config.shutdown_timeout_secs),
            handle,
        )
        .await;
        tracing::info!("Project change listener stopped");
    }

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    heartbeat_handle.abort();
    tracing::info!("Heartbeat task stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
