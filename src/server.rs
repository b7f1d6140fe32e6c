//! Router assembly and server startup.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::config::RelayConfig;
use crate::domain::SessionRegistry;
use crate::service::RelayService;
use crate::storage::DeckStore;
use crate::ws::handler::ws_handler;

/// Builds the application state: an empty registry and a deck store
/// rooted at the configured uploads directory.
#[must_use]
pub fn build_state(config: RelayConfig) -> AppState {
    let registry = Arc::new(SessionRegistry::new());
    let store = DeckStore::new(&config.uploads_dir, &config.public_base_url);
    let relay = RelayService::new(registry, store).with_max_idle_rooms(config.max_idle_rooms);
    AppState {
        relay: Arc::new(relay),
        config: Arc::new(config),
    }
}

/// Builds the full router: REST API, `/ws`, `/files`, and (with the
/// `swagger-ui` feature) the API docs.
pub fn build_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let rest = api::build_router().layer(TimeoutLayer::new(Duration::from_secs(
        config.request_timeout_secs,
    )));
    let upload = api::handlers::deck::routes()
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.upload_timeout_secs,
        )));

    let app = Router::new()
        .merge(rest)
        .merge(upload)
        .route("/ws", get(ws_handler))
        .nest_service("/files", ServeDir::new(&config.uploads_dir));

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        app.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::openapi::ApiDoc::openapi()),
        )
    };

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
    .with_state(state)
}

/// Serves the relay on an already bound listener until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve_on(listener: TcpListener, config: RelayConfig) -> anyhow::Result<()> {
    if let Err(e) = tokio::fs::create_dir_all(&config.uploads_dir).await {
        tracing::warn!(
            dir = %config.uploads_dir.display(),
            error = %e,
            "uploads directory unavailable; uploads will fail until it exists"
        );
    }

    let app = build_app(build_state(config));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Binds `config.listen_addr` and serves the relay until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");
    serve_on(listener, config).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
