use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::todo::api::{TodoState, create_todo_router};
use crate::todo::{TodoGateway, TodoService};

pub mod health;

pub use health::{HealthResponse, health_check_handler};

/// CORS policy for the todo routes: only the configured origin may call them.
pub fn todo_cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Builds the complete application router on top of the given gateway.
///
/// Todo routes are served both at `/todos` and under `/api/todos`.
pub fn create_app_router(
    config: &Config,
    gateway: Arc<dyn TodoGateway>,
) -> anyhow::Result<Router> {
    let todo_router = create_todo_router(TodoState {
        gateway: gateway.clone(),
    })
    .layer(todo_cors_layer(&config.cors_origin)?);

    let app = Router::new()
        .route("/health", get(health_check_handler))
        .with_state(gateway)
        .merge(todo_router.clone())
        .nest("/api", todo_router)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    Ok(app)
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(config.connection_url()).await?;
    let gateway = TodoService::new(db);
    gateway.initialize().await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app_router(&config, Arc::new(gateway))?;

    axum::serve(listener, app).await?;
    Ok(())
}
