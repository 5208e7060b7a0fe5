//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Vetted BFF.

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::repositories::PetRepository;
use crate::services::PetService;
use crate::telemetry::trace_context_middleware;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub pets: PetService,
}

/// Builds the application state with the SeaORM-backed pet store
pub fn create_app_state(config: AppConfig, db: DatabaseConnection) -> AppState {
    let pets = PetService::new(Arc::new(PetRepository::new(db.clone())));
    AppState {
        config: Arc::new(config),
        db,
        pets,
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/pets",
            get(handlers::pets::list_pets).post(handlers::pets::create_pet),
        )
        .route(
            "/pets/{id}",
            get(handlers::pets::get_pet)
                .put(handlers::pets::update_pet)
                .delete(handlers::pets::delete_pet),
        )
        .route(
            "/tenants",
            get(handlers::tenants::list_tenants).post(handlers::tenants::create_tenant),
        )
        .route("/rpc/{procedure}", post(handlers::rpc::call))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(trace_context_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let profile = config.profile.clone();

    let app = create_app(create_app_state(config, db));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::health,
        crate::handlers::pets::list_pets,
        crate::handlers::pets::create_pet,
        crate::handlers::pets::get_pet,
        crate::handlers::pets::update_pet,
        crate::handlers::pets::delete_pet,
        crate::handlers::tenants::list_tenants,
        crate::handlers::tenants::create_tenant,
        crate::handlers::rpc::call,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::pet::Species,
            crate::models::tenant::TenantType,
            crate::error::ApiError,
            crate::handlers::HealthResponse,
            crate::services::PetRecord,
            crate::services::CreatePetInput,
            crate::services::UpdatePetInput,
            crate::services::DeleteResult,
            crate::handlers::tenants::CreateTenantRequestDto,
            crate::handlers::tenants::TenantResponseDto,
            crate::handlers::rpc::PetListInput,
            crate::handlers::rpc::PetUpdateInput,
            crate::handlers::rpc::PetDeleteInput,
            crate::handlers::rpc::PingResult,
            crate::handlers::rpc::RpcResponse,
            crate::handlers::rpc::RpcError,
            crate::handlers::rpc::RpcErrorBody,
        )
    ),
    tags(
        (name = "root", description = "Service information and health"),
        (name = "pets", description = "Tenant-scoped pet records"),
        (name = "tenants", description = "Tenant management"),
        (name = "rpc", description = "Procedure-style access to the same operations"),
    ),
    info(
        title = "Vetted BFF API",
        description = "Backend-for-frontend of the Vetted pet-management application",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
