//! Test utilities for database and router testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with migrations, tenant fixtures, and helpers for driving the axum router.

#![allow(dead_code)]

use anyhow::Result;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;
use vetted_bff::{
    config::AppConfig,
    models::tenant::{self, TenantType},
    server::{create_app, create_app_state},
};

/// Sets up an in-memory SQLite database with all migrations applied.
///
/// The pool is pinned to one connection: every SQLite in-memory connection
/// is a separate database.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Creates a tenant with a fixed id.
pub async fn create_test_tenant(db: &DatabaseConnection, tenant_id: &str) -> Result<String> {
    tenant::ActiveModel {
        id: Set(tenant_id.to_string()),
        tenant_type: Set(TenantType::Consumer),
        name: Set(format!("Tenant {tenant_id}")),
        created_at: Set(chrono::Utc::now().into()),
    }
    .insert(db)
    .await?;

    Ok(tenant_id.to_string())
}

/// Router backed by a fresh migrated database, plus the database handle.
pub async fn test_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let config = AppConfig {
        profile: "test".to_string(),
        database_url: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    let app = create_app(create_app_state(config, db.clone()));
    Ok((app, db))
}

/// Builds a JSON request with optional caller tenant.
pub fn json_request(
    method: &str,
    uri: &str,
    tenant_id: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(tenant_id) = tenant_id {
        builder = builder.header("x-tenant-id", tenant_id);
    }

    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    builder.body(body).expect("valid request")
}

/// Sends a request through the router and decodes the JSON body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("router responds");
    read_json(response).await
}

/// Splits a response into status and JSON body (`Null` when empty).
pub async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, value)
}
