//! # Tenants API Handlers
//!
//! This module contains handlers for tenant creation and listing endpoints.

use crate::error::{ApiError, RepositoryError, validation_error};
use crate::models::tenant::{Model as TenantModel, TenantType};
use crate::repositories::{CreateTenantRequest, TenantRepository};
use crate::server::AppState;
use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request payload for creating a new tenant
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateTenantRequestDto {
    /// Display name for the tenant (required, max 255 characters)
    #[schema(example = "Smith Household")]
    pub name: Option<String>,
    /// `consumer` or `vendor` (required)
    #[serde(rename = "type")]
    #[schema(example = "consumer")]
    pub tenant_type: Option<String>,
}

/// Tenant as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantResponseDto {
    /// Unique identifier for the tenant
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: String,
    #[serde(rename = "type")]
    pub tenant_type: TenantType,
    #[schema(example = "Smith Household")]
    pub name: String,
    /// Timestamp when the tenant was created (RFC 3339)
    #[schema(example = "2024-01-15T10:30:00+00:00")]
    pub created_at: String,
}

impl From<TenantModel> for TenantResponseDto {
    fn from(model: TenantModel) -> Self {
        Self {
            id: model.id,
            tenant_type: model.tenant_type,
            name: model.name,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// List tenants, newest first
#[utoipa::path(
    get,
    path = "/tenants",
    responses(
        (status = 200, description = "All tenants, newest first", body = Vec<TenantResponseDto>),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn list_tenants(
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponseDto>>, ApiError> {
    let tenants = TenantRepository::new(&state.db).list_tenants().await?;

    Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// Create a new tenant
#[utoipa::path(
    post,
    path = "/tenants",
    request_body = CreateTenantRequestDto,
    responses(
        (status = 201, description = "Tenant created successfully", body = TenantResponseDto),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "tenants"
)]
pub async fn create_tenant(
    State(state): State<AppState>,
    payload: Result<Json<CreateTenantRequestDto>, JsonRejection>,
) -> Result<(StatusCode, Json<TenantResponseDto>), ApiError> {
    let Json(request) = payload?;

    let name = request.name.unwrap_or_default();
    TenantRepository::validate_tenant_name(&name).map_err(|err| match err {
        RepositoryError::Validation(message) => invalid_field("name", &message),
        other => other.into(),
    })?;

    let tenant_type = request
        .tenant_type
        .as_deref()
        .and_then(TenantType::parse)
        .ok_or_else(|| invalid_field("type", "type must be one of: consumer, vendor"))?;

    let tenant = TenantRepository::new(&state.db)
        .create_tenant(CreateTenantRequest { name, tenant_type })
        .await?;

    tracing::info!(tenant_id = %tenant.id, tenant_type = ?tenant.tenant_type, "Tenant created");

    Ok((StatusCode::CREATED, Json(tenant.into())))
}

fn invalid_field(field: &str, message: &str) -> ApiError {
    validation_error(message, serde_json::json!({ "field": field }))
}
