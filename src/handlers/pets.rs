//! # Pets API Handlers
//!
//! REST adapters over [`PetService`](crate::services::PetService). Each handler
//! resolves the caller identity, decodes the request and maps the outcome to
//! an HTTP response; all rules live in the service.

use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::identity::{Identity, IdentityHeaders};
use crate::server::AppState;
use crate::services::{
    CreatePetInput, DeleteResult, ListPets, PetRecord, REST_PAGE_SIZE, UpdatePetInput,
};

/// Query parameters for pet listing
#[derive(Debug, Default, Deserialize, Serialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPetsQuery {
    /// Restrict the listing to one tenant
    pub tenant_id: Option<String>,
}

/// List pets, newest first (at most 50)
#[utoipa::path(
    get,
    path = "/pets",
    params(IdentityHeaders, ListPetsQuery),
    responses(
        (status = 200, description = "Pets, newest first", body = Vec<PetRecord>),
        (status = 400, description = "Malformed query string", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "pets"
)]
pub async fn list_pets(
    State(state): State<AppState>,
    identity: Identity,
    query: Result<Query<ListPetsQuery>, QueryRejection>,
) -> Result<Json<Vec<PetRecord>>, ApiError> {
    let Query(query) = query?;
    let pets = state
        .pets
        .list(
            &identity,
            ListPets {
                tenant_id: query.tenant_id,
                limit: REST_PAGE_SIZE,
            },
        )
        .await?;

    Ok(Json(pets))
}

/// Create a pet
#[utoipa::path(
    post,
    path = "/pets",
    params(IdentityHeaders),
    request_body = CreatePetInput,
    responses(
        (status = 201, description = "Pet created", body = PetRecord),
        (status = 400, description = "Validation failed or tenant not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "pets"
)]
pub async fn create_pet(
    State(state): State<AppState>,
    identity: Identity,
    payload: Result<Json<CreatePetInput>, JsonRejection>,
) -> Result<(StatusCode, Json<PetRecord>), ApiError> {
    let Json(input) = payload?;
    let pet = state.pets.create(&identity, input).await?;

    Ok((StatusCode::CREATED, Json(pet)))
}

/// Get a pet by id
#[utoipa::path(
    get,
    path = "/pets/{id}",
    params(IdentityHeaders, ("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet found", body = PetRecord),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 403, description = "Pet belongs to a different tenant", body = ApiError),
        (status = 404, description = "Pet not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "pets"
)]
pub async fn get_pet(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<PetRecord>, ApiError> {
    let pet = state.pets.get(&identity, &id).await?;
    Ok(Json(pet))
}

/// Update a pet
///
/// Only the supplied fields change; the owning tenant is never modified.
#[utoipa::path(
    put,
    path = "/pets/{id}",
    params(IdentityHeaders, ("id" = String, Path, description = "Pet identifier")),
    request_body = UpdatePetInput,
    responses(
        (status = 200, description = "Pet updated", body = PetRecord),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 403, description = "Pet belongs to a different tenant", body = ApiError),
        (status = 404, description = "Pet not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "pets"
)]
pub async fn update_pet(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePetInput>, JsonRejection>,
) -> Result<Json<PetRecord>, ApiError> {
    let Json(input) = payload?;
    let pet = state.pets.update(&identity, &id, input).await?;

    Ok(Json(pet))
}

/// Delete a pet
#[utoipa::path(
    delete,
    path = "/pets/{id}",
    params(IdentityHeaders, ("id" = String, Path, description = "Pet identifier")),
    responses(
        (status = 200, description = "Pet deleted", body = DeleteResult),
        (status = 400, description = "Invalid id", body = ApiError),
        (status = 403, description = "Pet belongs to a different tenant", body = ApiError),
        (status = 404, description = "Pet not found", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    ),
    tag = "pets"
)]
pub async fn delete_pet(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, ApiError> {
    let result = state.pets.delete(&identity, &id).await?;
    Ok(Json(result))
}
