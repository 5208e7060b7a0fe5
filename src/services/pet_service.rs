//! Pet service: tenant-scoped CRUD over a [`PetStore`].
//!
//! Every operation runs the same pipeline regardless of transport:
//! validate the input, look the record up, gate it against the caller's
//! tenant, then execute. Lookup always precedes the gate, so a missing id is
//! reported as not found even to a caller from another tenant.

use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PetError;
use crate::gate::ensure_pet_access;
use crate::identity::Identity;
use crate::models::pet::{Model as PetModel, Species};
use crate::repositories::{NewPet, PetChanges, PetFilter, PetOrder, PetStore};

/// Page size of `GET /pets`
pub const REST_PAGE_SIZE: u64 = 50;
/// `pet.list` limit when none is given
pub const RPC_DEFAULT_LIMIT: u64 = 50;
/// Largest accepted `pet.list` limit
pub const RPC_MAX_LIMIT: u64 = 100;

const SPECIES_MESSAGE: &str = "species must be one of: dog, cat, bird, other";

/// Pet as returned by both transports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    #[schema(example = "0b8f6f0e-8d7e-4d5a-9a39-2c1d0a4e7f11")]
    pub id: String,
    /// Owning tenant
    #[schema(example = "t1")]
    pub tenant_id: String,
    #[schema(example = "Buddy")]
    pub name: String,
    pub species: Species,
    #[schema(example = 3)]
    pub age_years: Option<i32>,
    /// Creation time (RFC 3339)
    #[schema(example = "2024-01-15T10:30:00+00:00")]
    pub created_at: String,
}

impl From<PetModel> for PetRecord {
    fn from(model: PetModel) -> Self {
        Self {
            id: model.id,
            tenant_id: model.tenant_id,
            name: model.name,
            species: model.species,
            age_years: model.age_years,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Input for creating a pet.
///
/// Required fields are optional here so that a missing field is reported as a
/// field-level validation error rather than a body decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetInput {
    /// Display name (required, non-empty)
    #[schema(example = "Buddy")]
    pub name: Option<String>,
    /// One of `dog`, `cat`, `bird`, `other` (required)
    #[schema(example = "dog")]
    pub species: Option<String>,
    /// Owning tenant; defaults to the caller's tenant
    #[schema(example = "t1")]
    pub tenant_id: Option<String>,
    /// Non-negative age in years
    #[schema(example = 3)]
    pub age_years: Option<i32>,
}

/// Partial update of a pet. At least one field must be supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePetInput {
    #[schema(example = "Max")]
    pub name: Option<String>,
    #[schema(example = "cat")]
    pub species: Option<String>,
    #[schema(example = 4)]
    pub age_years: Option<i32>,
}

/// Result of a delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResult {
    pub success: bool,
    pub id: String,
}

/// Listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPets {
    /// Explicit tenant scope requested by the caller
    pub tenant_id: Option<String>,
    pub limit: u64,
}

/// Validate the `limit` of `pet.list`: absent means the default, anything
/// outside `1..=100` is rejected.
pub fn rpc_limit(limit: Option<i64>) -> Result<u64, PetError> {
    match limit {
        None => Ok(RPC_DEFAULT_LIMIT),
        Some(value) if (1..=RPC_MAX_LIMIT as i64).contains(&value) => Ok(value as u64),
        Some(_) => Err(PetError::invalid_field(
            "limit",
            format!("limit must be between 1 and {RPC_MAX_LIMIT}"),
        )),
    }
}

/// Tenant-scoped pet operations shared by REST and RPC
#[derive(Clone)]
pub struct PetService {
    store: Arc<dyn PetStore>,
}

impl PetService {
    pub fn new(store: Arc<dyn PetStore>) -> Self {
        Self { store }
    }

    /// List pets newest first.
    ///
    /// Records are not gated individually; only an explicit `tenant_id` scope
    /// narrows the result.
    pub async fn list(
        &self,
        identity: &Identity,
        params: ListPets,
    ) -> Result<Vec<PetRecord>, PetError> {
        let filter = PetFilter {
            tenant_id: params.tenant_id.filter(|id| !id.is_empty()),
        };
        tracing::debug!(
            caller_tenant_id = identity.tenant_id.as_deref().unwrap_or("-"),
            scope = filter.tenant_id.as_deref().unwrap_or("-"),
            limit = params.limit,
            "Listing pets"
        );

        let pets = self
            .store
            .find_many(filter, PetOrder::NewestFirst, params.limit)
            .await?;

        Ok(pets.into_iter().map(PetRecord::from).collect())
    }

    /// Fetch a single pet
    pub async fn get(&self, identity: &Identity, id: &str) -> Result<PetRecord, PetError> {
        let pet = self.load_authorized(identity, id).await?;
        Ok(pet.into())
    }

    /// Create a pet for the body's tenant, or the caller's tenant when the body
    /// names none. The tenant must exist.
    pub async fn create(
        &self,
        identity: &Identity,
        input: CreatePetInput,
    ) -> Result<PetRecord, PetError> {
        let name = required_text("name", input.name)?;
        let species = match input.species {
            Some(value) => parse_species(&value)?,
            None => return Err(PetError::invalid_field("species", "species is required")),
        };
        validate_age(input.age_years)?;

        let tenant_id = match input.tenant_id {
            Some(tenant_id) if tenant_id.is_empty() => {
                return Err(PetError::invalid_field(
                    "tenantId",
                    "tenantId must not be empty",
                ));
            }
            Some(tenant_id) => tenant_id,
            None => identity.tenant_id.clone().ok_or_else(|| {
                PetError::invalid_field("tenantId", "tenantId required")
            })?,
        };

        if !self.store.tenant_exists(&tenant_id).await? {
            tracing::info!(tenant_id = %tenant_id, "Rejected pet for unknown tenant");
            return Err(PetError::invalid_field(
                "tenantId",
                "Invalid tenantId (tenant not found)",
            ));
        }

        let pet = self
            .store
            .create(NewPet {
                tenant_id,
                name,
                species,
                age_years: input.age_years,
            })
            .await?;

        counter!("pets_created_total").increment(1);
        tracing::info!(pet_id = %pet.id, tenant_id = %pet.tenant_id, "Pet created");

        Ok(pet.into())
    }

    /// Apply a partial update. The owning tenant never changes.
    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        input: UpdatePetInput,
    ) -> Result<PetRecord, PetError> {
        validate_id(id)?;
        let changes = validate_changes(input)?;

        self.load_authorized(identity, id).await?;

        let pet = self.store.update(id, changes).await?;

        counter!("pets_updated_total").increment(1);
        tracing::info!(pet_id = %pet.id, "Pet updated");

        Ok(pet.into())
    }

    /// Delete a pet
    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<DeleteResult, PetError> {
        self.load_authorized(identity, id).await?;

        self.store.delete(id).await?;

        counter!("pets_deleted_total").increment(1);
        tracing::info!(pet_id = id, "Pet deleted");

        Ok(DeleteResult {
            success: true,
            id: id.to_string(),
        })
    }

    async fn load_authorized(&self, identity: &Identity, id: &str) -> Result<PetModel, PetError> {
        validate_id(id)?;

        let pet = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| PetError::NotFound { id: id.to_string() })?;

        ensure_pet_access(identity.tenant_id.as_deref(), &pet.id, &pet.tenant_id)?;

        Ok(pet)
    }
}

fn validate_id(id: &str) -> Result<(), PetError> {
    if id.trim().is_empty() {
        return Err(PetError::invalid_field("id", "id is required"));
    }
    Ok(())
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, PetError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(PetError::invalid_field(
            field,
            format!("{field} must not be empty"),
        )),
        None => Err(PetError::invalid_field(field, format!("{field} is required"))),
    }
}

fn parse_species(value: &str) -> Result<Species, PetError> {
    Species::parse(value).ok_or_else(|| PetError::invalid_field("species", SPECIES_MESSAGE))
}

fn validate_age(age_years: Option<i32>) -> Result<(), PetError> {
    match age_years {
        Some(age) if age < 0 => Err(PetError::invalid_field(
            "ageYears",
            "ageYears must be a non-negative integer",
        )),
        _ => Ok(()),
    }
}

fn validate_changes(input: UpdatePetInput) -> Result<PetChanges, PetError> {
    let changes = PetChanges {
        name: match input.name {
            Some(name) => Some(required_text("name", Some(name))?),
            None => None,
        },
        species: match input.species {
            Some(species) => Some(parse_species(&species)?),
            None => None,
        },
        age_years: input.age_years,
    };
    validate_age(changes.age_years)?;

    if changes.is_empty() {
        return Err(PetError::validation(
            "At least one of name, species or ageYears must be provided",
        ));
    }

    Ok(changes)
}
