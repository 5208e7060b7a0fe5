//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM operations
//! for database entities. Pet access goes through the [`PetStore`] trait so the
//! service layer can run against any backing store.

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::models::pet::{Model as PetModel, Species};

pub mod pet;
pub mod tenant;

pub use pet::PetRepository;
pub use tenant::{CreateTenantRequest, TenantRepository};

/// Filter applied to pet listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetFilter {
    /// Restrict to a single tenant when set
    pub tenant_id: Option<String>,
}

/// Ordering of pet listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetOrder {
    /// `created_at` descending, ties broken by id descending
    #[default]
    NewestFirst,
}

/// Fields of a pet to insert. The id and creation time are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPet {
    pub tenant_id: String,
    pub name: String,
    pub species: Species,
    pub age_years: Option<i32>,
}

/// Partial update of a pet; `None` leaves the column untouched.
///
/// There is deliberately no tenant field: ownership never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub species: Option<Species>,
    pub age_years: Option<i32>,
}

impl PetChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.species.is_none() && self.age_years.is_none()
    }
}

/// Datastore operations needed by the pet service.
///
/// Each call is a single attempt; callers never retry.
#[async_trait]
pub trait PetStore: Send + Sync {
    /// Look up a pet by id
    async fn find_by_id(&self, id: &str) -> Result<Option<PetModel>, RepositoryError>;

    /// List pets matching `filter`, at most `limit` rows
    async fn find_many(
        &self,
        filter: PetFilter,
        order: PetOrder,
        limit: u64,
    ) -> Result<Vec<PetModel>, RepositoryError>;

    /// Insert a pet and return the stored row
    async fn create(&self, pet: NewPet) -> Result<PetModel, RepositoryError>;

    /// Apply `changes` to an existing pet. Fails with `NotFound` if the row is gone.
    async fn update(&self, id: &str, changes: PetChanges) -> Result<PetModel, RepositoryError>;

    /// Remove a pet. Fails with `NotFound` if the row is gone.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Whether a tenant with this id exists
    async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, RepositoryError>;
}
