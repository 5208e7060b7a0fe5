//! Pet repository for database operations
//!
//! SeaORM-backed implementation of [`PetStore`].

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::{NewPet, PetChanges, PetFilter, PetOrder, PetStore, TenantRepository};
use crate::error::RepositoryError;
use crate::models::pet::{self, Entity as Pet};

/// Repository for pet database operations
#[derive(Debug, Clone)]
pub struct PetRepository {
    db: DatabaseConnection,
}

impl PetRepository {
    /// Creates a new PetRepository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PetStore for PetRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<pet::Model>, RepositoryError> {
        let pet = Pet::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(pet)
    }

    async fn find_many(
        &self,
        filter: PetFilter,
        order: PetOrder,
        limit: u64,
    ) -> Result<Vec<pet::Model>, RepositoryError> {
        let mut query = Pet::find();

        if let Some(tenant_id) = filter.tenant_id {
            query = query.filter(pet::Column::TenantId.eq(tenant_id));
        }

        query = match order {
            PetOrder::NewestFirst => query
                .order_by_desc(pet::Column::CreatedAt)
                .order_by_desc(pet::Column::Id),
        };

        let pets = query.limit(limit).all(&self.db).await?;
        Ok(pets)
    }

    async fn create(&self, new_pet: NewPet) -> Result<pet::Model, RepositoryError> {
        let id = Uuid::new_v4().to_string();

        let active = pet::ActiveModel {
            id: Set(id.clone()),
            tenant_id: Set(new_pet.tenant_id),
            name: Set(new_pet.name),
            species: Set(new_pet.species),
            age_years: Set(new_pet.age_years),
            created_at: Set(Utc::now().into()),
        };

        // Text primary key: insert without RETURNING, then read the row back
        Pet::insert(active).exec_without_returning(&self.db).await?;

        Pet::find_by_id(id.clone())
            .one(&self.db)
            .await?
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn update(&self, id: &str, changes: PetChanges) -> Result<pet::Model, RepositoryError> {
        let existing = Pet::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let mut active = existing.into_active_model();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(species) = changes.species {
            active.species = Set(species);
        }
        if let Some(age_years) = changes.age_years {
            active.age_years = Set(Some(age_years));
        }

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let result = Pet::delete_by_id(id.to_string()).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }

    async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, RepositoryError> {
        TenantRepository::new(&self.db).tenant_exists(tenant_id).await
    }
}
