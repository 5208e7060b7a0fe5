//! # Tenant Repository
//!
//! This module contains the repository implementation for Tenant entities,
//! providing create, lookup and listing for tenant management.

use crate::error::RepositoryError;
use crate::models::tenant::{
    ActiveModel as TenantActiveModel, Column as TenantColumn, Entity as Tenant,
    Model as TenantModel, TenantType,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

/// Maximum accepted length of a tenant name
pub const MAX_TENANT_NAME_LEN: usize = 255;

/// Request data for creating a new tenant
#[derive(Debug, Clone)]
pub struct CreateTenantRequest {
    /// Display name for the tenant
    pub name: String,
    /// Consumer household or vendor organization
    pub tenant_type: TenantType,
}

/// Repository for Tenant database operations
pub struct TenantRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TenantRepository<'a> {
    /// Create a new TenantRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new tenant
    pub async fn create_tenant(
        &self,
        request: CreateTenantRequest,
    ) -> Result<TenantModel, RepositoryError> {
        let name = Self::validate_tenant_name(&request.name)?;

        let tenant_id = Uuid::new_v4().to_string();

        let tenant = TenantActiveModel {
            id: Set(tenant_id.clone()),
            tenant_type: Set(request.tenant_type),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        };

        Tenant::insert(tenant)
            .exec_without_returning(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        self.get_tenant_by_id(&tenant_id)
            .await?
            .ok_or(RepositoryError::NotFound(tenant_id))
    }

    /// Get tenant by ID
    pub async fn get_tenant_by_id(
        &self,
        tenant_id: &str,
    ) -> Result<Option<TenantModel>, RepositoryError> {
        let tenant = Tenant::find_by_id(tenant_id.to_string())
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tenant)
    }

    /// List all tenants, newest first
    pub async fn list_tenants(&self) -> Result<Vec<TenantModel>, RepositoryError> {
        let tenants = Tenant::find()
            .order_by_desc(TenantColumn::CreatedAt)
            .order_by_desc(TenantColumn::Id)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(tenants)
    }

    /// Check if a tenant exists
    pub async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, RepositoryError> {
        Ok(self.get_tenant_by_id(tenant_id).await?.is_some())
    }

    /// Trim a tenant name and check it is non-empty and at most
    /// [`MAX_TENANT_NAME_LEN`] characters. Returns the trimmed name.
    pub fn validate_tenant_name(name: &str) -> Result<&str, RepositoryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepositoryError::validation_error(
                "Tenant name is required and cannot be empty",
            ));
        }

        if name.chars().count() > MAX_TENANT_NAME_LEN {
            return Err(RepositoryError::validation_error(format!(
                "Tenant name cannot exceed {MAX_TENANT_NAME_LEN} characters"
            )));
        }

        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    async fn setup_test_db() -> DatabaseConnection {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn request(name: &str) -> CreateTenantRequest {
        CreateTenantRequest {
            name: name.to_string(),
            tenant_type: TenantType::Consumer,
        }
    }

    #[tokio::test]
    async fn test_create_tenant_success() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let tenant = repo
            .create_tenant(CreateTenantRequest {
                name: "  Paws Clinic ".to_string(),
                tenant_type: TenantType::Vendor,
            })
            .await
            .unwrap();

        assert!(Uuid::parse_str(&tenant.id).is_ok());
        assert_eq!(tenant.name, "Paws Clinic");
        assert_eq!(tenant.tenant_type, TenantType::Vendor);
        assert!(tenant.created_at.timestamp() > 0);
    }

    #[tokio::test]
    async fn test_create_tenant_validation() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let result = repo.create_tenant(request("   ")).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));

        let result = repo.create_tenant(request(&"a".repeat(256))).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));

        assert!(repo.list_tenants().await.unwrap().is_empty());
    }

    #[test]
    fn test_validate_tenant_name_counts_characters_after_trim() {
        let padded = format!("{}Smith{}", " ".repeat(300), " ".repeat(10));
        assert_eq!(TenantRepository::validate_tenant_name(&padded).unwrap(), "Smith");

        let accented = "é".repeat(MAX_TENANT_NAME_LEN);
        assert!(accented.len() > MAX_TENANT_NAME_LEN);
        assert_eq!(
            TenantRepository::validate_tenant_name(&accented).unwrap(),
            accented
        );

        let too_long = "é".repeat(MAX_TENANT_NAME_LEN + 1);
        assert!(matches!(
            TenantRepository::validate_tenant_name(&too_long),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_create_tenant_with_multibyte_name() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let name = "é".repeat(200);
        let tenant = repo.create_tenant(request(&name)).await.unwrap();
        assert_eq!(tenant.name, name);
    }

    #[tokio::test]
    async fn test_get_tenant_by_id() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let created = repo.create_tenant(request("Smith Household")).await.unwrap();

        let found = repo.get_tenant_by_id(&created.id).await.unwrap();
        assert_eq!(found, Some(created));

        let missing = repo.get_tenant_by_id("no-such-tenant").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_tenant_exists() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        assert!(!repo.tenant_exists("no-such-tenant").await.unwrap());

        let created = repo.create_tenant(request("Smith Household")).await.unwrap();
        assert!(repo.tenant_exists(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_tenants_newest_first() {
        let db = setup_test_db().await;
        let repo = TenantRepository::new(&db);

        let first = repo.create_tenant(request("First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repo.create_tenant(request("Second")).await.unwrap();

        let tenants = repo.list_tenants().await.unwrap();
        let ids: Vec<_> = tenants.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
