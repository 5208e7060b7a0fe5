//! Tenant entity model
//!
//! This module contains the SeaORM entity model for the tenants table.
//! A tenant is the isolation boundary that owns a disjoint set of pets.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Kind of organization a tenant represents
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum TenantType {
    #[sea_orm(string_value = "consumer")]
    Consumer,
    #[sea_orm(string_value = "vendor")]
    Vendor,
}

impl TenantType {
    /// Parse the wire value (`consumer` or `vendor`)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "consumer" => Some(Self::Consumer),
            "vendor" => Some(Self::Vendor),
            _ => None,
        }
    }
}

/// Tenant entity representing multi-tenant isolation
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tenants")]
pub struct Model {
    /// Unique identifier for the tenant (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Consumer household or vendor organization
    #[sea_orm(column_name = "type")]
    pub tenant_type: TenantType,

    /// Display name for the tenant
    pub name: String,

    /// Timestamp when the tenant was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pet::Entity")]
    Pet,
    #[sea_orm(has_many = "super::membership::Entity")]
    Membership,
}

impl Related<super::pet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pet.def()
    }
}

impl Related<super::membership::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Membership.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        super::membership::Relation::User.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::membership::Relation::Tenant.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
