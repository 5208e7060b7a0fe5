//! Pet entity model
//!
//! This module contains the SeaORM entity model for the pets table. Every pet
//! is owned by exactly one tenant and `tenant_id` never changes after insert.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported pet species
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "lowercase")]
pub enum Species {
    #[sea_orm(string_value = "dog")]
    Dog,
    #[sea_orm(string_value = "cat")]
    Cat,
    #[sea_orm(string_value = "bird")]
    Bird,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Species {
    /// Parse the wire value; `None` for anything outside the enumeration
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dog" => Some(Self::Dog),
            "cat" => Some(Self::Cat),
            "bird" => Some(Self::Bird),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Pet entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "pets")]
pub struct Model {
    /// Unique identifier for the pet (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning tenant, immutable after creation
    pub tenant_id: String,

    /// Display name
    pub name: String,

    pub species: Species,

    /// Age in whole years, when known
    pub age_years: Option<i32>,

    /// Timestamp when the pet was created
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenant::Entity",
        from = "Column::TenantId",
        to = "super::tenant::Column::Id",
        on_delete = "Cascade"
    )]
    Tenant,
}

impl Related<super::tenant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
