//! # Data Models
//!
//! This module contains all the data models used throughout the Vetted BFF.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod membership;
pub mod pet;
pub mod tenant;
pub mod user;

pub use membership::Entity as Membership;
pub use pet::Entity as Pet;
pub use tenant::Entity as Tenant;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
    /// Configuration profile the service was started with
    #[schema(example = "local")]
    pub profile: String,
}

impl ServiceInfo {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            service: "vetted-bff".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            profile: profile.into(),
        }
    }
}
