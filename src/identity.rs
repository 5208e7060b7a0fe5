//! # Caller Identity
//!
//! Resolves the caller's user and tenant from request headers. Authentication
//! happens upstream of this service; the headers are taken as already trusted.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Header naming the calling user
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header naming the caller's tenant
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Resolved caller identity. Both parts are optional; `(None, None)` is an
/// unauthenticated caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: Option<String>,
    pub tenant_id: Option<String>,
}

impl Identity {
    /// Identity with only a tenant set
    pub fn for_tenant(tenant_id: impl Into<String>) -> Self {
        Self {
            user_id: None,
            tenant_id: Some(tenant_id.into()),
        }
    }

    /// Resolve from request headers. Never fails: absent, empty or non-text
    /// values resolve to `None`.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            user_id: header_value(headers, USER_ID_HEADER),
            tenant_id: header_value(headers, TENANT_ID_HEADER),
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = Identity::from_headers(&parts.headers);
        tracing::debug!(
            user_id = identity.user_id.as_deref().unwrap_or("-"),
            tenant_id = identity.tenant_id.as_deref().unwrap_or("-"),
            "Resolved caller identity"
        );
        Ok(identity)
    }
}

/// OpenAPI header parameters for caller identity
#[derive(Debug, Serialize, Deserialize, IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Header)]
pub struct IdentityHeaders {
    /// Calling user identifier
    #[serde(rename = "x-user-id")]
    #[param(rename = "x-user-id", value_type = Option<String>)]
    pub user_id: Option<String>,
    /// Caller's tenant; when present, records of other tenants are not accessible
    #[serde(rename = "x-tenant-id")]
    #[param(rename = "x-tenant-id", value_type = Option<String>)]
    pub tenant_id: Option<String>,
}
