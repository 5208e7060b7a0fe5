//! # Tenant Gate
//!
//! Decides whether a caller may touch a record based on tenant ownership.
//!
//! A caller without a tenant is trusted: internal calls and REST callers that
//! send no tenant header see every record. This default is intentionally
//! permissive and must not be tightened without a policy change.

use metrics::counter;

use crate::error::PetError;

/// Result of a gate decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn as_str(self) -> &'static str {
        match self {
            Access::Allow => "allow",
            Access::Deny => "deny",
        }
    }
}

/// Deny iff the caller has a tenant and it differs from the record's tenant.
pub fn authorize(caller_tenant_id: Option<&str>, record_tenant_id: &str) -> Access {
    match caller_tenant_id {
        Some(caller) if caller != record_tenant_id => Access::Deny,
        _ => Access::Allow,
    }
}

/// Gate a pet record, turning a denial into [`PetError::AccessDenied`].
pub fn ensure_pet_access(
    caller_tenant_id: Option<&str>,
    pet_id: &str,
    record_tenant_id: &str,
) -> Result<(), PetError> {
    let access = authorize(caller_tenant_id, record_tenant_id);
    counter!("pets_gate_decisions_total", "decision" => access.as_str()).increment(1);
    tracing::debug!(pet_id, decision = access.as_str(), "Tenant gate decision");

    match access {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::warn!(
                pet_id,
                caller_tenant_id = caller_tenant_id.unwrap_or("-"),
                record_tenant_id,
                "Cross-tenant access denied"
            );
            Err(PetError::AccessDenied {
                id: pet_id.to_string(),
            })
        }
    }
}
