//! # RPC Router
//!
//! Procedure-style surface at `POST /rpc/{procedure}`. The request body is the
//! procedure input (an empty body means no input). Results are wrapped as
//! `{"result": ...}` and failures as `{"error": {code, message, procedure}}`.
//! Pet procedures go through the same service as the REST handlers, so
//! authorization behaves identically on both surfaces.

use std::fmt;
use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

use crate::error::PetError;
use crate::identity::{Identity, IdentityHeaders};
use crate::server::AppState;
use crate::services::{CreatePetInput, ListPets, UpdatePetInput, rpc_limit};

/// Procedures served by the RPC router
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    HealthPing,
    PetList,
    PetCreate,
    PetUpdate,
    PetDelete,
}

impl Procedure {
    pub fn as_str(self) -> &'static str {
        match self {
            Procedure::HealthPing => "health.ping",
            Procedure::PetList => "pet.list",
            Procedure::PetCreate => "pet.create",
            Procedure::PetUpdate => "pet.update",
            Procedure::PetDelete => "pet.delete",
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized procedure name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown procedure: {0}")]
pub struct UnknownProcedure(pub String);

impl FromStr for Procedure {
    type Err = UnknownProcedure;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "health.ping" => Ok(Procedure::HealthPing),
            "pet.list" => Ok(Procedure::PetList),
            "pet.create" => Ok(Procedure::PetCreate),
            "pet.update" => Ok(Procedure::PetUpdate),
            "pet.delete" => Ok(Procedure::PetDelete),
            other => Err(UnknownProcedure(other.to_string())),
        }
    }
}

/// Input of `pet.list`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PetListInput {
    /// 1 to 100, default 50
    pub limit: Option<i64>,
    /// Restrict the listing to one tenant
    pub tenant_id: Option<String>,
}

/// Input of `pet.update`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PetUpdateInput {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub changes: UpdatePetInput,
}

/// Input of `pet.delete`
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PetDeleteInput {
    #[serde(default)]
    pub id: String,
}

/// Result of `health.ping`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResult {
    pub ok: bool,
}

/// Successful RPC response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RpcResponse {
    #[schema(value_type = Object)]
    pub result: JsonValue,
}

/// Body of a failed RPC call
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RpcErrorBody {
    /// `BAD_REQUEST`, `NOT_FOUND`, `FORBIDDEN` or `INTERNAL_SERVER_ERROR`
    pub code: String,
    pub message: String,
    /// Procedure name as requested
    pub procedure: String,
}

/// Failed RPC call
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RpcError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: RpcErrorBody,
}

impl RpcError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>, procedure: &str) -> Self {
        Self {
            status,
            error: RpcErrorBody {
                code: code.to_string(),
                message: message.into(),
                procedure: procedure.to_string(),
            },
        }
    }

    fn bad_request(message: impl Into<String>, procedure: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message, procedure)
    }

    fn from_pet_error(error: PetError, procedure: Procedure) -> Self {
        let code = match &error {
            PetError::Validation { .. } => "BAD_REQUEST",
            PetError::NotFound { .. } => "NOT_FOUND",
            PetError::AccessDenied { .. } => "FORBIDDEN",
            PetError::Internal(source) => {
                tracing::error!(error = %source, procedure = %procedure, "RPC procedure failed");
                "INTERNAL_SERVER_ERROR"
            }
            PetError::Serialization(source) => {
                tracing::error!(error = %source, procedure = %procedure, "RPC result not serializable");
                "INTERNAL_SERVER_ERROR"
            }
        };
        Self::new(
            error.status_code(),
            code,
            error.to_string(),
            procedure.as_str(),
        )
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Invoke an RPC procedure
#[utoipa::path(
    post,
    path = "/rpc/{procedure}",
    params(
        IdentityHeaders,
        ("procedure" = String, Path, description = "Procedure name, e.g. `pet.list`")
    ),
    request_body(content = Option<JsonValue>, description = "Procedure input (omit for none)", content_type = "application/json"),
    responses(
        (status = 200, description = "Procedure result", body = RpcResponse),
        (status = 400, description = "Invalid input", body = RpcError),
        (status = 403, description = "Record belongs to a different tenant", body = RpcError),
        (status = 404, description = "Unknown procedure or record not found", body = RpcError),
        (status = 500, description = "Internal server error", body = RpcError)
    ),
    tag = "rpc"
)]
pub async fn call(
    State(state): State<AppState>,
    identity: Identity,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<RpcResponse>, RpcError> {
    let procedure: Procedure = name.parse().map_err(|err: UnknownProcedure| {
        tracing::debug!(procedure = %name, "Unknown RPC procedure");
        RpcError::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string(), &name)
    })?;

    let input = parse_input(&body, procedure)?;
    tracing::debug!(procedure = %procedure, "Dispatching RPC call");

    let result = dispatch(&state, &identity, procedure, input)
        .await
        .map_err(|err| RpcError::from_pet_error(err, procedure))?;

    Ok(Json(RpcResponse { result }))
}

async fn dispatch(
    state: &AppState,
    identity: &Identity,
    procedure: Procedure,
    input: JsonValue,
) -> Result<JsonValue, PetError> {
    let pets = &state.pets;

    let value = match procedure {
        Procedure::HealthPing => to_value(PingResult { ok: true })?,
        Procedure::PetList => {
            let input: PetListInput = decode(input)?;
            let params = ListPets {
                tenant_id: input.tenant_id,
                limit: rpc_limit(input.limit)?,
            };
            to_value(pets.list(identity, params).await?)?
        }
        Procedure::PetCreate => {
            let input: CreatePetInput = decode(input)?;
            to_value(pets.create(identity, input).await?)?
        }
        Procedure::PetUpdate => {
            let input: PetUpdateInput = decode(input)?;
            to_value(pets.update(identity, &input.id, input.changes).await?)?
        }
        Procedure::PetDelete => {
            let input: PetDeleteInput = decode(input)?;
            to_value(pets.delete(identity, &input.id).await?)?
        }
    };

    Ok(value)
}

fn parse_input(body: &Bytes, procedure: Procedure) -> Result<JsonValue, RpcError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(JsonValue::Null);
    }

    serde_json::from_slice(body).map_err(|err| {
        RpcError::bad_request(format!("Invalid JSON input: {err}"), procedure.as_str())
    })
}

/// Decode procedure input; `null` decodes to the input's default.
fn decode<T: DeserializeOwned + Default>(input: JsonValue) -> Result<T, PetError> {
    serde_json::from_value::<Option<T>>(input)
        .map(Option::unwrap_or_default)
        .map_err(|err| PetError::validation(format!("Invalid input: {err}")))
}

fn to_value<T: Serialize>(value: T) -> Result<JsonValue, PetError> {
    Ok(serde_json::to_value(value)?)
}
