//! End-to-end tests of the RPC surface against an in-memory database.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{create_test_tenant, json_request, send, test_app};

fn rpc(procedure: &str, tenant_id: Option<&str>, input: Option<Value>) -> Request<Body> {
    json_request("POST", &format!("/rpc/{procedure}"), tenant_id, input)
}

#[tokio::test]
async fn health_ping_needs_no_input() -> Result<()> {
    let (app, _db) = test_app().await?;

    let (status, body) = send(&app, rpc("health.ping", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": {"ok": true}}));
    Ok(())
}

#[tokio::test]
async fn unknown_procedure_is_not_found() -> Result<()> {
    let (app, _db) = test_app().await?;

    let (status, body) = send(&app, rpc("pet.explode", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["procedure"], "pet.explode");
    Ok(())
}

#[tokio::test]
async fn list_limit_above_maximum_is_rejected() -> Result<()> {
    let (app, _db) = test_app().await?;

    let (status, body) = send(&app, rpc("pet.list", None, Some(json!({"limit": 200})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["procedure"], "pet.list");
    assert_eq!(body["error"]["message"], "limit must be between 1 and 100");

    let (status, _) = send(&app, rpc("pet.list", None, Some(json!({"limit": 0})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, rpc("pet.list", None, Some(json!({"limit": 100})))).await;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn crud_round_through_rpc() -> Result<()> {
    let (app, db) = test_app().await?;
    create_test_tenant(&db, "T1").await?;

    let (status, body) = send(
        &app,
        rpc(
            "pet.create",
            Some("T1"),
            Some(json!({"name": "Buddy", "species": "dog"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pet = body["result"].clone();
    assert_eq!(pet["tenantId"], "T1");
    let id = pet["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        rpc(
            "pet.update",
            Some("T1"),
            Some(json!({"id": id, "ageYears": 4})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["ageYears"], 4);
    assert_eq!(body["result"]["name"], "Buddy");

    let (status, body) = send(&app, rpc("pet.list", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"].as_array().unwrap().len(), 1);

    let (status, body) = send(&app, rpc("pet.delete", Some("T1"), Some(json!({"id": id})))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], json!({"success": true, "id": id}));

    let (status, body) = send(&app, rpc("pet.delete", Some("T1"), Some(json!({"id": id})))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn rpc_enforces_same_tenant_gate_as_rest() -> Result<()> {
    let (app, db) = test_app().await?;
    create_test_tenant(&db, "T1").await?;

    let (_, body) = send(
        &app,
        rpc(
            "pet.create",
            None,
            Some(json!({"name": "Buddy", "species": "dog", "tenantId": "T1"})),
        ),
    )
    .await;
    let id = body["result"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        rpc(
            "pet.update",
            Some("T2"),
            Some(json!({"id": id, "name": "Stolen"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
    assert_eq!(
        body["error"]["message"],
        "Access denied: Pet belongs to different tenant"
    );

    let (status, _) = send(&app, rpc("pet.delete", Some("T2"), Some(json!({"id": id})))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Still there, unchanged
    let (status, body) = send(
        &app,
        json_request("GET", &format!("/pets/{id}"), Some("T1"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Buddy");
    Ok(())
}

#[tokio::test]
async fn invalid_input_is_bad_request() -> Result<()> {
    let (app, db) = test_app().await?;
    create_test_tenant(&db, "T1").await?;

    let (status, body) = send(&app, rpc("pet.create", Some("T1"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send(&app, rpc("pet.delete", Some("T1"), Some(json!({})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        rpc("pet.list", None, Some(json!({"limit": "fifty"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/rpc/pet.list")
        .body(Body::from("{broken"))?;
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["procedure"], "pet.list");
    Ok(())
}
