//! HTTP client tests against an in-process axum backend that answers in
//! every envelope shape the real backend uses.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use client::api::{ApiClient, NoAuth, StaticToken};
use client::config::settings::ApiSettings;
use client::prefs::{Preferences, TOKEN_KEY};
use client::services::{delete_many, upload_documents};
use client::{AppContext, ClientError};
use shared::catalog::Resource;
use shared::models::Row;

const TOKEN: &str = "jwt-1";

fn bearer_ok(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map_or(false, |v| v == format!("Bearer {}", TOKEN))
}

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "pw" && body["username"] == "ravi" {
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Login successful",
                "token": TOKEN,
                "user": {"name": "Ravi Iyer", "role": "technician"}
            })),
        )
    } else if body["password"] == "pw" {
        (
            StatusCode::OK,
            Json(json!({"success": true, "data": {"access_token": TOKEN, "user": {"name": "Asha Rao", "role": "admin"}}})),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"})))
    }
}

async fn roles(headers: HeaderMap) -> impl IntoResponse {
    if bearer_ok(&headers) {
        (StatusCode::OK, Json(json!([{"id": 1, "name": "admin"}])))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"error": {"message": "Token missing"}})))
    }
}

async fn delete_vendor(Path(id): Path<String>) -> impl IntoResponse {
    if id == "2" {
        (StatusCode::NOT_FOUND, Json(json!({"message": "Vendor 2 not found"})))
    } else {
        (StatusCode::OK, Json(json!({"success": true})))
    }
}

async fn upload(Path(id): Path<String>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let text = String::from_utf8_lossy(&body);
    if !content_type.starts_with("multipart/form-data") || !text.contains("name=\"file\"") {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": "file field missing"})));
    }
    if text.contains("filename=\"broken.pdf\"") {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"message": "Unsupported document"})));
    }
    (StatusCode::OK, Json(json!({"success": true, "data": {"vendor_id": id}})))
}

async fn create_branch(Json(mut body): Json<Value>) -> Json<Value> {
    body["id"] = json!(7);
    Json(json!({"success": true, "data": body}))
}

fn app() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route(
            "/api/branches",
            get(|| async { Json(json!([{"id": 1, "name": "North"}, {"id": 2, "name": "South"}])) })
                .post(create_branch),
        )
        .route(
            "/api/vendors",
            get(|| async { Json(json!({"success": true, "data": [{"id": 1, "name": "Acme"}], "message": "1 vendor"})) }),
        )
        .route("/api/vendors/:id", delete(delete_vendor))
        .route("/api/vendors/:id/documents", post(upload))
        .route("/api/assets", get(|| async { Json(json!({"data": null})) }))
        .route(
            "/api/certificates",
            get(|| async { Json(json!({"success": false, "message": "Certificate registry offline"})) }),
        )
        .route(
            "/api/users",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "database down"}))) }),
        )
        .route("/api/inspections", get(|| async { "<html>gateway</html>" }))
        .route(
            "/api/work-orders/:id",
            get(|Path(id): Path<String>| async move { Json(json!({"data": {"id": id, "title": "Replace belt"}})) }),
        )
        .route("/api/roles", get(roles))
        .route(
            "/api/disposals/:id",
            get(|Path(id): Path<String>| async move { Json(json!({"success": true, "id": id, "method": "auction"})) }),
        )
}

async fn start_server() -> ApiSettings {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app()).await.unwrap();
    });
    ApiSettings {
        base_url: format!("http://{}/api/", addr),
        timeout_secs: 5,
    }
}

fn names(rows: &[Row]) -> Vec<&str> {
    rows.iter().filter_map(|r| r.get("name").and_then(Value::as_str)).collect()
}

#[tokio::test]
async fn test_list_accepts_every_envelope_shape() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();

    assert_eq!(names(&api.list(Resource::Branches).await.unwrap()), vec!["North", "South"]);
    assert_eq!(names(&api.list(Resource::Vendors).await.unwrap()), vec!["Acme"]);
    assert!(api.list(Resource::Assets).await.unwrap().is_empty());

    let order = api.get(Resource::WorkOrders, "42").await.unwrap();
    assert_eq!(order["id"], "42");
    assert_eq!(order["title"], "Replace belt");
}

#[tokio::test]
async fn test_errors_carry_backend_messages() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();

    let err = api.list(Resource::Certificates).await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected { .. }));
    assert_eq!(err.user_message("Failed"), "Certificate registry offline");

    let err = api.list(Resource::Users).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.user_message("Failed"), "database down");

    let err = api.list(Resource::Roles).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("Failed"), "Token missing");

    let err = api.list(Resource::Inspections).await.unwrap_err();
    assert!(matches!(err, ClientError::DecodeError(_)));
    assert_eq!(err.user_message("Failed to load"), "Failed to load");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(StaticToken::new(TOKEN))).unwrap();
    let rows = api.list(Resource::Roles).await.unwrap();
    assert_eq!(names(&rows), vec!["admin"]);
}

#[tokio::test]
async fn test_create_returns_echoed_row() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();
    let mut row = Row::new();
    row.insert("name".into(), json!("East"));
    let created = api.create(Resource::Branches, &row).await.unwrap().unwrap();
    assert_eq!(created["id"], 7);
    assert_eq!(created["name"], "East");
}

#[tokio::test]
async fn test_context_login_stores_token_and_authorizes_requests() {
    let settings = start_server().await;
    let mut ctx = AppContext::init(&settings, Preferences::in_memory()).unwrap();

    let err = ctx.login("asha", "wrong").await.unwrap_err();
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    assert!(!ctx.is_authenticated());

    let session = ctx.login("asha", "pw").await.unwrap();
    assert_eq!(session.display_name(), "Asha Rao");
    assert_eq!(ctx.prefs().get(TOKEN_KEY), Some(TOKEN));
    assert_eq!(ctx.notices().last().unwrap().text, "Welcome back, Asha Rao");

    let rows = ctx.api().list(Resource::Roles).await.unwrap();
    assert_eq!(rows.len(), 1);

    ctx.logout().unwrap();
    assert!(ctx.api().list(Resource::Roles).await.is_err());
}

#[tokio::test]
async fn test_flat_login_envelope_signs_in() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();
    let login = api.login("ravi", "pw").await.unwrap();
    assert_eq!(login.token, TOKEN);
    assert_eq!(login.user.unwrap()["name"], "Ravi Iyer");

    let mut ctx = AppContext::init(&settings, Preferences::in_memory()).unwrap();
    let session = ctx.login("ravi", "pw").await.unwrap();
    assert_eq!(session.display_name(), "Ravi Iyer");
    assert_eq!(ctx.api().list(Resource::Roles).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_flat_item_response_is_the_row() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();
    let row = api.get(Resource::Disposals, "5").await.unwrap();
    assert_eq!(row["id"], "5");
    assert_eq!(row["method"], "auction");
    assert!(row.get("success").is_none());
}

#[tokio::test]
async fn test_bulk_delete_continues_past_failures() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();
    let ids: Vec<String> = ["1", "2", "3"].iter().map(|s| s.to_string()).collect();

    let report = delete_many(&api, Resource::Vendors, &ids).await.unwrap();
    assert_eq!(report.succeeded, vec!["1".to_string(), "3".to_string()]);
    assert_eq!(report.failed, vec![("2".to_string(), "Vendor 2 not found".to_string())]);
}

#[tokio::test]
async fn test_document_upload_counts_each_file() {
    let settings = start_server().await;
    let api = ApiClient::new(&settings, Arc::new(NoAuth)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("invoice.pdf");
    let bad = dir.path().join("broken.pdf");
    std::fs::write(&good, b"%PDF-1.4 ok").unwrap();
    std::fs::write(&bad, b"%PDF-1.4 bad").unwrap();
    let missing = dir.path().join("missing.pdf");
    let paths: Vec<PathBuf> = vec![good.clone(), bad.clone(), missing.clone()];

    let report = upload_documents(&api, Resource::Vendors, "5", &paths).await.unwrap();
    assert_eq!(report.succeeded, vec![good]);
    assert_eq!(report.failed_count(), 2);
    assert_eq!(report.failed[0], (bad, "Unsupported document".to_string()));
    assert_eq!(report.failed[1].0, missing);
}
