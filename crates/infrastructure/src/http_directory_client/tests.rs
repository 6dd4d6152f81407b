use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use rbac_admin_application::EntityDirectory;
use rbac_admin_core::{AppError, DirectoryOperation, EntityId, EntityKind};
use rbac_admin_domain::{Permission, PermissionDraft, Role, RoleDraft, User};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

use super::HttpDirectoryClient;

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(String, String, Value)>>>,
}

impl Recorded {
    async fn push(&self, method: &str, path: String, body: Value) {
        self.requests
            .lock()
            .await
            .push((method.to_owned(), path, body));
    }

    async fn take(&self) -> Vec<(String, String, Value)> {
        std::mem::take(&mut *self.requests.lock().await)
    }
}

async fn list_permissions() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "read" },
        { "id": "p-2", "name": "write" }
    ]))
}

async fn create_permission(
    State(recorded): State<Recorded>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    recorded
        .push("POST", "/permissions".to_owned(), body.clone())
        .await;
    (
        StatusCode::CREATED,
        Json(json!({ "id": 3, "name": body["name"] })),
    )
}

async fn replace_role(
    State(recorded): State<Recorded>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    recorded
        .push("PUT", format!("/roles/{id}"), body.clone())
        .await;
    Json(json!({
        "id": id,
        "name": body["name"],
        "permissions": body["permissions"]
    }))
}

async fn delete_role(State(recorded): State<Recorded>, Path(id): Path<String>) -> StatusCode {
    recorded
        .push("DELETE", format!("/roles/{id}"), Value::Null)
        .await;
    StatusCode::NO_CONTENT
}

async fn list_users() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database offline")
}

async fn serve_directory(recorded: Recorded) -> Url {
    let routes = Router::new()
        .route("/permissions", get(list_permissions).post(create_permission))
        .route("/roles", get(|| async { "not json" }))
        .route("/roles/{id}", put(replace_role).delete(delete_role))
        .route("/users", get(list_users))
        .with_state(recorded);
    let app = Router::new().nest("/api", routes);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr().unwrap_or_else(|_| unreachable!());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Url::parse(&format!("http://{address}/api/")).unwrap_or_else(|_| unreachable!())
}

fn client(base_url: Url) -> HttpDirectoryClient {
    HttpDirectoryClient::new(reqwest::Client::new(), base_url).unwrap_or_else(|_| unreachable!())
}

#[tokio::test]
async fn list_parses_numeric_and_text_identifiers() {
    let client = client(serve_directory(Recorded::default()).await);

    let permissions = EntityDirectory::<Permission>::list(&client).await;

    assert_eq!(
        permissions.ok(),
        Some(vec![
            Permission::new(1, "read"),
            Permission {
                id: EntityId::from("p-2"),
                name: "write".to_owned(),
            },
        ])
    );
}

#[tokio::test]
async fn create_posts_draft_without_identifier() {
    let recorded = Recorded::default();
    let client = client(serve_directory(recorded.clone()).await);

    let created = EntityDirectory::<Permission>::create(
        &client,
        PermissionDraft {
            name: "audit".to_owned(),
        },
    )
    .await;

    assert_eq!(created.ok(), Some(Permission::new(3, "audit")));
    assert_eq!(
        recorded.take().await,
        vec![(
            "POST".to_owned(),
            "/permissions".to_owned(),
            json!({ "name": "audit" })
        )]
    );
}

#[tokio::test]
async fn update_puts_full_record_to_identifier_path() {
    let recorded = Recorded::default();
    let client = client(serve_directory(recorded.clone()).await);
    let draft = RoleDraft {
        name: "editor".to_owned(),
        permissions: vec![Permission::new(2, "write")],
    };

    let updated = EntityDirectory::<Role>::update(&client, &EntityId::from("r-9"), draft).await;

    assert_eq!(
        updated.ok(),
        Some(Role {
            id: EntityId::from("r-9"),
            name: "editor".to_owned(),
            permissions: vec![Permission::new(2, "write")],
        })
    );
    let requests = recorded.take().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].1, "/roles/r-9");
    assert_eq!(
        requests[0].2,
        json!({ "name": "editor", "permissions": [{ "id": 2, "name": "write" }] })
    );
}

#[tokio::test]
async fn delete_accepts_empty_success_response() {
    let recorded = Recorded::default();
    let client = client(serve_directory(recorded.clone()).await);

    let deleted = EntityDirectory::<Role>::delete(&client, &EntityId::Number(4)).await;

    assert!(deleted.is_ok());
    assert_eq!(
        recorded.take().await,
        vec![("DELETE".to_owned(), "/roles/4".to_owned(), Value::Null)]
    );
}

#[tokio::test]
async fn error_status_becomes_directory_fault() {
    let client = client(serve_directory(Recorded::default()).await);

    let users = EntityDirectory::<User>::list(&client).await;

    let Err(AppError::Directory(fault)) = users else {
        unreachable!("expected a directory fault");
    };
    assert_eq!(fault.operation, DirectoryOperation::List);
    assert_eq!(fault.entity_kind, EntityKind::User);
    assert!(fault.cause.starts_with("status 500"));
    assert!(fault.cause.contains("database offline"));
}

#[tokio::test]
async fn malformed_body_becomes_directory_fault() {
    let client = client(serve_directory(Recorded::default()).await);

    let roles = EntityDirectory::<Role>::list(&client).await;

    let Err(AppError::Directory(fault)) = roles else {
        unreachable!("expected a directory fault");
    };
    assert!(fault.cause.starts_with("invalid response body"));
}

#[tokio::test]
async fn unreachable_backend_becomes_directory_fault() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|_| unreachable!());
    let address = listener.local_addr().unwrap_or_else(|_| unreachable!());
    drop(listener);
    let base_url = Url::parse(&format!("http://{address}")).unwrap_or_else(|_| unreachable!());
    let client = client(base_url);

    let result = EntityDirectory::<Permission>::delete(&client, &EntityId::Number(1)).await;

    let Err(AppError::Directory(fault)) = result else {
        unreachable!("expected a directory fault");
    };
    assert_eq!(fault.operation, DirectoryOperation::Delete);
    assert!(fault.cause.starts_with("transport error"));
}

#[test]
fn opaque_base_url_is_rejected() {
    let base_url = Url::parse("mailto:admin@example.com").unwrap_or_else(|_| unreachable!());

    let result = HttpDirectoryClient::new(reqwest::Client::new(), base_url);

    assert!(matches!(result, Err(AppError::Validation(_))));
}
