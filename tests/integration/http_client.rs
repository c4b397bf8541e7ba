//! HttpDirectoryClient against a local axum server.

use crate::integration::support::user;
use axum::body::Body;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use userdash::remote::{DirectoryClient, HttpDirectoryClient};
use userdash::{Dispatcher, UserDraft, UserRecord, UserStore};

const SERVER_ID: u64 = 11;

async fn list_users() -> Json<Vec<UserRecord>> {
    Json(vec![user(1, "Ann", Some("active")), user(2, "Bob", Some("pending"))])
}

async fn create_user(Json(draft): Json<UserDraft>) -> (StatusCode, Json<UserRecord>) {
    (StatusCode::CREATED, Json(UserRecord::from_draft(SERVER_ID, draft)))
}

async fn update_user(
    Path(id): Path<u64>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<UserRecord>, (StatusCode, String)> {
    if id > 2 {
        return Err((StatusCode::NOT_FOUND, "{}".to_string()));
    }
    Ok(Json(UserRecord::from_draft(id, draft)))
}

async fn delete_user(Path(_id): Path<u64>) -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database offline")
}

async fn slow() -> Json<Vec<UserRecord>> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(Vec::new())
}

async fn garbage() -> &'static str {
    "not json"
}

async fn truncated() -> (StatusCode, Body) {
    let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
        Ok("partial"),
        Err(std::io::Error::new(std::io::ErrorKind::Other, "connection reset")),
    ];
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Body::from_stream(futures::stream::iter(chunks)),
    )
}

async fn serve() -> SocketAddr {
    let app = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            axum::routing::put(update_user).delete(delete_user),
        )
        .route("/broken/users", get(broken))
        .route("/slow/users", get(slow))
        .route("/garbage/users", get(garbage))
        .route("/truncated/users", get(truncated));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client(addr: SocketAddr, collection: &str, timeout: Duration) -> HttpDirectoryClient {
    HttpDirectoryClient::new(&format!("http://{}", addr), collection, timeout).unwrap()
}

#[tokio::test]
async fn list_decodes_collection() {
    let addr = serve().await;
    let users = client(addr, "users", Duration::from_secs(5))
        .list()
        .await
        .unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].name, "Bob");
    assert_eq!(users[1].company.as_ref().unwrap().name, "Bob Co");
}

#[tokio::test]
async fn create_update_delete_round_trip() {
    let addr = serve().await;
    let client = client(addr, "users", Duration::from_secs(5));

    let created = client
        .create(&UserDraft::new("Ann", "a@x.com"))
        .await
        .unwrap();
    assert_eq!(created.id, SERVER_ID);
    assert_eq!(created.email, "a@x.com");

    let updated = client
        .update(2, &UserDraft::new("Robert", "r@x.com"))
        .await
        .unwrap();
    assert_eq!(updated.id, 2);
    assert_eq!(updated.name, "Robert");

    client.delete(2).await.unwrap();
}

#[tokio::test]
async fn empty_error_body_reports_status_code() {
    let addr = serve().await;
    let err = client(addr, "users", Duration::from_secs(5))
        .update(99, &UserDraft::new("x", "x@x.com"))
        .await
        .unwrap_err();
    assert_eq!(err.description(), "Request failed with status code 404");
}

#[tokio::test]
async fn error_body_becomes_description() {
    let addr = serve().await;
    let err = client(addr, "broken/users", Duration::from_secs(5))
        .list()
        .await
        .unwrap_err();
    assert_eq!(err.description(), "database offline");
}

#[tokio::test]
async fn timeout_is_reported_with_configured_duration() {
    let addr = serve().await;
    let err = client(addr, "slow/users", Duration::from_millis(50))
        .list()
        .await
        .unwrap_err();
    assert_eq!(err.description(), "timeout of 50ms exceeded");
}

#[tokio::test]
async fn undecodable_payload_is_a_failure() {
    let addr = serve().await;
    let err = client(addr, "garbage/users", Duration::from_secs(5))
        .list()
        .await
        .unwrap_err();
    assert!(err.description().starts_with("Invalid directory JSON payload"));
}

#[tokio::test]
async fn unreadable_error_body_reports_transport_failure() {
    let addr = serve().await;
    let err = client(addr, "truncated/users", Duration::from_secs(5))
        .list()
        .await
        .unwrap_err();
    assert_ne!(err.description(), "Request failed with status code 500");
    assert_ne!(err.description(), "partial");
    assert!(!err.description().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_failure() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(addr, "users", Duration::from_secs(5))
        .list()
        .await
        .unwrap_err();
    assert!(!err.description().is_empty());
}

#[tokio::test]
async fn dispatcher_over_http_falls_back_on_missing_record() {
    let addr = serve().await;
    let remote = Arc::new(client(addr, "users", Duration::from_secs(5)));
    let dispatcher = Dispatcher::new(UserStore::new(), remote);

    assert!(dispatcher.refresh().await.is_confirmed());
    let created = dispatcher
        .create_intent(UserDraft::new("Cid", "c@x.com"))
        .await;
    assert!(created.is_confirmed());
    assert_eq!(dispatcher.store().user(3).unwrap().name, "Cid");

    let updated = dispatcher
        .update_intent(
            3,
            UserDraft {
                status: Some("inactive".to_string()),
                ..UserDraft::default()
            },
        )
        .await;
    assert!(!updated.is_confirmed());
    assert_eq!(
        dispatcher.store().last_error().as_deref(),
        Some("Request failed with status code 404")
    );
    assert_eq!(
        dispatcher.store().user(3).unwrap().status.as_deref(),
        Some("inactive")
    );
    assert_eq!(dispatcher.store().aggregate_stats().active, 2);
}
