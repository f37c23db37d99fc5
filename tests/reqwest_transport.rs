use axum::extract::RawQuery;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use labinv_sdk::{ClientConfig, ClientError, LabContext, ListRequest};
use serde_json::{json, Value};
use std::net::SocketAddr;

fn authorized(headers: &HeaderMap) -> bool {
    let csrf = headers.get("x-csrftoken").and_then(|v| v.to_str().ok());
    let cookie = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    csrf == Some("tok") && cookie.contains("sessionid=s3cr3t")
}

async fn logged(headers: HeaderMap) -> impl IntoResponse {
    if !authorized(&headers) {
        return (StatusCode::FORBIDDEN, Json(json!({"detail": "Authentication credentials were not provided."})));
    }
    (StatusCode::OK, Json(json!({"id": 1, "username": "ann"})))
}

async fn navigation() -> Json<Value> {
    Json(json!([{"id": 12, "app_label": "lab", "model_class_name": "Plasmid",
                 "permissions": {"add": true, "change": true, "view": true}}]))
}

async fn plasmids(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({
        "count": 1, "next": null, "previous": null,
        "results": [{"id": 31, "name": query.unwrap_or_default(), "created_by": 2}]
    }))
}

/// Echoes one user per repeated `user_id` key.
async fn users(RawQuery(query): RawQuery) -> Json<Value> {
    let users: Vec<Value> = query
        .unwrap_or_default()
        .split('&')
        .filter_map(|pair| pair.strip_prefix("user_id="))
        .filter_map(|id| id.parse::<u64>().ok())
        .map(|id| json!({"id": id, "username": format!("user{}", id)}))
        .collect();
    Json(Value::Array(users))
}

async fn export() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename*=UTF-8''plasmid%20export.csv"),
        ],
        "id\n31\n",
    )
}

async fn spawn_backend() -> SocketAddr {
    let app = Router::new()
        .route("/api/common/user/logged/", get(logged))
        .route("/api/common/user/", get(users))
        .route("/api/navigation/", get(navigation))
        .route("/api/navigation/12/action/", get(export))
        .route("/api/lab/plasmid/", get(plasmids));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    let mut config = ClientConfig::new(format!("http://{}", addr));
    config.csrf_token = Some("tok".into());
    config.session_id = Some("s3cr3t".into());
    config
}

#[tokio::test]
async fn session_over_http() {
    let addr = spawn_backend().await;
    let ctx = LabContext::bootstrap(config(addr)).await.unwrap();
    assert_eq!(ctx.user.username, "ann");

    let store = ctx.stores.dynamic("lab", "plasmid").unwrap();
    store
        .list_items(ListRequest::new().query("pUC 19").page_size(5))
        .await
        .unwrap();
    let items = store.items();
    let echoed = items[0].record.get("name").and_then(Value::as_str).unwrap().to_string();
    assert!(echoed.contains("page=1"));
    assert!(echoed.contains("limit=5"));
    assert!(echoed.contains("search=pUC"));
    assert_eq!(items[0].user.as_ref().map(|u| u.username.as_str()), Some("user2"));

    ctx.users.get_items(&[3, 4]).await.unwrap();
    assert_eq!(ctx.users.item_count(), 3);

    let file = store.submit_action("export_data", &[31], None).await.unwrap();
    assert_eq!(file.filename, "plasmid export.csv");
    assert_eq!(file.bytes, b"id\n31\n");
}

#[tokio::test]
async fn missing_credentials_require_login() {
    let addr = spawn_backend().await;
    let mut config = ClientConfig::new(format!("http://{}", addr));
    config.login_url = "/accounts/login/".into();

    let err = LabContext::bootstrap(config).await.err().unwrap();
    match err {
        ClientError::Unauthenticated { login_url } => {
            assert_eq!(login_url, format!("http://{}/accounts/login/", addr));
        }
        other => panic!("expected unauthenticated, got {other}"),
    }
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = LabContext::bootstrap(config(addr)).await.err().unwrap();
    assert!(matches!(err, ClientError::Transport(_)));
}
