//! GCS media upload against a mock JSON API

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use secrecy::SecretString;
use subtitler_storage::{GcsObjectStore, ObjectStore, StorageError};
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Default)]
struct Captured {
    bucket: String,
    query: HashMap<String, String>,
    authorization: Option<String>,
    body: Vec<u8>,
}

struct MockGcs {
    addr: SocketAddr,
    shutdown: CancellationToken,
    captured: Arc<Mutex<Captured>>,
}

impl MockGcs {
    async fn start(status: StatusCode) -> Self {
        let captured = Arc::new(Mutex::new(Captured::default()));

        let app = Router::new()
            .route("/upload/storage/v1/b/{bucket}/o", post(upload))
            .with_state((Arc::clone(&captured), status));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown_clone.cancelled().await })
                .await
                .ok();
        });

        Self {
            addr,
            shutdown,
            captured,
        }
    }

    fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }
}

impl Drop for MockGcs {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn upload(
    State((captured, status)): State<(Arc<Mutex<Captured>>, StatusCode)>,
    Path(bucket): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let mut captured = captured.lock().unwrap();
    captured.bucket = bucket;
    captured.query = query;
    captured.authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    captured.body = body.to_vec();

    if status.is_success() {
        (status, Json(object_resource(&captured.bucket))).into_response()
    } else {
        (status, "access denied").into_response()
    }
}

fn object_resource(bucket: &str) -> HashMap<&'static str, String> {
    HashMap::from([("bucket", bucket.to_owned()), ("kind", "storage#object".to_owned())])
}

#[tokio::test]
async fn uploads_file_and_returns_gs_uri() {
    let mock = MockGcs::start(StatusCode::OK).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("clip.mp4.wav");
    tokio::fs::write(&audio, b"RIFF....WAVEfmt ").await.unwrap();

    let store = GcsObjectStore::new(
        "vid-dump".to_string(),
        SecretString::from("ya29.test"),
        Some(mock.base_url()),
    );

    let uri = store.persist(&audio, "clip.mp4.wav").await.unwrap();

    assert_eq!(uri.as_str(), "gs://vid-dump/clip.mp4.wav");

    let captured = mock.captured.lock().unwrap();
    assert_eq!(captured.bucket, "vid-dump");
    assert_eq!(captured.query.get("uploadType").map(String::as_str), Some("media"));
    assert_eq!(captured.query.get("name").map(String::as_str), Some("clip.mp4.wav"));
    assert_eq!(captured.authorization.as_deref(), Some("Bearer ya29.test"));
    assert_eq!(captured.body, b"RIFF....WAVEfmt ");
}

#[tokio::test]
async fn rejected_credentials_surface_as_authentication_failure() {
    let mock = MockGcs::start(StatusCode::FORBIDDEN).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("a.wav");
    tokio::fs::write(&audio, b"x").await.unwrap();

    let store = GcsObjectStore::new("b".to_string(), SecretString::from("bad"), Some(mock.base_url()));

    let err = store.persist(&audio, "a.wav").await.unwrap_err();

    assert!(matches!(err, StorageError::AuthenticationFailed(msg) if msg == "access denied"));
}

#[tokio::test]
async fn server_errors_keep_status() {
    let mock = MockGcs::start(StatusCode::SERVICE_UNAVAILABLE).await;
    let dir = tempfile::tempdir().unwrap();
    let audio = dir.path().join("a.wav");
    tokio::fs::write(&audio, b"x").await.unwrap();

    let store = GcsObjectStore::new("b".to_string(), SecretString::from("t"), Some(mock.base_url()));

    let err = store.persist(&audio, "a.wav").await.unwrap_err();

    assert!(matches!(err, StorageError::ProviderApiError { status: 503, .. }));
}
