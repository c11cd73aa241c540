//! Google long-running recognition against a mock Speech-to-Text API

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use speech::{GoogleSpeechProvider, Transcriber, TranscriptionError};
use subtitler_config::GoogleSpeechConfig;
use subtitler_storage::ObjectUri;
use tokio_util::sync::CancellationToken;
use url::Url;

/// What the mock returns once the operation is done
#[derive(Clone)]
enum Outcome {
    Response(Value),
    Error { code: i32, message: String },
    Nothing,
}

struct MockState {
    pending_polls: AtomicU32,
    poll_count: AtomicU32,
    outcome: Outcome,
    start_status: StatusCode,
    request_body: Mutex<Option<Value>>,
    api_key: Mutex<Option<String>>,
}

struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

impl MockSpeech {
    async fn start(pending_polls: u32, outcome: Outcome) -> Self {
        Self::start_with_status(pending_polls, outcome, StatusCode::OK).await
    }

    async fn start_with_status(pending_polls: u32, outcome: Outcome, start_status: StatusCode) -> Self {
        let state = Arc::new(MockState {
            pending_polls: AtomicU32::new(pending_polls),
            poll_count: AtomicU32::new(0),
            outcome,
            start_status,
            request_body: Mutex::new(None),
            api_key: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/speech:longrunningrecognize", post(handle_recognize))
            .route("/v1/operations/{name}", get(handle_operation))
            .with_state(Arc::clone(&state));

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

        Self { addr, shutdown, state }
    }

    fn provider(&self) -> GoogleSpeechProvider {
        let config = GoogleSpeechConfig {
            base_url: Some(Url::parse(&format!("http://{}", self.addr)).unwrap()),
            api_key: Some(SecretString::from("test-key")),
            poll_interval: Duration::from_millis(10),
            ..GoogleSpeechConfig::default()
        };

        GoogleSpeechProvider::from_config(&config).unwrap()
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn operation_json(state: &MockState) -> Value {
    if state.pending_polls.load(Ordering::SeqCst) > 0 {
        return json!({"name": "7781", "metadata": {"progressPercent": 50}});
    }

    match &state.outcome {
        Outcome::Response(response) => json!({"name": "7781", "done": true, "response": response}),
        Outcome::Error { code, message } => {
            json!({"name": "7781", "done": true, "error": {"code": code, "message": message}})
        }
        Outcome::Nothing => json!({"name": "7781", "done": true}),
    }
}

async fn handle_recognize(
    State(state): State<Arc<MockState>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    *state.request_body.lock().unwrap() = Some(body);
    *state.api_key.lock().unwrap() = query.get("key").cloned();

    if !state.start_status.is_success() {
        return (state.start_status, "recognition rejected").into_response();
    }

    Json(operation_json(&state)).into_response()
}

async fn handle_operation(State(state): State<Arc<MockState>>, Path(name): Path<String>) -> Response {
    assert_eq!(name, "7781");
    state.poll_count.fetch_add(1, Ordering::SeqCst);

    let remaining = state.pending_polls.load(Ordering::SeqCst);
    if remaining > 0 {
        state.pending_polls.store(remaining - 1, Ordering::SeqCst);
    }

    Json(operation_json(&state)).into_response()
}

fn audio() -> ObjectUri {
    ObjectUri::new("gs", "vid-dump", "clip.mp4.wav")
}

#[tokio::test]
async fn polls_until_done_and_normalizes_results() {
    let response = json!({
        "results": [
            {"alternatives": [{"transcript": "Hello world", "confidence": 0.92}, {"transcript": "Yellow world"}]},
            {"alternatives": [{"transcript": " This is a test", "confidence": 0.88}]}
        ]
    });
    let mock = MockSpeech::start(2, Outcome::Response(response)).await;

    let transcript = mock.provider().transcribe(&audio()).await.unwrap();

    assert_eq!(transcript.lines(), ["Hello world", "This is a test"]);
    assert_eq!(mock.state.poll_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn sends_recognition_config_and_key() {
    let mock = MockSpeech::start(0, Outcome::Response(json!({}))).await;

    mock.provider().transcribe(&audio()).await.unwrap();

    let body = mock.state.request_body.lock().unwrap().clone().unwrap();
    assert_eq!(
        body,
        json!({
            "config": {"encoding": "LINEAR16", "sampleRateHertz": 44100, "languageCode": "en-US"},
            "audio": {"uri": "gs://vid-dump/clip.mp4.wav"}
        })
    );
    assert_eq!(mock.state.api_key.lock().unwrap().as_deref(), Some("test-key"));
}

#[tokio::test]
async fn no_speech_is_an_empty_transcript() {
    let mock = MockSpeech::start(1, Outcome::Response(json!({}))).await;

    let transcript = mock.provider().transcribe(&audio()).await.unwrap();

    assert!(transcript.is_empty());
}

#[tokio::test]
async fn operation_error_is_reported() {
    let outcome = Outcome::Error {
        code: 3,
        message: "Invalid recognition 'config': bad encoding.".to_string(),
    };
    let mock = MockSpeech::start(1, outcome).await;

    let err = mock.provider().transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, TranscriptionError::OperationFailed { code: 3, .. }));
}

#[tokio::test]
async fn done_without_response_is_an_error() {
    let mock = MockSpeech::start(0, Outcome::Nothing).await;

    let err = mock.provider().transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, TranscriptionError::MissingResponse(_)));
}

#[tokio::test]
async fn rejected_credentials_surface_as_authentication_failure() {
    let mock = MockSpeech::start_with_status(0, Outcome::Nothing, StatusCode::FORBIDDEN).await;

    let err = mock.provider().transcribe(&audio()).await.unwrap_err();

    assert!(matches!(err, TranscriptionError::AuthenticationFailed(msg) if msg == "recognition rejected"));
}
