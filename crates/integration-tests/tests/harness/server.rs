//! Test server wrapper that starts the gateway on a random port

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use subtitler_config::{Config, HealthConfig, ServerConfig};
use subtitler_pipeline::{FixedDuration, Pipeline, PipelineComponents, PipelineSettings};
use subtitler_server::Server;
use subtitler_storage::LocalArtifactStore;
use tokio_util::sync::CancellationToken;

use super::fakes::{MemoryObjectStore, ScriptedExtractor, ScriptedTranscriber};

pub const PUBLIC_URL: &str = "http://subs.test";

/// How the fake collaborators behave for one test
pub struct Scenario {
    extraction_exit: Option<i32>,
    transcript: Result<Vec<String>, String>,
    duration: Duration,
    health: bool,
}

impl Scenario {
    pub fn new() -> Self {
        Self {
            extraction_exit: None,
            transcript: Ok(Vec::new()),
            duration: Duration::from_secs(10),
            health: true,
        }
    }

    pub fn transcript(mut self, lines: &[&str]) -> Self {
        self.transcript = Ok(lines.iter().map(|line| (*line).to_owned()).collect());
        self
    }

    pub fn transcription_error(mut self, message: &str) -> Self {
        self.transcript = Err(message.to_owned());
        self
    }

    pub fn extraction_exit(mut self, code: i32) -> Self {
        self.extraction_exit = Some(code);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn without_health(mut self) -> Self {
        self.health = false;
        self
    }

    pub async fn start(self) -> anyhow::Result<TestServer> {
        let workdir = tempfile::tempdir()?;

        let fakes = Fakes {
            extractor: Arc::new(ScriptedExtractor::new(self.extraction_exit)),
            objects: Arc::new(MemoryObjectStore::default()),
            transcriber: Arc::new(ScriptedTranscriber::new(self.transcript)),
            subtitles_dir: workdir.path().join("subtitles"),
            uploads_dir: workdir.path().join("uploads"),
            _workdir: workdir,
        };

        let components = PipelineComponents {
            extractor: fakes.extractor.clone(),
            probe: Arc::new(FixedDuration::new(self.duration)),
            objects: fakes.objects.clone(),
            transcriber: fakes.transcriber.clone(),
            artifacts: Arc::new(LocalArtifactStore::new(fakes.subtitles_dir.clone())),
        };

        let settings = PipelineSettings {
            uploads_dir: fakes.uploads_dir.clone(),
            audio_extension: "wav".to_string(),
            extraction_timeout: Duration::from_secs(30),
            transcription_timeout: Duration::from_secs(30),
            fallback_duration: self.duration,
        };

        let server_config = ServerConfig {
            listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
            public_url: PUBLIC_URL.parse()?,
            health: HealthConfig {
                enabled: self.health,
                ..HealthConfig::default()
            },
            ..ServerConfig::default()
        };

        let server = Server::with_pipeline(&server_config, Pipeline::new(components, settings));

        TestServer::spawn(server.into_router(), Some(fakes)).await
    }
}

/// Handles on the fakes wired into a running server
pub struct Fakes {
    pub extractor: Arc<ScriptedExtractor>,
    pub objects: Arc<MemoryObjectStore>,
    pub transcriber: Arc<ScriptedTranscriber>,
    pub subtitles_dir: PathBuf,
    pub uploads_dir: PathBuf,
    _workdir: tempfile::TempDir,
}

/// A running test server instance
pub struct TestServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    client: reqwest::Client,
    fakes: Option<Fakes>,
}

impl TestServer {
    /// Start a server assembled entirely from configuration
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let server = Server::new(config)?;

        Self::spawn(server.into_router(), None).await
    }

    /// Binds to port 0 for automatic port assignment
    async fn spawn(router: Router, fakes: Option<Fakes>) -> anyhow::Result<Self> {
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        // Bind the listener here so we know the actual port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown,
            client: reqwest::Client::new(),
            fakes,
        })
    }

    /// URL of `path` on the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn fakes(&self) -> &Fakes {
        self.fakes.as_ref().expect("server was started from a scenario")
    }

    /// Upload `bytes` as the `video` field named `file_name`
    pub async fn upload(&self, file_name: &str, bytes: &'static [u8]) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_owned());
        let form = reqwest::multipart::Form::new().part("video", part);

        self.client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}
