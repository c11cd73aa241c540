//! HTTP delivery gateway for the subtitle pipeline
//!
//! Exposes the liveness probe, the video upload that drives a conversion,
//! and the download of generated SRT files.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod download;
mod error;
mod health;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use subtitler_config::{Config, ServerConfig};
use subtitler_pipeline::Pipeline;
use tower_http::trace::TraceLayer;
use url::Url;

pub use error::{Result, ServerError};
pub use upload::UploadResponse;

const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED), 8080);

/// Shared handler state
pub(crate) struct AppState {
    pipeline: Pipeline,
    /// Base for download links handed back to clients
    public_url: Url,
}

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server and its pipeline from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a pipeline collaborator fails to initialize
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let pipeline = subtitler_pipeline::build_pipeline(config)?;

        Ok(Self::with_pipeline(&config.server, pipeline))
    }

    /// Build the server around an already assembled pipeline
    pub fn with_pipeline(config: &ServerConfig, pipeline: Pipeline) -> Self {
        let listen_address = config.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS);

        let state = Arc::new(AppState {
            pipeline,
            public_url: config.public_url.clone(),
        });

        let mut routes = Router::new()
            .route("/upload", post(upload::upload_handler))
            .route("/download-srt/{asset_name}", get(download::download_handler));

        if config.health.enabled {
            routes = routes.route(&config.health.path, get(health::health_handler));
        }

        let router = routes
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.upload_limit_bytes))
            .layer(TraceLayer::new_for_http());

        Self {
            router,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
