//! HTTP server wiring for the recommendation API

use axum::{
    routing::{get, post},
    Router,
};
use crate::recommend::Recommender;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use super::handler::{
    recommend_by_demographics_handler, recommend_handler, recommend_new_user_handler,
    status_handler,
};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
    /// Directory holding books.csv, ratings.csv and users.csv
    pub data_dir: String,
    /// Path to the model checkpoint file
    pub checkpoint_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
            data_dir: "./data".to_string(),
            checkpoint_path: "./model/checkpoint.bin".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `READNEXT_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(address) = std::env::var("READNEXT_ADDRESS") {
            config.address = address;
        }
        if let Ok(port) = std::env::var("READNEXT_PORT") {
            if let Ok(port) = port.parse() {
                config.port = port;
            }
        }
        if let Ok(data_dir) = std::env::var("READNEXT_DATA_DIR") {
            config.data_dir = data_dir;
        }
        if let Ok(path) = std::env::var("READNEXT_CHECKPOINT") {
            config.checkpoint_path = path;
        }
        config
    }
}

/// Build the API router. Split out from [`HttpServer::start`] so tests can
/// drive it without binding a socket.
pub fn router(recommender: Arc<Recommender>) -> Router {
    Router::new()
        .route("/recommend", post(recommend_handler))
        .route("/recommend_new_user", post(recommend_new_user_handler))
        .route(
            "/recommend_by_demographics",
            post(recommend_by_demographics_handler),
        )
        .route("/api/status", get(status_handler))
        .layer(CorsLayer::permissive())
        .with_state(recommender)
}

/// HTTP server exposing the recommendation API
pub struct HttpServer {
    recommender: Arc<Recommender>,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(recommender: Arc<Recommender>, config: ServerConfig) -> Self {
        Self {
            recommender,
            config,
        }
    }

    /// Start the HTTP server
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        let app = router(Arc::clone(&self.recommender));

        let addr = format!("{}:{}", self.config.address, self.config.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Recommendation API listening on http://{}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
