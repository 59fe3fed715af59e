//! Deepmail Web Server
//!
//! HTTP surface for the SDR auto-reply webhook, conversation inspection and
//! the streamed deep research pipeline.

pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod state;

// Re-export main types
pub use server::{DeepmailServer, DeepmailServerBuilder};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method, StatusCode,
    },
    response::{IntoResponse, Json, Response},
    Router,
};
use deepmail_applications::ApplicationError;
use deepmail_core::DeepmailError;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let cors = if state.config.dev_mode {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([ACCEPT, CONTENT_TYPE])
    };

    Router::new()
        .merge(routes::api_routes())
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Inbound-parse posts can carry attachments
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
        .with_state(state)
}

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Enable development mode
    pub dev_mode: bool,
    /// Conversation database URL, overriding the config file
    pub database_url: Option<String>,
    /// Explicit deepmail config file
    pub config_path: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            dev_mode: false,
            database_url: None,
            config_path: None,
        }
    }
}

impl WebConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("DEEPMAIL_HOST").unwrap_or(defaults.host),
            port: lookup("DEEPMAIL_PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(defaults.port),
            dev_mode: lookup("DEEPMAIL_DEV_MODE")
                .and_then(|flag| flag.parse().ok())
                .unwrap_or(defaults.dev_mode),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            config_path: lookup("DEEPMAIL_CONFIG").filter(|path| !path.is_empty()),
        }
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error(transparent)]
    Core(#[from] DeepmailError),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl WebError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Core(DeepmailError::NotFound { .. })
            | WebError::Application(ApplicationError::Core(DeepmailError::NotFound { .. })) => {
                StatusCode::NOT_FOUND
            }
            WebError::Application(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            WebError::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }

        let body = handlers::types::ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Initialize logging for the web server
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepmail_web=debug,deepmail_applications=info,tower_http=debug".into()),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_web_config_defaults() {
        let config = WebConfig::from_lookup(|_| None);
        assert_eq!(config.address(), "0.0.0.0:5000");
        assert!(!config.dev_mode);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_web_config_from_env_values() {
        let env: HashMap<&str, &str> = [
            ("DEEPMAIL_HOST", "127.0.0.1"),
            ("DEEPMAIL_PORT", "8088"),
            ("DEEPMAIL_DEV_MODE", "true"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DEEPMAIL_CONFIG", ""),
        ]
        .into_iter()
        .collect();
        let config = WebConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.address(), "127.0.0.1:8088");
        assert!(config.dev_mode);
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let config = WebConfig::from_lookup(|key| (key == "DEEPMAIL_PORT").then(|| "web".to_string()));
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            WebError::BadRequest("nope".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::from(ApplicationError::validation("Missing sender address")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::from(ApplicationError::from(deepmail_core::not_found_error!(
                "thread",
                "conversations"
            )))
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::Config("bad".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
