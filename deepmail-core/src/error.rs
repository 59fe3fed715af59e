//! Unified error handling system
//!
//! Provides structured error types with context, recovery suggestions, and proper error chaining

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type DeepmailResult<T> = Result<T, DeepmailError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Additional metadata
    pub metadata: std::collections::HashMap<String, String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            metadata: std::collections::HashMap::new(),
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the deepmail system
#[derive(Error, Debug)]
pub enum DeepmailError {
    #[error("Agent error: {message}")]
    Agent {
        message: String,
        agent: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Email delivery error: {message}")]
    Email {
        message: String,
        provider: Option<String>,
        status_code: Option<u16>,
        context: ErrorContext,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Resource not found: {resource}")]
    NotFound {
        resource: String,
        context: ErrorContext,
    },

    #[error("Operation timeout: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl DeepmailError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            DeepmailError::Agent { context, .. } => Some(context),
            DeepmailError::Email { context, .. } => Some(context),
            DeepmailError::Storage { context, .. } => Some(context),
            DeepmailError::Config { context, .. } => Some(context),
            DeepmailError::Validation { context, .. } => Some(context),
            DeepmailError::NotFound { context, .. } => Some(context),
            DeepmailError::Timeout { context, .. } => Some(context),
            DeepmailError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether the error was caused by the caller's input rather than by the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DeepmailError::Validation { .. } | DeepmailError::NotFound { .. }
        )
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            DeepmailError::Internal { .. } | DeepmailError::Storage { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Internal error occurred"
                );
            }
            DeepmailError::Config { .. } | DeepmailError::Validation { .. } => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Configuration or validation error"
                );
            }
            DeepmailError::Email { .. } | DeepmailError::Timeout { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Delivery or timeout error"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}

/// Convenience macros for creating errors with context
#[macro_export]
macro_rules! agent_error {
    ($msg:expr, $agent:expr) => {
        $crate::DeepmailError::Agent {
            message: $msg.to_string(),
            agent: Some($agent.to_string()),
            source: None,
            context: $crate::ErrorContext::new("agent").with_operation("run"),
        }
    };
    ($msg:expr, $agent:expr, $source:expr) => {
        $crate::DeepmailError::Agent {
            message: $msg.to_string(),
            agent: Some($agent.to_string()),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new("agent").with_operation("run"),
        }
    };
}

#[macro_export]
macro_rules! email_error {
    ($msg:expr, $provider:expr) => {
        $crate::DeepmailError::Email {
            message: $msg.to_string(),
            provider: Some($provider.to_string()),
            status_code: None,
            context: $crate::ErrorContext::new("email")
                .with_suggestion("Check the email provider API key and verified sender"),
        }
    };
    ($msg:expr, $provider:expr, $status:expr) => {
        $crate::DeepmailError::Email {
            message: $msg.to_string(),
            provider: Some($provider.to_string()),
            status_code: Some($status),
            context: $crate::ErrorContext::new("email")
                .with_suggestion("Check the email provider API key and verified sender"),
        }
    };
}

#[macro_export]
macro_rules! storage_error {
    ($msg:expr, $component:expr) => {
        $crate::DeepmailError::Storage {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component),
        }
    };
    ($msg:expr, $component:expr, $source:expr) => {
        $crate::DeepmailError::Storage {
            message: $msg.to_string(),
            source: Some(Box::new($source)),
            context: $crate::ErrorContext::new($component),
        }
    };
}

#[macro_export]
macro_rules! config_error {
    ($msg:expr, $component:expr) => {
        $crate::DeepmailError::Config {
            message: $msg.to_string(),
            source: None,
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check your configuration file")
                .with_suggestion("Run 'deepmail config --init' to create default config"),
        }
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr, $field:expr, $component:expr) => {
        $crate::DeepmailError::Validation {
            message: $msg.to_string(),
            field: Some($field.to_string()),
            context: $crate::ErrorContext::new($component)
                .with_suggestion("Check the field value and format"),
        }
    };
}

#[macro_export]
macro_rules! not_found_error {
    ($resource:expr, $component:expr) => {
        $crate::DeepmailError::NotFound {
            resource: $resource.to_string(),
            context: $crate::ErrorContext::new($component),
        }
    };
}
