//! Error types for the xaheen command routing and dispatch engine.

use thiserror::Error;

/// Dispatch-layer errors
///
/// Every variant except [`CliError::Unstructured`] carries a stable,
/// machine-readable code (see [`CliError::code`]).
#[derive(Debug, Error)]
pub enum CliError {
    #[error("No route registered for '{0}'")]
    RouteNotFound(String),

    #[error("No handler registered for domain: {0}")]
    HandlerNotRegistered(String),

    #[error("Failed to construct handler for domain '{domain}': {source}")]
    HandlerConstruction {
        domain: String,
        #[source]
        source: Box<CliError>,
    },

    #[error("Handler initialization failed for domain '{domain}': {message}")]
    HandlerInitialization { domain: String, message: String },

    #[error("Domain '{domain}' cannot handle action '{action}'")]
    UnsupportedAction { domain: String, action: String },

    #[error("Action '{domain} {action}' requires a target")]
    MissingTarget { domain: String, action: String },

    #[error("Invalid command line: {0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Structured failure reported by a domain handler.
    #[error("{message}")]
    Domain {
        code: String,
        message: String,
        exit_code: i32,
    },

    #[error(transparent)]
    Unstructured(#[from] anyhow::Error),
}

impl CliError {
    /// Structured domain error with the default exit code.
    pub fn domain(code: impl Into<String>, message: impl Into<String>) -> Self {
        CliError::Domain {
            code: code.into(),
            message: message.into(),
            exit_code: 1,
        }
    }

    /// Machine-readable code; `None` for unstructured failures.
    pub fn code(&self) -> Option<&str> {
        match self {
            CliError::RouteNotFound(_) => Some("ROUTE_NOT_FOUND"),
            CliError::HandlerNotRegistered(_) => Some("HANDLER_NOT_REGISTERED"),
            CliError::HandlerConstruction { .. } => Some("HANDLER_CONSTRUCTION_FAILED"),
            CliError::HandlerInitialization { .. } => Some("HANDLER_INITIALIZATION_FAILED"),
            CliError::UnsupportedAction { .. } => Some("UNSUPPORTED_ACTION"),
            CliError::MissingTarget { .. } => Some("MISSING_TARGET"),
            CliError::Usage(_) => Some("INVALID_ARGUMENTS"),
            CliError::ConfigError(_) => Some("CONFIG_ERROR"),
            CliError::IoError(_) => Some("IO_ERROR"),
            CliError::Domain { code, .. } => Some(code.as_str()),
            CliError::Unstructured(_) => None,
        }
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Domain { exit_code, .. } => *exit_code,
            _ => 1,
        }
    }
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::ConfigError(err.to_string())
    }
}
