// src/error.rs
//! Unified error handling for the telemetry crate
//!
//! The random-walk model itself cannot fail: every output is clamped. Errors
//! only arise at the edges, when a caller hands in a tick interval, finger
//! angle or gesture name that is not allowed, or when configuration files
//! cannot be loaded.

use std::collections::HashMap;
use std::time::SystemTime;
use thiserror::Error;

/// Result alias used across the crate
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Unified error type for the telemetry system
#[derive(Debug, Clone, Error)]
pub enum TelemetryError {
    /// A control or configuration value outside its allowed set
    #[error("[CONFIG] Invalid {field}: {value} (allowed: {allowed}) ({})", .context.operation)]
    InvalidConfiguration {
        field: String,
        value: String,
        allowed: String,
        context: ErrorContext,
    },

    /// Gesture name with no preset
    #[error("[CONTROL] Unknown gesture '{name}'")]
    UnknownGesture { name: String },

    /// Configuration file could not be read, parsed or validated
    #[error("[CONFIG] {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl TelemetryError {
    /// Build an `InvalidConfiguration` error
    pub fn invalid_configuration(
        field: &str,
        value: impl ToString,
        allowed: impl ToString,
        context: ErrorContext,
    ) -> Self {
        TelemetryError::InvalidConfiguration {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.to_string(),
            context,
        }
    }

    /// Context attached to this error, if any
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            TelemetryError::InvalidConfiguration { context, .. } => Some(context),
            _ => None,
        }
    }
}

/// Error context for debugging and log correlation
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub timestamp: SystemTime,
    pub component: String,
    pub operation: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
    pub additional_info: HashMap<String, String>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            timestamp: SystemTime::now(),
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
            additional_info: HashMap::new(),
        }
    }

    /// Create error context with file and line information
    pub fn with_location(component: &str, operation: &str, file: &'static str, line: u32) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file);
        context.line = Some(line);
        context
    }

    /// Add additional information to the context
    pub fn add_info<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.additional_info.insert(key.into(), value.into());
        self
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}
