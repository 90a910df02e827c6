// Copyright 2025 Vivian Voss. Licensed under the Apache Licence, Version 2.0.
// SPDX-Licence-Identifier: Apache-2.0

//! Universal result and error types for all RushDB modules.
//!
//! Foundation layer with no dependencies on other RushDB modules. Every
//! fallible operation in the crate returns `RushResult<T>`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard Result type for all RushDB operations.
pub type RushResult<T> = Result<T, RushError>;

/// Standard Error types across all modules.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
pub enum RushError {
    /// Resource not found (e.g., key not in the keyspace, config file missing).
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    /// File system or I/O operation error.
    #[error("I/O error during operation '{operation}' on path '{path}': {reason}")]
    IoError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Configuration or setup error.
    #[error("Configuration error in component '{component}': {reason}")]
    ConfigError { component: String, reason: String },

    /// Server or network operation error.
    #[error("Server error in component '{component}': {reason}")]
    ServerError { component: String, reason: String },

    /// Invalid CLI command or parameters.
    #[error("Invalid command '{command}': {reason}")]
    InvalidCommand { command: String, reason: String },

    /// Data parsing error.
    #[error("Parse error for input '{input}': {reason}")]
    ParseError { input: String, reason: String },
}

// == CONVENIENCE FUNCTIONS ==

/// Creates a NotFound error.
pub fn not_found(resource: impl Into<String>) -> RushError {
    RushError::NotFound {
        resource: resource.into(),
    }
}

/// Creates an IoError.
pub fn io_error(
    operation: impl Into<String>,
    path: impl Into<String>,
    reason: impl Into<String>,
) -> RushError {
    RushError::IoError {
        operation: operation.into(),
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a ConfigError.
pub fn config_error(component: impl Into<String>, reason: impl Into<String>) -> RushError {
    RushError::ConfigError {
        component: component.into(),
        reason: reason.into(),
    }
}

/// Creates a ServerError.
pub fn server_error(component: impl Into<String>, reason: impl Into<String>) -> RushError {
    RushError::ServerError {
        component: component.into(),
        reason: reason.into(),
    }
}

/// Creates an InvalidCommand error.
pub fn invalid_command(command: impl Into<String>, reason: impl Into<String>) -> RushError {
    RushError::InvalidCommand {
        command: command.into(),
        reason: reason.into(),
    }
}

/// Creates a ParseError.
pub fn parse_error(input: impl Into<String>, reason: impl Into<String>) -> RushError {
    RushError::ParseError {
        input: input.into(),
        reason: reason.into(),
    }
}

/// Automatic conversion from std::io::Error to RushError.
impl From<std::io::Error> for RushError {
    fn from(err: std::io::Error) -> Self {
        RushError::IoError {
            operation: "io".to_string(),
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}
