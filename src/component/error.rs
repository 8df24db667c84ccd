// src/component/error.rs

use alloc::string::String;

use crate::common::id::{ComponentId, IdError};

/// A user configuration that does not fit the schema.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("required key '{key}' not provided")]
    MissingField { key: &'static str },

    #[error("[{key}] is an invalid option")]
    UnknownField { key: String },

    #[error("[{key}] expected {expected}, got {found}")]
    InvalidType {
        key: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("[{key}] value {value} must be in range {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("[{key}] invalid identifier: {source}")]
    InvalidId {
        key: &'static str,
        #[source]
        source: IdError,
    },

    #[error("[{key}] unknown value '{value}'")]
    InvalidChoice { key: &'static str, value: String },

    #[error("[{key}] icons must be in the form 'prefix:name', got '{value}'")]
    InvalidIcon { key: &'static str, value: String },
}

/// Failure of a build pass. Every variant is fatal to the build.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    /// Instance `index` of the component failed validation.
    #[error("invalid configuration for instance {index}: {source}")]
    Config {
        index: usize,
        #[source]
        source: ConfigError,
    },

    #[error("component {component} requires component {dependency}")]
    MissingDependency {
        component: &'static str,
        dependency: &'static str,
    },

    #[error("ID {0} redefined")]
    DuplicateId(ComponentId),

    #[error("invalid ID '{id}': {source}")]
    InvalidId {
        id: String,
        #[source]
        source: IdError,
    },

    #[error("{id}: couldn't find UART {uart_id}")]
    UnknownUart { id: ComponentId, uart_id: ComponentId },
}
