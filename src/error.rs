//! Error types for configuration definition and resolution.
//!
//! This module defines [`ConfigVarError`], the error type returned by every
//! fallible operation on a [`Context`](crate::Context), and a [`Result`] type
//! alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Registration errors (`DuplicateDefinition`, `InvalidName`) surface from
//!   the `register_*` call that caused them, before any resolution happens
//! - Resolution errors (`MissingRequiredValue`, `InvalidValue`, `Custom`)
//!   surface from [`Context::reload`](crate::Context::reload) and abort it
//! - Access errors (`NoSuchValue`, `TypeMismatch`) surface from the getters
//! - Custom resolvers may return any error through `Custom`
//!
//! Messages name the uppercase environment key wherever one exists, since
//! that is what an operator has to go and set.

use thiserror::Error;

/// Core error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigVarError {
    /// A definition with the same name is already registered.
    #[error("{key} is already registered")]
    DuplicateDefinition { key: String },

    /// A definition name that cannot be turned into an environment key.
    #[error("'{name}' is not a valid configuration name")]
    InvalidName { name: String },

    /// A required key was absent from the source.
    #[error("A value must be provided for {key}")]
    MissingRequiredValue { key: String },

    /// A present value failed coercion or parsing.
    #[error("{value} is not a valid {expected} for {key}")]
    InvalidValue {
        value: String,
        key: String,
        expected: &'static str,
    },

    /// No resolved entry exists under the requested name.
    #[error("No value available for {name}")]
    NoSuchValue { name: String },

    /// A typed accessor found a value of a different type.
    #[error("Value for {name} is {found}, not {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Failure raised by a caller-supplied resolver.
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl ConfigVarError {
    /// Build a `MissingRequiredValue` for the given key.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingRequiredValue { key: key.into() }
    }

    /// Build an `InvalidValue` for the given raw text and key.
    pub fn invalid(
        value: impl Into<String>,
        key: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            value: value.into(),
            key: key.into(),
            expected,
        }
    }
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigVarError>;
