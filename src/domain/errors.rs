//! Domain error types
//!
//! This module defines the error hierarchy for envcast. Conversion failures are
//! reported through [`ConfigurationError`], which is what the conversion engine
//! returns; everything that can go wrong around it (definition files, unknown
//! settings, I/O) is an [`EnvcastError`].

use std::fmt;
use thiserror::Error;

use crate::descriptor::TypeExprError;

/// Main envcast error type
///
/// This is the primary error type used by the settings layer and the CLI.
#[derive(Debug, Error)]
pub enum EnvcastError {
    /// Configuration-related errors (definition file, discovery, options)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A setting override could not be converted
    #[error(transparent)]
    Setting(#[from] ConfigurationError),

    /// A type annotation could not be parsed
    #[error("Type annotation error: {0}")]
    TypeExpression(#[from] TypeExprError),

    /// The requested setting is neither declared nor overridden
    #[error("Settings has no setting '{0}'")]
    UnknownSetting(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Conversion failure for a single setting
///
/// Every variant carries the setting name so that failures surfacing from
/// union or custom-class recursion stay attributed to the setting that was
/// being resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The raw text could not be converted to, or validated against, the
    /// expected type
    #[error("Invalid type for {name} with configured value '{raw}'. Expected {expected}.")]
    TypeMismatch {
        name: String,
        raw: String,
        expected: String,
    },

    /// A custom type's conversion hook does not take exactly one typed parameter
    #[error("Invalid method signature for {type_name}. {reason}")]
    HookContractViolation {
        name: String,
        type_name: String,
        reason: HookContractReason,
    },

    /// Decimal construction failed; the decimal library's error is kept as-is
    #[error("Invalid decimal for {name} with configured value '{raw}': {source}")]
    InvalidDecimal {
        name: String,
        raw: String,
        #[source]
        source: rust_decimal::Error,
    },
}

impl ConfigurationError {
    /// Creates a type-mismatch error, rendering `expected` with its `Display` form
    pub fn type_mismatch(
        name: impl Into<String>,
        raw: impl Into<String>,
        expected: impl fmt::Display,
    ) -> Self {
        Self::TypeMismatch {
            name: name.into(),
            raw: raw.into(),
            expected: expected.to_string(),
        }
    }

    /// Name of the setting being resolved when the error occurred
    pub fn setting_name(&self) -> &str {
        match self {
            Self::TypeMismatch { name, .. }
            | Self::HookContractViolation { name, .. }
            | Self::InvalidDecimal { name, .. } => name,
        }
    }

    /// The offending raw value, if the error depends on one
    pub fn raw_value(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { raw, .. } | Self::InvalidDecimal { raw, .. } => Some(raw),
            Self::HookContractViolation { .. } => None,
        }
    }

    /// Rendered expected type for type-mismatch errors
    pub fn expected_type(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { expected, .. } => Some(expected),
            _ => None,
        }
    }
}

/// Why a conversion hook signature was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookContractReason {
    /// The hook does not declare exactly one parameter
    ParameterCount,
    /// The single parameter has no declared type
    MissingTypeHint,
}

impl fmt::Display for HookContractReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterCount => f.write_str("Expected a single parameter."),
            Self::MissingTypeHint => f.write_str("Expected a type hint for the parameter."),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for EnvcastError {
    fn from(err: std::io::Error) -> Self {
        EnvcastError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EnvcastError {
    fn from(err: serde_json::Error) -> Self {
        EnvcastError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EnvcastError {
    fn from(err: toml::de::Error) -> Self {
        EnvcastError::Configuration(format!("TOML parse error: {err}"))
    }
}
