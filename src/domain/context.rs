//! Error context extension trait
//!
//! Works like `anyhow::Context` but keeps errors as [`EnvcastError`], so
//! library code can add context without giving up the typed error.
//!
//! # Examples
//!
//! ```rust
//! use envcast::domain::Result;
//! use envcast::domain::context::ResultExt;
//!
//! fn read_definition(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read settings file {}", path))
//! }
//! # assert!(read_definition("/nonexistent/settings.toml").is_err());
//! ```

use crate::domain::errors::EnvcastError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
///
/// The contextualised error is an [`EnvcastError::Configuration`] whose
/// message is `"{context}: {error}"`.
pub trait ResultExt<T> {
    /// Add context to an error
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error, computing it only if there is one
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EnvcastError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| EnvcastError::Configuration(format!("{context}: {}", e.into())))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| {
            let base_error = e.into();
            EnvcastError::Configuration(format!("{}: {base_error}", f()))
        })
    }
}
