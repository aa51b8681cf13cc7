//! Domain models and types for envcast.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Values** ([`Value`], [`CustomValue`]) produced by conversion
//! - **Error types** ([`EnvcastError`], [`ConfigurationError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Conversion failures are [`ConfigurationError`]s and convert into
//! [`EnvcastError`] with the `?` operator:
//!
//! ```rust
//! use envcast::descriptor::TypeDescriptor;
//! use envcast::domain::Result;
//! use envcast::engine::convert;
//!
//! fn port() -> Result<i64> {
//!     let value = convert("PORT", "8080", &TypeDescriptor::int())?;
//!     Ok(value.as_int().unwrap_or_default())
//! }
//! # assert_eq!(port().unwrap(), 8080);
//! ```

pub mod context;
pub mod errors;
pub mod result;
pub mod value;

// Re-export commonly used types for convenience
pub use errors::{ConfigurationError, EnvcastError, HookContractReason};
pub use result::Result;
pub use value::{CustomValue, Value};
