// envcast - Typed settings from environment overrides
// Copyright (c) 2025 Envcast Contributors
// Licensed under the MIT License

//! # envcast - typed settings from environment overrides
//!
//! envcast resolves application settings from a declared definition, letting
//! each one be overridden by an environment variable. The override is always
//! a string; envcast converts it to the setting's declared type, or reports
//! exactly which setting, which text and which type did not fit.
//!
//! ## Architecture
//!
//! - [`engine`] - Type-directed conversion of raw override strings
//! - [`descriptor`] - Type descriptors, type expressions, custom type hooks
//! - [`literal`] - Safe parser for container literals
//! - [`domain`] - Values and errors
//! - [`config`] - Settings definitions and their TOML loader
//! - [`settings`] - Override lookup, conversion and caching
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust
//! use envcast::descriptor::{TypeDescriptor, TypeRegistry};
//! use envcast::domain::Value;
//! use envcast::engine::convert;
//!
//! let registry = TypeRegistry::with_hook_name("from_setting");
//! let descriptor = TypeDescriptor::parse("list[int]", &registry).unwrap();
//!
//! let value = convert("PORTS", "[8000, 8001]", &descriptor).unwrap();
//! assert_eq!(value, Value::List(vec![Value::Int(8000), Value::Int(8001)]));
//!
//! let err = convert("PORTS", "[8000, 'x']", &descriptor).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "Invalid type for PORTS with configured value '[8000, 'x']'. Expected list[int]."
//! );
//! ```
//!
//! ## Custom Types
//!
//! A type converts from a setting by implementing [`descriptor::FromSetting`]:
//! the override is first converted to the hook's parameter type, then handed
//! to the hook.
//!
//! ```rust
//! use envcast::descriptor::{FromSetting, HookError, TypeDescriptor, TypeRegistry};
//! use envcast::domain::Value;
//! use envcast::engine::convert;
//!
//! #[derive(Debug, PartialEq)]
//! struct Endpoint {
//!     host: String,
//!     port: i64,
//! }
//!
//! impl FromSetting for Endpoint {
//!     const TYPE_NAME: &'static str = "Endpoint";
//!
//!     fn parameter() -> TypeDescriptor {
//!         TypeDescriptor::str()
//!     }
//!
//!     fn from_setting(value: Value) -> Result<Self, HookError> {
//!         let text = value.to_plain_string();
//!         let (host, port) = text
//!             .rsplit_once(':')
//!             .ok_or_else(|| HookError::new("expected host:port"))?;
//!         let port = port.parse().map_err(|_| HookError::new("invalid port"))?;
//!         Ok(Endpoint { host: host.to_string(), port })
//!     }
//! }
//!
//! let mut registry = TypeRegistry::with_hook_name("from_setting");
//! registry.register::<Endpoint>();
//!
//! let descriptor = TypeDescriptor::parse("Endpoint | None", &registry).unwrap();
//! let value = convert("UPSTREAM", "db.local:5432", &descriptor).unwrap();
//! assert_eq!(
//!     value.downcast_custom::<Endpoint>(),
//!     Some(&Endpoint { host: "db.local".to_string(), port: 5432 })
//! );
//! ```
//!
//! ## Settings
//!
//! ```rust,no_run
//! use envcast::descriptor::TypeRegistry;
//! use envcast::settings::Settings;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // ENVCAST_SETTINGS_FILE=settings.toml, ENVCAST_PORT=8080
//! let settings = Settings::from_env(&TypeRegistry::new())?;
//! let port = settings.get_int("PORT")?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod domain;
pub mod engine;
pub mod literal;
pub mod logging;
pub mod settings;
