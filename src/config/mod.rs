//! Settings definitions for envcast.
//!
//! A definition declares every setting an application reads: its name, its
//! default value and optionally a type annotation. Overrides found in the
//! environment are converted to the declared type by the
//! [`engine`](crate::engine).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use envcast::config::load_definition;
//! use envcast::descriptor::TypeRegistry;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TypeRegistry::new();
//! let definition = load_definition("settings.toml", &registry)?;
//!
//! for (name, spec) in definition.iter() {
//!     println!("{name}: {} = {}", spec.descriptor(), spec.default_value());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Definition Files
//!
//! ```toml
//! [defaults]
//! DEBUG = false
//! PORT = 8000
//! HOSTS = ["localhost"]
//! DATABASE_URL = "${DATABASE_URL}"
//!
//! [types]
//! PORT = "int | None"
//! ALLOWED_IDS = "set[int] | None"
//! ```
//!
//! Only uppercase keys are settings. `${VAR_NAME}` references are substituted
//! from the process environment before the file is parsed.

pub mod loader;
pub mod schema;

pub use loader::{load_definition, parse_definition};
pub use schema::{is_setting_name, DefinitionBuilder, LoggingConfig, SettingSpec, SettingsDefinition};
