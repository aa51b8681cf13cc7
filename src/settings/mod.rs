//! Runtime settings access
//!
//! [`Settings`] pairs a [`SettingsDefinition`](crate::config::SettingsDefinition)
//! with an [`EnvSource`]. Each setting can be overridden by the environment
//! variable `{prefix}{NAME}`; overrides are converted to the setting's
//! declared type and cached.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `ENVCAST_SETTINGS_FILE` | definition file (required) |
//! | `ENVCAST_ENV_PREFIX` | override prefix, `ENVCAST_` by default |
//! | `ENVCAST_LAZY_LOAD` | `true` or unset for lazy loading, anything else for eager |
//! | `ENVCAST_HOOK_NAME` | capability name conversion hooks are registered under |

mod env;
mod store;

pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use store::{LoadPolicy, Settings, SettingsOptions};

/// Names the settings definition file
pub const SETTINGS_FILE_ENV: &str = "ENVCAST_SETTINGS_FILE";

/// Overrides the environment prefix
pub const ENV_PREFIX_ENV: &str = "ENVCAST_ENV_PREFIX";

/// Selects the load policy
pub const LAZY_LOAD_ENV: &str = "ENVCAST_LAZY_LOAD";

pub const DEFAULT_ENV_PREFIX: &str = "ENVCAST_";
