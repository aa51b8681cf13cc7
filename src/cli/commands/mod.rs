//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod check;
pub mod convert;
pub mod get;
pub mod init;
pub mod show;

use std::sync::Arc;

use crate::descriptor::TypeRegistry;
use crate::domain::EnvcastError;
use crate::log_error_with_context;
use crate::settings::{ProcessEnv, Settings, SettingsOptions, SETTINGS_FILE_ENV};

/// Configuration error exit code
pub(crate) const EXIT_CONFIGURATION: i32 = 2;

/// Opens the settings named by `options`, reporting failures on stdout
///
/// Returns the exit code to use when the settings cannot be opened.
pub(crate) fn open_settings(options: Option<&SettingsOptions>) -> Result<Settings, i32> {
    let Some(options) = options else {
        println!(
            "❌ '{SETTINGS_FILE_ENV}' environment variable is not set. Please specify a settings file."
        );
        println!("   Use --definition or set {SETTINGS_FILE_ENV}");
        return Err(EXIT_CONFIGURATION);
    };

    let registry = TypeRegistry::new();
    Settings::load(options, &registry, Arc::new(ProcessEnv)).map_err(|e| {
        log_error_with_context!(&e, "Failed to load settings");
        println!("❌ Failed to load settings definition");
        println!("   Error: {e}");
        EXIT_CONFIGURATION
    })
}

/// Exit code for a failed setting resolution
pub(crate) fn exit_code_for(error: &EnvcastError) -> i32 {
    match error {
        EnvcastError::Io(_) => 5,
        _ => EXIT_CONFIGURATION,
    }
}
