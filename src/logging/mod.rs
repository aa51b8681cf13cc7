//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output with `RUST_LOG`-style filtering
//! - JSON-formatted local file logs with rotation
//! - Event macros shared by the settings layer and the CLI
//!
//! # Example
//!
//! ```no_run
//! use envcast::logging::init_logging;
//! use envcast::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log that an environment override was found for a setting
///
/// # Example
///
/// ```no_run
/// use envcast::log_override_applied;
///
/// log_override_applied!("PORT", "ENVCAST_PORT");
/// ```
#[macro_export]
macro_rules! log_override_applied {
    ($name:expr, $variable:expr) => {
        tracing::debug!(
            setting = $name,
            variable = $variable,
            "Applying environment override"
        );
    };
}

/// Log a setting whose override could not be converted
///
/// # Example
///
/// ```no_run
/// use envcast::log_conversion_failure;
/// use envcast::domain::ConfigurationError;
///
/// let error = ConfigurationError::type_mismatch("PORT", "abc", "int");
/// log_conversion_failure!(&error);
/// ```
#[macro_export]
macro_rules! log_conversion_failure {
    ($error:expr) => {
        tracing::warn!(
            setting = $error.setting_name(),
            error = %$error,
            "Override conversion failed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use envcast::log_error_with_context;
/// use envcast::domain::EnvcastError;
///
/// let error = EnvcastError::Configuration("Invalid definition".to_string());
/// log_error_with_context!(&error, "Failed to load settings");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
