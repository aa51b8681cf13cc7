//! Result type alias for envcast

use super::errors::EnvcastError;

/// Result type alias for envcast operations
///
/// # Examples
///
/// ```
/// use envcast::domain::result::Result;
/// use envcast::domain::errors::EnvcastError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(EnvcastError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, EnvcastError>;
