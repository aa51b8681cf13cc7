//! Settings definition loader
//!
//! Reads a TOML definition file, substitutes `${VAR}` references from the
//! process environment and resolves every setting against a
//! [`TypeRegistry`].

use super::schema::{is_setting_name, SettingsDefinition};
use crate::descriptor::TypeRegistry;
use crate::domain::context::ResultExt;
use crate::domain::errors::EnvcastError;
use crate::domain::result::Result;
use crate::domain::Value;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
struct DefinitionFile {
    #[serde(default)]
    defaults: toml::Table,

    #[serde(default)]
    types: BTreeMap<String, String>,
}

/// Loads a settings definition from a TOML file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - A referenced environment variable is not set
/// - TOML parsing fails
/// - A type annotation does not parse
///
/// # Examples
///
/// ```no_run
/// use envcast::config::loader::load_definition;
/// use envcast::descriptor::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let definition = load_definition("settings.toml", &registry).expect("Failed to load definition");
/// ```
pub fn load_definition(path: impl AsRef<Path>, registry: &TypeRegistry) -> Result<SettingsDefinition> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EnvcastError::Configuration(format!(
            "Settings file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;

    let definition = parse_definition(&contents, registry)?;
    tracing::debug!(
        path = %path.display(),
        settings = definition.len(),
        "Loaded settings definition"
    );
    Ok(definition)
}

/// Parses a settings definition from TOML text
///
/// Keys that are not setting names are skipped. A `[types]` entry without a
/// matching default declares a setting whose default is `None`.
pub fn parse_definition(contents: &str, registry: &TypeRegistry) -> Result<SettingsDefinition> {
    let contents = substitute_env_vars(contents)?;
    let file: DefinitionFile = toml::from_str(&contents)
        .map_err(|e| EnvcastError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    let mut types = file.types;
    let mut builder = SettingsDefinition::builder(registry);

    for (name, default) in file.defaults {
        if !is_setting_name(&name) {
            tracing::debug!(key = %name, "Skipping non-setting key in [defaults]");
            types.remove(&name);
            continue;
        }
        let default = toml_to_value(default);
        builder = match types.remove(&name) {
            Some(annotation) => builder.annotated(name, default, annotation),
            None => builder.default(name, default),
        };
    }

    for (name, annotation) in types {
        if !is_setting_name(&name) {
            tracing::debug!(key = %name, "Skipping non-setting key in [types]");
            continue;
        }
        builder = builder.declared(name, annotation);
    }

    builder.build()
}

/// Converts a TOML value into a setting default
fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::Str(s),
        toml::Value::Integer(i) => Value::Int(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::Str(dt.to_string()),
        toml::Value::Array(items) => Value::List(items.into_iter().map(toml_to_value).collect()),
        toml::Value::Table(table) => Value::map_from(
            table
                .into_iter()
                .map(|(key, value)| (Value::Str(key), toml_to_value(value))),
        ),
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error listing every referenced environment variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| EnvcastError::Configuration(format!("Invalid substitution pattern: {}", e)))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Comment lines are kept as written
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let processed = re.replace_all(line, |cap: &regex::Captures<'_>| {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    cap[0].to_string()
                }
            }
        });
        lines.push(processed.into_owned());
    }

    if !missing_vars.is_empty() {
        return Err(EnvcastError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}
