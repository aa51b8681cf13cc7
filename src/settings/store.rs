//! Settings resolution and caching

use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;

use super::env::{EnvSource, ProcessEnv};
use super::{DEFAULT_ENV_PREFIX, ENV_PREFIX_ENV, LAZY_LOAD_ENV, SETTINGS_FILE_ENV};
use crate::config::{load_definition, SettingsDefinition};
use crate::descriptor::{TypeDescriptor, TypeRegistry};
use crate::domain::{EnvcastError, Result, Value};
use crate::engine::convert;
use crate::{log_conversion_failure, log_override_applied};

/// When settings are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// On first access
    #[default]
    Lazy,
    /// All at construction, failing on the first error
    Eager,
}

impl LoadPolicy {
    /// Reads the lazy-load flag: `"true"` in any case selects lazy loading,
    /// any other value eager loading, and an unset flag lazy loading
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            None => LoadPolicy::Lazy,
            Some(value) if value.to_lowercase() == "true" => LoadPolicy::Lazy,
            Some(_) => LoadPolicy::Eager,
        }
    }
}

/// Where settings come from and how they are loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsOptions {
    pub definition_path: PathBuf,
    pub env_prefix: String,
    pub load_policy: LoadPolicy,
}

impl SettingsOptions {
    pub fn new(definition_path: impl Into<PathBuf>) -> Self {
        Self {
            definition_path: definition_path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
            load_policy: LoadPolicy::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn with_load_policy(mut self, load_policy: LoadPolicy) -> Self {
        self.load_policy = load_policy;
        self
    }

    /// Options from the process environment
    ///
    /// # Errors
    ///
    /// Returns a configuration error when `ENVCAST_SETTINGS_FILE` is not set.
    pub fn from_env() -> Result<Self> {
        Self::from_source(&ProcessEnv)
    }

    /// Options from `ENVCAST_SETTINGS_FILE`, `ENVCAST_ENV_PREFIX` and
    /// `ENVCAST_LAZY_LOAD` in `env`
    pub fn from_source(env: &dyn EnvSource) -> Result<Self> {
        let definition_path = env.var(SETTINGS_FILE_ENV).ok_or_else(|| {
            EnvcastError::Configuration(format!(
                "'{SETTINGS_FILE_ENV}' environment variable is not set. Please specify a settings file."
            ))
        })?;
        let env_prefix = env
            .var(ENV_PREFIX_ENV)
            .unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string());
        let load_policy = LoadPolicy::from_flag(env.var(LAZY_LOAD_ENV).as_deref());

        Ok(Self {
            definition_path: PathBuf::from(definition_path),
            env_prefix,
            load_policy,
        })
    }
}

/// Declared settings with environment overrides applied
///
/// A value is resolved on first access from `{prefix}{NAME}` in the
/// environment source, or from the declared default when the variable is
/// unset. Resolved values are cached until [`Settings::clear_cache`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use envcast::config::SettingsDefinition;
/// use envcast::descriptor::TypeRegistry;
/// use envcast::domain::Value;
/// use envcast::settings::{MapEnv, Settings};
///
/// let registry = TypeRegistry::with_hook_name("from_setting");
/// let definition = SettingsDefinition::builder(&registry)
///     .default("PORT", 8000_i64)
///     .default("DEBUG", true)
///     .build()
///     .unwrap();
///
/// let env = Arc::new(MapEnv::from_iter([("APP_PORT", "8080")]));
/// let settings = Settings::with_definition(definition, "APP_", env);
///
/// assert_eq!(settings.get("PORT").unwrap(), Value::Int(8080));
/// assert_eq!(settings.get_bool("DEBUG").unwrap(), true);
/// ```
pub struct Settings {
    definition: SettingsDefinition,
    prefix: String,
    env: Arc<dyn EnvSource>,
    cache: DashMap<String, Value>,
}

impl Settings {
    /// Settings described by the process environment
    ///
    /// # Errors
    ///
    /// Returns an error when `ENVCAST_SETTINGS_FILE` is unset, the definition
    /// cannot be loaded, or eager loading fails.
    pub fn from_env(registry: &TypeRegistry) -> Result<Self> {
        let options = SettingsOptions::from_env()?;
        Self::load(&options, registry, Arc::new(ProcessEnv))
    }

    /// Loads the definition named by `options` and applies its load policy
    pub fn load(
        options: &SettingsOptions,
        registry: &TypeRegistry,
        env: Arc<dyn EnvSource>,
    ) -> Result<Self> {
        let definition = load_definition(&options.definition_path, registry)?;
        let settings = Self::with_definition(definition, options.env_prefix.clone(), env);
        if options.load_policy == LoadPolicy::Eager {
            settings.load_all()?;
        }
        Ok(settings)
    }

    pub fn with_definition(
        definition: SettingsDefinition,
        prefix: impl Into<String>,
        env: Arc<dyn EnvSource>,
    ) -> Self {
        Self {
            definition,
            prefix: prefix.into(),
            env,
            cache: DashMap::new(),
        }
    }

    /// Resolves every declared setting, stopping at the first failure
    pub fn load_all(&self) -> Result<()> {
        tracing::debug!(settings = self.definition.len(), "Loading all settings");
        for name in self.definition.names() {
            self.get(name)?;
        }
        Ok(())
    }

    /// Value of setting `name`
    ///
    /// # Errors
    ///
    /// - [`EnvcastError::Setting`] when the override cannot be converted
    /// - [`EnvcastError::UnknownSetting`] when `name` is neither declared nor
    ///   overridden
    pub fn get(&self, name: &str) -> Result<Value> {
        if let Some(cached) = self.cache.get(name) {
            tracing::trace!(setting = name, "Cache hit");
            return Ok(cached.value().clone());
        }

        let value = self.resolve(name)?;
        self.cache.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn resolve(&self, name: &str) -> Result<Value> {
        let variable = self.env_var_name(name);
        let spec = self.definition.get(name);

        match (self.env.var(&variable), spec) {
            (Some(raw), Some(spec)) => {
                log_override_applied!(name, variable.as_str());
                convert(name, &raw, spec.descriptor()).map_err(|err| {
                    log_conversion_failure!(&err);
                    EnvcastError::Setting(err)
                })
            }
            (Some(raw), None) => {
                tracing::debug!(setting = name, variable = %variable, "Undeclared setting overridden");
                Ok(Value::Str(raw))
            }
            (None, Some(spec)) => Ok(spec.default_value().clone()),
            (None, None) => Err(EnvcastError::UnknownSetting(name.to_string())),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        let value = self.get(name)?;
        value.as_bool().ok_or_else(|| wrong_shape(name, &value, "bool"))
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_int().ok_or_else(|| wrong_shape(name, &value, "int"))
    }

    pub fn get_float(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_float().ok_or_else(|| wrong_shape(name, &value, "float"))
    }

    pub fn get_str(&self, name: &str) -> Result<String> {
        let value = self.get(name)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| wrong_shape(name, &value, "str"))
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Declared setting names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.definition.names().collect()
    }

    pub fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.definition.get(name).map(|spec| spec.descriptor())
    }

    pub fn definition(&self) -> &SettingsDefinition {
        &self.definition
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Environment variable overriding setting `name`
    pub fn env_var_name(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    /// Whether this settings' environment source overrides `name`
    pub fn is_overridden(&self, name: &str) -> bool {
        self.env.var(&self.env_var_name(name)).is_some()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("prefix", &self.prefix)
            .field("settings", &self.definition.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}

fn wrong_shape(name: &str, value: &Value, expected: &str) -> EnvcastError {
    EnvcastError::Configuration(format!(
        "Setting '{}' holds a {} value, not {}",
        name,
        value.type_name(),
        expected
    ))
}
