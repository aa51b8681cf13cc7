//! Settings definition types
//!
//! A [`SettingsDefinition`] is the set of declared settings: each has a
//! default value, an optional type annotation, and the descriptor resolved
//! from them. Definitions come from a TOML file (see [`super::loader`]) or
//! are built in code with [`DefinitionBuilder`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::descriptor::{TypeDescriptor, TypeRegistry};
use crate::domain::{EnvcastError, Result, Value};

/// One declared setting
#[derive(Debug, Clone)]
pub struct SettingSpec {
    default: Value,
    annotation: Option<String>,
    descriptor: TypeDescriptor,
}

impl SettingSpec {
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Annotation text as declared, if any
    pub fn annotation(&self) -> Option<&str> {
        self.annotation.as_deref()
    }

    /// Descriptor overrides of this setting are converted with
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }
}

/// Declared settings, keyed by name
#[derive(Debug, Clone, Default)]
pub struct SettingsDefinition {
    settings: BTreeMap<String, SettingSpec>,
}

impl SettingsDefinition {
    pub fn builder(registry: &TypeRegistry) -> DefinitionBuilder<'_> {
        DefinitionBuilder {
            registry,
            entries: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SettingSpec> {
        self.settings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// Declared names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.settings.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingSpec)> {
        self.settings.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }
}

/// Whether `name` is a setting name: an uppercase ASCII letter followed by
/// uppercase letters, digits or underscores
pub fn is_setting_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

struct PendingSetting {
    default: Value,
    annotation: Option<String>,
}

/// Builds a [`SettingsDefinition`], resolving annotations against a registry
///
/// ```rust
/// use envcast::config::SettingsDefinition;
/// use envcast::descriptor::TypeRegistry;
/// use envcast::domain::Value;
///
/// let registry = TypeRegistry::with_hook_name("from_setting");
/// let definition = SettingsDefinition::builder(&registry)
///     .default("DEBUG", Value::Bool(true))
///     .annotated("PORT", Value::Int(8000), "int | None")
///     .declared("TIMEOUT", "float | None")
///     .build()
///     .unwrap();
///
/// assert_eq!(definition.len(), 3);
/// assert_eq!(definition.get("TIMEOUT").unwrap().default_value(), &Value::None);
/// ```
pub struct DefinitionBuilder<'r> {
    registry: &'r TypeRegistry,
    entries: BTreeMap<String, PendingSetting>,
}

impl<'r> DefinitionBuilder<'r> {
    /// Declares a setting whose type is taken from its default value
    pub fn default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.entries.insert(
            name.into(),
            PendingSetting {
                default: default.into(),
                annotation: None,
            },
        );
        self
    }

    /// Declares a setting with a type annotation
    pub fn annotated(
        mut self,
        name: impl Into<String>,
        default: impl Into<Value>,
        annotation: impl Into<String>,
    ) -> Self {
        self.entries.insert(
            name.into(),
            PendingSetting {
                default: default.into(),
                annotation: Some(annotation.into()),
            },
        );
        self
    }

    /// Declares an annotated setting without a default; its default is `None`
    pub fn declared(self, name: impl Into<String>, annotation: impl Into<String>) -> Self {
        self.annotated(name, Value::None, annotation)
    }

    /// Resolves every setting's descriptor
    ///
    /// # Errors
    ///
    /// Returns an error for a name that is not a setting name or an annotation
    /// that does not parse.
    pub fn build(self) -> Result<SettingsDefinition> {
        let DefinitionBuilder { registry, entries } = self;
        let mut settings = BTreeMap::new();
        for (name, pending) in entries {
            if !is_setting_name(&name) {
                return Err(EnvcastError::Configuration(format!(
                    "Invalid setting name '{name}'. Setting names must be uppercase"
                )));
            }
            let descriptor = match &pending.annotation {
                Some(annotation) => TypeDescriptor::parse(annotation, registry)?,
                None => infer_descriptor(registry, &pending.default),
            };
            settings.insert(
                name,
                SettingSpec {
                    default: pending.default,
                    annotation: pending.annotation,
                    descriptor,
                },
            );
        }
        Ok(SettingsDefinition { settings })
    }
}

/// Descriptor of an un-annotated setting; custom defaults resolve through the
/// registry under their type name
fn infer_descriptor(registry: &TypeRegistry, default: &Value) -> TypeDescriptor {
    match default {
        Value::Custom(custom) => registry
            .resolve(custom.type_name())
            .unwrap_or_else(|| TypeDescriptor::from_default(default)),
        other => TypeDescriptor::from_default(other),
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FromSetting, HookError};

    #[derive(Debug, PartialEq)]
    struct Hosts(Vec<String>);

    impl FromSetting for Hosts {
        const TYPE_NAME: &'static str = "Hosts";

        fn parameter() -> TypeDescriptor {
            TypeDescriptor::list(Some(TypeDescriptor::str()))
        }

        fn from_setting(value: Value) -> std::result::Result<Self, HookError> {
            match value {
                Value::List(items) => Ok(Hosts(items.iter().map(Value::to_plain_string).collect())),
                _ => Err(HookError::new("expected list")),
            }
        }
    }

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::with_hook_name("from_setting");
        registry.register::<Hosts>();
        registry
    }

    #[test]
    fn test_is_setting_name() {
        assert!(is_setting_name("DEBUG"));
        assert!(is_setting_name("SOME_DICT_2"));
        assert!(!is_setting_name("debug"));
        assert!(!is_setting_name("_PRIVATE"));
        assert!(!is_setting_name("Mixed"));
        assert!(!is_setting_name(""));
    }

    #[test]
    fn test_annotation_wins_over_default() {
        let registry = registry();
        let definition = SettingsDefinition::builder(&registry)
            .annotated("SOME_STRICT_LIST", vec!["a", "b"], "list[str]")
            .default("SOME_LIST", vec!["a", "b"])
            .build()
            .unwrap();
        assert_eq!(
            definition.get("SOME_STRICT_LIST").unwrap().descriptor().to_string(),
            "list[str]"
        );
        assert_eq!(definition.get("SOME_LIST").unwrap().descriptor().to_string(), "list");
    }

    #[test]
    fn test_custom_default_resolves_registered_type() {
        let registry = registry();
        let default = Value::Custom(crate::domain::CustomValue::new(
            "Hosts",
            Hosts(vec!["a".to_string()]),
        ));
        let definition = SettingsDefinition::builder(&registry)
            .default("HOSTS", default)
            .build()
            .unwrap();
        assert!(matches!(
            definition.get("HOSTS").unwrap().descriptor(),
            TypeDescriptor::Custom(_)
        ));
    }

    #[test]
    fn test_build_mixes_annotated_and_inferred_settings() {
        let registry = registry();
        let unregistered = Value::Custom(crate::domain::CustomValue::new("Widget", 7_i64));
        let definition = SettingsDefinition::builder(&registry)
            .annotated("PORT", Value::Int(8000), "int")
            .default("RATIO", Value::Float(0.5))
            .default("WIDGET", unregistered)
            .declared("TIMEOUT", "float | None")
            .build()
            .unwrap();

        assert_eq!(definition.get("PORT").unwrap().descriptor(), &TypeDescriptor::int());
        assert_eq!(definition.get("RATIO").unwrap().descriptor(), &TypeDescriptor::float());
        assert_eq!(definition.get("WIDGET").unwrap().descriptor(), &TypeDescriptor::str());
        assert_eq!(definition.get("TIMEOUT").unwrap().annotation(), Some("float | None"));
    }

    #[test]
    fn test_build_rejects_bad_names_and_annotations() {
        let registry = registry();
        assert!(SettingsDefinition::builder(&registry)
            .default("lower", 1_i64)
            .build()
            .is_err());
        assert!(matches!(
            SettingsDefinition::builder(&registry)
                .declared("PORT", "integer")
                .build(),
            Err(EnvcastError::TypeExpression(_))
        ));
    }

    #[test]
    fn test_logging_config_validation() {
        assert!(LoggingConfig::default().validate().is_ok());
        let config = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..LoggingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
