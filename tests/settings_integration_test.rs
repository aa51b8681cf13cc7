//! Integration tests for settings resolution
//!
//! Tests that modify process environment variables are serialized with
//! `ENV_MUTEX`; everything else goes through an in-memory `MapEnv`.

use std::io::Write;
use std::sync::{Arc, Mutex};

use envcast::descriptor::{FromSetting, HookError, TypeDescriptor, TypeRegistry};
use envcast::domain::{CustomValue, EnvcastError, Value};
use envcast::settings::{LoadPolicy, MapEnv, Settings, SettingsOptions};
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const DEFINITION: &str = r#"
[defaults]
NONE_VALUE = "placeholder"
DEBUG = true
ENABLE_FEATURE = false
PORT = 8000
DATABASE_URL = "sqlite:///db.sqlite3"
SECRET_KEY = "my-secret-key"
SOME_LIST = ["a", "b", "c"]
SOME_UNION_TYPE = "some_str"
SOME_STRICT_LIST = ["a", "b", "c"]
NO_TYPE_HINT_FLOAT = 1.0

[defaults.SOME_DICT]
a = "b"
c = "d"

[defaults.SOME_STRICT_DICT]
a = "b"
c = "d"

[types]
NONE_VALUE = "None"
SOME_TUPLE = "tuple"
SOME_SET = "set"
SOME_UNION_TYPE = "dict | str"
SOME_STRICT_DICT = "dict[str, str]"
SOME_STRICT_LIST = "list[str]"
"#;

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for name in [
        "ENVCAST_SETTINGS_FILE",
        "ENVCAST_ENV_PREFIX",
        "ENVCAST_LAZY_LOAD",
        "ENVCAST_PORT",
        "ENVCAST_DEBUG",
        "TEST_OTHER_SETTING",
    ] {
        std::env::remove_var(name);
    }
}

fn definition_file() -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(DEFINITION.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

fn settings_with(env: Arc<MapEnv>) -> (Settings, NamedTempFile) {
    let temp_file = definition_file();
    let options = SettingsOptions::new(temp_file.path());
    let registry = TypeRegistry::with_hook_name("from_setting");
    let settings = Settings::load(&options, &registry, env).unwrap();
    (settings, temp_file)
}

#[test]
fn test_settings_initialization() {
    let (settings, _file) = settings_with(Arc::new(MapEnv::new()));

    assert_eq!(settings.get("DEBUG").unwrap(), Value::Bool(true));
    assert_eq!(settings.get_str("DATABASE_URL").unwrap(), "sqlite:///db.sqlite3");
    assert_eq!(settings.get_str("SECRET_KEY").unwrap(), "my-secret-key");
    assert_eq!(settings.get_int("PORT").unwrap(), 8000);
    assert!(!settings.get_bool("ENABLE_FEATURE").unwrap());
    assert_eq!(settings.get("SOME_LIST").unwrap(), Value::from(vec!["a", "b", "c"]));
    assert_eq!(
        settings.get("SOME_DICT").unwrap(),
        Value::map_from([
            (Value::from("a"), Value::from("b")),
            (Value::from("c"), Value::from("d")),
        ])
    );
    assert_eq!(settings.get("SOME_TUPLE").unwrap(), Value::None);
    assert_eq!(settings.get_float("NO_TYPE_HINT_FLOAT").unwrap(), 1.0);
}

#[test]
fn test_env_var_overrides() {
    let env = Arc::new(MapEnv::from_iter([
        ("ENVCAST_DEBUG", "False"),
        ("ENVCAST_PORT", "8080"),
        ("ENVCAST_NONE_VALUE", "some_value"),
    ]));
    let (settings, _file) = settings_with(env);

    assert!(!settings.get_bool("DEBUG").unwrap());
    assert_eq!(settings.get_int("PORT").unwrap(), 8080);
    assert_eq!(settings.get("NONE_VALUE").unwrap(), Value::from("some_value"));
}

#[test]
fn test_env_var_type_conversion() {
    let env = Arc::new(MapEnv::from_iter([
        ("ENVCAST_ENABLE_FEATURE", "True"),
        ("ENVCAST_SOME_LIST", r#"["a","b","c","d"]"#),
        ("ENVCAST_SOME_TUPLE", "(1,2,3)"),
        ("ENVCAST_SOME_SET", r#"{"a","b","c",1,2,3}"#),
        (
            "ENVCAST_SOME_DICT",
            r#"{"a":"b","c":"d","another_dict":{"a":1,"b":2,"c":3}}"#,
        ),
    ]));
    let (settings, _file) = settings_with(env);

    assert!(settings.get_bool("ENABLE_FEATURE").unwrap());
    assert_eq!(
        settings.get("SOME_LIST").unwrap(),
        Value::from(vec!["a", "b", "c", "d"])
    );
    assert_eq!(
        settings.get("SOME_TUPLE").unwrap(),
        Value::Tuple(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(
        settings.get("SOME_SET").unwrap(),
        Value::set_from([
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
            Value::Int(1),
            Value::Int(2),
            Value::Int(3),
        ])
    );
    assert_eq!(
        settings.get("SOME_DICT").unwrap(),
        Value::map_from([
            (Value::from("a"), Value::from("b")),
            (Value::from("c"), Value::from("d")),
            (
                Value::from("another_dict"),
                Value::map_from([
                    (Value::from("a"), Value::Int(1)),
                    (Value::from("b"), Value::Int(2)),
                    (Value::from("c"), Value::Int(3)),
                ]),
            ),
        ])
    );
}

#[test]
fn test_env_var_type_conversion_failure() {
    let env = Arc::new(MapEnv::from_iter([
        ("ENVCAST_SOME_LIST", "1"),
        ("ENVCAST_SOME_TUPLE", "a"),
        ("ENVCAST_PORT", ""),
    ]));
    let (settings, _file) = settings_with(env);

    assert_eq!(
        settings.get("SOME_LIST").unwrap_err().to_string(),
        "Invalid type for SOME_LIST with configured value '1'. Expected list."
    );
    assert_eq!(
        settings.get("SOME_TUPLE").unwrap_err().to_string(),
        "Invalid type for SOME_TUPLE with configured value 'a'. Expected tuple."
    );
    assert_eq!(
        settings.get("PORT").unwrap_err().to_string(),
        "Invalid type for PORT with configured value ''. Expected int."
    );
}

#[test]
fn test_annotated_settings() {
    let env = Arc::new(MapEnv::from_iter([
        ("ENVCAST_SOME_UNION_TYPE", "{'k': 'v'}"),
        ("ENVCAST_SOME_STRICT_LIST", "[1, 2, 3]"),
        ("ENVCAST_SOME_STRICT_DICT", "{'x': 'y'}"),
    ]));
    let (settings, _file) = settings_with(Arc::clone(&env));

    assert_eq!(
        settings.get("SOME_UNION_TYPE").unwrap(),
        Value::map_from([(Value::from("k"), Value::from("v"))])
    );
    assert_eq!(
        settings.get("SOME_STRICT_LIST").unwrap_err().to_string(),
        "Invalid type for SOME_STRICT_LIST with configured value '[1, 2, 3]'. Expected list[str]."
    );
    assert_eq!(
        settings.get("SOME_STRICT_DICT").unwrap(),
        Value::map_from([(Value::from("x"), Value::from("y"))])
    );

    env.set("ENVCAST_SOME_UNION_TYPE", "plain text");
    settings.clear_cache();
    assert_eq!(settings.get("SOME_UNION_TYPE").unwrap(), Value::from("plain text"));
}

#[test]
fn test_missing_setting() {
    let (settings, _file) = settings_with(Arc::new(MapEnv::new()));
    let err = settings.get("MISSING_SETTING").unwrap_err();
    assert!(matches!(err, EnvcastError::UnknownSetting(_)));
    assert!(err.to_string().contains("has no setting 'MISSING_SETTING'"));
}

#[test]
fn test_custom_prefix() {
    let env = Arc::new(MapEnv::from_iter([
        ("TEST_OTHER_SETTING", "test_value"),
        ("TEST_PORT", "9000"),
        ("ENVCAST_DEBUG", "false"),
    ]));
    let temp_file = definition_file();
    let options = SettingsOptions::new(temp_file.path()).with_prefix("TEST_");
    let settings = Settings::load(&options, &TypeRegistry::with_hook_name("from_setting"), env).unwrap();

    assert_eq!(settings.prefix(), "TEST_");
    assert!(settings.get_bool("DEBUG").unwrap());
    assert_eq!(settings.get_int("PORT").unwrap(), 9000);
    assert_eq!(settings.get("OTHER_SETTING").unwrap(), Value::from("test_value"));
}

#[test]
fn test_eager_loading_fails_fast() {
    let temp_file = definition_file();
    let options = SettingsOptions::new(temp_file.path()).with_load_policy(LoadPolicy::Eager);
    let registry = TypeRegistry::with_hook_name("from_setting");

    let env = Arc::new(MapEnv::from_iter([("ENVCAST_PORT", "eighty")]));
    assert!(matches!(
        Settings::load(&options, &registry, env),
        Err(EnvcastError::Setting(_))
    ));

    let env = Arc::new(MapEnv::from_iter([("ENVCAST_PORT", "80")]));
    let settings = Settings::load(&options, &registry, env).unwrap();
    assert_eq!(settings.get_int("PORT").unwrap(), 80);
}

#[derive(Debug, PartialEq)]
struct Hosts(Vec<String>);

impl FromSetting for Hosts {
    const TYPE_NAME: &'static str = "Hosts";

    fn parameter() -> TypeDescriptor {
        TypeDescriptor::list(Some(TypeDescriptor::str()))
    }

    fn from_setting(value: Value) -> Result<Self, HookError> {
        match value {
            Value::List(items) => Ok(Hosts(items.iter().map(Value::to_plain_string).collect())),
            _ => Err(HookError::new("expected a list")),
        }
    }
}

#[test]
fn test_custom_default_and_annotation() {
    let mut registry = TypeRegistry::with_hook_name("from_setting");
    registry.register::<Hosts>();

    let definition = envcast::config::SettingsDefinition::builder(&registry)
        .default(
            "ALLOWED_HOSTS",
            CustomValue::new("Hosts", Hosts(vec!["localhost".to_string()])),
        )
        .declared("BACKUP_HOSTS", "Hosts | None")
        .build()
        .unwrap();

    let env = Arc::new(MapEnv::from_iter([
        ("APP_ALLOWED_HOSTS", "['a.example', 'b.example']"),
        ("APP_BACKUP_HOSTS", "[1]"),
    ]));
    let settings = Settings::with_definition(definition, "APP_", env);

    let hosts = settings.get("ALLOWED_HOSTS").unwrap();
    assert_eq!(
        hosts.downcast_custom::<Hosts>(),
        Some(&Hosts(vec!["a.example".to_string(), "b.example".to_string()]))
    );
    // [1] is not a list[str]; the None alternative keeps the text
    assert_eq!(settings.get("BACKUP_HOSTS").unwrap(), Value::from("[1]"));
}

#[test]
fn test_missing_settings_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let err = Settings::from_env(&TypeRegistry::with_hook_name("from_setting")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Configuration error: 'ENVCAST_SETTINGS_FILE' environment variable is not set. Please specify a settings file."
    );
}

#[test]
fn test_from_process_env() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let temp_file = definition_file();
    std::env::set_var("ENVCAST_SETTINGS_FILE", temp_file.path());
    std::env::set_var("ENVCAST_PORT", "8081");
    std::env::set_var("ENVCAST_LAZY_LOAD", "false");

    let settings = Settings::from_env(&TypeRegistry::with_hook_name("from_setting")).unwrap();
    assert_eq!(settings.get_int("PORT").unwrap(), 8081);

    // an unconvertible override fails construction under eager loading
    std::env::set_var("ENVCAST_DEBUG", "true");
    std::env::set_var("ENVCAST_PORT", "not a port");
    assert!(Settings::from_env(&TypeRegistry::with_hook_name("from_setting")).is_err());

    cleanup_env_vars();
}
