//! Environment sources overrides are read from

use dashmap::DashMap;

/// Where setting overrides are looked up
pub trait EnvSource: Send + Sync {
    /// Value of the variable `key`, if set
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// An in-memory environment
///
/// Variables can be changed through a shared reference, so a `MapEnv` shared
/// with a [`Settings`](super::Settings) instance behaves like a process
/// environment that is edited while the application runs.
///
/// ```rust
/// use envcast::settings::{EnvSource, MapEnv};
///
/// let env = MapEnv::from_iter([("APP_PORT", "8080")]);
/// env.set("APP_DEBUG", "true");
///
/// assert_eq!(env.var("APP_PORT").as_deref(), Some("8080"));
/// assert_eq!(env.var("APP_DEBUG").as_deref(), Some("true"));
/// ```
#[derive(Debug, Default)]
pub struct MapEnv {
    vars: DashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.vars.remove(key);
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let env = MapEnv::new();
        for (key, value) in iter {
            env.set(key, value);
        }
        env
    }
}

impl EnvSource for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).map(|value| value.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_set_and_remove() {
        let env = MapEnv::new();
        assert_eq!(env.var("KEY"), None);

        env.set("KEY", "value");
        assert_eq!(env.var("KEY").as_deref(), Some("value"));

        env.remove("KEY");
        assert_eq!(env.var("KEY"), None);
    }

    #[test]
    fn test_process_env_reads_variables() {
        std::env::set_var("ENVCAST_ENV_SOURCE_TEST", "1");
        assert_eq!(ProcessEnv.var("ENVCAST_ENV_SOURCE_TEST").as_deref(), Some("1"));
        std::env::remove_var("ENVCAST_ENV_SOURCE_TEST");
        assert_eq!(ProcessEnv.var("ENVCAST_ENV_SOURCE_TEST"), None);
    }
}
