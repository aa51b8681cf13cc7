//! Registry of user-defined types
//!
//! Annotations name types; the registry maps those names to descriptors.
//! A registered type becomes a custom-converting type when it exposes a hook
//! under the registry's capability name, and a string-constructible type when
//! it has a [`StrConstructor`]. The capability name is fixed when the registry
//! is built (from `ENVCAST_HOOK_NAME`, default [`DEFAULT_HOOK_NAME`]).

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use super::hook::{ConversionHook, FromSetting, TypedHook};
use super::types::{PrimitiveKind, TypeDescriptor};
use crate::domain::{CustomValue, Value};

/// Capability name hooks are discovered under unless configured otherwise
pub const DEFAULT_HOOK_NAME: &str = "from_setting";

/// Environment variable overriding the capability name
pub const HOOK_NAME_ENV: &str = "ENVCAST_HOOK_NAME";

/// Builds a value of some type from one string
pub trait StrConstructor: Send + Sync {
    fn type_name(&self) -> &str;

    fn construct(&self, raw: &str) -> Result<Value, String>;
}

/// [`StrConstructor`] backed by a `FromStr` implementation
pub struct FromStrConstructor<T> {
    type_name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConstructor<T> {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            _marker: PhantomData,
        }
    }
}

impl<T> StrConstructor for FromStrConstructor<T>
where
    T: FromStr + Send + Sync + fmt::Debug + PartialEq + 'static,
    T::Err: fmt::Display,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn construct(&self, raw: &str) -> Result<Value, String> {
        raw.parse::<T>()
            .map(|parsed| Value::Custom(CustomValue::new(self.type_name.as_str(), parsed)))
            .map_err(|e| e.to_string())
    }
}

#[derive(Default)]
struct RegisteredType {
    hooks: HashMap<String, Arc<dyn ConversionHook>>,
    constructor: Option<Arc<dyn StrConstructor>>,
}

/// Named user-defined types available to annotations
pub struct TypeRegistry {
    hook_name: String,
    types: HashMap<String, RegisteredType>,
}

impl TypeRegistry {
    /// Empty registry using the capability name from `ENVCAST_HOOK_NAME`
    pub fn new() -> Self {
        let hook_name = std::env::var(HOOK_NAME_ENV)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOOK_NAME.to_string());
        Self::with_hook_name(hook_name)
    }

    /// Empty registry discovering hooks under `hook_name`
    pub fn with_hook_name(hook_name: impl Into<String>) -> Self {
        Self {
            hook_name: hook_name.into(),
            types: HashMap::new(),
        }
    }

    /// Capability name hooks are discovered under
    pub fn hook_name(&self) -> &str {
        &self.hook_name
    }

    /// Exposes `hook` on `type_name` under the capability `method`
    pub fn register_hook(
        &mut self,
        type_name: impl Into<String>,
        method: impl Into<String>,
        hook: Arc<dyn ConversionHook>,
    ) -> &mut Self {
        self.types
            .entry(type_name.into())
            .or_default()
            .hooks
            .insert(method.into(), hook);
        self
    }

    /// Registers a [`FromSetting`] type under its own name and hook name
    pub fn register<T: FromSetting>(&mut self) -> &mut Self {
        self.register_hook(T::TYPE_NAME, T::HOOK_NAME, Arc::new(TypedHook::<T>::new()))
    }

    /// Registers a type built from a single string through `FromStr`
    pub fn register_from_str<T>(&mut self, type_name: impl Into<String>) -> &mut Self
    where
        T: FromStr + Send + Sync + fmt::Debug + PartialEq + 'static,
        T::Err: fmt::Display,
    {
        let type_name = type_name.into();
        let constructor = Arc::new(FromStrConstructor::<T>::new(type_name.clone()));
        self.types.entry(type_name).or_default().constructor = Some(constructor);
        self
    }

    /// Whether `type_name` exposes a hook under the active capability name
    pub fn is_custom(&self, type_name: &str) -> bool {
        self.hook(type_name).is_some()
    }

    fn hook(&self, type_name: &str) -> Option<&Arc<dyn ConversionHook>> {
        self.types.get(type_name)?.hooks.get(&self.hook_name)
    }

    /// Descriptor for a registered type name
    ///
    /// A hook under the active capability name wins over a string constructor.
    pub fn resolve(&self, type_name: &str) -> Option<TypeDescriptor> {
        if let Some(hook) = self.hook(type_name) {
            return Some(TypeDescriptor::Custom(Arc::clone(hook)));
        }
        self.types
            .get(type_name)?
            .constructor
            .as_ref()
            .map(|constructor| TypeDescriptor::Primitive(PrimitiveKind::Other(Arc::clone(constructor))))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.types.keys().collect();
        names.sort();
        f.debug_struct("TypeRegistry")
            .field("hook_name", &self.hook_name)
            .field("types", &names)
            .finish()
    }
}
