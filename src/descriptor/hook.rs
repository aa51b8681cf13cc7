//! Conversion-hook protocol
//!
//! A type opts into custom conversion by exposing a hook: a single-parameter
//! constructing function whose parameter type is itself a [`TypeDescriptor`].
//! The engine converts the raw override against that parameter type first and
//! hands the result to the hook.
//!
//! Most types implement [`FromSetting`] and get a checked signature for free.
//! [`FnHook`] builds a hook from a closure and an explicit
//! [`HookSignature`], which is also how malformed signatures reach the engine.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use thiserror::Error;

use super::registry::DEFAULT_HOOK_NAME;
use super::types::TypeDescriptor;
use crate::domain::{CustomValue, Value};

/// A hook refused the value it was given
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// One declared parameter of a hook
#[derive(Debug, Clone, PartialEq)]
pub struct HookParameter {
    pub name: String,
    /// Declared parameter type; `None` when the hook left it untyped
    pub annotation: Option<TypeDescriptor>,
}

impl HookParameter {
    pub fn typed(name: impl Into<String>, annotation: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
        }
    }
}

/// Declared parameter list of a hook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HookSignature {
    pub parameters: Vec<HookParameter>,
}

impl HookSignature {
    pub fn new(parameters: Vec<HookParameter>) -> Self {
        Self { parameters }
    }

    /// The well-formed signature: one parameter with a declared type
    pub fn single(annotation: TypeDescriptor) -> Self {
        Self::new(vec![HookParameter::typed("value", annotation)])
    }
}

/// Custom conversion capability of a type
pub trait ConversionHook: Send + Sync {
    /// Name the type is known by in annotations and error messages
    fn type_name(&self) -> &str;

    /// Declared parameters; the engine rejects anything but one typed parameter
    fn signature(&self) -> HookSignature;

    /// Builds the custom value from the already-converted parameter
    fn invoke(&self, argument: Value) -> Result<Value, HookError>;
}

/// Typed conversion hook
///
/// ```rust
/// use envcast::descriptor::{FromSetting, HookError, TypeDescriptor};
/// use envcast::domain::Value;
///
/// #[derive(Debug, PartialEq)]
/// struct Ports(Vec<i64>);
///
/// impl FromSetting for Ports {
///     const TYPE_NAME: &'static str = "Ports";
///
///     fn parameter() -> TypeDescriptor {
///         TypeDescriptor::list(Some(TypeDescriptor::int()))
///     }
///
///     fn from_setting(value: Value) -> Result<Self, HookError> {
///         match value {
///             Value::List(items) => Ok(Ports(items.iter().filter_map(Value::as_int).collect())),
///             other => Err(HookError::new(format!("expected a list, got {other}"))),
///         }
///     }
/// }
/// ```
pub trait FromSetting: Any + Send + Sync + fmt::Debug + PartialEq + Sized {
    /// Name the type is registered and annotated under
    const TYPE_NAME: &'static str;

    /// Capability name the hook is exposed under
    const HOOK_NAME: &'static str = DEFAULT_HOOK_NAME;

    /// Type the raw override is converted to before [`FromSetting::from_setting`]
    fn parameter() -> TypeDescriptor;

    fn from_setting(value: Value) -> Result<Self, HookError>;
}

/// [`ConversionHook`] adapter for a [`FromSetting`] type
pub struct TypedHook<T>(PhantomData<fn() -> T>);

impl<T: FromSetting> TypedHook<T> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T: FromSetting> Default for TypedHook<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromSetting> ConversionHook for TypedHook<T> {
    fn type_name(&self) -> &str {
        T::TYPE_NAME
    }

    fn signature(&self) -> HookSignature {
        HookSignature::single(T::parameter())
    }

    fn invoke(&self, argument: Value) -> Result<Value, HookError> {
        let converted = T::from_setting(argument)?;
        Ok(Value::Custom(CustomValue::new(T::TYPE_NAME, converted)))
    }
}

type HookFn = dyn Fn(Value) -> Result<Value, HookError> + Send + Sync;

/// Hook built from a closure and an explicit signature
#[derive(Clone)]
pub struct FnHook {
    type_name: String,
    signature: HookSignature,
    function: Arc<HookFn>,
}

impl FnHook {
    pub fn new<F>(type_name: impl Into<String>, signature: HookSignature, function: F) -> Self
    where
        F: Fn(Value) -> Result<Value, HookError> + Send + Sync + 'static,
    {
        Self {
            type_name: type_name.into(),
            signature,
            function: Arc::new(function),
        }
    }
}

impl ConversionHook for FnHook {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn signature(&self) -> HookSignature {
        self.signature.clone()
    }

    fn invoke(&self, argument: Value) -> Result<Value, HookError> {
        (self.function)(argument)
    }
}

impl fmt::Debug for FnHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHook")
            .field("type_name", &self.type_name)
            .field("signature", &self.signature)
            .finish()
    }
}
