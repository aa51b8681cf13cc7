//! Conversion entry point and dispatch
//!
//! Dispatch follows the descriptor kind: unions try each alternative in
//! order, custom types convert to the hook's parameter type and then call the
//! hook, primitives convert directly, containers go through the literal
//! parser.

use std::sync::Arc;

use crate::descriptor::{ConversionHook, TypeDescriptor};
use crate::domain::{ConfigurationError, HookContractReason, Value};

use super::container::convert_container;
use super::primitive::convert_primitive;

/// Converts the raw override of setting `name` to the type `descriptor` describes
///
/// # Errors
///
/// - [`ConfigurationError::TypeMismatch`] when `raw` cannot be converted to or
///   validated against `descriptor`
/// - [`ConfigurationError::HookContractViolation`] when a custom type's hook
///   does not take exactly one typed parameter
/// - [`ConfigurationError::InvalidDecimal`] when a `Decimal` cannot be built
///
/// # Examples
///
/// ```rust
/// use envcast::descriptor::{TypeDescriptor, TypeRegistry};
/// use envcast::domain::Value;
/// use envcast::engine::convert;
///
/// let registry = TypeRegistry::with_hook_name("from_setting");
/// let descriptor = TypeDescriptor::parse("int | str", &registry).unwrap();
///
/// assert_eq!(convert("LIMIT", "1", &descriptor).unwrap(), Value::Int(1));
/// assert_eq!(convert("LIMIT", "x", &descriptor).unwrap(), Value::from("x"));
/// ```
pub fn convert(name: &str, raw: &str, descriptor: &TypeDescriptor) -> Result<Value, ConfigurationError> {
    tracing::trace!(setting = name, expected = %descriptor, "Converting override");
    match descriptor {
        TypeDescriptor::Union(alternatives) => convert_union(name, raw, descriptor, alternatives),
        TypeDescriptor::Custom(hook) => convert_custom(name, raw, hook),
        TypeDescriptor::Primitive(kind) => convert_primitive(name, raw, kind),
        TypeDescriptor::Container(container) => convert_container(name, raw, container),
    }
}

fn convert_union(
    name: &str,
    raw: &str,
    union: &TypeDescriptor,
    alternatives: &[TypeDescriptor],
) -> Result<Value, ConfigurationError> {
    for alternative in alternatives {
        match convert(name, raw, alternative) {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::trace!(setting = name, alternative = %alternative, error = %err, "Union alternative rejected");
            }
        }
    }
    Err(ConfigurationError::type_mismatch(name, raw, union))
}

fn convert_custom(
    name: &str,
    raw: &str,
    hook: &Arc<dyn ConversionHook>,
) -> Result<Value, ConfigurationError> {
    let violation = |reason| ConfigurationError::HookContractViolation {
        name: name.to_string(),
        type_name: hook.type_name().to_string(),
        reason,
    };

    let signature = hook.signature();
    let [parameter] = signature.parameters.as_slice() else {
        return Err(violation(HookContractReason::ParameterCount));
    };
    let Some(parameter_type) = &parameter.annotation else {
        return Err(violation(HookContractReason::MissingTypeHint));
    };

    let argument = convert(name, raw, parameter_type)?;
    tracing::debug!(setting = name, type_name = hook.type_name(), "Invoking conversion hook");
    hook.invoke(argument).map_err(|err| {
        tracing::debug!(setting = name, type_name = hook.type_name(), error = %err, "Conversion hook rejected value");
        ConfigurationError::type_mismatch(name, raw, hook.type_name())
    })
}
