//! Container conversion
//!
//! The override is parsed as a literal and its shape checked first; type
//! arguments, when declared, are validated afterwards against every element.
//! A shape failure names the bare container (`list`), an element failure the
//! parameterized one (`list[int]`).

use crate::descriptor::{ContainerType, PrimitiveKind, TypeDescriptor};
use crate::domain::{ConfigurationError, Value};
use crate::literal::parse_literal;

use super::convert::convert;

pub(crate) fn convert_container(
    name: &str,
    raw: &str,
    container: &ContainerType,
) -> Result<Value, ConfigurationError> {
    let shape = container.shape();
    let parsed = match parse_literal(raw) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(setting = name, error = %err, "Override is not a literal");
            return Err(ConfigurationError::type_mismatch(name, raw, shape));
        }
    };
    if !shape.matches(&parsed) {
        tracing::debug!(
            setting = name,
            expected = %shape,
            found = parsed.type_name(),
            "Literal has the wrong container shape"
        );
        return Err(ConfigurationError::type_mismatch(name, raw, shape));
    }
    if !container.is_parameterized() {
        return Ok(parsed);
    }
    validate_container(name, parsed, container)
        .ok_or_else(|| ConfigurationError::type_mismatch(name, raw, container))
}

/// Checks a parsed element against a descriptor, returning the element as it
/// should appear in the result
///
/// Scalars must already have the declared type. A `bool` counts as an `int`,
/// but an `int` is not a `float`. Custom element types run through the engine
/// with the element's text, and the hook result replaces the element.
fn validate_element(name: &str, value: Value, descriptor: &TypeDescriptor) -> Option<Value> {
    match descriptor {
        TypeDescriptor::Primitive(kind) => {
            let satisfied = matches!(
                (kind, &value),
                (PrimitiveKind::Bool, Value::Bool(_))
                    | (PrimitiveKind::Int, Value::Int(_) | Value::Bool(_))
                    | (PrimitiveKind::Float, Value::Float(_))
                    | (PrimitiveKind::Str, Value::Str(_))
                    | (PrimitiveKind::NoneSentinel, Value::None)
            );
            satisfied.then_some(value)
        }
        TypeDescriptor::Container(container) => {
            if !container.shape().matches(&value) {
                return None;
            }
            validate_container(name, value, container)
        }
        TypeDescriptor::Union(alternatives) => alternatives
            .iter()
            .find_map(|alternative| validate_element(name, value.clone(), alternative)),
        TypeDescriptor::Custom(_) => {
            let text = value.to_plain_string();
            convert(name, &text, descriptor).ok()
        }
    }
}

/// Validates the members of a container whose shape already matches
fn validate_container(name: &str, value: Value, container: &ContainerType) -> Option<Value> {
    match (container, value) {
        (ContainerType::List(Some(element)), Value::List(items)) => {
            validate_items(name, items, element).map(Value::List)
        }
        (ContainerType::Tuple(Some(element)), Value::Tuple(items)) => {
            validate_items(name, items, element).map(Value::Tuple)
        }
        (ContainerType::Set(Some(element)), Value::Set(items)) => {
            validate_items(name, items, element).map(Value::set_from)
        }
        (ContainerType::Map(Some((key_type, value_type))), Value::Map(pairs)) => {
            let mut validated = Vec::with_capacity(pairs.len());
            for (key, value) in pairs {
                let key = validate_element(name, key, key_type)?;
                let value = validate_element(name, value, value_type)?;
                validated.push((key, value));
            }
            Some(Value::map_from(validated))
        }
        (ContainerType::List(None), value @ Value::List(_))
        | (ContainerType::Tuple(None), value @ Value::Tuple(_))
        | (ContainerType::Set(None), value @ Value::Set(_))
        | (ContainerType::Map(None), value @ Value::Map(_)) => Some(value),
        _ => None,
    }
}

fn validate_items(name: &str, items: Vec<Value>, element: &TypeDescriptor) -> Option<Vec<Value>> {
    items
        .into_iter()
        .map(|item| validate_element(name, item, element))
        .collect()
}
