//! Converted setting values
//!
//! [`Value`] is what the conversion engine produces and what the literal
//! parser yields. Literal-only variants (`None` through `Map`) are the values
//! the literal grammar can spell; `Decimal` and `Custom` only come out of
//! conversion.
//!
//! `Display` renders a value in the same literal syntax the parser accepts,
//! so a rendered list, tuple, set or mapping re-parses to an equal value.

use rust_decimal::Decimal;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A typed setting value
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Decimal(Decimal),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Insertion-ordered, without duplicates
    Set(Vec<Value>),
    /// Insertion-ordered key/value pairs with unique keys
    Map(Vec<(Value, Value)>),
    Custom(CustomValue),
}

impl Value {
    /// Builds a set, dropping duplicate members while keeping first-seen order
    pub fn set_from(items: impl IntoIterator<Item = Value>) -> Self {
        let mut members: Vec<Value> = Vec::new();
        for item in items {
            if !members.contains(&item) {
                members.push(item);
            }
        }
        Value::Set(members)
    }

    /// Builds a mapping; a repeated key keeps its first position and its last value
    pub fn map_from(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let mut pairs: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            match pairs.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }
        Value::Map(pairs)
    }

    /// Short type name in the vocabulary used by type annotations
    pub fn type_name(&self) -> &str {
        match self {
            Value::None => "None",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Decimal(_) => "Decimal",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Set(_) => "set",
            Value::Map(_) => "dict",
            Value::Custom(custom) => custom.type_name(),
        }
    }

    /// Whether the value may be a set member or mapping key
    pub fn is_hashable(&self) -> bool {
        match self {
            Value::List(_) | Value::Set(_) | Value::Map(_) => false,
            Value::Tuple(items) => items.iter().all(Value::is_hashable),
            _ => true,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Text of the value without literal quoting: string contents for
    /// strings, the literal rendering for everything else
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Downcasts a custom value produced by a conversion hook
    pub fn downcast_custom<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(custom) => custom.downcast_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|member| b.contains(member))
            }
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| {
                        b.iter().any(|(other_key, other_value)| {
                            key == other_key && value == other_value
                        })
                    })
            }
            (Value::Custom(a), Value::Custom(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<CustomValue> for Value {
    fn from(custom: CustomValue) -> Self {
        Value::Custom(custom)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the fractional part ("3.0"), so floats stay floats when re-parsed
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Str(s) => write_quoted(f, s),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::List(items) => write_items(f, "[", items, "]"),
            Value::Tuple(items) if items.len() == 1 => write!(f, "({},)", items[0]),
            Value::Tuple(items) => write_items(f, "(", items, ")"),
            Value::Set(items) if items.is_empty() => f.write_str("set()"),
            Value::Set(items) => write_items(f, "{", items, "}"),
            Value::Map(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Custom(custom) => write!(f, "{custom}"),
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, open: &str, items: &[Value], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(close)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    write!(f, "{quote}")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => write!(f, "\\{c}")?,
            c if (c as u32) < 0x20 || c as u32 == 0x7f => write!(f, "\\x{:02x}", c as u32)?,
            c => write!(f, "{c}")?,
        }
    }
    write!(f, "{quote}")
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Str(s) => serializer.serialize_str(s),
            Value::Decimal(d) => serializer.serialize_str(&d.to_string()),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs {
                    map.serialize_entry(&key.to_plain_string(), value)?;
                }
                map.end()
            }
            Value::Custom(custom) => serializer.serialize_str(&custom.to_string()),
        }
    }
}

trait DynCustom: Any + Send + Sync + fmt::Debug {
    fn as_any(&self) -> &dyn Any;
    fn dyn_eq(&self, other: &dyn Any) -> bool;
}

impl<T> DynCustom for T
where
    T: Any + Send + Sync + fmt::Debug + PartialEq,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dyn_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// Opaque value produced by a conversion hook or a string constructor
///
/// The engine never looks inside; callers get the concrete type back with
/// [`CustomValue::downcast_ref`].
#[derive(Clone)]
pub struct CustomValue {
    type_name: Arc<str>,
    inner: Arc<dyn DynCustom>,
}

impl CustomValue {
    pub fn new<T>(type_name: impl Into<Arc<str>>, value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug + PartialEq,
    {
        Self {
            type_name: type_name.into(),
            inner: Arc::new(value),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.inner).as_any().downcast_ref::<T>()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && (*self.inner).dyn_eq((*other.inner).as_any())
    }
}

impl fmt::Debug for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CustomValue")
            .field(&self.type_name)
            .field(&self.inner)
            .finish()
    }
}

impl fmt::Display for CustomValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Port(u16);

    #[test]
    fn test_display_uses_literal_syntax() {
        let value = Value::map_from([
            (Value::from("a"), Value::from(vec![1_i64, 2])),
            (Value::from("b"), Value::Tuple(vec![Value::Float(3.0)])),
        ]);
        assert_eq!(value.to_string(), "{'a': [1, 2], 'b': (3.0,)}");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Set(vec![]).to_string(), "set()");
        assert_eq!(Value::from("it's").to_string(), "\"it's\"");
        assert_eq!(Value::from("a\nb").to_string(), "'a\\nb'");
    }

    #[test]
    fn test_set_equality_ignores_order() {
        let a = Value::set_from([Value::Int(1), Value::Int(2), Value::Int(1)]);
        let b = Value::set_from([Value::Int(2), Value::Int(1)]);
        assert_eq!(a, b);
        assert_eq!(a, Value::Set(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_map_last_value_wins() {
        let map = Value::map_from([
            (Value::from("k"), Value::Int(1)),
            (Value::from("k"), Value::Int(2)),
        ]);
        assert_eq!(map, Value::Map(vec![(Value::from("k"), Value::Int(2))]));
    }

    #[test]
    fn test_bool_is_not_int() {
        assert_ne!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_custom_value_downcast_and_eq() {
        let a = Value::Custom(CustomValue::new("Port", Port(80)));
        let b = Value::Custom(CustomValue::new("Port", Port(80)));
        let c = Value::Custom(CustomValue::new("Port", Port(81)));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.downcast_custom::<Port>(), Some(&Port(80)));
        assert_eq!(a.type_name(), "Port");
        assert_eq!(a.to_string(), "Port(80)");
    }

    #[test]
    fn test_hashable() {
        assert!(Value::Tuple(vec![Value::Int(1), Value::from("a")]).is_hashable());
        assert!(!Value::Tuple(vec![Value::List(vec![])]).is_hashable());
        assert!(!Value::Map(vec![]).is_hashable());
    }

    #[test]
    fn test_serialize_json() {
        let value = Value::map_from([
            (Value::Int(1), Value::Decimal(Decimal::new(314, 2))),
            (Value::from("list"), Value::set_from([Value::None])),
        ]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"1": "3.14", "list": [null]}));
    }
}
