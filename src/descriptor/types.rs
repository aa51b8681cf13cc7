//! Type descriptor model
//!
//! A [`TypeDescriptor`] is the data form of an expected type. It is built once
//! per setting, from an annotation or from the shape of the default value,
//! and the conversion engine dispatches on it.

use std::fmt;
use std::sync::Arc;

use super::hook::ConversionHook;
use super::registry::StrConstructor;
use crate::domain::Value;

/// Expected type of a setting
#[derive(Clone)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    Container(ContainerType),
    /// Ordered, non-empty; the first alternative that converts wins
    Union(Vec<TypeDescriptor>),
    Custom(Arc<dyn ConversionHook>),
}

/// Leaf types converted straight from the raw string
#[derive(Clone)]
pub enum PrimitiveKind {
    Bool,
    Int,
    Float,
    Str,
    Decimal,
    /// Declared or inferred "no type": the override text is kept verbatim
    NoneSentinel,
    /// Any registered type constructible from a single string
    Other(Arc<dyn StrConstructor>),
}

/// Container shape together with its optional type arguments
#[derive(Clone, PartialEq)]
pub enum ContainerType {
    List(Option<Box<TypeDescriptor>>),
    /// Homogeneous: every member is checked against the one element type
    Tuple(Option<Box<TypeDescriptor>>),
    Set(Option<Box<TypeDescriptor>>),
    Map(Option<(Box<TypeDescriptor>, Box<TypeDescriptor>)>),
}

/// Bare container shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerShape {
    List,
    Tuple,
    Set,
    Map,
}

impl ContainerShape {
    /// Name used in annotations and error messages
    pub fn name(self) -> &'static str {
        match self {
            ContainerShape::List => "list",
            ContainerShape::Tuple => "tuple",
            ContainerShape::Set => "set",
            ContainerShape::Map => "dict",
        }
    }

    /// Whether a parsed literal has this shape
    pub fn matches(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ContainerShape::List, Value::List(_))
                | (ContainerShape::Tuple, Value::Tuple(_))
                | (ContainerShape::Set, Value::Set(_))
                | (ContainerShape::Map, Value::Map(_))
        )
    }

    /// The container without type arguments
    pub fn untyped(self) -> ContainerType {
        match self {
            ContainerShape::List => ContainerType::List(None),
            ContainerShape::Tuple => ContainerType::Tuple(None),
            ContainerShape::Set => ContainerType::Set(None),
            ContainerShape::Map => ContainerType::Map(None),
        }
    }
}

impl fmt::Display for ContainerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ContainerType {
    pub fn shape(&self) -> ContainerShape {
        match self {
            ContainerType::List(_) => ContainerShape::List,
            ContainerType::Tuple(_) => ContainerShape::Tuple,
            ContainerType::Set(_) => ContainerShape::Set,
            ContainerType::Map(_) => ContainerShape::Map,
        }
    }

    pub fn is_parameterized(&self) -> bool {
        match self {
            ContainerType::List(element)
            | ContainerType::Tuple(element)
            | ContainerType::Set(element) => element.is_some(),
            ContainerType::Map(pair) => pair.is_some(),
        }
    }
}

impl TypeDescriptor {
    pub fn bool() -> Self {
        Self::Primitive(PrimitiveKind::Bool)
    }

    pub fn int() -> Self {
        Self::Primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Self::Primitive(PrimitiveKind::Float)
    }

    pub fn str() -> Self {
        Self::Primitive(PrimitiveKind::Str)
    }

    pub fn decimal() -> Self {
        Self::Primitive(PrimitiveKind::Decimal)
    }

    pub fn none() -> Self {
        Self::Primitive(PrimitiveKind::NoneSentinel)
    }

    pub fn list(element: Option<TypeDescriptor>) -> Self {
        Self::Container(ContainerType::List(element.map(Box::new)))
    }

    pub fn tuple(element: Option<TypeDescriptor>) -> Self {
        Self::Container(ContainerType::Tuple(element.map(Box::new)))
    }

    pub fn set(element: Option<TypeDescriptor>) -> Self {
        Self::Container(ContainerType::Set(element.map(Box::new)))
    }

    pub fn map(key_value: Option<(TypeDescriptor, TypeDescriptor)>) -> Self {
        Self::Container(ContainerType::Map(
            key_value.map(|(key, value)| (Box::new(key), Box::new(value))),
        ))
    }

    /// Union of `alternatives`, flattening nested unions and dropping repeats
    ///
    /// A single remaining alternative is returned on its own. Returns `None`
    /// for an empty list.
    pub fn union(alternatives: impl IntoIterator<Item = TypeDescriptor>) -> Option<Self> {
        let mut flat: Vec<TypeDescriptor> = Vec::new();
        for alternative in alternatives {
            let members = match alternative {
                TypeDescriptor::Union(inner) => inner,
                other => vec![other],
            };
            for member in members {
                if !flat.contains(&member) {
                    flat.push(member);
                }
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(TypeDescriptor::Union(flat)),
        }
    }

    pub fn custom(hook: Arc<dyn ConversionHook>) -> Self {
        Self::Custom(hook)
    }

    /// Descriptor synthesized from the runtime shape of a default value
    ///
    /// Containers come out unparameterized, so overrides of un-annotated
    /// container settings are only shape-checked.
    pub fn from_default(value: &Value) -> Self {
        match value {
            Value::None => Self::none(),
            Value::Bool(_) => Self::bool(),
            Value::Int(_) => Self::int(),
            Value::Float(_) => Self::float(),
            Value::Str(_) => Self::str(),
            Value::Decimal(_) => Self::decimal(),
            Value::List(_) => Self::list(None),
            Value::Tuple(_) => Self::tuple(None),
            Value::Set(_) => Self::set(None),
            Value::Map(_) => Self::map(None),
            Value::Custom(_) => Self::str(),
        }
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeDescriptor::Primitive(a), TypeDescriptor::Primitive(b)) => a == b,
            (TypeDescriptor::Container(a), TypeDescriptor::Container(b)) => a == b,
            (TypeDescriptor::Union(a), TypeDescriptor::Union(b)) => a == b,
            (TypeDescriptor::Custom(a), TypeDescriptor::Custom(b)) => a.type_name() == b.type_name(),
            _ => false,
        }
    }
}

impl PartialEq for PrimitiveKind {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PrimitiveKind::Other(a), PrimitiveKind::Other(b)) => a.type_name() == b.type_name(),
            (PrimitiveKind::Other(_), _) | (_, PrimitiveKind::Other(_)) => false,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveKind::Bool => f.write_str("bool"),
            PrimitiveKind::Int => f.write_str("int"),
            PrimitiveKind::Float => f.write_str("float"),
            PrimitiveKind::Str => f.write_str("str"),
            PrimitiveKind::Decimal => f.write_str("Decimal"),
            PrimitiveKind::NoneSentinel => f.write_str("None"),
            PrimitiveKind::Other(constructor) => f.write_str(constructor.type_name()),
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerType::List(Some(element)) => write!(f, "list[{element}]"),
            ContainerType::Tuple(Some(element)) => write!(f, "tuple[{element}, ...]"),
            ContainerType::Set(Some(element)) => write!(f, "set[{element}]"),
            ContainerType::Map(Some((key, value))) => write!(f, "dict[{key}, {value}]"),
            bare => f.write_str(bare.shape().name()),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{kind}"),
            TypeDescriptor::Container(container) => write!(f, "{container}"),
            TypeDescriptor::Union(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
            TypeDescriptor::Custom(hook) => f.write_str(hook.type_name()),
        }
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}

impl fmt::Debug for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveKind({self})")
    }
}

impl fmt::Debug for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContainerType({self})")
    }
}
