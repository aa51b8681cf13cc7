//! Type descriptors
//!
//! The closed grammar of expected types the conversion engine understands:
//! primitives, containers (optionally parameterized), ordered unions and
//! custom-converting types. Descriptors are built once per setting, either by
//! parsing an annotation ([`TypeDescriptor::parse`]) or from the shape of the
//! default value ([`TypeDescriptor::from_default`]).
//!
//! # Example
//!
//! ```rust
//! use envcast::descriptor::{TypeDescriptor, TypeRegistry};
//!
//! let registry = TypeRegistry::with_hook_name("from_setting");
//! let descriptor = TypeDescriptor::parse("Optional[dict[str, int]]", &registry).unwrap();
//! assert_eq!(descriptor.to_string(), "dict[str, int] | None");
//! ```

pub mod expr;
pub mod hook;
pub mod registry;
pub mod types;

pub use expr::TypeExprError;
pub use hook::{ConversionHook, FnHook, FromSetting, HookError, HookParameter, HookSignature, TypedHook};
pub use registry::{FromStrConstructor, StrConstructor, TypeRegistry, DEFAULT_HOOK_NAME, HOOK_NAME_ENV};
pub use types::{ContainerShape, ContainerType, PrimitiveKind, TypeDescriptor};
