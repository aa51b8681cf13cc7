//! Type-directed conversion engine
//!
//! [`convert`] turns a setting's raw override into a [`Value`](crate::domain::Value)
//! of the type a [`TypeDescriptor`](crate::descriptor::TypeDescriptor)
//! describes, or a [`ConfigurationError`](crate::domain::ConfigurationError)
//! naming the setting, the offending text and the expected type.
//!
//! The engine holds no state and can be called from any number of threads
//! at once.

mod container;
mod convert;
mod primitive;

pub use convert::convert;
