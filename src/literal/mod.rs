//! Literal parser
//!
//! Turns override text into a [`Value`](crate::domain::Value) using a
//! restricted literal grammar: numbers, quoted strings, `True`/`False`/`None`
//! and arbitrarily nested lists `[...]`, tuples `(...)`, sets `{...}` and
//! mappings `{k: v}`. Anything outside that grammar is a [`LiteralError`].

pub mod parser;

pub use parser::{parse_literal, LiteralError, MAX_DEPTH};
