//! Typed JSON Schema validators for the boundary of a safe call.
//!
//! Every schema is compiled once against JSON Schema 2020-12 and bound to a
//! Rust type. A value that passes validation is deserialized into that type,
//! so downstream code can trust it without re-checking.

pub mod config;
pub mod error;
pub mod schema;
pub mod set;
pub mod validator;

pub use config::SchemaConfig;
pub use error::{Result, SchemaError, SchemaRole};
pub use schema::Schema;
pub use set::SchemaSet;
