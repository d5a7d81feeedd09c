//! Validated execution contracts: schema-checked async calls that never throw.
//!
//! Wrap any async operation between an input, a response and an error schema
//! and get back a [`Contract`] whose results are always shape-verified.
//!
//! # Crate Structure
//!
//! - [`schema`]: Typed JSON Schema validators and schema directories
//! - [`contract`]: The execution contract, handlers and error constructors
//! - [`http`]: Mapping call results onto HTTP replies

pub mod http;

/// Re-export schema types.
pub mod schema {
    pub use safecall_schema::*;
}

/// Re-export contract types.
pub mod contract {
    pub use safecall_contract::*;
}

pub use safecall_contract::{
    handler_fn, CallResult, Contract, ContractError, Envelope, ErrorConstructor, ExecuteOptions,
    Handler, HandlerFault, HandlerResult, MessageError,
};
pub use safecall_schema::{Schema, SchemaConfig, SchemaError, SchemaRole, SchemaSet};
