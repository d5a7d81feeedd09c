//! Schema-checked execution contracts that never throw.
//!
//! A [`Contract`] wraps an async [`Handler`] between three schemas. Every
//! call validates its input, runs the handler inside a panic boundary, and
//! validates whatever comes back. The result is always a [`CallResult`] with
//! exactly one side populated, and the populated side always satisfies its
//! schema.

pub mod contract;
pub mod envelope;
pub mod error;
pub mod errors;
pub mod handler;
pub mod options;

mod fault;

pub use contract::{
    Contract, CANCELLED, INVALID_ERROR, INVALID_INPUT, INVALID_RESPONSE, TIMED_OUT, UNKNOWN_ERROR,
};
pub use envelope::{CallResult, Envelope};
pub use error::{ContractError, Result};
pub use errors::{ErrorConstructor, MessageError};
pub use handler::{handler_fn, FnHandler, Handler, HandlerFault, HandlerResult};
pub use options::ExecuteOptions;
pub use safecall_schema::{Schema, SchemaConfig, SchemaError, SchemaRole, SchemaSet};
