use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Maps a human-readable message to a value of the contract's error type.
///
/// This is the only way the contract creates new error values, so it must
/// always produce something the error schema accepts. Contracts check it with
/// their fixed messages at construction time.
pub struct ErrorConstructor<E> {
    build: Arc<dyn Fn(&str) -> E + Send + Sync>,
}

impl<E> ErrorConstructor<E> {
    pub fn new(build: impl Fn(&str) -> E + Send + Sync + 'static) -> Self {
        Self {
            build: Arc::new(build),
        }
    }

    /// Build an error value carrying `message`.
    pub fn build(&self, message: &str) -> E {
        (self.build)(message)
    }
}

impl ErrorConstructor<MessageError> {
    /// Constructor for the conventional `{ "message": string }` error shape.
    pub fn message() -> Self {
        Self::new(|message: &str| MessageError::new(message))
    }
}

impl ErrorConstructor<Value> {
    /// Constructor producing untyped `{ "message": string }` documents.
    pub fn json_message() -> Self {
        Self::new(|message| json!({ "message": message }))
    }
}

impl<E> Clone for ErrorConstructor<E> {
    fn clone(&self) -> Self {
        Self {
            build: Arc::clone(&self.build),
        }
    }
}

impl<E> fmt::Debug for ErrorConstructor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorConstructor")
            .field("error", &std::any::type_name::<E>())
            .finish_non_exhaustive()
    }
}

/// The conventional single-field error shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageError {
    pub message: String,
}

impl MessageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// JSON Schema describing [`MessageError`].
    pub fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" }
            },
            "required": ["message"]
        })
    }
}

impl fmt::Display for MessageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MessageError {}
