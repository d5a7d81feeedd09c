use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// The raw two-slot value a handler returns.
///
/// By convention exactly one slot is set. The contract does not enforce that
/// on the handler: a set `error` always wins, and an envelope with neither
/// slot set is checked as a `null` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<O, E> {
    pub value: Option<O>,
    pub error: Option<E>,
}

impl<O, E> Envelope<O, E> {
    pub fn ok(value: O) -> Self {
        Self {
            value: Some(value),
            error: None,
        }
    }

    pub fn fail(error: E) -> Self {
        Self {
            value: None,
            error: Some(error),
        }
    }

    pub fn empty() -> Self {
        Self {
            value: None,
            error: None,
        }
    }
}

impl<O, E> From<Result<O, E>> for Envelope<O, E> {
    fn from(result: Result<O, E>) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(error) => Self::fail(error),
        }
    }
}

/// The resolved outcome of a contract call.
///
/// Serializes as `{ "value": ..., "error": null }` or
/// `{ "value": null, "error": ... }`.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult<O, E> {
    Value(O),
    Error(E),
}

impl<O, E> CallResult<O, E> {
    pub fn value(&self) -> Option<&O> {
        match self {
            CallResult::Value(value) => Some(value),
            CallResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            CallResult::Value(_) => None,
            CallResult::Error(error) => Some(error),
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, CallResult::Value(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CallResult::Error(_))
    }

    pub fn into_result(self) -> Result<O, E> {
        match self {
            CallResult::Value(value) => Ok(value),
            CallResult::Error(error) => Err(error),
        }
    }

    pub fn into_envelope(self) -> Envelope<O, E> {
        self.into_result().into()
    }
}

impl<O: Serialize, E: Serialize> Serialize for CallResult<O, E> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("CallResult", 2)?;
        match self {
            CallResult::Value(value) => {
                state.serialize_field("value", value)?;
                state.serialize_field("error", &None::<()>)?;
            }
            CallResult::Error(error) => {
                state.serialize_field("value", &None::<()>)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
