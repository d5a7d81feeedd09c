use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use safecall_contract::{CallResult, Contract};

pub const OK: u16 = 200;
pub const CREATED: u16 = 201;
pub const BAD_REQUEST: u16 = 400;
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Message returned when a request body is not JSON.
pub const MALFORMED_BODY: &str = "Malformed JSON body";

/// Status and JSON body a route handler should send back.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Value,
}

impl HttpReply {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Map a call result onto a reply: errors become 400, values use `success_status`.
pub fn reply_for<O, E>(result: &CallResult<O, E>, success_status: u16) -> HttpReply
where
    O: Serialize,
    E: Serialize,
{
    let (status, rendered) = match result {
        CallResult::Value(value) => (success_status, serde_json::to_value(value)),
        CallResult::Error(error) => (BAD_REQUEST, serde_json::to_value(error)),
    };

    match rendered {
        Ok(body) => HttpReply::new(status, body),
        Err(err) => {
            tracing::error!(error = %err, "call result could not be rendered");
            HttpReply::new(
                INTERNAL_SERVER_ERROR,
                json!({ "message": "response could not be rendered" }),
            )
        }
    }
}

/// Parse a raw request body, run the contract, and map the result.
///
/// A body that is not JSON is answered with 400 before the contract runs.
pub async fn reply_for_body<I, O, E>(
    contract: &Contract<I, O, E>,
    body: &[u8],
    success_status: u16,
) -> HttpReply
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + DeserializeOwned + Send + 'static,
    E: Serialize + Clone + Send + 'static,
{
    let raw: Value = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::debug!(error = %err, "request body is not JSON");
            return HttpReply::new(BAD_REQUEST, json!({ "message": MALFORMED_BODY }));
        }
    };

    let result = contract.execute(raw).await;
    reply_for(&result, success_status)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use safecall_contract::{handler_fn, Envelope, HandlerFault, MessageError};
    use safecall_schema::{Schema, SchemaRole};

    use super::*;

    fn echo_contract(calls: Arc<AtomicUsize>) -> Contract<Value, Value, MessageError> {
        Contract::with_message_errors(
            Schema::compile(
                SchemaRole::Input,
                &json!({
                    "type": "object",
                    "properties": { "name": { "type": "string" } },
                    "required": ["name"]
                }),
            )
            .unwrap(),
            Schema::compile(SchemaRole::Output, &json!({ "type": "object" })).unwrap(),
            handler_fn(move |input: Value, _errors| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, HandlerFault>(Envelope::ok(json!({ "created": input }))) }
            }),
        )
        .unwrap()
    }

    #[test]
    fn value_maps_to_success_status() {
        let result: CallResult<Value, MessageError> = CallResult::Value(json!({ "id": 1 }));
        let reply = reply_for(&result, CREATED);
        assert_eq!(reply, HttpReply::new(CREATED, json!({ "id": 1 })));
        assert!(reply.is_success());
    }

    #[test]
    fn error_maps_to_bad_request() {
        let result: CallResult<Value, MessageError> =
            CallResult::Error(MessageError::new("Invalid input"));
        let reply = reply_for(&result, OK);
        assert_eq!(reply.status, BAD_REQUEST);
        assert_eq!(reply.body, json!({ "message": "Invalid input" }));
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn body_flows_through_contract() {
        let calls = Arc::new(AtomicUsize::new(0));
        let contract = echo_contract(Arc::clone(&calls));

        let reply = reply_for_body(&contract, br#"{"name":"widget"}"#, CREATED).await;
        assert_eq!(reply.status, CREATED);
        assert_eq!(reply.body, json!({ "created": { "name": "widget" } }));

        let reply = reply_for_body(&contract, br#"{"name":5}"#, CREATED).await;
        assert_eq!(reply.status, BAD_REQUEST);
        assert_eq!(reply.body, json!({ "message": "Invalid input" }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn malformed_body_never_reaches_contract() {
        let calls = Arc::new(AtomicUsize::new(0));
        let contract = echo_contract(Arc::clone(&calls));

        let reply = reply_for_body(&contract, b"{not json", CREATED).await;
        assert_eq!(reply.status, BAD_REQUEST);
        assert_eq!(reply.body, json!({ "message": MALFORMED_BODY }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
