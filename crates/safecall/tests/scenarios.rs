use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use safecall::{
    handler_fn, Contract, Envelope, ErrorConstructor, HandlerFault, MessageError, Schema,
    SchemaRole, SchemaSet,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Serialize, Deserialize)]
struct Lookup {
    id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    id: i64,
    name: String,
}

fn lookup_contract(calls: Arc<AtomicUsize>) -> Contract<Lookup, Record, MessageError> {
    let input = Schema::compile(
        SchemaRole::Input,
        &json!({
            "type": "object",
            "properties": { "id": { "type": "number" } },
            "required": ["id"]
        }),
    )
    .expect("input schema should compile");
    let output = Schema::compile(SchemaRole::Output, &json!({ "type": "object" }))
        .expect("output schema should compile");

    Contract::with_message_errors(
        input,
        output,
        handler_fn(move |input: Lookup, errors: ErrorConstructor<MessageError>| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if input.id < 0 {
                    return Ok::<_, HandlerFault>(Envelope::fail(errors.build("Invalid ID")));
                }
                Ok(Envelope::ok(Record {
                    id: input.id,
                    name: "Test".to_string(),
                }))
            }
        }),
    )
    .expect("contract should build")
}

fn json_contract<F, Fut>(handler: F) -> Contract<Value, Value, Value>
where
    F: Fn(Value, ErrorConstructor<Value>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = safecall::HandlerResult<Value, Value>> + Send + 'static,
{
    let set = SchemaSet::new(json!(true), json!({ "type": "object" }), MessageError::schema());
    Contract::from_set(&set, ErrorConstructor::json_message(), handler_fn(handler))
        .expect("contract should build")
}

async fn run(contract: &Contract<Lookup, Record, MessageError>, raw: Value) -> Value {
    serde_json::to_value(contract.execute(raw).await).expect("result should serialize")
}

#[tokio::test]
async fn matching_input_yields_value() {
    let contract = lookup_contract(Arc::new(AtomicUsize::new(0)));
    assert_eq!(
        run(&contract, json!({ "id": 1 })).await,
        json!({ "value": { "id": 1, "name": "Test" }, "error": null })
    );
}

#[tokio::test]
async fn handler_declared_failure_yields_error() {
    let contract = lookup_contract(Arc::new(AtomicUsize::new(0)));
    assert_eq!(
        run(&contract, json!({ "id": -1 })).await,
        json!({ "value": null, "error": { "message": "Invalid ID" } })
    );
}

#[tokio::test]
async fn mistyped_input_short_circuits() {
    let calls = Arc::new(AtomicUsize::new(0));
    let contract = lookup_contract(Arc::clone(&calls));
    assert_eq!(
        run(&contract, json!({ "id": "not-a-number" })).await,
        json!({ "value": null, "error": { "message": "Invalid input" } })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn raised_error_yields_its_message() {
    let contract = json_contract(|_input, _errors| async move {
        Err::<Envelope<Value, Value>, HandlerFault>("boom".into())
    });
    let result = serde_json::to_value(contract.execute(json!({})).await).unwrap();
    assert_eq!(result, json!({ "value": null, "error": { "message": "boom" } }));
}

#[tokio::test]
async fn non_object_response_is_rejected() {
    let contract = json_contract(|_input, _errors| async move {
        Ok::<_, HandlerFault>(Envelope::ok(json!("not-an-object")))
    });
    let result = serde_json::to_value(contract.execute(json!({})).await).unwrap();
    assert_eq!(
        result,
        json!({
            "value": null,
            "error": { "message": "Execution returned an invalid response object" }
        })
    );
}

#[tokio::test]
async fn every_result_fills_exactly_one_slot() {
    let contract = json_contract(|input: Value, errors: ErrorConstructor<Value>| async move {
        match input.get("mode").and_then(Value::as_str) {
            Some("ok") => Ok(Envelope::ok(json!({ "done": true }))),
            Some("fail") => Ok(Envelope::fail(errors.build("declared"))),
            Some("bad-value") => Ok(Envelope::ok(json!([1, 2]))),
            Some("bad-error") => Ok(Envelope::fail(json!(42))),
            Some("empty") => Ok(Envelope::empty()),
            Some("panic") => panic!("handler exploded"),
            _ => Err::<Envelope<Value, Value>, HandlerFault>("unrecognized mode".into()),
        }
    });
    let errors_schema = contract.error_schema().clone();
    let output_schema = contract.output_schema().clone();

    for mode in ["ok", "fail", "bad-value", "bad-error", "empty", "panic", "other"] {
        let result = contract.execute(json!({ "mode": mode })).await;
        match (result.value(), result.error()) {
            (Some(value), None) => assert!(output_schema.is_valid(value), "mode {mode}"),
            (None, Some(error)) => assert!(errors_schema.is_valid(error), "mode {mode}"),
            _ => unreachable!("CallResult always fills one slot"),
        }
    }
}
