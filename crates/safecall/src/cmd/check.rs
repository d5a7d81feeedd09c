use std::fs;
use std::time::Duration;

use safecall_contract::{
    handler_fn, CallResult, Contract, Envelope, ErrorConstructor, ExecuteOptions, HandlerFault,
    TIMED_OUT,
};
use safecall_schema::{SchemaConfig, SchemaSet};
use serde_json::{Map, Value};

use crate::cmd::CheckArgs;
use crate::exit::{
    contract_error, io_error, schema_error, CliError, CliResult, DATA_INVALID, SUCCESS, TIMEOUT,
    USAGE,
};
use crate::output::{print_call_result, OutputFormat};

pub fn run(args: CheckArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SchemaConfig {
        strict_mode: args.strict,
        ..SchemaConfig::default()
    };
    let set = SchemaSet::from_directory_with_config(&args.schemas, config)
        .map_err(|err| schema_error("schema load failed", err))?;
    let raw = resolve_input(&args)?;
    let options = execute_options(args.timeout_ms)?;

    // The validated input is echoed back, so the output schema must accept it too.
    let contract: Contract<Value, Value, Value> = Contract::from_set(
        &set,
        ErrorConstructor::json_message(),
        handler_fn(|input: Value, _errors| async move {
            Ok::<_, HandlerFault>(Envelope::ok(input))
        }),
    )
    .map_err(|err| contract_error("contract setup failed", err))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| io_error("runtime setup failed", err))?;
    let result = runtime.block_on(contract.execute_with(raw, options));

    tracing::info!(
        schemas = %args.schemas.display(),
        accepted = result.is_value(),
        "check finished"
    );
    print_call_result(&result, format);

    Ok(exit_code_for(&result))
}

fn execute_options(timeout_ms: Option<u64>) -> CliResult<ExecuteOptions> {
    match timeout_ms {
        None => Ok(ExecuteOptions::default()),
        Some(0) => Err(CliError::new(USAGE, "--timeout-ms must be greater than zero")),
        Some(ms) => Ok(ExecuteOptions::default().with_deadline(Duration::from_millis(ms))),
    }
}

fn exit_code_for(result: &CallResult<Value, Value>) -> i32 {
    match result {
        CallResult::Value(_) => SUCCESS,
        CallResult::Error(error) => match error.get("message").and_then(Value::as_str) {
            Some(TIMED_OUT) => TIMEOUT,
            _ => DATA_INVALID,
        },
    }
}

fn resolve_input(args: &CheckArgs) -> CliResult<Value> {
    if let Some(json) = &args.json {
        return serde_json::from_str(json)
            .map_err(|err| CliError::new(USAGE, format!("--json is not valid JSON: {err}")));
    }
    if let Some(path) = &args.file {
        let content = fs::read(path)
            .map_err(|err| io_error(&format!("failed reading {}", path.display()), err))?;
        return serde_json::from_slice(&content).map_err(|err| {
            CliError::new(
                USAGE,
                format!("{} is not valid JSON: {err}", path.display()),
            )
        });
    }
    if !args.field.is_empty() {
        return fields_to_object(&args.field);
    }
    Err(CliError::new(
        USAGE,
        "one of --json, --file or --field is required",
    ))
}

fn fields_to_object(fields: &[String]) -> CliResult<Value> {
    let mut object = Map::new();
    for field in fields {
        let (key, value) = parse_field(field)?;
        object.insert(key, value);
    }
    Ok(Value::Object(object))
}

fn parse_field(field: &str) -> CliResult<(String, Value)> {
    let (key, raw) = field
        .split_once('=')
        .ok_or_else(|| CliError::new(USAGE, format!("--field expects KEY=VALUE: {field}")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::new(USAGE, format!("--field has an empty key: {field}")));
    }

    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_field_prefers_json_values() {
        assert_eq!(parse_field("id=1").unwrap(), ("id".to_string(), json!(1)));
        assert_eq!(
            parse_field("tags=[\"a\"]").unwrap(),
            ("tags".to_string(), json!(["a"]))
        );
        assert_eq!(
            parse_field("name=Test").unwrap(),
            ("name".to_string(), json!("Test"))
        );
        assert_eq!(parse_field("empty=").unwrap(), ("empty".to_string(), json!("")));
    }

    #[test]
    fn parse_field_rejects_malformed_pairs() {
        assert_eq!(parse_field("novalue").unwrap_err().code, USAGE);
        assert_eq!(parse_field("=1").unwrap_err().code, USAGE);
    }

    #[test]
    fn timeout_flag_sets_a_deadline() {
        assert!(execute_options(None).unwrap().is_unbounded());
        assert_eq!(
            execute_options(Some(250)).unwrap().deadline,
            Some(Duration::from_millis(250))
        );
        assert_eq!(execute_options(Some(0)).unwrap_err().code, USAGE);
    }

    #[test]
    fn exit_code_separates_timeouts_from_rejections() {
        assert_eq!(exit_code_for(&CallResult::Value(json!({ "id": 1 }))), SUCCESS);
        assert_eq!(
            exit_code_for(&CallResult::Error(json!({ "message": TIMED_OUT }))),
            TIMEOUT
        );
        assert_eq!(
            exit_code_for(&CallResult::Error(json!({ "message": "Invalid input" }))),
            DATA_INVALID
        );
    }

    #[test]
    fn later_fields_override_earlier_ones() {
        let fields = vec!["id=1".to_string(), "id=2".to_string(), "ok=true".to_string()];
        assert_eq!(
            fields_to_object(&fields).unwrap(),
            json!({ "id": 2, "ok": true })
        );
    }
}
