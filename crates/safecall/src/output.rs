use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use safecall_contract::CallResult;
use safecall_schema::{SchemaRole, SchemaSet};
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct SchemaOutput<'a> {
    input: &'a Value,
    output: &'a Value,
    error: &'a Value,
}

pub fn print_call_result(result: &CallResult<Value, Value>, format: OutputFormat) {
    let (slot, payload) = match result {
        CallResult::Value(value) => ("value", value),
        CallResult::Error(error) => ("error", error),
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(result).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SLOT", "PAYLOAD"])
                .add_row(vec![slot.to_string(), payload.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!("{slot}:");
            println!(
                "{}",
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
            );
        }
        OutputFormat::Raw => println!("{payload}"),
    }
}

pub fn print_schema_set(set: &SchemaSet, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SchemaOutput {
                input: &set.input,
                output: &set.output,
                error: &set.error,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ROLE", "FILE", "TYPE", "REQUIRED"]);
            for role in SchemaRole::ALL {
                let document = set.document(role);
                table.add_row(vec![
                    role.to_string(),
                    role.file_name().to_string(),
                    type_summary(document),
                    required_summary(document),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for role in SchemaRole::ALL {
                let document = set.document(role);
                println!("{role} ({}):", role.file_name());
                println!(
                    "{}",
                    serde_json::to_string_pretty(document).unwrap_or_else(|_| document.to_string())
                );
            }
        }
        OutputFormat::Raw => {
            for role in SchemaRole::ALL {
                println!("{}", set.document(role));
            }
        }
    }
}

fn type_summary(document: &Value) -> String {
    match document {
        Value::Bool(true) => "any".to_string(),
        Value::Bool(false) => "nothing".to_string(),
        _ => match document.get("type") {
            Some(Value::String(kind)) => kind.clone(),
            Some(Value::Array(kinds)) => kinds
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("|"),
            _ => "-".to_string(),
        },
    }
}

fn required_summary(document: &Value) -> String {
    match document.get("required") {
        Some(Value::Array(fields)) if !fields.is_empty() => fields
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_summary_handles_common_shapes() {
        assert_eq!(type_summary(&json!({ "type": "object" })), "object");
        assert_eq!(type_summary(&json!({ "type": ["object", "null"] })), "object|null");
        assert_eq!(type_summary(&json!(true)), "any");
        assert_eq!(type_summary(&json!({})), "-");
    }

    #[test]
    fn required_summary_lists_fields() {
        assert_eq!(required_summary(&json!({ "required": ["id", "name"] })), "id, name");
        assert_eq!(required_summary(&json!({ "required": [] })), "-");
        assert_eq!(required_summary(&json!(true)), "-");
    }
}
