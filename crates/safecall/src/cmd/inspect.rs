use safecall_schema::{SchemaConfig, SchemaSet};
use serde_json::Value;

use crate::cmd::InspectArgs;
use crate::exit::{schema_error, CliResult, SUCCESS};
use crate::output::{print_schema_set, OutputFormat};

pub fn run(args: InspectArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SchemaConfig {
        strict_mode: args.strict,
        ..SchemaConfig::default()
    };
    let set = SchemaSet::from_directory_with_config(&args.schemas, config)
        .map_err(|err| schema_error("schema load failed", err))?;

    // Compiling both validates the documents and applies strict-mode rewriting.
    let (input, output, error) = set
        .compile::<Value, Value, Value>()
        .map_err(|err| schema_error("schema compile failed", err))?;
    let compiled = SchemaSet::new(
        input.document().clone(),
        output.document().clone(),
        error.document().clone(),
    );

    print_schema_set(&compiled, format);
    Ok(SUCCESS)
}
