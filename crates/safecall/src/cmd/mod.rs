use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod check;
pub mod inspect;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an input through a pass-through contract built from a schema directory.
    Check(CheckArgs),
    /// Print the schemas loaded from a schema directory.
    Inspect(InspectArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Check(args) => check::run(args, format),
        Command::Inspect(args) => inspect::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory holding input.schema.json, output.schema.json and error.schema.json.
    #[arg(long, value_name = "DIR", env = "SAFECALL_SCHEMA_DIR")]
    pub schemas: PathBuf,
    /// JSON input.
    #[arg(long, conflicts_with_all = ["file", "field"])]
    pub json: Option<String>,
    /// Read JSON input from file.
    #[arg(long, conflicts_with_all = ["json", "field"])]
    pub file: Option<PathBuf>,
    /// Build an object input from KEY=VALUE pairs. Values are parsed as JSON when possible.
    #[arg(long, value_name = "KEY=VALUE", conflicts_with_all = ["json", "file"])]
    pub field: Vec<String>,
    /// Reject object properties the schemas do not declare.
    #[arg(long)]
    pub strict: bool,
    /// Give up on the call after this many milliseconds.
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Directory holding the role schema files.
    #[arg(long, value_name = "DIR", env = "SAFECALL_SCHEMA_DIR")]
    pub schemas: PathBuf,
    /// Show schemas after strict-mode rewriting.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
