use std::io::Read;
use std::path::Path;

use serde_json::Value;

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError, SchemaRole};
use crate::schema::Schema;

/// The three schema documents that describe one call boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSet {
    pub input: Value,
    pub output: Value,
    pub error: Value,
    config: SchemaConfig,
}

impl SchemaSet {
    /// Build a set from already-parsed documents.
    pub fn new(input: Value, output: Value, error: Value) -> Self {
        Self {
            input,
            output,
            error,
            config: SchemaConfig::default(),
        }
    }

    /// Replace the config used when the set is compiled.
    pub fn with_config(mut self, config: SchemaConfig) -> Self {
        self.config = config;
        self
    }

    /// Load from embedded schema strings.
    pub fn from_embedded(input: &str, output: &str, error: &str) -> Result<Self> {
        let parse =
            |text: &str| serde_json::from_str::<Value>(text).map_err(SchemaError::InvalidJson);
        Ok(Self::new(parse(input)?, parse(output)?, parse(error)?))
    }

    /// Load `input.schema.json`, `output.schema.json` and `error.schema.json` from a directory.
    pub fn from_directory(path: &Path) -> Result<Self> {
        Self::from_directory_with_config(path, SchemaConfig::default())
    }

    /// Load the role files from a directory with explicit config.
    pub fn from_directory_with_config(path: &Path, config: SchemaConfig) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .map_err(|err| SchemaError::LoadFailed(format!("{}: {err}", path.display())))?;
        if !metadata.is_dir() {
            return Err(SchemaError::LoadFailed(format!(
                "{}: not a directory",
                path.display()
            )));
        }

        let input = load_role(path, SchemaRole::Input, &config)?;
        let output = load_role(path, SchemaRole::Output, &config)?;
        let error = load_role(path, SchemaRole::Error, &config)?;

        tracing::debug!(dir = %path.display(), "loaded schema set");
        Ok(Self {
            input,
            output,
            error,
            config,
        })
    }

    /// The document for one role.
    pub fn document(&self, role: SchemaRole) -> &Value {
        match role {
            SchemaRole::Input => &self.input,
            SchemaRole::Output => &self.output,
            SchemaRole::Error => &self.error,
        }
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Compile all three documents into typed schemas.
    pub fn compile<I, O, E>(&self) -> Result<(Schema<I>, Schema<O>, Schema<E>)> {
        Ok((
            Schema::compile_with_config(SchemaRole::Input, &self.input, self.config)?,
            Schema::compile_with_config(SchemaRole::Output, &self.output, self.config)?,
            Schema::compile_with_config(SchemaRole::Error, &self.error, self.config)?,
        ))
    }
}

fn load_role(dir: &Path, role: SchemaRole, config: &SchemaConfig) -> Result<Value> {
    let file_name = role.file_name();
    let entry_path = dir.join(file_name);

    let path_metadata = match std::fs::symlink_metadata(&entry_path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(SchemaError::MissingSchema(role));
        }
        Err(err) => return Err(SchemaError::LoadFailed(format!("{file_name}: {err}"))),
    };
    let file_type = path_metadata.file_type();
    if file_type.is_symlink() {
        return Err(SchemaError::LoadFailed(format!(
            "refusing to load schema symlink: {file_name}"
        )));
    }
    if !file_type.is_file() {
        return Err(SchemaError::LoadFailed(format!(
            "schema path is not a regular file: {file_name}"
        )));
    }

    let file = std::fs::File::open(&entry_path).map_err(|err| {
        SchemaError::LoadFailed(format!(
            "failed opening schema {}: {err}",
            entry_path.display()
        ))
    })?;
    let opened_metadata = file
        .metadata()
        .map_err(|err| SchemaError::LoadFailed(err.to_string()))?;

    #[cfg(unix)]
    {
        if !same_file_identity(&path_metadata, &opened_metadata) {
            return Err(SchemaError::LoadFailed(format!(
                "schema file changed during load: {file_name}"
            )));
        }
    }

    let max_bytes = config.max_schema_file_size;
    if opened_metadata.len() > max_bytes as u64 {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large ({} bytes): {file_name}",
            opened_metadata.len()
        )));
    }

    let read_limit = u64::try_from(max_bytes.saturating_add(1)).unwrap_or(u64::MAX);
    let mut content = String::new();
    file.take(read_limit)
        .read_to_string(&mut content)
        .map_err(|err| {
            SchemaError::LoadFailed(format!(
                "failed reading schema {}: {err}",
                entry_path.display()
            ))
        })?;
    if content.len() > max_bytes {
        return Err(SchemaError::LoadFailed(format!(
            "schema file too large while reading: {file_name}"
        )));
    }

    serde_json::from_str(&content)
        .map_err(|err| SchemaError::LoadFailed(format!("{file_name}: {err}")))
}

#[cfg(unix)]
fn same_file_identity(
    path_metadata: &std::fs::Metadata,
    opened_metadata: &std::fs::Metadata,
) -> bool {
    use std::os::unix::fs::MetadataExt;
    path_metadata.dev() == opened_metadata.dev() && path_metadata.ino() == opened_metadata.ino()
}
