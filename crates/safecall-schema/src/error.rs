use std::fmt;

/// Which side of a call a schema guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaRole {
    Input,
    Output,
    Error,
}

impl SchemaRole {
    pub const ALL: [SchemaRole; 3] = [SchemaRole::Input, SchemaRole::Output, SchemaRole::Error];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaRole::Input => "input",
            SchemaRole::Output => "output",
            SchemaRole::Error => "error",
        }
    }

    /// File name used when the role is loaded from a schema directory.
    pub fn file_name(self) -> &'static str {
        match self {
            SchemaRole::Input => "input.schema.json",
            SchemaRole::Output => "output.schema.json",
            SchemaRole::Error => "error.schema.json",
        }
    }
}

impl fmt::Display for SchemaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while loading, compiling or checking schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema file could not be loaded.
    #[error("failed to load schema: {0}")]
    LoadFailed(String),

    /// The schema could not be compiled.
    #[error("failed to compile {role} schema: {message}")]
    CompileFailed { role: SchemaRole, message: String },

    /// The value failed schema validation.
    #[error("validation failed for {role}: {message}")]
    ValidationFailed { role: SchemaRole, message: String },

    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// The value matched the schema but not the bound Rust type.
    #[error("{role} does not fit its declared type: {source}")]
    Deserialize {
        role: SchemaRole,
        #[source]
        source: serde_json::Error,
    },

    /// A typed value could not be rendered as JSON for checking.
    #[error("{role} could not be serialized: {source}")]
    Serialize {
        role: SchemaRole,
        #[source]
        source: serde_json::Error,
    },

    /// A schema directory is missing one of the role files.
    #[error("no {0} schema found")]
    MissingSchema(SchemaRole),
}

impl SchemaError {
    /// True when the failure is about a checked value rather than the schema itself.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SchemaError::ValidationFailed { .. }
                | SchemaError::InvalidJson(_)
                | SchemaError::Deserialize { .. }
                | SchemaError::Serialize { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_and_files() {
        assert_eq!(SchemaRole::Input.to_string(), "input");
        assert_eq!(SchemaRole::Error.file_name(), "error.schema.json");
        assert_eq!(SchemaRole::ALL.len(), 3);
    }

    #[test]
    fn rejection_kinds() {
        let rejected = SchemaError::ValidationFailed {
            role: SchemaRole::Input,
            message: "bad".to_string(),
        };
        assert!(rejected.is_rejection());
        assert!(!SchemaError::MissingSchema(SchemaRole::Output).is_rejection());
        assert_eq!(
            rejected.to_string(),
            "validation failed for input: bad"
        );
    }
}
