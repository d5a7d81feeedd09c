use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use jsonschema::Validator;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::SchemaConfig;
use crate::error::{Result, SchemaError, SchemaRole};
use crate::validator::{apply_strict_mode, validate_value};

/// A compiled JSON Schema bound to the Rust type `T` it describes.
///
/// Checking a raw value validates it against the schema first and only then
/// deserializes it, so a `T` obtained through [`Schema::check`] is known to
/// satisfy both the document and the type. Clones share the compiled
/// validator.
pub struct Schema<T> {
    inner: Arc<Compiled>,
    _type: PhantomData<fn() -> T>,
}

struct Compiled {
    role: SchemaRole,
    document: Value,
    validator: Validator,
    config: SchemaConfig,
}

impl<T> Schema<T> {
    /// Compile a schema document with default config.
    pub fn compile(role: SchemaRole, document: &Value) -> Result<Self> {
        Self::compile_with_config(role, document, SchemaConfig::default())
    }

    /// Compile a schema document with explicit config.
    pub fn compile_with_config(
        role: SchemaRole,
        document: &Value,
        config: SchemaConfig,
    ) -> Result<Self> {
        let mut document = document.clone();
        if config.strict_mode {
            apply_strict_mode(&mut document);
        }

        let validator =
            jsonschema::validator_for(&document).map_err(|err| SchemaError::CompileFailed {
                role,
                message: err.to_string(),
            })?;

        Ok(Self {
            inner: Arc::new(Compiled {
                role,
                document,
                validator,
                config,
            }),
            _type: PhantomData,
        })
    }

    /// Compile a schema from a JSON string.
    pub fn from_json(role: SchemaRole, schema_json: &str) -> Result<Self> {
        Self::from_json_with_config(role, schema_json, SchemaConfig::default())
    }

    /// Compile a schema from a JSON string with explicit config.
    pub fn from_json_with_config(
        role: SchemaRole,
        schema_json: &str,
        config: SchemaConfig,
    ) -> Result<Self> {
        let document: Value =
            serde_json::from_str(schema_json).map_err(SchemaError::InvalidJson)?;
        Self::compile_with_config(role, &document, config)
    }

    /// A schema that accepts every document; only the Rust type constrains values.
    pub fn any(role: SchemaRole) -> Result<Self> {
        Self::compile(role, &Value::Bool(true))
    }

    /// Validate a raw document without producing a typed value.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let result = validate_value(
            self.inner.role,
            value,
            &self.inner.validator,
            self.inner.config.max_reported_errors,
        );
        if let Err(err) = &result {
            tracing::debug!(role = %self.inner.role, error = %err, "schema rejected value");
        }
        result
    }

    /// Check whether a raw document satisfies the schema.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.inner.validator.is_valid(value)
    }

    /// The compiled document, after strict-mode rewriting if enabled.
    pub fn document(&self) -> &Value {
        &self.inner.document
    }

    pub fn role(&self) -> SchemaRole {
        self.inner.role
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.inner.config
    }
}

impl<T: DeserializeOwned> Schema<T> {
    /// Validate a raw document and return the typed value on pass.
    pub fn check(&self, value: &Value) -> Result<T> {
        self.validate(value)?;
        serde_json::from_value(value.clone()).map_err(|source| SchemaError::Deserialize {
            role: self.inner.role,
            source,
        })
    }

    /// Parse a JSON payload, then [`check`](Self::check) it.
    pub fn check_bytes(&self, payload: &[u8]) -> Result<T> {
        let value: Value = serde_json::from_slice(payload).map_err(SchemaError::InvalidJson)?;
        self.check(&value)
    }
}

impl<T: Serialize> Schema<T> {
    /// Render a typed value as JSON and validate the rendered document.
    pub fn verify(&self, value: &T) -> Result<Value> {
        let rendered = serde_json::to_value(value).map_err(|source| SchemaError::Serialize {
            role: self.inner.role,
            source,
        })?;
        self.validate(&rendered)?;
        Ok(rendered)
    }
}

impl<T> Clone for Schema<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _type: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("role", &self.inner.role)
            .field("type", &std::any::type_name::<T>())
            .field("document", &self.inner.document)
            .finish()
    }
}

impl<T> Serialize for Schema<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.document.serialize(serializer)
    }
}
