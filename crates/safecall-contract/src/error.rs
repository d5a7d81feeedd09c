use safecall_schema::SchemaError;

/// Errors that can occur while constructing a contract.
///
/// Once a contract exists, calling it never fails; every failure is reported
/// through [`CallResult::Error`](crate::CallResult::Error).
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// One of the schemas could not be loaded or compiled.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The error constructor produced a value its own schema rejects.
    #[error("error constructor output for {message:?} violates the error schema: {source}")]
    NonConformantErrors {
        message: &'static str,
        #[source]
        source: SchemaError,
    },
}

pub type Result<T> = std::result::Result<T, ContractError>;
