use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use safecall_schema::{Schema, SchemaRole, SchemaSet};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::envelope::{CallResult, Envelope};
use crate::error::{ContractError, Result};
use crate::errors::{ErrorConstructor, MessageError};
use crate::fault::Fault;
use crate::handler::Handler;
use crate::options::ExecuteOptions;

/// Message for input that fails the input schema.
pub const INVALID_INPUT: &str = "Invalid input";
/// Message for a handler response that fails the output schema.
pub const INVALID_RESPONSE: &str = "Execution returned an invalid response object";
/// Message for a handler error that fails the error schema.
pub const INVALID_ERROR: &str = "Execution returned an invalid error object";
/// Message for a fault that carries no usable message.
pub const UNKNOWN_ERROR: &str = "Unknown error";
/// Message for a handler that outlived its deadline.
pub const TIMED_OUT: &str = "Execution timed out";
/// Message for a call whose cancellation token fired.
pub const CANCELLED: &str = "Execution cancelled";

const FIXED_MESSAGES: [&str; 6] = [
    INVALID_INPUT,
    INVALID_RESPONSE,
    INVALID_ERROR,
    UNKNOWN_ERROR,
    TIMED_OUT,
    CANCELLED,
];

/// A handler bound between an input, a response and an error schema.
///
/// [`execute`](Self::execute) never panics and never returns `Err`: every
/// outcome is a [`CallResult`] whose populated side satisfies its schema.
/// Contracts hold only shared immutable state, so one instance can serve
/// any number of concurrent calls.
pub struct Contract<I, O, E> {
    input: Schema<I>,
    output: Schema<O>,
    error: Schema<E>,
    errors: ErrorConstructor<E>,
    unknown: E,
    handler: Arc<dyn Handler<I, O, E>>,
    defaults: ExecuteOptions,
}

impl<I, O, E> Contract<I, O, E>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + DeserializeOwned + Send + 'static,
    E: Serialize + Clone + Send + 'static,
{
    /// Bind a handler to its schemas.
    ///
    /// Fails if `errors` cannot produce a schema-conformant value for the
    /// contract's own failure messages.
    pub fn new<H>(
        input: Schema<I>,
        output: Schema<O>,
        error: Schema<E>,
        errors: ErrorConstructor<E>,
        handler: H,
    ) -> Result<Self>
    where
        H: Handler<I, O, E>,
    {
        for message in FIXED_MESSAGES {
            error
                .verify(&errors.build(message))
                .map_err(|source| ContractError::NonConformantErrors { message, source })?;
        }
        let unknown = errors.build(UNKNOWN_ERROR);

        Ok(Self {
            input,
            output,
            error,
            errors,
            unknown,
            handler: Arc::new(handler),
            defaults: ExecuteOptions::default(),
        })
    }

    /// Compile a [`SchemaSet`] and bind a handler to it.
    pub fn from_set<H>(set: &SchemaSet, errors: ErrorConstructor<E>, handler: H) -> Result<Self>
    where
        H: Handler<I, O, E>,
    {
        let (input, output, error) = set.compile::<I, O, E>()?;
        Self::new(input, output, error, errors, handler)
    }

    /// Options applied by [`execute`](Self::execute).
    pub fn with_default_options(mut self, options: ExecuteOptions) -> Self {
        self.defaults = options;
        self
    }

    pub fn input_schema(&self) -> &Schema<I> {
        &self.input
    }

    pub fn output_schema(&self) -> &Schema<O> {
        &self.output
    }

    pub fn error_schema(&self) -> &Schema<E> {
        &self.error
    }

    pub fn errors(&self) -> &ErrorConstructor<E> {
        &self.errors
    }

    /// Run one call with the contract's default options.
    pub async fn execute(&self, raw: Value) -> CallResult<O, E> {
        self.execute_with(raw, self.defaults.clone()).await
    }

    /// Run one call with explicit options.
    pub async fn execute_with(&self, raw: Value, options: ExecuteOptions) -> CallResult<O, E> {
        let checked = std::panic::catch_unwind(AssertUnwindSafe(|| self.input.check(&raw)));
        let input = match checked {
            Ok(Ok(input)) => input,
            Ok(Err(err)) => {
                tracing::debug!(error = %err, "input rejected; handler not invoked");
                return self.fail(INVALID_INPUT);
            }
            Err(payload) => {
                let fault = Fault::panicked(payload);
                tracing::error!(reason = fault.message(), "input decoding panicked");
                return self.fail(INVALID_INPUT);
            }
        };

        let settled = match self.run_handler(input, &options).await {
            // Rendering a value for validation runs user Serialize impls.
            Ok(envelope) => std::panic::catch_unwind(AssertUnwindSafe(|| self.settle(envelope)))
                .unwrap_or_else(|payload| Err(Fault::panicked(payload))),
            Err(fault) => Err(fault),
        };

        match settled {
            Ok(result) => result,
            Err(fault) => {
                match &fault {
                    Fault::Panicked(_) => {
                        tracing::error!(reason = fault.message(), "handler panicked");
                    }
                    Fault::Violation(_) => {
                        tracing::warn!(reason = fault.message(), "handler broke its contract");
                    }
                    _ => {
                        tracing::debug!(
                            kind = fault.kind(),
                            reason = fault.message(),
                            "call faulted"
                        );
                    }
                }
                self.fail(fault.message())
            }
        }
    }

    async fn run_handler(
        &self,
        input: I,
        options: &ExecuteOptions,
    ) -> std::result::Result<Envelope<O, E>, Fault> {
        let handler = Arc::clone(&self.handler);
        let errors = self.errors.clone();
        let pending =
            match std::panic::catch_unwind(AssertUnwindSafe(move || handler.call(input, errors))) {
                Ok(pending) => pending,
                Err(payload) => return Err(Fault::panicked(payload)),
            };

        let guarded = AssertUnwindSafe(pending)
            .catch_unwind()
            .map(|outcome| match outcome {
                Ok(Ok(envelope)) => Ok(envelope),
                Ok(Err(raised)) => Err(Fault::Raised(raised.to_string())),
                Err(payload) => Err(Fault::panicked(payload)),
            });

        let bounded = async {
            match options.deadline {
                Some(deadline) => tokio::time::timeout(deadline, guarded)
                    .await
                    .unwrap_or(Err(Fault::TimedOut)),
                None => guarded.await,
            }
        };

        let cancelled = async {
            match &options.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            outcome = bounded => outcome,
            () = cancelled => Err(Fault::Cancelled),
        }
    }

    fn settle(&self, envelope: Envelope<O, E>) -> std::result::Result<CallResult<O, E>, Fault> {
        match envelope {
            Envelope {
                error: Some(error), ..
            } => match self.error.verify(&error) {
                Ok(_) => Ok(CallResult::Error(error)),
                Err(err) => {
                    tracing::debug!(error = %err, "handler error failed the error schema");
                    Err(Fault::Violation(INVALID_ERROR))
                }
            },
            Envelope {
                value: Some(value),
                error: None,
            } => match self.output.verify(&value) {
                Ok(_) => Ok(CallResult::Value(value)),
                Err(err) => {
                    tracing::debug!(error = %err, "handler response failed the output schema");
                    Err(Fault::Violation(INVALID_RESPONSE))
                }
            },
            Envelope {
                value: None,
                error: None,
            } => match self.output.check(&Value::Null) {
                Ok(value) => Ok(CallResult::Value(value)),
                Err(err) => {
                    tracing::debug!(error = %err, "handler returned an empty envelope");
                    Err(Fault::Violation(INVALID_RESPONSE))
                }
            },
        }
    }

    fn fail(&self, message: &str) -> CallResult<O, E> {
        // The constructor and `E`'s Serialize impl are user code.
        let attempt = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let built = self.errors.build(message);
            self.error.verify(&built).map(|_| built)
        }));

        match attempt {
            Ok(Ok(built)) => CallResult::Error(built),
            Ok(Err(err)) => {
                tracing::warn!(
                    role = %SchemaRole::Error,
                    error = %err,
                    "error constructor output rejected; reporting unknown error"
                );
                CallResult::Error(self.unknown.clone())
            }
            Err(payload) => {
                let fault = Fault::panicked(payload);
                tracing::error!(
                    reason = fault.message(),
                    "error constructor panicked; reporting unknown error"
                );
                CallResult::Error(self.unknown.clone())
            }
        }
    }
}

impl<I, O> Contract<I, O, MessageError>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + DeserializeOwned + Send + 'static,
{
    /// Bind a handler using the conventional `{ "message": string }` error shape.
    pub fn with_message_errors<H>(input: Schema<I>, output: Schema<O>, handler: H) -> Result<Self>
    where
        H: Handler<I, O, MessageError>,
    {
        let error = Schema::compile(SchemaRole::Error, &MessageError::schema())?;
        Self::new(input, output, error, ErrorConstructor::message(), handler)
    }
}

impl<I, O, E: Clone> Clone for Contract<I, O, E> {
    fn clone(&self) -> Self {
        Self {
            input: self.input.clone(),
            output: self.output.clone(),
            error: self.error.clone(),
            errors: self.errors.clone(),
            unknown: self.unknown.clone(),
            handler: Arc::clone(&self.handler),
            defaults: self.defaults.clone(),
        }
    }
}

impl<I, O, E> fmt::Debug for Contract<I, O, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("input", &self.input)
            .field("output", &self.output)
            .field("error", &self.error)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
