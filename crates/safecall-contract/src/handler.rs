use std::future::Future;

use futures_util::future::BoxFuture;

use crate::envelope::Envelope;
use crate::errors::ErrorConstructor;

/// An error raised by a handler instead of returning an envelope.
pub type HandlerFault = Box<dyn std::error::Error + Send + Sync>;

/// What a handler resolves to.
pub type HandlerResult<O, E> = Result<Envelope<O, E>, HandlerFault>;

/// Business logic wrapped by a [`Contract`](crate::Contract).
///
/// Receives an input that already passed the input schema, plus the error
/// constructor for building declared failures. Returning `Err` or panicking
/// is contained by the contract and reported as an error value.
pub trait Handler<I, O, E>: Send + Sync + 'static {
    fn call(
        &self,
        input: I,
        errors: ErrorConstructor<E>,
    ) -> BoxFuture<'static, HandlerResult<O, E>>;
}

/// Adapts an async closure into a [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap `f` as a [`Handler`].
pub fn handler_fn<I, O, E, F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(I, ErrorConstructor<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<O, E>> + Send + 'static,
{
    FnHandler { f }
}

impl<I, O, E, F, Fut> Handler<I, O, E> for FnHandler<F>
where
    F: Fn(I, ErrorConstructor<E>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult<O, E>> + Send + 'static,
{
    fn call(
        &self,
        input: I,
        errors: ErrorConstructor<E>,
    ) -> BoxFuture<'static, HandlerResult<O, E>> {
        Box::pin((self.f)(input, errors))
    }
}
