use std::any::Any;

use crate::contract::{CANCELLED, TIMED_OUT, UNKNOWN_ERROR};

/// Why a call failed after its input was accepted.
///
/// Every variant is absorbed by the contract and turned into an error value.
#[derive(Debug)]
pub(crate) enum Fault {
    /// The handler returned `Err`.
    Raised(String),
    /// The handler panicked, with the panic message when it was a string.
    Panicked(Option<String>),
    /// The handler returned a value its schema rejects.
    Violation(&'static str),
    TimedOut,
    Cancelled,
}

impl Fault {
    pub(crate) fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|text| (*text).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned());
        Fault::Panicked(message)
    }

    /// Message handed to the error constructor.
    pub(crate) fn message(&self) -> &str {
        let message = match self {
            Fault::Raised(message) => message.as_str(),
            Fault::Panicked(Some(message)) => message.as_str(),
            Fault::Panicked(None) => UNKNOWN_ERROR,
            Fault::Violation(message) => message,
            Fault::TimedOut => TIMED_OUT,
            Fault::Cancelled => CANCELLED,
        };
        if message.trim().is_empty() {
            UNKNOWN_ERROR
        } else {
            message
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Fault::Raised(_) => "raised",
            Fault::Panicked(_) => "panicked",
            Fault::Violation(_) => "violation",
            Fault::TimedOut => "timed_out",
            Fault::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_yield_messages() {
        let static_str: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(Fault::panicked(static_str).message(), "boom");

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(Fault::panicked(owned).message(), "owned boom");

        let opaque: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(Fault::panicked(opaque).message(), UNKNOWN_ERROR);
    }

    #[test]
    fn empty_messages_fall_back_to_unknown() {
        assert_eq!(Fault::Raised(String::new()).message(), UNKNOWN_ERROR);
        assert_eq!(Fault::Raised("  ".to_string()).message(), UNKNOWN_ERROR);
        assert_eq!(Fault::Raised("db down".to_string()).message(), "db down");
        assert_eq!(Fault::TimedOut.kind(), "timed_out");
    }
}
