use thiserror::Error;

use crate::token::Token;

/// Configuration time errors.
///
/// Preparation failures signal a wiring mistake and are never raised while
/// delivering. Most malformed registrations (a zero-argument factory that
/// declares parameters, a factory with untyped parameters, a non-injection
/// where an injection is expected) are rejected by the type system before
/// this enum comes into play; the token shape check stays a runtime check.
#[derive(Error, Debug)]
pub enum PreparationError {
    /// Sequence injections can only be registered under list, tuple or set tokens.
    #[error("token '{token}' is not a list, tuple or set token, cannot prepare a sequence for it")]
    NotASequenceToken { token: Token },
}

/// Resolution time errors.
///
/// Failures inside user construction code are not represented here: factories
/// and constructors are infallible by signature and a panic inside one
/// propagates to the `deliver` caller unmodified.
#[derive(Error, Debug)]
pub enum DeliveryError {
    /// Strict delivery met a token with no registered injection.
    #[error("token '{token}' is not prepared, prepare it before delivering")]
    NotPrepared { token: Token },
    /// A required ingredient resolved to the absent value.
    #[error("token '{token}' delivered no value but a concrete one was required")]
    Absent { token: Token },
    /// A delivered value did not have the requested concrete type.
    #[error("failed to downcast delivered value, required '{required}' actual '{actual}'")]
    Downcast {
        required: &'static str,
        actual: &'static str,
    },
    /// An injection received a different number of resolved ingredients than
    /// it declared.
    #[error("injection received {actual} resolved ingredients, expected {expected}")]
    ArityMismatch { expected: usize, actual: usize },
    /// The dependency graph reachable from the delivered token cycles back on
    /// itself.
    #[error("dependency cycle detected: {}", format_chain(.chain))]
    Cycle { chain: Vec<Token> },
}

fn format_chain(chain: &[Token]) -> String {
    chain
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}
