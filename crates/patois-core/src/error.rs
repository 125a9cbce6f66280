//! Runtime error types shared by every dialect.

use thiserror::Error;

/// Evaluation error — user mistakes and impossible-case invariant checks.
///
/// None of these are fatal: the REPL reports the error on its diagnostic
/// stream and prompts again. Logic-search failure is not an error at all; it
/// travels as a plain `bool` through the resolution engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    /// A symbol with no binding anywhere in the environment chain.
    #[error("evaluation of unknown symbol: {0}")]
    UnboundSymbol(String),

    /// The head of an applied list did not resolve to a callable.
    #[error("evaluation of unknown function: {0}")]
    UnknownFunction(String),

    /// A callable was given the wrong number of arguments.
    #[error("{name} given {got} arguments, expected {expected}")]
    WrongArity {
        name: String,
        expected: String,
        got: usize,
    },

    /// A primitive was handed an operand of the wrong kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Integer division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// A special form whose argument list does not have the required shape.
    #[error("malformed {form}: {reason}")]
    MalformedForm { form: &'static str, reason: String },

    /// A state the design asserts cannot occur. Reported like a user error,
    /// but indicates a bug if ever seen.
    #[error("impossible: {0}")]
    Impossible(String),
}

impl EvalError {
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        EvalError::TypeMismatch(msg.into())
    }

    pub fn malformed(form: &'static str, reason: impl Into<String>) -> Self {
        EvalError::MalformedForm {
            form,
            reason: reason.into(),
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
