//! Callable values.
//!
//! The dialects' whole primitive vocabulary is expressed as one callable kind
//! carrying an arity and an argument-evaluation mode, instead of a hierarchy
//! of unary/binary/special function types. User `define`d functions are the
//! second variant.

use std::rc::Rc;

use crate::env::EnvRef;
use crate::error::{EvalError, EvalResult};
use crate::value::Handle;

/// Implementation of a primitive. Receives the argument vector (evaluated or
/// raw depending on [`ArgMode`]), the ops environment, and the lexical
/// environment of the call site.
pub type PrimImpl = Rc<dyn Fn(&[Handle], &EnvRef, &EnvRef) -> EvalResult<Handle>>;

/// How many arguments a primitive accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
    Any,
}

impl Arity {
    /// Check an argument count, before any argument is evaluated.
    pub fn check(&self, name: &str, got: usize) -> EvalResult<()> {
        let ok = match self {
            Arity::Exact(n) => got == *n,
            Arity::AtLeast(n) => got >= *n,
            Arity::Any => true,
        };
        if ok {
            Ok(())
        } else {
            Err(EvalError::WrongArity {
                name: name.to_string(),
                expected: match self {
                    Arity::Exact(n) => n.to_string(),
                    Arity::AtLeast(n) => format!("at least {n}"),
                    Arity::Any => unreachable!("Any accepts every count"),
                },
                got,
            })
        }
    }
}

/// Whether a callable sees evaluated arguments or raw expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgMode {
    /// Arguments are evaluated left-to-right before the call.
    Eager,
    /// Special form: the callable receives the unevaluated argument
    /// expressions and decides itself what to evaluate and when. `if` skips
    /// the untaken branch this way, and the logic connectives keep their goal
    /// arguments from searching eagerly.
    Special,
}

/// A built-in operation or special form.
#[derive(Clone)]
pub struct Primitive {
    pub name: &'static str,
    pub arity: Arity,
    pub mode: ArgMode,
    pub run: PrimImpl,
}

/// A user-defined function: parameter names, a body expression, and the
/// environment it was defined in.
///
/// The captured environment is held strongly, so a closure returned out of
/// its defining frame keeps that frame alive. `define` installs the closure
/// into the very environment it captures, which makes the pair a reference
/// cycle; `Interp` releases those cycles on teardown (see `eval`).
#[derive(Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Handle,
    pub context: EnvRef,
}

impl Closure {
    pub fn new(params: Vec<String>, body: Handle, context: &EnvRef) -> Self {
        Closure {
            params,
            body,
            context: context.clone(),
        }
    }
}

/// A callable value.
#[derive(Clone)]
pub enum Function {
    Primitive(Primitive),
    Closure(Closure),
}

impl Function {
    /// A primitive whose arguments are evaluated before the call.
    pub fn eager<F>(name: &'static str, arity: Arity, run: F) -> Function
    where
        F: Fn(&[Handle], &EnvRef, &EnvRef) -> EvalResult<Handle> + 'static,
    {
        Function::Primitive(Primitive {
            name,
            arity,
            mode: ArgMode::Eager,
            run: Rc::new(run),
        })
    }

    /// A special form: receives raw argument expressions.
    pub fn special<F>(name: &'static str, arity: Arity, run: F) -> Function
    where
        F: Fn(&[Handle], &EnvRef, &EnvRef) -> EvalResult<Handle> + 'static,
    {
        Function::Primitive(Primitive {
            name,
            arity,
            mode: ArgMode::Special,
            run: Rc::new(run),
        })
    }

    /// True only for user-defined closures, mirroring the `closure?`
    /// predicate.
    pub fn is_closure(&self) -> bool {
        matches!(self, Function::Closure(_))
    }
}
