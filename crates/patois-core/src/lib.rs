//! Patois runtime substrate.
//!
//! The shared core every dialect builds on: the closed [`Value`] model behind
//! shared [`Handle`]s, chained binding [`Environment`]s, the `eval`/`apply`
//! protocol, and the logic-programming resolution engine (unification plus
//! continuation-driven backtracking).

pub mod env;
pub mod error;
pub mod eval;
pub mod function;
pub mod logic;
pub mod value;

pub use env::{EnvRef, Environment};
pub use error::{EvalError, EvalResult};
pub use eval::{apply, eval, Interp};
pub use function::{ArgMode, Arity, Closure, Function};
pub use logic::{run, solve, symbol_of, unify, Goal, LogicCell, Unification};
pub use value::{list_to_vec, vec_to_list, Handle, Value};
