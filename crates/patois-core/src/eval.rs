//! The evaluator protocol: `eval` and `apply`.
//!
//! Every value kind knows how to evaluate itself given the pair of
//! environments threaded through each call: `ops`, holding the primitive and
//! command vocabulary of the active dialect, and `env`, the lexical
//! environment of the expression. No global state is consulted, so several
//! independent interpreters can coexist.

use std::collections::HashSet;
use std::rc::Rc;

use crate::env::{EnvRef, Environment};
use crate::error::{EvalError, EvalResult};
use crate::function::{ArgMode, Function};
use crate::logic::symbol_of;
use crate::value::{list_to_vec, Handle, Value};

/// Evaluate `expr` in `(ops, env)`.
pub fn eval(expr: &Handle, ops: &EnvRef, env: &EnvRef) -> EvalResult<Handle> {
    match &**expr {
        Value::Symbol(name) => env
            .lookup(name)
            .ok_or_else(|| EvalError::UnboundSymbol(name.clone())),
        Value::Quoted(inner) => Ok(inner.clone()),
        Value::Pair(head, tail) => eval_call(head, tail, ops, env),
        Value::Var(_) => eval_logic_value(expr, env),
        // Integers, the empty list, callables, environments, cluster
        // instances, and relation values evaluate to themselves.
        _ => Ok(expr.clone()),
    }
}

/// Evaluate a list form: resolve the head to a callable, then apply it to the
/// unevaluated tail.
///
/// A head that names a symbol (directly, or through a logic value bound to
/// one) is looked up in the ops environment first, so `if`, `+`, `query` and
/// friends are found without living in the lexical scope. Anything else —
/// including a symbol the ops environment does not know — is evaluated
/// normally, which is how user-defined functions are reached.
fn eval_call(head: &Handle, tail: &Handle, ops: &EnvRef, env: &EnvRef) -> EvalResult<Handle> {
    let mut callee = None;
    if let Some(sym) = symbol_of(head) {
        let name = sym.symbol_name().unwrap_or_default().to_owned();
        callee = ops.lookup(&name);
    }
    let callee = match callee {
        Some(found) => found,
        None => eval(head, ops, env)?,
    };
    match callee.as_function() {
        Some(f) => apply(f, tail, ops, env),
        None => Err(EvalError::UnknownFunction(callee.to_string())),
    }
}

/// Apply a callable to an argument list.
///
/// Eager callables have their arguments evaluated left-to-right in the
/// caller's environments after the arity check; special forms receive the raw
/// expressions.
pub fn apply(f: &Function, args: &Handle, ops: &EnvRef, env: &EnvRef) -> EvalResult<Handle> {
    let raw = list_to_vec(args)
        .ok_or_else(|| EvalError::type_mismatch("argument list is not a proper list"))?;
    match f {
        Function::Primitive(p) => {
            p.arity.check(p.name, raw.len())?;
            match p.mode {
                ArgMode::Special => (p.run)(&raw, ops, env),
                ArgMode::Eager => {
                    let argv = eval_args(&raw, ops, env)?;
                    (p.run)(&argv, ops, env)
                }
            }
        }
        Function::Closure(c) => {
            if c.params.len() != raw.len() {
                return Err(EvalError::WrongArity {
                    name: "<closure>".into(),
                    expected: c.params.len().to_string(),
                    got: raw.len(),
                });
            }
            let argv = eval_args(&raw, ops, env)?;
            let frame = Environment::child(&c.context);
            for (param, value) in c.params.iter().zip(argv) {
                frame.add(param.clone(), value);
            }
            eval(&c.body, ops, &frame)
        }
    }
}

fn eval_args(raw: &[Handle], ops: &EnvRef, env: &EnvRef) -> EvalResult<Vec<Handle>> {
    raw.iter().map(|arg| eval(arg, ops, env)).collect()
}

/// Evaluate a logic value (the logic dialect's symbol rule).
///
/// A logic value resolving to a known name yields that binding. An unknown
/// lowercase-initial name is an atom and yields the value itself. Any other
/// unknown name mints a fresh unbound variable and records it in the
/// innermost frame, so later mentions inside the same query resolve to the
/// same variable identity. A value with no resolvable symbol (an unbound or
/// indirect variable) evaluates to itself.
fn eval_logic_value(expr: &Handle, env: &EnvRef) -> EvalResult<Handle> {
    let Some(sym) = symbol_of(expr) else {
        return Ok(expr.clone());
    };
    let name = sym.symbol_name().unwrap_or_default().to_owned();
    if let Some(bound) = env.lookup(&name) {
        return Ok(bound);
    }
    if name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Ok(expr.clone());
    }
    let fresh = Value::unbound_var();
    env.add(name, fresh.clone());
    Ok(fresh)
}

/// One interpreter instance: the three environments every dialect shares.
///
/// `commands` chains to `ops`, so expression operators remain visible at the
/// top level; dialect installers populate both and add their globals to
/// `globals`.
pub struct Interp {
    /// Top-level user bindings.
    pub globals: EnvRef,
    /// Operations legal inside expressions.
    pub ops: EnvRef,
    /// Top-level statement forms (`define`, `cluster`, `query`, ...).
    pub commands: EnvRef,
}

impl Interp {
    pub fn new() -> Self {
        let globals = Environment::root();
        let ops = Environment::root();
        let commands = Environment::child(&ops);
        Interp {
            globals,
            ops,
            commands,
        }
    }

    /// Register a top-level command form.
    pub fn add_command(&self, name: &'static str, f: Function) {
        self.commands.add(name, Value::function(f));
    }

    /// Register an operation usable inside expressions.
    pub fn add_op(&self, name: &'static str, f: Function) {
        self.ops.add(name, Value::function(f));
    }

    /// Evaluate one top-level expression: commands (falling back to ops) as
    /// the operator vocabulary, globals as the lexical environment.
    pub fn eval_top(&self, expr: &Handle) -> EvalResult<Handle> {
        eval(expr, &self.commands, &self.globals)
    }
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

/// Closures capture the environment they are defined in, and `define` stores
/// them back into that same environment, so a session's binding graph is
/// cyclic. Dropping the interpreter empties every frame reachable from its
/// three roots, which breaks the cycles and lets the `Rc`s unwind.
impl Drop for Interp {
    fn drop(&mut self) {
        let mut visited = HashSet::new();
        release_env(&self.globals, &mut visited);
        release_env(&self.commands, &mut visited);
        release_env(&self.ops, &mut visited);
    }
}

fn release_env(env: &EnvRef, visited: &mut HashSet<*const Environment>) {
    if !visited.insert(Rc::as_ptr(env)) {
        return;
    }
    for (_, value) in env.take_frame() {
        release_value(&value, visited);
    }
    if let Some(parent) = env.parent() {
        release_env(parent, visited);
    }
}

fn release_value(value: &Handle, visited: &mut HashSet<*const Environment>) {
    match &**value {
        Value::Pair(head, tail) => {
            release_value(head, visited);
            release_value(tail, visited);
        }
        Value::Quoted(inner) => release_value(inner, visited),
        Value::Function(Function::Closure(c)) => release_env(&c.context, visited),
        Value::Env(e) | Value::Cluster(e) => release_env(e, visited),
        Value::Var(cell) => {
            if let Some(inner) = cell.get() {
                release_value(&inner, visited);
            }
        }
        _ => {}
    }
}
