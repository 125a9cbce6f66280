//! The logic-programming dialect.
//!
//! `:=:`, `and`, `or` and `print` are goal builders: applying them constructs
//! a relation value without searching. `query` is where searching happens —
//! its argument is evaluated in a fresh frame (so each query gets its own
//! variables) and the resulting goal is driven against the terminal
//! continuation, answering `ok` or `not ok`.

use patois_core::env::Environment;
use patois_core::{eval, run, Arity, EvalError, Function, Goal, Interp, Value};

use crate::lisp::define;

/// Install the logic vocabulary into an interpreter.
pub fn install_logic(interp: &Interp) {
    interp.add_command("define", define());
    interp.add_command("query", query());

    interp.add_op("print", print_goal());
    interp.add_op(":=:", unify_goal());
    interp.add_op("and", and_goal());
    interp.add_op("or", or_goal());
}

fn unify_goal() -> Function {
    Function::eager(":=:", Arity::Exact(2), |args, _ops, _env| {
        Ok(Value::goal(Goal::Unify(args[0].clone(), args[1].clone())))
    })
}

fn print_goal() -> Function {
    Function::eager("print", Arity::Exact(1), |args, _ops, _env| {
        Ok(Value::goal(Goal::Print(args[0].clone())))
    })
}

fn and_goal() -> Function {
    Function::eager("and", Arity::Any, |args, _ops, _env| {
        Ok(Value::goal(Goal::Conj(args.to_vec())))
    })
}

fn or_goal() -> Function {
    Function::eager("or", Arity::Any, |args, _ops, _env| {
        Ok(Value::goal(Goal::Disj(args.to_vec())))
    })
}

fn query() -> Function {
    Function::special("query", Arity::Exact(1), |args, ops, env| {
        // A fresh frame isolates this query's variables from every other
        // query evaluated in the same session.
        let frame = Environment::child(env);
        let goal = eval(&args[0], ops, &frame)?;
        if goal.as_goal().is_none() {
            return Err(EvalError::type_mismatch("query given non-relation"));
        }
        if run(&goal) {
            Ok(Value::symbol("ok"))
        } else {
            Ok(Value::symbol("not ok"))
        }
    })
}
