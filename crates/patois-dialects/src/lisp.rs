//! The arithmetic/control-flow (lisp) dialect.
//!
//! Integer arithmetic and relations, list surgery, type predicates, and the
//! `if`/`while`/`set`/`begin` special forms, plus the `define` command shared
//! by every dialect. Truth is integer-valued: 0 is false, everything else is
//! true.

use patois_core::symbol_of;
use patois_core::{
    eval, list_to_vec, Arity, Closure, EvalError, EvalResult, Function, Handle, Interp, Value,
};

/// Install the lisp vocabulary into an interpreter.
pub fn install_lisp(interp: &Interp) {
    interp.add_command("define", define());

    interp.add_op("if", if_form());
    interp.add_op("while", while_form());
    interp.add_op("set", set_form());
    interp.add_op("begin", begin());

    interp.add_op("+", arith("+", |a, b| Ok(a.wrapping_add(b))));
    interp.add_op("-", arith("-", |a, b| Ok(a.wrapping_sub(b))));
    interp.add_op("*", arith("*", |a, b| Ok(a.wrapping_mul(b))));
    interp.add_op(
        "/",
        arith("/", |a, b| {
            if b == 0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(a / b)
            }
        }),
    );
    interp.add_op("=", equal());
    interp.add_op("<", relation("<", |a, b| a < b));
    interp.add_op(">", relation(">", |a, b| a > b));

    interp.add_op("print", print());
    interp.add_op("car", car());
    interp.add_op("cdr", cdr());
    interp.add_op("cons", cons());

    interp.add_op("number?", predicate("number?", |v| v.as_int().is_some()));
    interp.add_op("symbol?", predicate("symbol?", |v| v.symbol_name().is_some()));
    interp.add_op(
        "list?",
        // the empty list does not count as a list here
        predicate("list?", |v| matches!(&**v, Value::Pair(..))),
    );
    interp.add_op("null?", predicate("null?", |v| v.is_nil()));
    interp.add_op(
        "primop?",
        predicate("primop?", |v| {
            v.as_function().is_some_and(|f| !f.is_closure())
        }),
    );
    interp.add_op(
        "closure?",
        predicate("closure?", |v| v.as_function().is_some_and(Function::is_closure)),
    );
}

/// The dialect truth rule: integer 0 is false, everything else is true.
pub fn is_true(value: &Handle) -> bool {
    !matches!(&**value, Value::Int(0))
}

fn truth(b: bool) -> Handle {
    Value::int(i64::from(b))
}

/// Resolve a form's name operand: a direct symbol, or a logic value bound to
/// one (the logic dialect routes `define` and `set` through here too).
fn name_of(operand: &Handle) -> Option<String> {
    let sym = symbol_of(operand)?;
    sym.symbol_name().map(str::to_owned)
}

// ── Commands ─────────────────────────────────────────────────────────

/// `(define name (params...) body)` — installs a closure over the defining
/// environment and yields the name.
pub fn define() -> Function {
    Function::special("define", Arity::Exact(3), |args, _ops, env| {
        let name =
            name_of(&args[0]).ok_or_else(|| EvalError::malformed("define", "missing name"))?;
        let param_list = list_to_vec(&args[1])
            .ok_or_else(|| EvalError::malformed("define", "missing arg names"))?;
        let params = param_list
            .iter()
            .map(|p| name_of(p).ok_or_else(|| EvalError::malformed("define", "parameter names must be symbols")))
            .collect::<EvalResult<Vec<_>>>()?;

        let closure = Closure::new(params, args[2].clone(), env);
        env.add(name.clone(), Value::function(Function::Closure(closure)));
        Ok(Value::symbol(name))
    })
}

// ── Special forms ────────────────────────────────────────────────────

fn if_form() -> Function {
    Function::special("if", Arity::Exact(3), |args, ops, env| {
        let cond = eval(&args[0], ops, env)?;
        if is_true(&cond) {
            eval(&args[1], ops, env)
        } else {
            eval(&args[2], ops, env)
        }
    })
}

fn while_form() -> Function {
    Function::special("while", Arity::Exact(2), |args, ops, env| {
        let mut cond = eval(&args[0], ops, env)?;
        while is_true(&cond) {
            // the body's value is discarded
            eval(&args[1], ops, env)?;
            cond = eval(&args[0], ops, env)?;
        }
        Ok(cond)
    })
}

fn set_form() -> Function {
    Function::special("set", Arity::Exact(2), |args, ops, env| {
        let name = name_of(&args[0])
            .ok_or_else(|| EvalError::malformed("set", "first argument must be a symbol"))?;
        let value = eval(&args[1], ops, env)?;
        env.set(&name, value.clone());
        Ok(value)
    })
}

fn begin() -> Function {
    // arguments are evaluated left-to-right by the eager protocol; the last
    // one is the result
    Function::eager("begin", Arity::AtLeast(1), |args, _ops, _env| {
        Ok(args[args.len() - 1].clone())
    })
}

// ── Arithmetic and relations ─────────────────────────────────────────

fn int_operands(name: &str, args: &[Handle]) -> EvalResult<(i64, i64)> {
    match (args[0].as_int(), args[1].as_int()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(EvalError::type_mismatch(format!(
            "{name} applied to non-integer arguments"
        ))),
    }
}

fn arith(name: &'static str, f: fn(i64, i64) -> EvalResult<i64>) -> Function {
    Function::eager(name, Arity::Exact(2), move |args, _ops, _env| {
        let (a, b) = int_operands(name, args)?;
        Ok(Value::int(f(a, b)?))
    })
}

fn relation(name: &'static str, f: fn(i64, i64) -> bool) -> Function {
    Function::eager(name, Arity::Exact(2), move |args, _ops, _env| {
        let (a, b) = int_operands(name, args)?;
        Ok(truth(f(a, b)))
    })
}

/// Polymorphic `=`: equal integers, equal symbols, or two empty lists.
fn equal() -> Function {
    Function::eager("=", Arity::Exact(2), |args, _ops, _env| {
        let (a, b) = (&args[0], &args[1]);
        let eq = match (&**a, &**b) {
            (Value::Int(x), Value::Int(y)) => x == y,
            (Value::Symbol(x), Value::Symbol(y)) => x == y,
            (Value::Nil, Value::Nil) => true,
            _ => false,
        };
        Ok(truth(eq))
    })
}

// ── List surgery and printing ────────────────────────────────────────

fn print() -> Function {
    Function::eager("print", Arity::Exact(1), |args, _ops, _env| {
        println!("{}", args[0]);
        Ok(args[0].clone())
    })
}

fn car() -> Function {
    Function::eager("car", Arity::Exact(1), |args, _ops, _env| match &*args[0] {
        Value::Pair(head, _) => Ok(head.clone()),
        _ => Err(EvalError::type_mismatch("car applied to non list")),
    })
}

fn cdr() -> Function {
    Function::eager("cdr", Arity::Exact(1), |args, _ops, _env| match &*args[0] {
        Value::Pair(_, tail) => Ok(tail.clone()),
        _ => Err(EvalError::type_mismatch("cdr applied to non list")),
    })
}

fn cons() -> Function {
    Function::eager("cons", Arity::Exact(2), |args, _ops, _env| {
        Ok(Value::cons(args[0].clone(), args[1].clone()))
    })
}

fn predicate(name: &'static str, test: fn(&Handle) -> bool) -> Function {
    Function::eager(name, Arity::Exact(1), move |args, _ops, _env| {
        Ok(truth(test(&args[0])))
    })
}
