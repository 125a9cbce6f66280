//! The cluster (abstract-data-type) dialect.
//!
//! `(cluster Name (rep f1 f2 ...) (define op (args) body) ...)` defines an
//! abstract type: a constructor named after the cluster, per-field selectors
//! and `set-<field>` modifiers visible only inside the cluster's private
//! environment, and each defined operation exported to the enclosing scope as
//! `Name$op`. Instances are opaque environment-backed records.

use patois_core::{
    eval, list_to_vec, Arity, EnvRef, EvalError, EvalResult, Function, Handle, Interp, Value,
};
use patois_core::env::Environment;

use crate::lisp::install_lisp;

/// Install the cluster dialect: the whole lisp vocabulary plus `cluster`.
pub fn install_clu(interp: &Interp) {
    install_lisp(interp);
    interp.add_command("cluster", cluster());
}

fn cluster_data(value: &Handle) -> Option<&EnvRef> {
    match &**value {
        Value::Cluster(data) => Some(data),
        _ => None,
    }
}

fn cluster() -> Function {
    Function::special("cluster", Arity::AtLeast(3), |args, ops, env| {
        let name = args[0]
            .symbol_name()
            .ok_or_else(|| EvalError::malformed("cluster", "missing name"))?
            .to_owned();

        // The private environment the cluster's operations run in; exported
        // so instances of mutually recursive operations stay reachable.
        let in_env = Environment::child(env);
        env.add(format!("{name}Env{name}"), Value::env(in_env.clone()));

        let fields = rep_fields(&args[1])?;
        in_env.add(name.clone(), Value::function(constructor(fields.clone())));
        for field in &fields {
            in_env.add(field.clone(), Value::function(selector(field.clone())));
            in_env.add(format!("set-{field}"), Value::function(modifier(field.clone())));
        }

        // The remaining arguments must be define forms; each is evaluated in
        // the private environment and its result exported as Name$op.
        for def in &args[2..] {
            let parts = list_to_vec(def)
                .ok_or_else(|| EvalError::malformed("cluster", "ill formed cluster body"))?;
            if parts.first().and_then(|p| p.symbol_name()) != Some("define") {
                return Err(EvalError::malformed("cluster", "missing define in cluster"));
            }
            let op_name = parts
                .get(1)
                .and_then(|p| p.symbol_name())
                .ok_or_else(|| EvalError::malformed("cluster", "missing name in define"))?
                .to_owned();

            eval(def, ops, &in_env)?;

            let defined = in_env.lookup(&op_name).ok_or_else(|| {
                EvalError::Impossible(format!("cluster define left no binding for {op_name}"))
            })?;
            env.add(format!("{name}${op_name}"), defined);
        }

        Ok(Value::symbol(name))
    })
}

/// Parse the `(rep f1 f2 ...)` representation list into field names.
fn rep_fields(rep: &Handle) -> EvalResult<Vec<String>> {
    let parts =
        list_to_vec(rep).ok_or_else(|| EvalError::malformed("cluster", "missing rep"))?;
    if parts.first().and_then(|p| p.symbol_name()) != Some("rep") {
        return Err(EvalError::malformed("cluster", "missing rep"));
    }
    parts[1..]
        .iter()
        .map(|p| {
            p.symbol_name()
                .map(str::to_owned)
                .ok_or_else(|| EvalError::malformed("cluster", "ill formed rep in cluster"))
        })
        .collect()
}

/// The constructor takes one argument per rep field and builds an instance.
fn constructor(fields: Vec<String>) -> Function {
    let arity = Arity::Exact(fields.len());
    Function::eager("constructor", arity, move |args, _ops, _env| {
        let data = Environment::root();
        for (field, value) in fields.iter().zip(args) {
            data.add(field.clone(), value.clone());
        }
        Ok(Value::cluster(data))
    })
}

fn selector(field: String) -> Function {
    Function::eager("selector", Arity::Exact(1), move |args, _ops, _env| {
        let data = cluster_data(&args[0])
            .ok_or_else(|| EvalError::type_mismatch("selector given non-cluster"))?;
        data.lookup(&field).ok_or_else(|| {
            EvalError::type_mismatch(format!("selector cannot find symbol: {field}"))
        })
    })
}

/// Modifiers mutate the instance in place and yield the stored value.
fn modifier(field: String) -> Function {
    Function::eager("modifier", Arity::Exact(2), move |args, _ops, _env| {
        let data = cluster_data(&args[0])
            .ok_or_else(|| EvalError::type_mismatch("modifier given non-cluster"))?;
        data.set(&field, args[1].clone());
        Ok(args[1].clone())
    })
}
