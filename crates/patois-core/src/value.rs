//! The runtime value model.
//!
//! Every datum an interpreter touches is a [`Value`] behind a shared
//! [`Handle`]. The enum is closed: each dialect works with the same kinds and
//! dispatches on them exhaustively instead of probing with cast methods.

use std::fmt;
use std::rc::Rc;

use crate::env::EnvRef;
use crate::function::Function;
use crate::logic::{symbol_of, Goal, LogicCell};

/// Shared-ownership reference to a runtime value.
///
/// A value's backing storage is released exactly when the last handle to it
/// is dropped; sharing a cell between two holders keeps it alive until both
/// are gone.
pub type Handle = Rc<Value>;

/// A runtime value.
///
/// Immutable once constructed, with two exceptions: the binding cell of a
/// [`Value::Var`] and environment frames (reached through [`Value::Env`] and
/// [`Value::Cluster`]), which are the interpreters' mutable binding slots.
pub enum Value {
    /// A machine integer.
    Int(i64),
    /// An interned-by-name symbol.
    Symbol(String),
    /// The distinguished empty list.
    Nil,
    /// A list cell.
    Pair(Handle, Handle),
    /// A quoted constant from the lisp reader; evaluates to its payload.
    Quoted(Handle),
    /// A callable: primitive operation, special form, or user closure.
    Function(Function),
    /// A first-class environment (clusters export theirs under this kind).
    Env(EnvRef),
    /// An abstract-data-type instance: an opaque environment of fields.
    Cluster(EnvRef),
    /// A logic variable: unbound, bound to a symbol, or bound to another
    /// variable.
    Var(LogicCell),
    /// A relation value produced by the logic dialect's goal builders.
    Goal(Goal),
}

impl Value {
    pub fn int(n: i64) -> Handle {
        Rc::new(Value::Int(n))
    }

    pub fn symbol(name: impl Into<String>) -> Handle {
        Rc::new(Value::Symbol(name.into()))
    }

    pub fn nil() -> Handle {
        Rc::new(Value::Nil)
    }

    pub fn cons(head: Handle, tail: Handle) -> Handle {
        Rc::new(Value::Pair(head, tail))
    }

    pub fn quoted(inner: Handle) -> Handle {
        Rc::new(Value::Quoted(inner))
    }

    pub fn function(f: Function) -> Handle {
        Rc::new(Value::Function(f))
    }

    pub fn env(e: EnvRef) -> Handle {
        Rc::new(Value::Env(e))
    }

    pub fn cluster(e: EnvRef) -> Handle {
        Rc::new(Value::Cluster(e))
    }

    /// A fresh unbound logic variable.
    pub fn unbound_var() -> Handle {
        Rc::new(Value::Var(LogicCell::unbound()))
    }

    /// A logic value directly bound to `inner` (the logic reader wraps every
    /// symbol it reads this way).
    pub fn bound_var(inner: Handle) -> Handle {
        Rc::new(Value::Var(LogicCell::bound_to(inner)))
    }

    pub fn goal(g: Goal) -> Handle {
        Rc::new(Value::Goal(g))
    }

    /// The symbol's name, for direct symbols only. Logic variables bound to a
    /// symbol are resolved by [`symbol_of`] instead.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            Value::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&LogicCell> {
        match self {
            Value::Var(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_goal(&self) -> Option<&Goal> {
        match self {
            Value::Goal(g) => Some(g),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// True for list values: a cell or the empty list.
    pub fn is_list(&self) -> bool {
        matches!(self, Value::Pair(..) | Value::Nil)
    }
}

/// Collect a proper list into a vector of element handles.
///
/// Returns `None` if the spine ends in anything other than the empty list;
/// the reader only produces proper lists, so callers treat that as malformed
/// input.
pub fn list_to_vec(list: &Handle) -> Option<Vec<Handle>> {
    let mut out = Vec::new();
    let mut cursor = list.clone();
    loop {
        let next = match &*cursor {
            Value::Nil => return Some(out),
            Value::Pair(head, tail) => {
                out.push(head.clone());
                tail.clone()
            }
            _ => return None,
        };
        cursor = next;
    }
}

/// Build a proper list from element handles.
pub fn vec_to_list(items: Vec<Handle>) -> Handle {
    let mut list = Value::nil();
    for item in items.into_iter().rev() {
        list = Value::cons(item, list);
    }
    list
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Symbol(name) => write!(f, "{name}"),
            Value::Nil => write!(f, "()"),
            Value::Pair(head, tail) => {
                write!(f, "({head}")?;
                let mut cursor = tail.clone();
                loop {
                    let next = match &*cursor {
                        Value::Nil => break,
                        Value::Pair(h, t) => {
                            write!(f, " {h}")?;
                            t.clone()
                        }
                        other => {
                            // improper tail, dotted rendering
                            write!(f, " . {other}")?;
                            break;
                        }
                    };
                    cursor = next;
                }
                write!(f, ")")
            }
            Value::Quoted(inner) => write!(f, "'{inner}"),
            Value::Function(_) => write!(f, "<closure>"),
            Value::Env(_) => write!(f, "<environment>"),
            Value::Cluster(_) => write!(f, "<userval>"),
            Value::Var(_) => match symbol_of_self(self) {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "unbound variable"),
            },
            Value::Goal(_) => write!(f, "<future>"),
        }
    }
}

/// Resolve a `Var` value's symbol name without a handle to it.
fn symbol_of_self(value: &Value) -> Option<String> {
    let cell = value.as_var()?;
    let inner = cell.get()?;
    let sym = symbol_of(&inner)?;
    sym.symbol_name().map(str::to_owned)
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Var(cell) if cell.get().is_none() => write!(f, "Var(unbound)"),
            other => write!(f, "{other}"),
        }
    }
}
