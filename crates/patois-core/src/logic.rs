//! The logic-programming resolution engine.
//!
//! Two pieces: unification over mutable logic variables, and a backtracking
//! search driver over composable goals. Goal construction and search are
//! separate steps — the dialect's `and`/`or`/`:=:`/`print` operations only
//! build [`Goal`] values; [`solve`] does the searching, using the native call
//! stack as the choice-point stack. Failure unwinds by ordinary returns, and
//! every binding made on a failing branch is undone before control passes the
//! unification that made it.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, warn};

use crate::value::{Handle, Value};

// ─────────────────────────────────────────────────────────────────────
// Logic variables
// ─────────────────────────────────────────────────────────────────────

/// The mutable binding cell of a logic variable.
///
/// Unbound, bound directly to a symbol, or bound to another variable (an
/// indirection chain, never compressed). Only [`unify`] binds a cell and only
/// the failing search path clears one; a cell is never re-bound while bound.
pub struct LogicCell {
    binding: RefCell<Option<Handle>>,
}

impl LogicCell {
    pub fn unbound() -> Self {
        LogicCell {
            binding: RefCell::new(None),
        }
    }

    pub fn bound_to(inner: Handle) -> Self {
        LogicCell {
            binding: RefCell::new(Some(inner)),
        }
    }

    pub fn get(&self) -> Option<Handle> {
        self.binding.borrow().clone()
    }

    pub fn is_unbound(&self) -> bool {
        self.binding.borrow().is_none()
    }

    fn bind(&self, inner: Handle) {
        *self.binding.borrow_mut() = Some(inner);
    }

    fn clear(&self) {
        *self.binding.borrow_mut() = None;
    }
}

/// Resolve a value to the symbol behind it, walking variable indirection
/// chains. Direct symbols resolve to themselves; unbound variables and
/// non-symbolic values resolve to nothing.
pub fn symbol_of(value: &Handle) -> Option<Handle> {
    match &**value {
        Value::Symbol(_) => Some(value.clone()),
        Value::Var(cell) => {
            let inner = cell.get()?;
            symbol_of(&inner)
        }
        _ => None,
    }
}

/// If `value` is a variable bound to another variable, that variable.
fn indirect(value: &Handle) -> Option<Handle> {
    let cell = value.as_var()?;
    let inner = cell.get()?;
    match &*inner {
        Value::Var(_) => Some(inner),
        _ => None,
    }
}

// ─────────────────────────────────────────────────────────────────────
// Unification
// ─────────────────────────────────────────────────────────────────────

/// Outcome of one unification.
pub enum Unification {
    /// The sides were made equal by binding this variable. The caller must
    /// unbind it if the rest of the search fails.
    Bound(Handle),
    /// The sides were already equal symbols; nothing to undo.
    Matched,
    Failed,
}

/// Unify two logic values.
///
/// The same variable unifies with itself without binding. If either side is
/// bound to another variable, dereference one level and retry — binding only
/// ever targets a fully dereferenced side, which is what keeps indirection
/// chains acyclic. Then if either side is unbound, bind it to the other (the
/// left side when both are) and succeed, reporting the binding for later
/// undo; at most one binding is made per call. Otherwise both sides must
/// resolve to symbols and unification succeeds exactly when the names are
/// equal.
pub fn unify(a: &Handle, b: &Handle) -> Unification {
    let (Some(cell_a), Some(cell_b)) = (a.as_var(), b.as_var()) else {
        error!("impossible: unification over non-logic operands");
        return Unification::Failed;
    };

    if Rc::ptr_eq(a, b) {
        return Unification::Matched;
    }

    if let Some(next) = indirect(a) {
        return unify(&next, b);
    }
    if let Some(next) = indirect(b) {
        return unify(a, &next);
    }

    if cell_a.is_unbound() {
        cell_a.bind(b.clone());
        return Unification::Bound(a.clone());
    }
    if cell_b.is_unbound() {
        cell_b.bind(a.clone());
        return Unification::Bound(b.clone());
    }

    // Both sides are now directly bound; they must hold symbols.
    match (symbol_of(a), symbol_of(b)) {
        (Some(sa), Some(sb)) => {
            if sa.symbol_name() == sb.symbol_name() {
                Unification::Matched
            } else {
                Unification::Failed
            }
        }
        _ => {
            error!("impossible: unification of non-symbols");
            Unification::Failed
        }
    }
}

fn unbind(var: &Handle) {
    if let Some(cell) = var.as_var() {
        cell.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────
// Goals and the search driver
// ─────────────────────────────────────────────────────────────────────

/// A relation: "the rest of the computation that must still succeed."
#[derive(Clone)]
pub enum Goal {
    /// The terminal continuation; always succeeds.
    Succeed,
    /// Sequence two relations — conjunction builds chains of these.
    Seq(Handle, Handle),
    /// Conjunction of relations, satisfied left-to-right with one consistent
    /// binding set.
    Conj(Vec<Handle>),
    /// Disjunction of relations, tried left-to-right; each alternative starts
    /// from a clean binding state.
    Disj(Vec<Handle>),
    /// Unification as a goal; the engine's sole commit point for variable
    /// bindings.
    Unify(Handle, Handle),
    /// Print the (possibly still symbolic) value, then continue.
    Print(Handle),
}

fn succeed() -> Handle {
    Value::goal(Goal::Succeed)
}

/// Drive `goal`, with `future` as the continuation that must also succeed.
///
/// A malformed goal (a non-relation where a relation is required) is reported
/// to the diagnostic stream and fails like any other branch; it never aborts
/// the surrounding search.
pub fn solve(goal: &Handle, future: &Handle) -> bool {
    let Some(g) = goal.as_goal() else {
        warn!("driving a non-relation");
        return false;
    };
    match g {
        Goal::Succeed => true,

        Goal::Seq(first, rest) => {
            if rest.as_goal().is_none() {
                warn!("and with non relations");
                return false;
            }
            solve(first, rest)
        }

        Goal::Conj(goals) => {
            // Right-fold into a Seq chain ending in the incoming future, then
            // drive the chain once.
            let mut chain = future.clone();
            for g in goals.iter().rev() {
                chain = Value::goal(Goal::Seq(g.clone(), chain));
            }
            solve(&chain, &succeed())
        }

        Goal::Disj(goals) => {
            for alternative in goals {
                if alternative.as_goal().is_none() {
                    warn!("or argument is non-relation");
                    return false;
                }
                if solve(alternative, future) {
                    return true;
                }
            }
            false
        }

        Goal::Unify(left, right) => match unify(left, right) {
            Unification::Failed => false,
            Unification::Matched => solve(future, &succeed()),
            Unification::Bound(var) => {
                if solve(future, &succeed()) {
                    true
                } else {
                    // The branch below this binding failed; undo it before
                    // reporting failure to the choice point above.
                    unbind(&var);
                    false
                }
            }
        },

        Goal::Print(value) => match symbol_of(value) {
            Some(sym) => {
                println!("{}", sym.symbol_name().unwrap_or_default());
                solve(future, &succeed())
            }
            None => false,
        },
    }
}

/// Drive a goal to completion against the terminal continuation.
pub fn run(goal: &Handle) -> bool {
    solve(goal, &succeed())
}
