//! Chained binding environments.
//!
//! An environment is one frame of (name, value) bindings plus an optional
//! parent. Lookups scan the local frame newest-first and then fall back to the
//! parent chain, which is what gives the dialects lexical shadowing.

use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Handle;

/// Shared reference to an environment. Parent links point child-to-parent
/// only, so chains are acyclic; closures that capture an environment hold it
/// weakly (see `function::Closure`).
pub type EnvRef = Rc<Environment>;

/// One binding frame plus its parent chain.
pub struct Environment {
    /// Local bindings, oldest first. A name added again shadows the earlier
    /// entry because scans run newest-first; nothing is ever overwritten by
    /// `add`.
    frame: RefCell<Vec<(String, Handle)>>,
    parent: Option<EnvRef>,
}

impl Environment {
    /// A root environment with no parent.
    pub fn root() -> EnvRef {
        Rc::new(Environment {
            frame: RefCell::new(Vec::new()),
            parent: None,
        })
    }

    /// A fresh empty frame chained to `parent`.
    pub fn child(parent: &EnvRef) -> EnvRef {
        Rc::new(Environment {
            frame: RefCell::new(Vec::new()),
            parent: Some(parent.clone()),
        })
    }

    pub fn parent(&self) -> Option<&EnvRef> {
        self.parent.as_ref()
    }

    /// Bind `name` in this frame. Never overwrites: the new binding shadows
    /// any earlier one of the same name.
    pub fn add(&self, name: impl Into<String>, value: Handle) {
        self.frame.borrow_mut().push((name.into(), value));
    }

    /// Find the nearest binding for `name`: local frame newest-first, then
    /// the parent chain.
    pub fn lookup(&self, name: &str) -> Option<Handle> {
        for (bound, value) in self.frame.borrow().iter().rev() {
            if bound == name {
                return Some(value.clone());
            }
        }
        self.parent.as_ref()?.lookup(name)
    }

    /// Mutate the nearest enclosing binding for `name`, using the same search
    /// order as [`lookup`](Self::lookup). If no frame in the chain binds the
    /// name, the binding is created in the outermost reachable frame — the
    /// permissive root-fallback policy the dialects' `set` relies on.
    pub fn set(&self, name: &str, value: Handle) {
        for (bound, slot) in self.frame.borrow_mut().iter_mut().rev() {
            if bound == name {
                *slot = value;
                return;
            }
        }
        match &self.parent {
            Some(parent) => parent.set(name, value),
            None => self.add(name, value),
        }
    }

    /// Number of local bindings (frame only, parents excluded).
    pub fn frame_len(&self) -> usize {
        self.frame.borrow().len()
    }

    /// Empty the local frame, returning its bindings. Interpreter teardown
    /// uses this to break closure/environment reference cycles.
    pub fn take_frame(&self) -> Vec<(String, Handle)> {
        std::mem::take(&mut *self.frame.borrow_mut())
    }
}
