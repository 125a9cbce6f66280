//! Patois surface dialects.
//!
//! Each dialect is an installer that registers its primitive vocabulary into
//! a fresh [`patois_core::Interp`]; all of them run on the same substrate.

pub mod clu;
pub mod lisp;
pub mod logic;

pub use clu::install_clu;
pub use lisp::{install_lisp, is_true};
pub use logic::install_logic;
