//! The logic dialect end to end: goal building, querying, backtracking.

use patois_core::{symbol_of, EvalError, EvalResult, Handle, Interp, Value};
use patois_dialects::install_logic;
use patois_reader::{Reader, StringSource, Syntax, QUIT};

fn logic() -> Interp {
    let interp = Interp::new();
    install_logic(&interp);
    interp
}

fn eval_program(interp: &Interp, text: &str) -> EvalResult<Handle> {
    let mut reader = Reader::new(Syntax::Logic, StringSource::new(text));
    let mut last = Value::nil();
    loop {
        let expr = reader.next_expression();
        if symbol_of(&expr).is_some_and(|s| s.symbol_name() == Some(QUIT)) {
            return Ok(last);
        }
        last = interp.eval_top(&expr)?;
    }
}

/// A query's whole observable outcome is the `ok` / `not ok` answer symbol.
fn answer(interp: &Interp, text: &str) -> String {
    eval_program(interp, text)
        .unwrap()
        .symbol_name()
        .unwrap()
        .to_owned()
}

#[test]
fn an_atom_unifies_with_itself() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (:=: a a))"), "ok");
}

#[test]
fn distinct_atoms_do_not_unify() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (:=: a b))"), "not ok");
}

#[test]
fn a_variable_takes_any_binding_once() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (:=: X a))"), "ok");
}

#[test]
fn conjunction_requires_consistent_bindings() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (and (:=: X a) (:=: X a)))"), "ok");
    assert_eq!(
        answer(&interp, "(query (and (:=: X a) (:=: X b)))"),
        "not ok"
    );
}

#[test]
fn disjunction_backtracks_to_a_succeeding_alternative() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (or (:=: a b) (:=: a a)))"), "ok");
    assert_eq!(
        answer(&interp, "(query (or (:=: a b) (:=: b c)))"),
        "not ok"
    );
}

#[test]
fn backtracking_rebinds_across_alternatives() {
    // The first alternative binds X to a and then fails; the second must be
    // free to bind X to b.
    let interp = logic();
    let program = "(query (or (and (:=: X a) (:=: X b)) (and (:=: X b) (:=: X b))))";
    assert_eq!(answer(&interp, program), "ok");
}

#[test]
fn print_succeeds_on_a_bound_variable() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (and (:=: X a) (print X)))"), "ok");
}

#[test]
fn print_fails_on_an_unbound_variable() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (print X))"), "not ok");
}

#[test]
fn variables_do_not_leak_between_queries() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (:=: X a))"), "ok");
    // a leaked binding of X to a would make this fail
    assert_eq!(answer(&interp, "(query (:=: X b))"), "ok");
}

#[test]
fn repeating_a_unification_is_harmless() {
    let interp = logic();
    // the second (:=: X Y) re-unifies an already-chained pair; the query must
    // still terminate and answer through the chain
    assert_eq!(
        answer(
            &interp,
            "(query (and (:=: X Y) (:=: X Y) (:=: Y c) (print X)))"
        ),
        "ok"
    );
}

#[test]
fn a_variable_keeps_its_identity_within_one_query() {
    let interp = logic();
    // both mentions of X are the same variable, so the chain reaches c
    assert_eq!(
        answer(&interp, "(query (and (:=: X Y) (:=: Y c) (print X)))"),
        "ok"
    );
}

#[test]
fn query_rejects_a_non_relation() {
    let interp = logic();
    assert!(matches!(
        eval_program(&interp, "(query a)"),
        Err(EvalError::TypeMismatch(_))
    ));
}

#[test]
fn a_defined_relation_is_callable_from_a_query() {
    let interp = logic();
    eval_program(&interp, "(define likes (Who) (:=: Who mary))").unwrap();
    assert_eq!(answer(&interp, "(query (likes mary))"), "ok");
    assert_eq!(answer(&interp, "(query (likes john))"), "not ok");
}

#[test]
fn a_defined_relation_composes_with_connectives() {
    let interp = logic();
    eval_program(&interp, "(define likes (Who) (:=: Who mary))").unwrap();
    assert_eq!(
        answer(&interp, "(query (and (likes X) (print X)))"),
        "ok"
    );
}

#[test]
fn empty_connectives_follow_the_search_rules() {
    let interp = logic();
    assert_eq!(answer(&interp, "(query (and))"), "ok");
    assert_eq!(answer(&interp, "(query (or))"), "not ok");
}
