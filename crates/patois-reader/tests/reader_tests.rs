//! Reading text into runtime values, across the three surface syntaxes.

use patois_core::{list_to_vec, symbol_of, Handle, Value};
use patois_reader::{Reader, StringSource, Syntax, QUIT};

fn reader(syntax: Syntax, text: &str) -> Reader<StringSource> {
    Reader::new(syntax, StringSource::new(text))
}

fn read_one(syntax: Syntax, text: &str) -> Handle {
    reader(syntax, text).next_expression()
}

#[test]
fn reads_an_integer() {
    assert_eq!(read_one(Syntax::Core, "42").as_int(), Some(42));
}

#[test]
fn reads_a_negative_integer() {
    assert_eq!(read_one(Syntax::Core, "-17").as_int(), Some(-17));
}

#[test]
fn an_overlong_numeral_wraps_like_arithmetic() {
    // more digits than an i64 holds still reads as an integer
    let value = read_one(Syntax::Core, "99999999999999999999");
    assert!(value.as_int().is_some());
    let negative = read_one(Syntax::Core, "-99999999999999999999");
    assert!(negative.as_int().is_some());
}

#[test]
fn a_lone_minus_is_a_symbol() {
    assert_eq!(read_one(Syntax::Core, "-").symbol_name(), Some("-"));
}

#[test]
fn reads_a_symbol() {
    assert_eq!(read_one(Syntax::Core, "hello").symbol_name(), Some("hello"));
}

#[test]
fn reads_a_flat_list() {
    let expr = read_one(Syntax::Core, "(+ 1 2)");
    let items = list_to_vec(&expr).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].symbol_name(), Some("+"));
    assert_eq!(items[1].as_int(), Some(1));
    assert_eq!(items[2].as_int(), Some(2));
}

#[test]
fn reads_a_nested_list() {
    let expr = read_one(Syntax::Core, "(if (< x 1) 0 1)");
    let items = list_to_vec(&expr).unwrap();
    assert_eq!(items.len(), 4);
    let cond = list_to_vec(&items[1]).unwrap();
    assert_eq!(cond[0].symbol_name(), Some("<"));
}

#[test]
fn empty_list_reads_as_nil() {
    assert!(read_one(Syntax::Core, "()").is_nil());
}

#[test]
fn comments_run_to_end_of_line() {
    let mut r = reader(Syntax::Core, "; a remark\n7 ; trailing");
    assert_eq!(r.next_expression().as_int(), Some(7));
}

#[test]
fn a_list_may_span_lines() {
    let mut r = reader(Syntax::Core, "(+ 1\n   2\n   3)");
    let items = list_to_vec(&r.next_expression()).unwrap();
    assert_eq!(items.len(), 4);
    assert_eq!(items[3].as_int(), Some(3));
}

#[test]
fn successive_expressions_come_one_per_call() {
    let mut r = reader(Syntax::Core, "1\ntwo\n(3)");
    assert_eq!(r.next_expression().as_int(), Some(1));
    assert_eq!(r.next_expression().symbol_name(), Some("two"));
    assert!(list_to_vec(&r.next_expression()).is_some());
}

#[test]
fn end_of_input_yields_the_quit_sentinel() {
    let mut r = reader(Syntax::Core, "");
    assert_eq!(r.next_expression().symbol_name(), Some(QUIT));
    // and keeps yielding it
    assert_eq!(r.next_expression().symbol_name(), Some(QUIT));
}

#[test]
fn end_of_input_inside_a_list_closes_it() {
    let expr = read_one(Syntax::Core, "(a b");
    let items = list_to_vec(&expr).unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn trailing_junk_is_dropped_not_parsed() {
    let mut r = reader(Syntax::Core, "1 2\n3");
    assert_eq!(r.next_expression().as_int(), Some(1));
    // the rest of the first line is discarded with a diagnostic
    assert_eq!(r.next_expression().as_int(), Some(3));
}

#[test]
fn lisp_syntax_reads_quoted_constants() {
    let expr = read_one(Syntax::Lisp, "'(a b)");
    match &*expr {
        Value::Quoted(inner) => {
            let items = list_to_vec(inner).unwrap();
            assert_eq!(items[0].symbol_name(), Some("a"));
        }
        other => panic!("expected a quoted constant, got {other:?}"),
    }
}

#[test]
fn backquote_reads_like_quote() {
    let expr = read_one(Syntax::Lisp, "`x");
    assert!(matches!(&*expr, Value::Quoted(_)));
}

#[test]
fn core_syntax_treats_quote_as_a_separator() {
    // without lisp syntax, the apostrophe ends a symbol
    let mut r = reader(Syntax::Core, "a'b");
    assert_eq!(r.next_expression().symbol_name(), Some("a"));
}

#[test]
fn logic_syntax_wraps_symbols_as_logic_values() {
    let expr = read_one(Syntax::Logic, "X");
    assert!(expr.as_var().is_some());
    let sym = symbol_of(&expr).unwrap();
    assert_eq!(sym.symbol_name(), Some("X"));
}

#[test]
fn logic_syntax_reads_no_integers() {
    // digits are just symbol characters in the logic dialect
    let expr = read_one(Syntax::Logic, "42");
    assert!(expr.as_int().is_none());
    assert_eq!(symbol_of(&expr).unwrap().symbol_name(), Some("42"));
}

#[test]
fn logic_lists_hold_wrapped_symbols() {
    let expr = read_one(Syntax::Logic, "(and p q)");
    let items = list_to_vec(&expr).unwrap();
    assert_eq!(items.len(), 3);
    for item in &items {
        assert!(item.as_var().is_some());
    }
    assert_eq!(symbol_of(&items[0]).unwrap().symbol_name(), Some("and"));
}
