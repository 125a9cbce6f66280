//! The line-oriented reader.
//!
//! Turns text into runtime values one top-level expression at a time. Input
//! arrives line by line through a [`LineSource`], so the interactive REPL can
//! hand over readline-edited lines while tests and scripts feed canned text.
//! An expression may span lines; the reader asks the source for continuation
//! lines with the secondary prompt until the open list closes.

use std::collections::VecDeque;

use tracing::warn;

use patois_core::{Handle, Value};

/// Prompt shown before a fresh top-level expression.
pub const PRIMARY_PROMPT: &str = "-> ";
/// Prompt shown for continuation lines inside an unclosed list.
pub const SECONDARY_PROMPT: &str = "> ";

/// The sentinel symbol end-of-input maps to.
pub const QUIT: &str = "quit";

/// Supplies input lines on demand. `None` means end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Option<String>;
}

/// A canned-line source for tests and non-interactive input.
pub struct StringSource {
    lines: VecDeque<String>,
}

impl StringSource {
    pub fn new(text: &str) -> Self {
        StringSource {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }
}

impl LineSource for StringSource {
    fn read_line(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Surface syntax of the active dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Integers, lists, symbols.
    Core,
    /// Core plus `'`/`` ` `` quoted constants.
    Lisp,
    /// No integer recognition; every symbol read becomes a logic value bound
    /// to that symbol.
    Logic,
}

/// The reader: a cursor over the current input line plus the line source.
pub struct Reader<S> {
    source: S,
    syntax: Syntax,
    line: Vec<u8>,
    pos: usize,
}

impl<S: LineSource> Reader<S> {
    pub fn new(syntax: Syntax, source: S) -> Self {
        Reader {
            source,
            syntax,
            line: Vec::new(),
            pos: 0,
        }
    }

    /// Read the next top-level expression, prompting as needed. End of input
    /// at expression start yields the `quit` sentinel symbol.
    pub fn next_expression(&mut self) -> Handle {
        // Loop until a line with content arrives.
        loop {
            if !self.refill(PRIMARY_PROMPT) {
                return Value::symbol(QUIT);
            }
            if self.peek().is_some() {
                break;
            }
        }

        let value = self.read_expression();

        self.skip_spaces();
        if self.peek().is_some() {
            let rest = String::from_utf8_lossy(&self.line[self.pos..]).into_owned();
            warn!("unexpected characters at end of line: {rest}");
            self.pos = self.line.len();
        }
        value
    }

    // ── Line handling ────────────────────────────────────────────────

    /// Fetch a fresh line from the source. Returns false at end of input.
    fn refill(&mut self, prompt: &str) -> bool {
        match self.source.read_line(prompt) {
            Some(text) => {
                self.line = text.into_bytes();
                self.pos = 0;
                self.skip_spaces();
                true
            }
            None => false,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.line.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.line.get(self.pos + offset).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_spaces(&mut self) {
        while matches!(self.peek(), Some(b' ') | Some(b'\t')) {
            self.advance();
        }
        if self.peek() == Some(b';') {
            // comment runs to end of line
            self.pos = self.line.len();
        }
    }

    /// Skip to the next non-blank character, pulling continuation lines as
    /// needed. Returns false if the source runs out mid-expression.
    fn skip_newlines(&mut self) -> bool {
        self.skip_spaces();
        while self.peek().is_none() {
            if !self.refill(SECONDARY_PROMPT) {
                return false;
            }
        }
        true
    }

    fn is_separator(c: u8) -> bool {
        matches!(c, b' ' | b'\t' | b'\n' | b'\0' | b'\'' | b';' | b'(' | b')')
    }

    // ── Expression forms ─────────────────────────────────────────────

    fn read_expression(&mut self) -> Handle {
        if self.syntax == Syntax::Lisp {
            if let Some(b'\'') | Some(b'`') = self.peek() {
                self.advance();
                return Value::quoted(self.read_expression());
            }
        }

        if self.syntax == Syntax::Logic {
            // Everything that is not a list is a symbol, wrapped as a logic
            // value so the evaluator applies the variable/atom rule.
            if self.peek() == Some(b'(') {
                self.advance();
                return self.read_list();
            }
            return Value::bound_var(Value::symbol(self.read_symbol()));
        }

        match self.peek() {
            Some(c) if c.is_ascii_digit() => Value::int(self.read_integer()),
            Some(b'-') if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.advance();
                Value::int(self.read_integer().wrapping_neg())
            }
            Some(b'(') => {
                self.advance();
                self.read_list()
            }
            _ => Value::symbol(self.read_symbol()),
        }
    }

    fn read_list(&mut self) -> Handle {
        if !self.skip_newlines() {
            warn!("unexpected end of input inside a list");
            return Value::nil();
        }
        if self.peek() == Some(b')') {
            self.advance();
            return Value::nil();
        }
        let head = self.read_expression();
        Value::cons(head, self.read_list())
    }

    fn read_integer(&mut self) -> i64 {
        // wraps on overlong numerals, like the dialects' arithmetic
        let mut value: i64 = 0;
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            value = value.wrapping_mul(10).wrapping_add(i64::from(c - b'0'));
            self.advance();
        }
        value
    }

    fn read_symbol(&mut self) -> String {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if Self::is_separator(c) {
                break;
            }
            self.advance();
        }
        String::from_utf8_lossy(&self.line[start..self.pos]).into_owned()
    }
}
