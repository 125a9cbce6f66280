//! The interactive interpreter.
//!
//! `patois [core|lisp|clu|logic]` — read one expression, evaluate it in the
//! chosen dialect, print the result, repeat. The literal symbol `quit` (or
//! end of input) ends the session; errors go to stderr and the loop recovers.

use std::process::ExitCode;

use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use patois_core::{symbol_of, Interp};
use patois_dialects::{install_clu, install_lisp, install_logic};
use patois_reader::{LineSource, Reader, Syntax, QUIT};

/// Line source backed by a rustyline editor, with history.
struct EditorSource {
    editor: DefaultEditor,
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let line = self.editor.readline(prompt).ok()?;
        let _ = self.editor.add_history_entry(&line);
        Some(line)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let dialect = std::env::args().nth(1).unwrap_or_else(|| "lisp".into());
    let interp = Interp::new();
    let syntax = match dialect.as_str() {
        "core" => {
            install_lisp(&interp);
            Syntax::Core
        }
        "lisp" => {
            install_lisp(&interp);
            Syntax::Lisp
        }
        "clu" => {
            install_clu(&interp);
            Syntax::Core
        }
        "logic" => {
            install_logic(&interp);
            Syntax::Logic
        }
        other => {
            eprintln!("unknown dialect: {other} (expected core, lisp, clu, or logic)");
            return ExitCode::from(2);
        }
    };

    let editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            eprintln!("cannot open terminal: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut reader = Reader::new(syntax, EditorSource { editor });

    loop {
        let expr = reader.next_expression();
        if symbol_of(&expr).is_some_and(|s| s.symbol_name() == Some(QUIT)) {
            break;
        }
        match interp.eval_top(&expr) {
            Ok(value) => println!("{value}"),
            Err(err) => eprintln!("Error: {err}"),
        }
    }

    ExitCode::SUCCESS
}
