//! A tree-walk interpreter for Lox, a small dynamically-typed scripting
//! language with lexical scoping, first-class functions, and closures.
//!
//! ## Scanning
//! The first step converts a string of characters into a list of tokens.
//! The scanner is implemented in [`scanner`] as a state machine driving a
//! [`peekmore`] iterator over the source's characters. It reports lexical
//! errors as [`ScanError`](error::ScanError) but keeps scanning afterward,
//! so a single pass surfaces every lexical problem in the source at once.
//!
//! ## Parsing
//! The second step converts the token list into an abstract syntax tree.
//! The parser, in [`parser`], is a hand-written recursive-descent parser
//! with an explicit precedence ladder (see [`parser::Parser`]'s doc
//! comment for the full grammar). [`Expressions`](expr::Expr) produce an
//! [`Object`](object::Object); [`Statements`](stmt::Stmt) perform an
//! action and produce nothing. On a syntax error the parser enters panic
//! mode: it discards tokens until the next statement boundary and resumes,
//! so one mistake doesn't cascade into a wall of follow-on diagnostics.
//!
//! ## Resolving
//! The third step, in [`resolver`], walks the tree once more ahead of
//! evaluation to bind every local variable reference to a fixed scope
//! distance and to flag variables that are declared but never read. This
//! keeps the interpreter's variable lookups O(1) and robust against
//! shadowing introduced after a closure captures its environment.
//!
//! ## Interpreting
//! The final step, in [`interpreter`], walks the resolved tree and
//! evaluates it directly — no bytecode, no compilation. Control flow that
//! needs to unwind the call stack (`return`, `break`, a runtime error) is
//! threaded through as the `Err` side of a `Result<_, Unwind>` rather than
//! by throwing a host exception, which keeps every unwind path explicit at
//! the type level.

use std::fs;
use std::io::{self, Write};
use std::process;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use error::RuntimeError;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// The non-local control-flow signals that can unwind out of statement
/// execution: a runtime error, a `return` carrying its value, or a
/// `break` carrying the token it was written at (needed if it escapes
/// every enclosing loop and has to be reported as a runtime error).
#[derive(Debug)]
pub enum Unwind {
    Error(RuntimeError),
    Return(object::Object),
    Break(token::Token),
}

/// Drives the full scan → parse → resolve → interpret pipeline over one
/// or more calls to [`run`](Lox::run), reusing the same interpreter (and
/// therefore the same global scope) across calls — this is what lets the
/// REPL accumulate variables and functions across lines.
pub struct Lox {
    interpreter: interpreter::Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Lox { interpreter: interpreter::Interpreter::new() }
    }

    pub fn run_file(&mut self, path: &str) {
        let contents = fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("Could not read file '{path}': {err}");
            process::exit(64);
        });

        self.run(&contents);

        if error::did_runtime_error() {
            process::exit(70);
        }
        if error::did_error() {
            process::exit(65);
        }
    }

    pub fn run_prompt(&mut self) {
        let mut editor = rustyline::DefaultEditor::new().expect("line editor to initialize");
        let history_path = home::home_dir().map(|home| home.join(".lox_history"));

        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    error::reset_error();
                },
                Err(rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error reading input: {err}");
                    break;
                },
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }
    }

    fn run(&mut self, source: &str) {
        let tokens = Scanner::new(source).scan_tokens();

        if error::did_error() {
            return;
        }

        let statements = Parser::new(tokens).parse();

        if error::did_error() {
            return;
        }

        {
            let mut resolver = Resolver::new(&mut self.interpreter);
            resolver.resolve(&statements);
            resolver.finish();
        }

        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
