//! Tree-walking interpreter core for the Lox scripting language: source text
//! is scanned into tokens, parsed into statements, and executed directly.

pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod value;

use std::io::Write;

use tracing::debug;

pub use diagnostic::Diagnostics;
pub use error::{Error, ParseError, RuntimeError, ScanError};
pub use interpreter::Interpreter;
pub use value::Value;

/// An interpretation session. Top-level variables persist between calls to
/// [`Lox::run`], which is what an interactive prompt needs.
#[derive(Debug)]
pub struct Lox<W> {
    interpreter: Interpreter<W>,
}

impl<W: Write> Lox<W> {
    pub fn new(out: W) -> Self {
        Lox {
            interpreter: Interpreter::new(out),
        }
    }

    /// Scans, parses and, if both succeeded, executes `source`.
    ///
    /// Parsing happens even after scan errors so that syntax errors are
    /// reported in the same pass. Nothing is executed when either failed.
    pub fn run(&mut self, source: &str) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let lexed = lexer::scan(source);
        diagnostics.extend(lexed.errors);

        let parsed = parser::parse(&lexed.tokens);
        diagnostics.extend(parsed.errors);

        if diagnostics.had_error() {
            debug!(errors = diagnostics.len(), "skipping execution");
            return diagnostics;
        }

        if let Err(err) = self.interpreter.interpret(&parsed.stmts) {
            diagnostics.push(err);
        }

        diagnostics
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }
}
