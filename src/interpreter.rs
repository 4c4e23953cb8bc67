//! API to control the interpreter.

use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::info;

use crate::char_reader::CharReaderError;
use crate::parser::{Halt, Parser};
use crate::scanner::Scanner;
use crate::token::TokenKind;

/// Single-pass interpreter: programs are evaluated while they are parsed.
///
/// # Example
///
/// Print output and diagnostics go to separate sinks:
///
/// ```
/// # use minifort::interpreter::{Interpreter, RunError};
///
/// let mut output: Vec<u8> = Vec::new();
/// let mut diagnostics: Vec<u8> = Vec::new();
/// let mut interp = Interpreter::new(&mut output, &mut diagnostics);
///
/// let prog = r#"
///     PROGRAM greet
///       CHARACTER (LEN = 5) :: name = "World"
///       INTEGER :: n = 40
///       IF (n > 10) THEN
///         PRINT *, "Hello ", name, "! ", n + 2
///       END IF
///     END PROGRAM greet
/// "#;
/// interp.run(prog.as_bytes())?;
///
/// let failed = interp.run("PROGRAM bad INTEGER :: x PRINT *, x END PROGRAM bad".as_bytes());
/// assert!(matches!(failed, Err(RunError::Failed { errors }) if errors > 0));
///
/// assert_eq!(output, b"Hello World! 42\n");
/// assert!(diagnostics.starts_with(b"1: Using Uninitialized Variable\n"));
/// # Ok::<(), RunError>(())
/// ```
#[derive(Debug)]
pub struct Interpreter<'t, W: Write, D: Write> {
    output: &'t mut W,
    diagnostics: &'t mut D,
}

/// Errors the interpreter can raise.
#[derive(Debug, Error)]
pub enum RunError {
    /// The program did not parse and run to its end.  Diagnostics have been written out.
    #[error("unsuccessful execution: {errors} error(s)")]
    Failed { errors: usize },

    /// The source could not be read.
    #[error("read error: {0}")]
    Read(#[from] CharReaderError),

    /// Output or diagnostics could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl<'t, W: Write, D: Write> Interpreter<'t, W, D> {
    pub fn new(output: &'t mut W, diagnostics: &'t mut D) -> Interpreter<'t, W, D> {
        Interpreter {
            output,
            diagnostics,
        }
    }

    /// Interpret one program.  Each run starts with no variables.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<(), RunError> {
        let mut parser = Parser::new(input, &mut *self.output, &mut *self.diagnostics);
        match parser.program() {
            Ok(()) => {
                info!("program completed");
                Ok(())
            }
            Err(Halt::Diagnosed) => {
                let errors = parser.error_count();
                info!(errors, "program failed");
                Err(RunError::Failed { errors })
            }
            Err(Halt::Io(e)) => Err(RunError::Io(e)),
            Err(Halt::Read(e)) => Err(RunError::Read(e)),
        }
    }

    /// Write the tokens of `input` to the output, one per line, up to the end of input or the
    /// first lexical error.
    pub fn dump_tokens<R: BufRead>(&mut self, input: R) -> Result<(), RunError> {
        let mut scanner = Scanner::new(input);
        loop {
            let token = scanner.get_token()?;
            writeln!(self.output, "{}", token)?;
            if matches!(token.kind, TokenKind::Done | TokenKind::Err) {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }
}
