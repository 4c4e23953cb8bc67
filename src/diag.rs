use std::io;
use std::io::prelude::*;

use thiserror::Error;
use tracing::debug;

/// Line number (starting at one).
pub type Position = u32;

/// User-facing error messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Message {
    // Lexical
    #[error("Unrecognized Input Pattern ({0})")]
    BadToken(String),

    // Program structure
    #[error("Missing Program")]
    MissingProgram,
    #[error("Missing Program name")]
    MissingProgramName,
    #[error("Missing END of Program")]
    MissingEndOfProgram,
    #[error("Incorrect Declaration in Program")]
    IncorrectDeclaration,
    #[error("Incorrect Statement in Program")]
    IncorrectStatement,

    // Declarations
    #[error("Missing Type")]
    MissingType,
    #[error("Missing Length")]
    MissingLength,
    #[error("Incorrect Initialization of a String Length")]
    IncorrectStringLength,
    #[error("Missing Double Colon")]
    MissingDoubleColon,
    #[error("Missing Variable List")]
    MissingVariableList,
    #[error("Missing Variable Name")]
    MissingVariableName,
    #[error("Variable Redefinition")]
    VariableRedefinition,
    #[error("Incorrect initialization for a variable.")]
    IncorrectInitialization,

    // Statements
    #[error("Missing Statement")]
    MissingStatement,
    #[error("Missing Simple Statement")]
    MissingSimpleStatement,
    #[error("Missing Assignment Operator")]
    MissingAssignmentOperator,
    #[error("Missing Variable")]
    MissingVariable,
    #[error("Missing Expression in Assignment Statement")]
    MissingAssignmentExpression,
    #[error("Print statement syntax error.")]
    PrintSyntax,
    #[error("Missing expression after Print Statement")]
    MissingPrintExpression,
    #[error("Missing Left Parenthesis")]
    MissingLeftParenthesis,
    #[error("Missing Right Parenthesis")]
    MissingRightParenthesis,
    #[error("Missing If-Statement Condition")]
    MissingIfCondition,
    #[error("Missing IF at end of IF statement")]
    MissingEndIf,
    #[error("Missing END")]
    MissingEnd,

    // Expressions
    #[error("Missing Expression")]
    MissingExpression,
    #[error("Missing Operand")]
    MissingOperand,
    #[error("Missing Operand After Operator")]
    MissingOperandAfterOperator,
    #[error("Missing exponent operand")]
    MissingExponent,
    #[error("Illegal Literal Value ({0})")]
    BadLiteral(String),

    // Semantics
    #[error("Undeclared Variable")]
    UndeclaredVariable,
    #[error("Using Uninitialized Variable")]
    UninitializedVariable,
    #[error("Illegal mixed-mode assignment operation")]
    MixedModeAssignment,
    #[error("Illegal Operand Types for a Relational Operation")]
    IllegalRelationalOperands,
    #[error("Illegal Operand Type for the Operation.")]
    IllegalAdditiveOperands,
    #[error("Illegal operand types for the operation.")]
    IllegalOperands,
    #[error("Run-Time Error: Illegal Operand Type for Sign Operator")]
    IllegalSignOperand,

    // Runtime
    #[error("Runtime Error - Illegal Type for If-Statement Condition")]
    IllegalConditionType,
    #[error("Runtime Error - Division by Zero")]
    DivisionByZero,
}

/// A message attached to the line it was detected on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}: {message}")]
pub struct Diagnostic {
    pub line: Position,
    pub message: Message,
}

/// Writes diagnostics as they are detected and counts them.
pub struct Reporter<'d> {
    sink: &'d mut dyn Write,
    count: usize,
}

impl<'d> Reporter<'d> {
    pub fn new(sink: &'d mut dyn Write) -> Reporter<'d> {
        Reporter { sink, count: 0 }
    }

    /// Count `diagnostic` and write it out on its own line.
    pub fn report(&mut self, diagnostic: Diagnostic) -> io::Result<()> {
        self.count += 1;
        debug!(line = diagnostic.line, count = self.count, "{}", diagnostic.message);
        writeln!(self.sink, "{}", diagnostic)
    }

    /// Number of diagnostics reported so far.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl std::fmt::Debug for Reporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("count", &self.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_format() {
        let d = Diagnostic {
            line: 3,
            message: Message::VariableRedefinition,
        };
        assert_eq!(d.to_string(), "3: Variable Redefinition");
    }

    #[test]
    fn reporter_counts_and_writes() -> io::Result<()> {
        let mut sink: Vec<u8> = Vec::new();
        let mut reporter = Reporter::new(&mut sink);
        reporter.report(Diagnostic {
            line: 1,
            message: Message::MissingProgram,
        })?;
        reporter.report(Diagnostic {
            line: 2,
            message: Message::BadToken("@".to_string()),
        })?;
        assert_eq!(reporter.count(), 2);
        assert_eq!(
            String::from_utf8_lossy(&sink),
            "1: Missing Program\n2: Unrecognized Input Pattern (@)\n"
        );
        Ok(())
    }
}
