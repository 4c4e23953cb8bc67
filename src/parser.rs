//! Syntax-directed interpreter.
//!
//! Each grammar production is a method that both checks the syntax and evaluates what it parsed:
//! expression productions return a `Value`, statement productions perform their effect.  There is
//! no tree in between.
//!
//! ```text
//! Prog      ::= PROGRAM IDENT {Decl} {Stmt} END PROGRAM IDENT
//! Decl      ::= Type [( LEN = ICONST )] :: VarList
//! VarList   ::= Var [= Expr] {, Var [= Expr]}
//! Stmt      ::= AssignStmt | PrintStmt | IfStmt
//! IfStmt    ::= IF ( RelExpr ) SimpleStmt
//!             | IF ( RelExpr ) THEN {Stmt} [ELSE {Stmt}] END IF
//! PrintStmt ::= PRINT *, Expr {, Expr}
//! RelExpr   ::= Expr [( == | < | > ) Expr]
//! Expr      ::= MultExpr {( + | - | // ) MultExpr}
//! MultExpr  ::= TermExpr {( * | / ) TermExpr}
//! TermExpr  ::= SFactor [** TermExpr]
//! SFactor   ::= [+ | -] Factor
//! Factor    ::= IDENT | ICONST | RCONST | SCONST | ( Expr )
//! ```

use std::io;
use std::io::prelude::*;

use tracing::debug;

use crate::char_reader::CharReaderError;
use crate::ctx::{Context, VarType};
use crate::cursor::TokenCursor;
use crate::diag::{Diagnostic, Message, Position, Reporter};
use crate::token::{Token, TokenKind};
use crate::value::{Slot, Value};

/// Why parsing stopped early.
#[derive(Debug)]
pub enum Halt {
    /// A diagnostic has been reported.
    Diagnosed,
    /// Writing to the output or diagnostic sink failed.
    Io(io::Error),
    /// Reading the source failed.
    Read(CharReaderError),
}

impl From<io::Error> for Halt {
    fn from(e: io::Error) -> Halt {
        Halt::Io(e)
    }
}

impl From<CharReaderError> for Halt {
    fn from(e: CharReaderError) -> Halt {
        Halt::Read(e)
    }
}

type ParseResult<T> = Result<T, Halt>;

/// Optional sign in front of a factor.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Sign {
    None,
    Plus,
    Minus,
}

pub struct Parser<'a, R: BufRead> {
    tokens: TokenCursor<R>,
    ctx: Context,
    output: &'a mut dyn Write,
    reporter: Reporter<'a>,
}

impl<'a, R: BufRead> Parser<'a, R> {
    pub fn new(
        input: R,
        output: &'a mut dyn Write,
        diagnostics: &'a mut dyn Write,
    ) -> Parser<'a, R> {
        Parser {
            tokens: TokenCursor::new(input),
            ctx: Context::new(),
            output,
            reporter: Reporter::new(diagnostics),
        }
    }

    /// Number of diagnostics reported so far.
    pub fn error_count(&self) -> usize {
        self.reporter.count()
    }

    /// Prog ::= PROGRAM IDENT {Decl} {Stmt} END PROGRAM IDENT
    ///
    /// The closing name is not compared with the opening one.
    pub fn program(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Program, Message::MissingProgram)?;
        self.expect(TokenKind::Ident, Message::MissingProgramName)?;

        let mut token = self.next()?;
        while token.kind.is_type() {
            self.tokens.push_back(token);
            self.declaration()
                .map_err(|h| self.context(h, Message::IncorrectDeclaration))?;
            token = self.next()?;
        }

        while token.kind.starts_statement() {
            let line = token.line;
            self.tokens.push_back(token);
            self.statement()
                .map_err(|h| self.context_at(h, line, Message::IncorrectStatement))?;
            token = self.next()?;
        }

        if token.kind != TokenKind::End {
            return Err(self.fail(Message::MissingEndOfProgram));
        }
        self.expect(TokenKind::Program, Message::MissingProgram)?;
        self.expect(TokenKind::Ident, Message::MissingProgramName)?;
        self.output.flush()?;
        Ok(())
    }

    /// Decl ::= Type [( LEN = ICONST )] :: VarList
    fn declaration(&mut self) -> ParseResult<()> {
        let token = self.next()?;
        let var_type = match VarType::from_keyword(token.kind) {
            Some(t) => t,
            None => return Err(self.fail(Message::MissingType)),
        };

        let mut token = self.next()?;
        let mut len = 1;
        if token.kind == TokenKind::LParen && var_type == VarType::Character {
            self.expect(TokenKind::Len, Message::MissingLength)?;
            self.expect(TokenKind::Assop, Message::MissingAssignmentOperator)?;
            let size = self.expect(TokenKind::IConst, Message::IncorrectStringLength)?;
            len = match size.lexeme.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(self.fail(Message::IncorrectStringLength)),
            };
            self.expect(TokenKind::RParen, Message::MissingRightParenthesis)?;
            token = self.next()?;
        }

        if token.kind != TokenKind::DColon {
            return Err(self.fail(Message::MissingDoubleColon));
        }
        self.var_list(var_type, len)
            .map_err(|h| self.context(h, Message::MissingVariableList))
    }

    /// VarList ::= Var [= Expr] {, Var [= Expr]}
    ///
    /// Initializers are not checked against the declared type.  String results are fitted to
    /// `len`.
    fn var_list(&mut self, var_type: VarType, len: usize) -> ParseResult<()> {
        loop {
            let token = self.next()?;
            if token.kind != TokenKind::Ident {
                return Err(self.fail(Message::MissingVariableName));
            }
            let name = token.lexeme;
            if !self.ctx.declare(&name, var_type, len) {
                return Err(self.fail(Message::VariableRedefinition));
            }
            debug!(%name, ?var_type, len, "declared");

            let mut token = self.next()?;
            if token.kind == TokenKind::Assop {
                let slot = var_type.default_value(len).slot();
                let value = self
                    .expression(slot)
                    .map_err(|h| self.context(h, Message::IncorrectInitialization))?;
                let value = match value {
                    Value::Str(s) => Value::fixed(&s, len),
                    other => other,
                };
                debug!(%name, %value, "initialized");
                self.ctx.assign(&name, value);
                token = self.next()?;
            }

            if token.kind != TokenKind::Comma {
                self.tokens.push_back(token);
                return Ok(());
            }
        }
    }

    /// Stmt ::= AssignStmt | PrintStmt | IfStmt
    fn statement(&mut self) -> ParseResult<()> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Ident => {
                self.tokens.push_back(token);
                self.assignment()
            }
            TokenKind::Print => {
                self.tokens.push_back(token);
                self.print_statement()
            }
            TokenKind::If => {
                self.tokens.push_back(token);
                self.if_statement()
            }
            _ => Err(self.fail(Message::MissingStatement)),
        }
    }

    /// SimpleStmt ::= AssignStmt | PrintStmt
    fn simple_statement(&mut self) -> ParseResult<()> {
        let token = self.next()?;
        match token.kind {
            TokenKind::Ident => {
                self.tokens.push_back(token);
                self.assignment()
            }
            TokenKind::Print => {
                self.tokens.push_back(token);
                self.print_statement()
            }
            _ => Err(self.fail(Message::MissingSimpleStatement)),
        }
    }

    /// PrintStmt ::= PRINT *, ExprList
    ///
    /// Nothing is written unless every expression evaluates.
    fn print_statement(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Print, Message::PrintSyntax)?;
        self.expect(TokenKind::Def, Message::PrintSyntax)?;
        self.expect(TokenKind::Comma, Message::PrintSyntax)?;
        let values = self
            .expression_list()
            .map_err(|h| self.context(h, Message::MissingPrintExpression))?;
        for value in &values {
            write!(self.output, "{}", value)?;
        }
        writeln!(self.output)?;
        Ok(())
    }

    /// ExprList ::= Expr {, Expr}
    fn expression_list(&mut self) -> ParseResult<Vec<Value>> {
        let mut values = vec![];
        loop {
            let value = self
                .expression(Slot::Untyped)
                .map_err(|h| self.context(h, Message::MissingExpression))?;
            values.push(value);
            let token = self.next()?;
            if token.kind != TokenKind::Comma {
                self.tokens.push_back(token);
                return Ok(values);
            }
        }
    }

    /// IfStmt ::= IF ( RelExpr ) SimpleStmt
    ///          | IF ( RelExpr ) THEN {Stmt} [ELSE {Stmt}] END IF
    ///
    /// Only the selected branch is evaluated.  The other one is skipped token by token and is
    /// never checked.
    fn if_statement(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::If, Message::MissingStatement)?;
        self.expect(TokenKind::LParen, Message::MissingLeftParenthesis)?;
        let guard = self
            .relational_expression()
            .map_err(|h| self.context(h, Message::MissingIfCondition))?;
        let token = self.next()?;
        let condition = match guard {
            Value::Bool(b) => b,
            _ => return Err(self.fail(Message::IllegalConditionType)),
        };
        if token.kind != TokenKind::RParen {
            return Err(self.fail(Message::MissingRightParenthesis));
        }
        debug!(condition, line = token.line, "if");

        let token = self.next()?;
        if token.kind != TokenKind::Then {
            if condition {
                self.tokens.push_back(token);
                return self
                    .simple_statement()
                    .map_err(|h| self.context(h, Message::MissingSimpleStatement));
            }
            self.tokens.push_back(token);
            return self.skip_simple_statement();
        }

        let token = if condition {
            self.statements_until(&[TokenKind::Else, TokenKind::End])?
        } else {
            self.skip_branch(true)?
        };
        if token.kind == TokenKind::Else {
            if condition {
                self.skip_branch(false)?;
            } else {
                self.statements_until(&[TokenKind::End])?;
            }
        }
        self.expect(TokenKind::If, Message::MissingEndIf)?;
        Ok(())
    }

    /// Evaluate statements up to one of `stops`, which is consumed and returned.
    fn statements_until(&mut self, stops: &[TokenKind]) -> ParseResult<Token> {
        loop {
            let token = self.next()?;
            if stops.contains(&token.kind) {
                return Ok(token);
            }
            self.tokens.push_back(token);
            self.statement()
                .map_err(|h| self.context(h, Message::MissingStatement))?;
        }
    }

    /// Skip the tokens of an untaken block branch up to its `END`, or its `ELSE` if
    /// `stop_at_else`.  Nested blocks are skipped whole.
    fn skip_branch(&mut self, stop_at_else: bool) -> ParseResult<Token> {
        let mut depth = 0usize;
        loop {
            let token = self.tokens.next_token()?;
            match token.kind {
                TokenKind::Then => depth += 1,
                TokenKind::Else if depth == 0 && stop_at_else => break Ok(token),
                TokenKind::End if depth == 0 => break Ok(token),
                TokenKind::End => depth -= 1,
                TokenKind::Done => break Err(self.fail(Message::MissingEnd)),
                _ => (),
            }
            debug!(skipped = %token, "untaken branch");
        }
    }

    /// Skip the untaken statement of a simple IF.  The statement is delimited by its shape, not
    /// checked: `PRINT *, <expr list>` or `<ident> = <expr>`.
    fn skip_simple_statement(&mut self) -> ParseResult<()> {
        let token = self.tokens.next_token()?;
        debug!(line = token.line, "skipping simple statement");
        let in_list = match token.kind {
            TokenKind::Print => {
                self.skip_if_next(TokenKind::Def)?;
                self.skip_if_next(TokenKind::Comma)?;
                true
            }
            TokenKind::Ident => {
                self.skip_if_next(TokenKind::Assop)?;
                false
            }
            _ => {
                self.tokens.push_back(token);
                return Err(self.fail(Message::MissingSimpleStatement));
            }
        };
        self.skip_expression(in_list)
    }

    fn skip_if_next(&mut self, kind: TokenKind) -> ParseResult<()> {
        let token = self.tokens.next_token()?;
        if token.kind != kind {
            self.tokens.push_back(token);
        }
        Ok(())
    }

    /// Skip the tokens of an expression, or of a comma-separated list of them if `in_list`.
    ///
    /// Ends before the first token that cannot continue it, such as a keyword or an identifier
    /// right after an operand.
    fn skip_expression(&mut self, in_list: bool) -> ParseResult<()> {
        let mut depth = 0usize;
        let mut want_operand = true;
        loop {
            let token = self.tokens.next_token()?;
            let continues = match token.kind {
                TokenKind::Ident | TokenKind::IConst | TokenKind::RConst | TokenKind::SConst
                    if want_operand =>
                {
                    want_operand = false;
                    true
                }
                TokenKind::Plus | TokenKind::Minus => {
                    want_operand = true;
                    true
                }
                TokenKind::LParen if want_operand => {
                    depth += 1;
                    true
                }
                TokenKind::RParen if !want_operand && depth > 0 => {
                    depth -= 1;
                    true
                }
                TokenKind::Mult
                | TokenKind::Div
                | TokenKind::Pow
                | TokenKind::Cat
                | TokenKind::Eq
                | TokenKind::Lthan
                | TokenKind::Gthan
                    if !want_operand =>
                {
                    want_operand = true;
                    true
                }
                TokenKind::Comma if in_list && !want_operand && depth == 0 => {
                    want_operand = true;
                    true
                }
                _ => false,
            };
            if !continues {
                self.tokens.push_back(token);
                return Ok(());
            }
        }
    }

    /// AssignStmt ::= Var = Expr
    fn assignment(&mut self) -> ParseResult<()> {
        let name = self.variable()?;
        let op = self.expect(TokenKind::Assop, Message::MissingAssignmentOperator)?;

        let var_type = self.ctx.var_type(&name);
        let slot = self.ctx.value(&name).map_or(Slot::Untyped, Value::slot);
        let value = self
            .expression(slot)
            .map_err(|h| self.context_at(h, op.line, Message::MissingAssignmentExpression))?;
        let value = match (value, slot) {
            (Value::Str(s), Slot::Str(len)) => Value::fixed(&s, len),
            (value, _) => value,
        };

        if let Some(var_type) = var_type {
            if !var_type.accepts(&value) {
                return Err(self.fail_at(op.line, Message::MixedModeAssignment));
            }
        }
        debug!(%name, %value, "assigned");
        self.ctx.assign(&name, value);
        Ok(())
    }

    /// Var ::= IDENT, which must be declared.
    fn variable(&mut self) -> ParseResult<String> {
        let token = self.next()?;
        if token.kind != TokenKind::Ident {
            return Err(self.fail(Message::MissingVariable));
        }
        if !self.ctx.is_declared(&token.lexeme) {
            return Err(self.fail(Message::UndeclaredVariable));
        }
        Ok(token.lexeme)
    }

    /// RelExpr ::= Expr [( == | < | > ) Expr]
    fn relational_expression(&mut self) -> ParseResult<Value> {
        let lhs = self.expression(Slot::Untyped)?;
        let token = self.next()?;
        let result = match token.kind {
            TokenKind::Eq | TokenKind::Lthan | TokenKind::Gthan => {
                let rhs = self.expression(Slot::Untyped)?;
                match token.kind {
                    TokenKind::Eq => lhs.equals(&rhs),
                    TokenKind::Lthan => lhs.less(&rhs),
                    _ => lhs.greater(&rhs),
                }
            }
            _ => {
                self.tokens.push_back(token);
                lhs
            }
        };
        if result.is_error() {
            return Err(self.fail(Message::IllegalRelationalOperands));
        }
        Ok(result)
    }

    /// Expr ::= MultExpr {( + | - | // ) MultExpr}
    ///
    /// `slot` is the shape of the variable being assigned, if any.  It only affects the leftmost
    /// operand.
    fn expression(&mut self, slot: Slot) -> ParseResult<Value> {
        let mut acc = self.mult_expression(slot)?;
        loop {
            let op = self.next()?;
            if !matches!(op.kind, TokenKind::Plus | TokenKind::Minus | TokenKind::Cat) {
                self.tokens.push_back(op);
                return Ok(acc);
            }
            let rhs = self
                .mult_expression(Slot::Untyped)
                .map_err(|h| self.context(h, Message::MissingOperandAfterOperator))?;
            acc = match op.kind {
                TokenKind::Plus => acc + rhs,
                TokenKind::Minus => acc - rhs,
                _ => acc.catenate(&rhs),
            };
            if acc.is_error() {
                return Err(self.fail_at(op.line, Message::IllegalAdditiveOperands));
            }
        }
    }

    /// MultExpr ::= TermExpr {( * | / ) TermExpr}
    fn mult_expression(&mut self, slot: Slot) -> ParseResult<Value> {
        let mut acc = self.term_expression(slot)?;
        loop {
            let op = self.next()?;
            if !matches!(op.kind, TokenKind::Mult | TokenKind::Div) {
                self.tokens.push_back(op);
                return Ok(acc);
            }
            let rhs = self
                .term_expression(Slot::Untyped)
                .map_err(|h| self.context(h, Message::MissingOperandAfterOperator))?;
            acc = if op.kind == TokenKind::Mult {
                acc * rhs
            } else {
                if acc.is_numeric() && rhs.is_numeric() && rhs.is_zero() {
                    return Err(self.fail_at(op.line, Message::DivisionByZero));
                }
                acc / rhs
            };
            if acc.is_error() {
                return Err(self.fail_at(op.line, Message::IllegalOperands));
            }
        }
    }

    /// TermExpr ::= SFactor [** TermExpr]
    ///
    /// Right-associative: `2 ** 3 ** 2` is `2 ** 9`.
    fn term_expression(&mut self, slot: Slot) -> ParseResult<Value> {
        let base = self.signed_factor(slot)?;
        let op = self.next()?;
        if op.kind != TokenKind::Pow {
            self.tokens.push_back(op);
            return Ok(base);
        }
        let exponent = self
            .term_expression(Slot::Untyped)
            .map_err(|h| self.context(h, Message::MissingExponent))?;
        let result = base.power(&exponent);
        if result.is_error() {
            return Err(self.fail_at(op.line, Message::IllegalOperands));
        }
        Ok(result)
    }

    /// SFactor ::= [+ | -] Factor
    fn signed_factor(&mut self, slot: Slot) -> ParseResult<Value> {
        let token = self.next()?;
        let sign = match token.kind {
            TokenKind::Plus => Sign::Plus,
            TokenKind::Minus => Sign::Minus,
            _ => {
                self.tokens.push_back(token);
                Sign::None
            }
        };
        if sign != Sign::None && matches!(slot, Slot::Str(_)) {
            return Err(self.fail(Message::IllegalSignOperand));
        }
        self.factor(slot, sign)
    }

    /// Factor ::= IDENT | ICONST | RCONST | SCONST | ( Expr )
    fn factor(&mut self, slot: Slot, sign: Sign) -> ParseResult<Value> {
        let token = self.next()?;
        let value = match token.kind {
            TokenKind::Ident => {
                if !self.ctx.is_declared(&token.lexeme) {
                    return Err(self.fail(Message::UndeclaredVariable));
                }
                let stored = if self.ctx.is_initialized(&token.lexeme) {
                    self.ctx.value(&token.lexeme).cloned()
                } else {
                    None
                };
                match stored {
                    Some(value) => value,
                    None => return Err(self.fail(Message::UninitializedVariable)),
                }
            }
            TokenKind::IConst => match slot {
                Slot::Real => Value::Real(self.literal(&token)?),
                _ => Value::Int(self.literal(&token)?),
            },
            TokenKind::RConst => Value::Real(self.literal(&token)?),
            TokenKind::SConst => match slot {
                Slot::Str(len) => Value::fixed(&token.lexeme, len),
                _ => Value::Str(token.lexeme),
            },
            TokenKind::LParen => {
                let value = self
                    .expression(slot)
                    .map_err(|h| self.context(h, Message::MissingExpression))?;
                self.expect(TokenKind::RParen, Message::MissingRightParenthesis)?;
                value
            }
            _ => return Err(self.fail(Message::MissingOperand)),
        };

        match sign {
            Sign::None => Ok(value),
            _ if !value.is_numeric() => Err(self.fail(Message::IllegalSignOperand)),
            Sign::Plus => Ok(value),
            Sign::Minus => Ok(-value),
        }
    }

    fn literal<T: std::str::FromStr>(&mut self, token: &Token) -> ParseResult<T> {
        token
            .lexeme
            .parse::<T>()
            .map_err(|_| self.fail(Message::BadLiteral(token.lexeme.clone())))
    }

    /// Next token.  Lexical error tokens are reported here.
    fn next(&mut self) -> ParseResult<Token> {
        let token = self.tokens.next_token()?;
        if token.kind == TokenKind::Err {
            return Err(self.fail_at(token.line, Message::BadToken(token.lexeme)));
        }
        Ok(token)
    }

    /// Consume a token of kind `expected` or report `message`.
    fn expect(&mut self, expected: TokenKind, message: Message) -> ParseResult<Token> {
        let token = self.next()?;
        if token.kind == expected {
            Ok(token)
        } else {
            Err(self.fail(message))
        }
    }

    /// Report `message` on the current line.
    fn fail(&mut self, message: Message) -> Halt {
        let line = self.tokens.line();
        self.fail_at(line, message)
    }

    fn fail_at(&mut self, line: Position, message: Message) -> Halt {
        match self.reporter.report(Diagnostic { line, message }) {
            Ok(()) => Halt::Diagnosed,
            Err(e) => Halt::Io(e),
        }
    }

    /// Add the enclosing production's own diagnostic, on the current line, to a failure being
    /// propagated.
    fn context(&mut self, halt: Halt, message: Message) -> Halt {
        let line = self.tokens.line();
        self.context_at(halt, line, message)
    }

    fn context_at(&mut self, halt: Halt, line: Position, message: Message) -> Halt {
        match halt {
            Halt::Diagnosed => self.fail_at(line, message),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Run {
        output: String,
        diagnostics: String,
        errors: usize,
        ok: bool,
    }

    fn run(source: &str) -> Run {
        let mut output: Vec<u8> = Vec::new();
        let mut diagnostics: Vec<u8> = Vec::new();
        let (ok, errors) = {
            let mut parser = Parser::new(source.as_bytes(), &mut output, &mut diagnostics);
            let ok = parser.program().is_ok();
            (ok, parser.error_count())
        };
        Run {
            output: String::from_utf8(output).expect("output is not UTF-8"),
            diagnostics: String::from_utf8(diagnostics).expect("diagnostics are not UTF-8"),
            errors,
            ok,
        }
    }

    fn program(body: &str) -> String {
        format!("PROGRAM t\n{}\nEND PROGRAM t\n", body)
    }

    #[test]
    fn empty_program() {
        let r = run("PROGRAM t END PROGRAM t");
        assert!(r.ok);
        assert_eq!(r.output, "");
        assert_eq!(r.errors, 0);
    }

    #[test]
    fn closing_name_is_not_checked() {
        assert!(run("PROGRAM a END PROGRAM b").ok);
    }

    #[test]
    fn missing_program_keyword() {
        let r = run("t END PROGRAM t");
        assert!(!r.ok);
        assert_eq!(r.diagnostics, "1: Missing Program\n");
        assert_eq!(r.errors, 1);
    }

    #[test]
    fn print_arithmetic() {
        let r = run("PROGRAM T INTEGER :: X = 5 PRINT *, X + 2 END PROGRAM T");
        assert!(r.ok);
        assert_eq!(r.output, "7\n");
        assert_eq!(r.errors, 0);
    }

    #[test]
    fn print_values_back_to_back() {
        let r = run(&program("PRINT *, 1, \"ab\", 2.5"));
        assert_eq!(r.output, "1ab2.50\n");
    }

    #[test]
    fn precedence_and_associativity() {
        let r = run(&program(
            "PRINT *, 2 + 3 * 4\nPRINT *, 10 - 4 - 3\nPRINT *, 2 ** 3 ** 2\nPRINT *, (2 + 3) * 4",
        ));
        assert_eq!(r.output, "14\n3\n512.00\n20\n");
    }

    #[test]
    fn unary_signs() {
        let r = run(&program("INTEGER :: x = 4\nPRINT *, -x, +x, -(1 + 2), 2 * -3"));
        assert_eq!(r.output, "-44-3-6\n");
    }

    #[test]
    fn integer_division_truncates() {
        let r = run(&program("PRINT *, 7 / 2, 7.0 / 2"));
        assert_eq!(r.output, "33.50\n");
    }

    #[test]
    fn division_by_zero_literal() {
        let r = run(&program("INTEGER :: x = 1\nx = x / 0\nPRINT *, x"));
        assert!(!r.ok);
        assert_eq!(r.output, "");
        assert!(r.diagnostics.contains("3: Runtime Error - Division by Zero\n"));
    }

    #[test]
    fn division_by_computed_real_zero() {
        let r = run(&program("REAL :: z = 0.0\nREAL :: y\ny = 3.0 / (z * 2)"));
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Runtime Error - Division by Zero"));
    }

    #[test]
    fn character_truncates_and_pads() {
        let r = run("PROGRAM T CHARACTER (LEN=3) :: S = \"hello\" PRINT *, S END PROGRAM T");
        assert_eq!(r.output, "hel\n");
        let r = run(&program("CHARACTER(LEN=5) :: s\ns = 'ab'\nPRINT *, s, '|'"));
        assert_eq!(r.output, "ab   |\n");
    }

    #[test]
    fn character_default_is_blank() {
        let r = run(&program("CHARACTER(len=4) :: s\nPRINT *, '[', s, ']'"));
        assert!(r.ok);
        assert_eq!(r.output, "[    ]\n");
    }

    #[test]
    fn character_without_length_holds_one_char() {
        let r = run(&program("CHARACTER :: c = 'xyz'\nPRINT *, c"));
        assert_eq!(r.output, "x\n");
    }

    #[test]
    fn zero_length_is_rejected() {
        let r = run(&program("CHARACTER(LEN=0) :: c"));
        assert!(!r.ok);
        assert!(r
            .diagnostics
            .contains("Incorrect Initialization of a String Length"));
    }

    #[test]
    fn length_clause_only_for_character() {
        let r = run(&program("INTEGER(LEN=3) :: i"));
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Missing Double Colon"));
    }

    #[test]
    fn concatenation_is_fitted_on_assignment() {
        let r = run(&program(
            "CHARACTER(LEN=4) :: s\nCHARACTER(LEN=8) :: t\ns = 'ab'\nt = s // 'cd'\nPRINT *, t, '|'",
        ));
        assert_eq!(r.output, "ab  cd  |\n");
    }

    #[test]
    fn uninitialized_use_is_an_error() {
        let r = run("PROGRAM T INTEGER :: X PRINT *, X END PROGRAM T");
        assert!(!r.ok);
        assert_eq!(r.output, "");
        assert!(r.errors > 0);
        assert!(r.diagnostics.starts_with("1: Using Uninitialized Variable\n"));
    }

    #[test]
    fn self_reference_before_initialization() {
        let r = run(&program("INTEGER :: x\nx = x + 1"));
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Using Uninitialized Variable"));
    }

    #[test]
    fn undeclared_use_is_an_error() {
        let r = run(&program("y = 1"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("2: Undeclared Variable\n"));
    }

    #[test]
    fn redeclaration_is_an_error() {
        let r = run(&program("INTEGER :: x\nREAL :: y, x"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("3: Variable Redefinition\n"));
    }

    #[test]
    fn error_cascade_is_counted() {
        let r = run(&program("INTEGER :: x, x"));
        assert_eq!(
            r.diagnostics,
            "2: Variable Redefinition\n2: Missing Variable List\n2: Incorrect Declaration in Program\n"
        );
        assert_eq!(r.errors, 3);
    }

    #[test]
    fn mixed_mode_assignment() {
        let r = run(&program("INTEGER :: x\nx = 'oops'"));
        assert!(!r.ok);
        assert!(r
            .diagnostics
            .starts_with("3: Illegal mixed-mode assignment operation\n"));
        let r = run(&program("CHARACTER(LEN=2) :: s\ns = 1"));
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Illegal mixed-mode assignment operation"));
    }

    #[test]
    fn declaration_initializer_is_not_type_checked() {
        let r = run(&program("INTEGER :: x = 'abc'\nPRINT *, x"));
        assert!(r.ok);
        assert_eq!(r.output, "a\n");
    }

    #[test]
    fn integer_literal_takes_real_slot() {
        let r = run(&program("REAL :: r = 5\nREAL :: q\nq = 2\nPRINT *, r, ' ', q"));
        assert_eq!(r.output, "5.00 2.00\n");
    }

    #[test]
    fn integer_literal_in_real_slot_only_affects_leftmost_operand() {
        let r = run(&program("REAL :: r\nr = 7 / 2\nPRINT *, r"));
        assert_eq!(r.output, "3.50\n");
        let r = run(&program("INTEGER :: i\ni = 7 / 2\nPRINT *, i"));
        assert_eq!(r.output, "3\n");
    }

    #[test]
    fn sign_on_string_is_an_error() {
        let r = run(&program("PRINT *, -'a'"));
        assert!(!r.ok);
        assert!(r
            .diagnostics
            .starts_with("2: Run-Time Error: Illegal Operand Type for Sign Operator\n"));
        let r = run(&program("CHARACTER(LEN=2) :: s\ns = -1"));
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Illegal Operand Type for Sign Operator"));
    }

    #[test]
    fn illegal_operands() {
        let r = run(&program("PRINT *, 'a' + 1"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("2: Illegal Operand Type for the Operation.\n"));
        let r = run(&program("PRINT *, 1 // 2"));
        assert!(!r.ok);
        let r = run(&program("PRINT *, 'a' * 2"));
        assert!(r.diagnostics.starts_with("2: Illegal operand types for the operation.\n"));
        let r = run(&program("PRINT *, 'a' ** 2"));
        assert!(!r.ok);
    }

    #[test]
    fn string_divided_by_zero_is_an_operand_error() {
        let r = run(&program("PRINT *, 'a' / 0"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("2: Illegal operand types for the operation.\n"));
        assert!(!r.diagnostics.contains("Division by Zero"));
    }

    #[test]
    fn block_if_then_branch() {
        let r = run(&program(
            "INTEGER :: x = 3\nIF (x > 2) THEN\nPRINT *, 'big'\nELSE\nPRINT *, 'small'\nEND IF",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "big\n");
    }

    #[test]
    fn block_if_else_branch() {
        let r = run(&program(
            "INTEGER :: x = 1\nIF (x > 2) THEN\nPRINT *, 'big'\nELSE\nPRINT *, 'small'\nx = 0\nEND IF\nPRINT *, x",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "small\n0\n");
    }

    #[test]
    fn block_if_without_else() {
        let r = run(&program("IF (1 == 2) THEN\nPRINT *, 1\nEND IF\nPRINT *, 2"));
        assert!(r.ok);
        assert_eq!(r.output, "2\n");
    }

    #[test]
    fn untaken_branch_is_not_checked() {
        let r = run(&program("INTEGER :: x\nIF (1 > 2) THEN\nx = \"oops\"\nEND IF"));
        assert!(r.ok);
        assert_eq!(r.errors, 0);
        let r = run(&program(
            "IF (1 < 2) THEN\nPRINT *, 1\nELSE\nPRINT *, undeclared + @\nEND IF",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "1\n");
    }

    #[test]
    fn nested_block_in_untaken_branch() {
        let r = run(&program(
            "IF (1 > 2) THEN\nIF (1 < 2) THEN\nPRINT *, 'a'\nELSE\nPRINT *, 'b'\nEND IF\nPRINT *, 'c'\nELSE\nPRINT *, 'd'\nEND IF",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "d\n");
    }

    #[test]
    fn nested_block_in_taken_branch() {
        let r = run(&program(
            "INTEGER :: x = 5\nIF (x > 1) THEN\nIF (x > 9) THEN\nPRINT *, 'huge'\nELSE\nPRINT *, 'mid'\nEND IF\nEND IF",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "mid\n");
    }

    #[test]
    fn simple_if() {
        let r = run(&program(
            "INTEGER :: x = 5\nIF (x == 5) PRINT *, 'yes'\nIF (x < 5) PRINT *, 'no'\nIF (x > 1) x = 0\nPRINT *, x",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "yes\n0\n");
    }

    #[test]
    fn untaken_simple_if_shares_its_line() {
        let r = run("PROGRAM T INTEGER :: X = 5 IF (X < 1) PRINT *, X END PROGRAM T");
        assert!(r.ok);
        assert_eq!(r.errors, 0);
        assert_eq!(r.output, "");

        let r = run(&program(
            "INTEGER :: x = 5, y = 0 IF (x < 1) x = -(x + 1) * 2 y = x PRINT *, x, y",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "55\n");

        let r = run(&program(
            "INTEGER :: x = 5 IF (x < 1) PRINT *, 'a', x ** 2 // 'b' PRINT *, 'done'",
        ));
        assert!(r.ok);
        assert_eq!(r.output, "done\n");
    }

    #[test]
    fn untaken_simple_if_needs_a_simple_statement() {
        let r = run(&program("INTEGER :: x = 5\nIF (x < 1) END IF"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("3: Missing Simple Statement\n"));
    }

    #[test]
    fn string_equality_guard() {
        let r = run(&program(
            "CHARACTER(LEN=3) :: s = 'ab'\nIF (s == 'ab ') PRINT *, 'eq'",
        ));
        assert_eq!(r.output, "eq\n");
    }

    #[test]
    fn non_boolean_guard() {
        let r = run(&program("IF (1 + 1) PRINT *, 1"));
        assert!(!r.ok);
        assert!(r
            .diagnostics
            .starts_with("2: Runtime Error - Illegal Type for If-Statement Condition\n"));
    }

    #[test]
    fn string_ordering_is_illegal() {
        let r = run(&program("IF ('a' < 'b') PRINT *, 1"));
        assert!(!r.ok);
        assert!(r
            .diagnostics
            .starts_with("2: Illegal Operand Types for a Relational Operation\n"));
    }

    #[test]
    fn missing_end_if() {
        let r = run("PROGRAM t\nIF (1 > 2) THEN\nPRINT *, 1\n");
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Missing END"));
    }

    #[test]
    fn print_aborts_as_a_whole() {
        let r = run(&program("INTEGER :: x\nPRINT *, 1, x"));
        assert!(!r.ok);
        assert_eq!(r.output, "");
    }

    #[test]
    fn print_requires_marker() {
        let r = run(&program("PRINT 1"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("2: Print statement syntax error.\n"));
    }

    #[test]
    fn lexical_error_is_reported() {
        let r = run(&program("PRINT *, 1.2.3"));
        assert!(!r.ok);
        assert!(r.diagnostics.starts_with("3: Unrecognized Input Pattern (1.2.)\n"));
    }

    #[test]
    fn statements_stop_declarations() {
        let r = run(&program("INTEGER :: x = 1\nPRINT *, x\nINTEGER :: y"));
        assert!(!r.ok);
        assert!(r.diagnostics.contains("Missing END of Program"));
    }

    #[test]
    fn output_before_error_is_kept() {
        let r = run(&program("PRINT *, 1\nPRINT *, 1 / 0\nPRINT *, 3"));
        assert!(!r.ok);
        assert_eq!(r.output, "1\n");
    }

    #[test]
    fn comments_and_case() {
        let r = run("program T ! header\n  integer :: n = 2 ! two\n  print *, n ** 2\nend program T\n");
        assert!(r.ok);
        assert_eq!(r.output, "4.00\n");
    }
}
