//! Lexical analyzer
//!
//! A finite-state machine over characters.  `get_token()` starts in the START state and each
//! multi-character token has a dedicated `scan_*` method standing for its state.  When a state
//! reads one character too far, the character is put back into the reader.

use std::io::prelude::*;

use tracing::trace;

use crate::char_reader::{CharReader, CharReaderError};
use crate::diag::Position;
use crate::token::{self, Token, TokenKind};

/// Turn sequence of bytes into sequence of tokens.
#[derive(Debug)]
pub struct Scanner<R: BufRead> {
    input: CharReader<R>,
    line: Position,

    // Buffer used when scanning longer tokens.  Allocated here to reuse memory.
    buf: String,
}

impl<R: BufRead> Scanner<R> {
    /// Creates a new scanner operating on `input`.
    pub fn new(input: R) -> Scanner<R> {
        Scanner {
            input: CharReader::new(input),
            line: 1,
            buf: String::new(),
        }
    }

    /// Current line number.
    pub fn line(&self) -> Position {
        self.line
    }

    /// Scan next token and return it.
    ///
    /// Lexical errors are returned as `TokenKind::Err` tokens.  Only failing to read the input
    /// is an `Err`.
    pub fn get_token(&mut self) -> Result<Token, CharReaderError> {
        let token = self.get_raw_token()?;
        trace!(kind = %token.kind, lexeme = %token.lexeme, line = token.line, "scanned");
        Ok(token)
    }

    fn get_raw_token(&mut self) -> Result<Token, CharReaderError> {
        loop {
            let ch = match self.input.next_char()? {
                None => return Ok(self.token(TokenKind::Done, "")),
                Some(ch) => ch,
            };
            match ch {
                '\n' => self.line += 1,
                ch if ch.is_whitespace() => (),
                '!' => self.skip_comment()?,
                '+' => return Ok(self.token(TokenKind::Plus, "+")),
                '-' => return Ok(self.token(TokenKind::Minus, "-")),
                '<' => return Ok(self.token(TokenKind::Lthan, "<")),
                '>' => return Ok(self.token(TokenKind::Gthan, ">")),
                '(' => return Ok(self.token(TokenKind::LParen, "(")),
                ')' => return Ok(self.token(TokenKind::RParen, ")")),
                ',' => return Ok(self.token(TokenKind::Comma, ",")),
                '*' => return self.scan_star(),
                '/' => {
                    return self.scan_pair('/', TokenKind::Div, "//", TokenKind::Cat);
                }
                '=' => {
                    return self.scan_pair('=', TokenKind::Assop, "==", TokenKind::Eq);
                }
                ':' => return self.scan_double_colon(),
                '.' => return self.scan_dot(),
                '"' | '\'' => return self.scan_string(ch),
                '0'..='9' => return self.scan_number(ch),
                ch if ch.is_ascii_alphabetic() => return self.scan_identifier(ch),
                _ => return Ok(self.error(ch.to_string())),
            }
        }
    }

    fn token(&self, kind: TokenKind, lexeme: &str) -> Token {
        Token::new(kind, lexeme, self.line)
    }

    /// Error tokens bump the line counter before being tagged with it.
    fn error(&mut self, lexeme: String) -> Token {
        self.line += 1;
        Token::new(TokenKind::Err, lexeme, self.line)
    }

    fn skip_comment(&mut self) -> Result<(), CharReaderError> {
        while let Some(ch) = self.input.next_char()? {
            if ch == '\n' {
                self.line += 1;
                break;
            }
        }
        Ok(())
    }

    /// `*` is either `**`, the `*,` print marker (comma left in the input), or `*`.
    fn scan_star(&mut self) -> Result<Token, CharReaderError> {
        match self.input.next_char()? {
            Some('*') => Ok(self.token(TokenKind::Pow, "**")),
            Some(',') => {
                self.input.put_back(',');
                Ok(self.token(TokenKind::Def, "*"))
            }
            Some(ch) => {
                self.input.put_back(ch);
                Ok(self.token(TokenKind::Mult, "*"))
            }
            None => Ok(self.token(TokenKind::Mult, "*")),
        }
    }

    /// Scan a token that is `single` unless the same character is doubled.
    fn scan_pair(
        &mut self,
        ch: char,
        single: TokenKind,
        doubled_lexeme: &str,
        doubled: TokenKind,
    ) -> Result<Token, CharReaderError> {
        match self.input.next_char()? {
            Some(next) if next == ch => Ok(self.token(doubled, doubled_lexeme)),
            Some(next) => {
                self.input.put_back(next);
                Ok(self.token(single, &ch.to_string()))
            }
            None => Ok(self.token(single, &ch.to_string())),
        }
    }

    fn scan_double_colon(&mut self) -> Result<Token, CharReaderError> {
        match self.input.next_char()? {
            Some(':') => Ok(self.token(TokenKind::DColon, "::")),
            Some(ch) => Ok(self.error(format!(":{}", ch))),
            None => Ok(self.error(":".to_string())),
        }
    }

    /// A dot starts a real literal when a digit follows, otherwise it stands alone.
    fn scan_dot(&mut self) -> Result<Token, CharReaderError> {
        match self.input.next_char()? {
            Some(ch) if ch.is_ascii_digit() => {
                self.buf.clear();
                self.buf.push('.');
                self.buf.push(ch);
                self.scan_fraction()
            }
            Some(ch) => {
                self.input.put_back(ch);
                Ok(self.token(TokenKind::Dot, "."))
            }
            None => Ok(self.token(TokenKind::Dot, ".")),
        }
    }

    fn scan_number(&mut self, first_digit: char) -> Result<Token, CharReaderError> {
        self.buf.clear();
        self.buf.push(first_digit);
        loop {
            match self.input.next_char()? {
                Some(ch) if ch.is_ascii_digit() => self.buf.push(ch),
                Some('.') => match self.input.next_char()? {
                    Some(ch) if ch.is_ascii_digit() => {
                        self.buf.push('.');
                        self.buf.push(ch);
                        return self.scan_fraction();
                    }
                    next => {
                        // Malformed number such as `1.` or `1.x`: the dot is dropped.
                        if let Some(ch) = next {
                            self.input.put_back(ch);
                        }
                        let lexeme = self.buf.clone();
                        return Ok(self.error(lexeme));
                    }
                },
                Some(ch) => {
                    self.input.put_back(ch);
                    break;
                }
                None => break,
            }
        }
        Ok(self.token(TokenKind::IConst, &self.buf))
    }

    /// Digits after the decimal point.  `buf` already holds the digits scanned so far.
    fn scan_fraction(&mut self) -> Result<Token, CharReaderError> {
        loop {
            match self.input.next_char()? {
                Some(ch) if ch.is_ascii_digit() => self.buf.push(ch),
                Some('.') => {
                    self.buf.push('.');
                    let lexeme = self.buf.clone();
                    return Ok(self.error(lexeme));
                }
                Some(ch) => {
                    self.input.put_back(ch);
                    break;
                }
                None => break,
            }
        }
        Ok(self.token(TokenKind::RConst, &self.buf))
    }

    /// The literal ends at the same kind of quote it started with.
    fn scan_string(&mut self, quote: char) -> Result<Token, CharReaderError> {
        self.buf.clear();
        loop {
            match self.input.next_char()? {
                Some(ch) if ch == quote => return Ok(self.token(TokenKind::SConst, &self.buf)),
                Some('\n') | None => {
                    let lexeme = format!("{}{}", quote, self.buf);
                    return Ok(self.error(lexeme));
                }
                Some(ch) => self.buf.push(ch),
            }
        }
    }

    fn scan_identifier(&mut self, first_char: char) -> Result<Token, CharReaderError> {
        self.buf.clear();
        self.buf.push(first_char);
        loop {
            match self.input.next_char()? {
                Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => self.buf.push(ch),
                Some(ch) => {
                    self.input.put_back(ch);
                    break;
                }
                None => break,
            }
        }

        let kind = token::keyword(&self.buf).unwrap_or(TokenKind::Ident);
        Ok(self.token(kind, &self.buf))
    }
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<Token, CharReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.get_token() {
            Ok(t) if t.kind == TokenKind::Done => None,
            r => Some(r),
        }
    }
}
