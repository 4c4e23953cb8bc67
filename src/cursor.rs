use std::io::prelude::*;

use crate::char_reader::CharReaderError;
use crate::diag::Position;
use crate::scanner::Scanner;
use crate::token::Token;

/// Token source with room to give back the one token a production read ahead.
#[derive(Debug)]
pub struct TokenCursor<R: BufRead> {
    scanner: Scanner<R>,
    pushed_back: Option<Token>,
}

impl<R: BufRead> TokenCursor<R> {
    pub fn new(input: R) -> TokenCursor<R> {
        TokenCursor {
            scanner: Scanner::new(input),
            pushed_back: None,
        }
    }

    /// Return the pushed back token if any, else scan a new one.
    pub fn next_token(&mut self) -> Result<Token, CharReaderError> {
        match self.pushed_back.take() {
            Some(token) => Ok(token),
            None => self.scanner.get_token(),
        }
    }

    /// Make `token` the next one returned.
    ///
    /// Panics if a token is already pending: a production only ever gives back the token it
    /// just read.
    pub fn push_back(&mut self, token: Token) {
        assert!(
            self.pushed_back.is_none(),
            "token pushed back twice: {} then {}",
            self.pushed_back.as_ref().map_or(String::new(), Token::to_string),
            token
        );
        self.pushed_back = Some(token);
    }

    /// Line the scanner is on.
    pub fn line(&self) -> Position {
        self.scanner.line()
    }
}
