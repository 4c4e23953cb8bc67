//! Convert byte reader to utf8 character stream with a one character pushback slot.
//!
//! The scanner only ever needs to look one character past the end of a token, so a single slot
//! is enough.

use std::io::prelude::*;
use std::io::{self, Bytes};
use std::iter::Peekable;
use std::str::{self, Utf8Error};

use thiserror::Error;

/// A reader over a buffered source that produces characters rather than bytes.
#[derive(Debug)]
pub struct CharReader<R: BufRead> {
    input: Peekable<Bytes<R>>,

    // Conversion buffer stored here to avoid reallocation.
    buf: Vec<u8>,

    pushed_back: Option<char>,
}

impl<R: BufRead> CharReader<R> {
    pub fn new(input: R) -> CharReader<R> {
        CharReader {
            input: input.bytes().peekable(),
            buf: vec![],
            pushed_back: None,
        }
    }

    /// Return next character, `None` at end of input.
    pub fn next_char(&mut self) -> Result<Option<char>, CharReaderError> {
        if let Some(ch) = self.pushed_back.take() {
            return Ok(Some(ch));
        }
        match self.input.next() {
            Some(Ok(b)) if b.is_ascii() => Ok(Some(b as char)),
            Some(Ok(b)) if (b & 0b11000000) == 0b11000000 => {
                self.convert_multi_byte_char(b).map(Some)
            }
            Some(Ok(b)) => Err(CharReaderError::BadStartByte(b)),
            Some(Err(e)) => Err(CharReaderError::from(e)),
            None => Ok(None),
        }
    }

    /// Return `ch` to the stream so that the next call to `next_char()` yields it again.
    ///
    /// Panics if a character is already pending.
    pub fn put_back(&mut self, ch: char) {
        assert!(
            self.pushed_back.is_none(),
            "character pushback slot already holds {:?}",
            self.pushed_back
        );
        self.pushed_back = Some(ch);
    }

    fn convert_multi_byte_char(&mut self, first_byte: u8) -> Result<char, CharReaderError> {
        self.buf.clear();
        self.buf.push(first_byte);
        while let Some(next) = self.input.peek() {
            match next {
                Ok(b) if (b & 0b11000000) == 0b10000000 => {
                    let b = *b;
                    self.input.next();
                    self.buf.push(b);
                }
                Ok(_) => break,
                Err(_) => {
                    if let Some(Err(e)) = self.input.next() {
                        return Err(CharReaderError::from(e));
                    }
                }
            }
        }
        let s = str::from_utf8(&self.buf)?;
        s.chars().next().ok_or(CharReaderError::BadStartByte(first_byte))
    }
}

impl<R: BufRead> Iterator for CharReader<R> {
    type Item = Result<char, CharReaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_char().transpose()
    }
}

/// Errors raised when reading and converting to UTF-8.
#[derive(Debug, Error)]
pub enum CharReaderError {
    #[error("failed to read bytes: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected UTF-8 start byte: {0:b}")]
    BadStartByte(u8),
    #[error("failed to convert byte sequence to UTF-8: {0}")]
    Utf8(#[from] Utf8Error),
}
