//! Interpreter for a small, statically typed, Fortran-like language.
//!
//! Programs are lexed, parsed and evaluated in a single pass: each grammar production evaluates
//! what it parses as it goes, so there is no syntax tree.
//!
//! ```text
//! PROGRAM circle
//!   REAL :: r = 2, area
//!   CHARACTER (LEN = 6) :: unit = "cm"
//!   area = 3.14 * r ** 2
//!   IF (area > 10) PRINT *, "area = ", area, " ", unit
//! END PROGRAM circle
//! ```
//!
//! # Examples
//!
//! See [`crate::interpreter::Interpreter`].
//!
//! # Limitations
//!
//! - The scanner and parser do not attempt any error recovery.  They bail out on the first
//! encountered error.
//! - No loops, arrays or procedures.

#![warn(rust_2018_idioms)]
#![warn(missing_debug_implementations)]

pub mod interpreter;

mod char_reader;
mod ctx;
mod cursor;
mod diag;
mod parser;
mod scanner;
mod token;
mod value;
