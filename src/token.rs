use std::fmt;

use crate::diag::Position;

/// Classification of the "words" produced by `Scanner`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    // Keywords
    If,
    Else,
    Print,
    Integer,
    Real,
    Character,
    End,
    Then,
    Program,
    Len,

    Ident,

    // Literals
    IConst,
    RConst,
    SConst,
    // Reserved: no production yields it yet.
    #[allow(dead_code)]
    BConst,

    // Operators
    Plus,
    Minus,
    Mult,
    Div,
    Assop,
    Eq,
    Pow,
    Gthan,
    Lthan,
    Cat,

    // Delimiters
    Comma,
    LParen,
    RParen,
    Dot,
    DColon,
    /// `*` immediately followed by `,` in `PRINT *, ...`.
    Def,

    Err,
    Done,
}

impl TokenKind {
    /// True for the keywords that open a declaration.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenKind::Integer | TokenKind::Real | TokenKind::Character
        )
    }

    /// True for the tokens a statement may start with.
    pub fn starts_statement(self) -> bool {
        matches!(self, TokenKind::If | TokenKind::Print | TokenKind::Ident)
    }
}

/// Reserved words.  Matched case-insensitively.
pub const KEYWORDS: [(&str, TokenKind); 10] = [
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("print", TokenKind::Print),
    ("integer", TokenKind::Integer),
    ("real", TokenKind::Real),
    ("character", TokenKind::Character),
    ("end", TokenKind::End),
    ("then", TokenKind::Then),
    ("program", TokenKind::Program),
    ("len", TokenKind::Len),
];

/// Look up `lexeme` in the keyword table.
pub fn keyword(lexeme: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(lexeme))
        .map(|(_, kind)| *kind)
}

/// A classified lexeme and the line it was recognized on.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text.  String literals have their quotes stripped.
    pub lexeme: String,
    pub line: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: Position) -> Token {
        Token {
            kind,
            lexeme: lexeme.into(),
            line,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Print => "PRINT",
            TokenKind::Integer => "INTEGER",
            TokenKind::Real => "REAL",
            TokenKind::Character => "CHARACTER",
            TokenKind::End => "END",
            TokenKind::Then => "THEN",
            TokenKind::Program => "PROGRAM",
            TokenKind::Len => "LEN",
            TokenKind::Ident => "IDENT",
            TokenKind::IConst => "ICONST",
            TokenKind::RConst => "RCONST",
            TokenKind::SConst => "SCONST",
            TokenKind::BConst => "BCONST",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::Assop => "ASSOP",
            TokenKind::Eq => "EQ",
            TokenKind::Pow => "POW",
            TokenKind::Gthan => "GTHAN",
            TokenKind::Lthan => "LTHAN",
            TokenKind::Cat => "CAT",
            TokenKind::Comma => "COMMA",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::Dot => "DOT",
            TokenKind::DColon => "DCOLON",
            TokenKind::Def => "DEF",
            TokenKind::Err => "ERR",
            TokenKind::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::IConst | TokenKind::RConst | TokenKind::BConst | TokenKind::Err => {
                write!(f, "{}: ({})", self.kind, self.lexeme)
            }
            TokenKind::SConst => write!(f, "{}: \"{}\"", self.kind, self.lexeme),
            TokenKind::Ident => write!(f, "{}: '{}'", self.kind, self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(keyword("PROGRAM"), Some(TokenKind::Program));
        assert_eq!(keyword("Character"), Some(TokenKind::Character));
        assert_eq!(keyword("len"), Some(TokenKind::Len));
        assert_eq!(keyword("lenx"), None);
    }

    #[test]
    fn display_matches_token_dump_format() {
        assert_eq!(Token::new(TokenKind::Ident, "x", 1).to_string(), "IDENT: 'x'");
        assert_eq!(Token::new(TokenKind::IConst, "42", 1).to_string(), "ICONST: (42)");
        assert_eq!(Token::new(TokenKind::SConst, "hi", 1).to_string(), "SCONST: \"hi\"");
        assert_eq!(Token::new(TokenKind::Cat, "//", 1).to_string(), "CAT");
        assert_eq!(Token::new(TokenKind::Err, "1.2.", 2).to_string(), "ERR: (1.2.)");
    }
}
