use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub data: TokenType,
    /// Character offset of the first character of the lexeme.
    pub pos: usize,
}

impl Token {
    pub fn new(data: TokenType, pos: usize) -> Self {
        Token { data, pos }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Integer(i64),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

impl TokenType {
    /// The single-character lexeme of operator and paren tokens.
    pub fn symbol(&self) -> Option<char> {
        match self {
            Self::Plus => Some('+'),
            Self::Minus => Some('-'),
            Self::Star => Some('*'),
            Self::Slash => Some('/'),
            Self::LeftParen => Some('('),
            Self::RightParen => Some(')'),
            Self::Integer(_) | Self::Eof => None,
        }
    }

    pub fn value(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Compares kinds, ignoring the payload of `Integer`.
    pub fn same_kind(&self, other: &TokenType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "integer {v}"),
            Self::Eof => write!(f, "end of input"),
            // Every other kind has a symbol.
            other => write!(f, "'{}'", other.symbol().unwrap_or('?')),
        }
    }
}
