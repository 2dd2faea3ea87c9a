use crate::token::*;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErr {
    #[error("[pos {pos}] Unexpected character '{ch}'.")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("[pos {pos}] Integer literal {digits} is too large.")]
    IntegerOverflow { digits: String, pos: usize },
}

/// Lazily turns a line of text into tokens, one `next_token` call at a time.
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    index: usize,
    // Set once `Eof` or an error has been handed out through `Iterator`.
    finished: bool,
}

pub fn scan(code: &str) -> Scanner {
    Scanner::new(code)
}

impl Scanner {
    pub fn new(code: &str) -> Self {
        Self {
            chars: code.chars().collect(),
            index: 0,
            finished: false,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.get(self.index).copied();
        if c.is_some() {
            self.index += 1;
        }
        c
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.index += 1;
        }
    }

    fn integer(&mut self, start: usize) -> Result<TokenType, LexErr> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.index += 1;
        }

        let digits = self.chars[start..self.index].iter().collect::<String>();
        match digits.parse() {
            Ok(num) => Ok(TokenType::Integer(num)),
            // Only ASCII digits were consumed, so the sole failure is overflow.
            Err(_) => Err(LexErr::IntegerOverflow { digits, pos: start }),
        }
    }

    /// Returns the next token. At end of input this keeps returning `Eof`.
    pub fn next_token(&mut self) -> Result<Token, LexErr> {
        self.skip_whitespace();
        let start = self.index;

        let tok = match self.advance() {
            None => TokenType::Eof,
            Some('+') => TokenType::Plus,
            Some('-') => TokenType::Minus,
            Some('*') => TokenType::Star,
            Some('/') => TokenType::Slash,
            Some('(') => TokenType::LeftParen,
            Some(')') => TokenType::RightParen,
            Some('0'..='9') => self.integer(start)?,
            Some(ch) => return Err(LexErr::UnexpectedChar { ch, pos: start }),
        };

        trace!(?tok, pos = start, "scanned token");
        Ok(Token::new(tok, start))
    }
}

/// Yields every token up to and including `Eof`, or up to the first error.
impl Iterator for Scanner {
    type Item = Result<Token, LexErr>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let res = self.next_token();
        if matches!(res, Err(_) | Ok(Token { data: TokenType::Eof, .. })) {
            self.finished = true;
        }
        Some(res)
    }
}
