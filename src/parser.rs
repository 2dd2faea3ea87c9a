use crate::expr::*;
use crate::scanner::{LexErr, Scanner};
use crate::token::*;

use thiserror::Error;
use tracing::debug;

type ExprResult = Result<ExprRef, ParseErr>;

/// Parentheses nest through recursion, so their depth is capped.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErr {
    #[error("[pos {pos}] Expected {expected} but got {found}.")]
    ExpectedToken {
        expected: TokenType,
        found: TokenType,
        pos: usize,
    },
    #[error("[pos {pos}] Unexpected {found}, expected an integer or '('.")]
    UnexpectedToken { found: TokenType, pos: usize },
    #[error("[pos {pos}] Parentheses nested deeper than {limit}.")]
    TooDeep { limit: usize, pos: usize },
    #[error(transparent)]
    Lex(#[from] LexErr),
}

/// Recursive-descent parser with one token of lookahead.
///
/// ```text
/// expr   := term ( ( '+' | '-' ) term )*
/// term   := factor ( ( '*' | '/' ) factor )*
/// factor := INTEGER | '(' expr ')'
/// ```
pub struct Parser {
    scanner: Scanner,
    current: Token,
    nesting: usize,
}

pub fn parse(scanner: Scanner) -> ExprResult {
    Parser::new(scanner)?.parse()
}

impl Parser {
    pub fn new(mut scanner: Scanner) -> Result<Parser, ParseErr> {
        let current = scanner.next_token()?;
        Ok(Parser {
            scanner,
            current,
            nesting: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, ParseErr> {
        let next = self.scanner.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn eat(&mut self, expected: &TokenType) -> Result<Token, ParseErr> {
        if !self.current.data.same_kind(expected) {
            return Err(ParseErr::ExpectedToken {
                expected: *expected,
                found: self.current.data,
                pos: self.current.pos,
            });
        }
        self.advance()
    }

    // Consumes the lookahead if it is one of `ops`, returning its operator.
    fn match_next_ops<const N: usize>(
        &mut self,
        ops: [TokenType; N],
    ) -> Result<Option<Operator>, ParseErr> {
        if !ops.contains(&self.current.data) {
            return Ok(None);
        }
        let tok = self.advance()?;
        Ok(Operator::from_token(&tok.data))
    }

    /// Parses one whole expression; anything left before `Eof` is an error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(mut self) -> ExprResult {
        let expr = self.expression()?;
        self.eat(&TokenType::Eof)?;
        debug!(%expr, "parsed");
        Ok(expr)
    }

    fn expression(&mut self) -> ExprResult {
        let mut expr = self.term()?;

        while let Some(op) = self.match_next_ops([TokenType::Plus, TokenType::Minus])? {
            let right = self.term()?;
            expr = Expr::binary(op, expr, right);
        }

        Ok(expr)
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;

        while let Some(op) = self.match_next_ops([TokenType::Star, TokenType::Slash])? {
            let right = self.factor()?;
            expr = Expr::binary(op, expr, right);
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        match self.current.data {
            TokenType::Integer(v) => {
                self.advance()?;
                Ok(Box::new(Expr::Literal(v)))
            }
            TokenType::LeftParen => {
                if self.nesting == MAX_NESTING {
                    return Err(ParseErr::TooDeep {
                        limit: MAX_NESTING,
                        pos: self.current.pos,
                    });
                }
                self.advance()?;
                self.nesting += 1;
                let expr = self.expression()?;
                self.nesting -= 1;
                self.eat(&TokenType::RightParen)?;
                Ok(expr)
            }
            found => Err(ParseErr::UnexpectedToken {
                found,
                pos: self.current.pos,
            }),
        }
    }
}
