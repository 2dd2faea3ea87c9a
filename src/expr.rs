use std::fmt;

use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};

use crate::token::TokenType;

/// Binary operators, tagged with their ASCII symbol.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum Operator {
    Add = b'+',
    Sub = b'-',
    Mul = b'*',
    Div = b'/',
}

impl Operator {
    pub fn from_symbol(c: char) -> Option<Self> {
        u8::try_from(c).ok().and_then(Self::from_u8)
    }

    pub fn from_token(tok: &TokenType) -> Option<Self> {
        tok.symbol().and_then(Self::from_symbol)
    }

    pub fn symbol(self) -> char {
        // Discriminants are ASCII.
        self.to_u8().map_or('?', char::from)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

pub type ExprRef = Box<Expr>;

#[derive(Debug, PartialEq, Eq)]
pub enum Expr {
    Literal(i64),
    Binary(Operator, ExprRef, ExprRef),
}

impl Expr {
    pub fn binary(op: Operator, left: ExprRef, right: ExprRef) -> ExprRef {
        Box::new(Expr::Binary(op, left, right))
    }

    /// Nesting depth; a literal has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, d)) = stack.pop() {
            max = max.max(d);
            if let Self::Binary(_, l, r) = expr {
                stack.push((l.as_ref(), d + 1));
                stack.push((r.as_ref(), d + 1));
            }
        }
        max
    }

    // Moves both children out, leaving literals behind.
    fn take_children(&mut self, into: &mut Vec<Expr>) {
        if let Self::Binary(_, l, r) = self {
            into.push(std::mem::replace(&mut **l, Expr::Literal(0)));
            into.push(std::mem::replace(&mut **r, Expr::Literal(0)));
        }
    }
}

// A `1+1+...+1` chain is as deep as it is long, so the tree is torn down
// with a work list instead of recursive drops.
impl Drop for Expr {
    fn drop(&mut self) {
        let mut stack = Vec::new();
        self.take_children(&mut stack);
        while let Some(mut expr) = stack.pop() {
            expr.take_children(&mut stack);
        }
    }
}

enum Piece<'a> {
    Node(&'a Expr),
    Op(Operator),
    Close,
}

/// Renders the tree as fully parenthesized infix, e.g. `((1 - 2) - 3)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Piece::Node(self)];
        while let Some(piece) = stack.pop() {
            match piece {
                Piece::Node(Self::Literal(v)) => write!(f, "{v}")?,
                Piece::Node(Self::Binary(op, l, r)) => {
                    f.write_str("(")?;
                    stack.push(Piece::Close);
                    stack.push(Piece::Node(r.as_ref()));
                    stack.push(Piece::Op(*op));
                    stack.push(Piece::Node(l.as_ref()));
                }
                Piece::Op(op) => write!(f, " {op} ")?,
                Piece::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}
