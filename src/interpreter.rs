use num_traits::{PrimInt, Signed};
use thiserror::Error;
use tracing::{debug, trace};

use crate::expr::{Expr, Operator};
use crate::parser::{parse, ParseErr};
use crate::scanner::{scan, LexErr};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalErr<T = i64> {
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Integer overflow in {lhs} {op} {rhs}.")]
    Overflow { op: Operator, lhs: T, rhs: T },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpretErr {
    #[error(transparent)]
    Lex(LexErr),
    #[error(transparent)]
    Parse(ParseErr),
    #[error(transparent)]
    Eval(#[from] EvalErr),
}

// Lexical errors reach `run` wrapped by the parser; unwrap them so callers
// see the same three kinds the stages produce.
impl From<ParseErr> for InterpretErr {
    fn from(value: ParseErr) -> Self {
        match value {
            ParseErr::Lex(e) => Self::Lex(e),
            e => Self::Parse(e),
        }
    }
}

/// Value of one evaluated line together with its trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub value: i64,
    pub trace: String,
}

/// Applies `op`, failing on a zero divisor or on overflow.
///
/// Division rounds toward negative infinity, so `-7 / 2 == -4`.
pub fn apply<T: PrimInt + Signed>(op: Operator, a: T, b: T) -> Result<T, EvalErr<T>> {
    let res = match op {
        Operator::Add => a.checked_add(&b),
        Operator::Sub => a.checked_sub(&b),
        Operator::Mul => a.checked_mul(&b),
        Operator::Div => {
            if b.is_zero() {
                return Err(EvalErr::DivisionByZero);
            }
            floor_div(a, b)
        }
    };
    res.ok_or(EvalErr::Overflow {
        op,
        lhs: a,
        rhs: b,
    })
}

fn floor_div<T: PrimInt + Signed>(a: T, b: T) -> Option<T> {
    // `None` for MIN / -1, before `%` gets a chance to overflow.
    let q = a.checked_div(&b)?;
    let r = a % b;
    if !r.is_zero() && r.is_negative() != b.is_negative() {
        Some(q - T::one())
    } else {
        Some(q)
    }
}

// Pending work of the evaluator. Operands of an `Apply` are already on the
// value stack when it is popped.
enum Step<'a> {
    Visit(&'a Expr),
    Apply(Operator),
}

/// Tree-walking evaluator. Every visit appends to the trace buffer:
/// literals as their digits, binary nodes as `op(` left right `)`.
#[derive(Debug, Default)]
pub struct Interpreter {
    trace: String,
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Default::default()
    }

    /// Left operand first, then right, then the operator itself. Runs off
    /// an explicit stack since operator chains make arbitrarily deep trees.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<i64, EvalErr> {
        let mut steps = vec![Step::Visit(expr)];
        let mut values: Vec<i64> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit(Expr::Literal(v)) => {
                    self.trace.push_str(&v.to_string());
                    values.push(*v);
                }
                Step::Visit(Expr::Binary(op, l, r)) => {
                    self.trace.push(op.symbol());
                    self.trace.push('(');
                    steps.push(Step::Apply(*op));
                    steps.push(Step::Visit(r.as_ref()));
                    steps.push(Step::Visit(l.as_ref()));
                }
                Step::Apply(op) => {
                    self.trace.push(')');
                    let (Some(r), Some(l)) = (values.pop(), values.pop()) else {
                        unreachable!("both operands are visited before their operator");
                    };
                    let res = apply(op, l, r)?;
                    trace!(%op, l, r, res, "applied");
                    values.push(res);
                }
            }
        }

        let Some(value) = values.pop() else {
            unreachable!("a tree always leaves one value");
        };
        Ok(value)
    }

    pub fn trace(&self) -> &str {
        &self.trace
    }

    /// Hands out the trace collected so far and starts a fresh one.
    pub fn take_trace(&mut self) -> String {
        std::mem::take(&mut self.trace)
    }

    /// Evaluates an already parsed tree with a fresh trace.
    pub fn run_expr(&mut self, expr: &Expr) -> Result<Evaluation, EvalErr> {
        self.trace.clear();
        let value = self.evaluate(expr);
        let trace = self.take_trace();
        let value = value?;
        debug!(value, %trace, "evaluated");
        Ok(Evaluation { value, trace })
    }

    /// Scans, parses and evaluates one line.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn run(&mut self, code: &str) -> Result<Evaluation, InterpretErr> {
        let expr = parse(scan(code))?;
        Ok(self.run_expr(&expr)?)
    }
}
