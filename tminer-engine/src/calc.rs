//! # Calculator
//!
//! Arithmetic over resolved tokens. Expressions are a small AST evaluated
//! recursively; the text form `({button.scale.active.height} * 2) + 8` is
//! parsed into the same AST, with `{...}` marking token paths.
//!
//! ```rust
//! use tminer_engine::calc::{parse, Expr};
//!
//! let expr = parse("({button.height} * 2) + 8").unwrap();
//! assert_eq!(
//!     expr,
//!     Expr::token("button.height") * Expr::number(2.0) + Expr::number(8.0)
//! );
//! ```

use std::fmt;
use std::ops;

use serde_json::Value;
use thiserror::Error;

use crate::value::as_number;

/// Binary operator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Remainder.
    Mod,
}

impl BinOp {
    /// Get the operator precedence (higher = binds tighter).
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 2,
        }
    }

    /// Get the symbol for the operator.
    pub fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Mod => '%',
        }
    }

    fn from_symbol(c: char) -> Option<BinOp> {
        match c {
            '+' => Some(BinOp::Add),
            '-' => Some(BinOp::Sub),
            '*' => Some(BinOp::Mul),
            '/' => Some(BinOp::Div),
            '%' => Some(BinOp::Mod),
            _ => None,
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Token path resolved at evaluation time.
    Token(String),
    /// Numeric negation.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Numeric literal.
    pub fn number(n: f64) -> Self {
        Expr::Number(n)
    }

    /// Token reference.
    pub fn token(path: impl Into<String>) -> Self {
        Expr::Token(path.into())
    }

    /// Binary operation.
    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Rewrite every token path with `f`.
    pub fn map_tokens<F>(self, f: &F) -> Expr
    where
        F: Fn(&str) -> String,
    {
        match self {
            Expr::Token(path) => Expr::Token(f(&path)),
            Expr::Neg(inner) => Expr::Neg(Box::new(inner.map_tokens(f))),
            Expr::Binary(op, lhs, rhs) => Expr::binary(op, lhs.map_tokens(f), rhs.map_tokens(f)),
            number => number,
        }
    }

    /// Evaluate, resolving tokens through `lookup`.
    pub fn eval<F>(&self, lookup: &mut F) -> Result<f64, CalcError>
    where
        F: FnMut(&str) -> Option<Value>,
    {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Token(path) => {
                let value = lookup(path).ok_or_else(|| CalcError::AbsentToken(path.clone()))?;
                as_number(&value).ok_or_else(|| CalcError::NonNumeric(path.clone()))
            }
            Expr::Neg(inner) => Ok(-inner.eval(lookup)?),
            Expr::Binary(op, lhs, rhs) => {
                let l = lhs.eval(lookup)?;
                let r = rhs.eval(lookup)?;
                match op {
                    BinOp::Add => Ok(l + r),
                    BinOp::Sub => Ok(l - r),
                    BinOp::Mul => Ok(l * r),
                    BinOp::Div | BinOp::Mod if r == 0.0 => Err(CalcError::DivisionByZero),
                    BinOp::Div => Ok(l / r),
                    BinOp::Mod => Ok(l % r),
                }
            }
        }
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl ops::$trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, BinOp::Add);
impl_binary_op!(Sub, sub, BinOp::Sub);
impl_binary_op!(Mul, mul, BinOp::Mul);
impl_binary_op!(Div, div, BinOp::Div);
impl_binary_op!(Rem, rem, BinOp::Mod);

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{n}"),
            Expr::Token(path) => write!(f, "{{{path}}}"),
            Expr::Neg(inner) => write!(f, "-{inner}"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
        }
    }
}

/// Errors from parsing or evaluating a calculation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// Unexpected character in the expression text.
    #[error("unexpected '{ch}' at {pos}")]
    UnexpectedChar {
        /// The character.
        ch: char,
        /// Its character offset.
        pos: usize,
    },
    /// Expression text ended early.
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    /// Malformed numeric literal.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    /// A token path did not resolve.
    #[error("token '{0}' is not set")]
    AbsentToken(String),
    /// A token path resolved to something that is not a number.
    #[error("token '{0}' is not numeric")]
    NonNumeric(String),
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            source,
        }
    }

    fn skip_ws(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_ws();
        self.chars.get(self.pos).copied()
    }

    fn expr(&mut self, min_prec: u8) -> Result<Expr, CalcError> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.peek().and_then(BinOp::from_symbol) {
            if op.precedence() < min_prec {
                break;
            }
            self.pos += 1;
            let rhs = self.expr(op.precedence() + 1)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some('+') => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.peek() {
            None => Err(CalcError::UnexpectedEnd),
            Some('(') => {
                self.pos += 1;
                let inner = self.expr(0)?;
                self.expect(')')?;
                Ok(inner)
            }
            Some('{') => {
                self.pos += 1;
                let start = self.pos;
                while self.chars.get(self.pos).is_some_and(|c| *c != '}') {
                    self.pos += 1;
                }
                let path: String = self.chars[start..self.pos].iter().collect();
                self.expect('}')?;
                let path = path.trim();
                if path.is_empty() {
                    return Err(CalcError::UnexpectedChar { ch: '}', pos: self.pos - 1 });
                }
                Ok(Expr::token(path))
            }
            Some(c) if c.is_ascii_digit() || c == '.' => {
                let start = self.pos;
                while self
                    .chars
                    .get(self.pos)
                    .is_some_and(|c| c.is_ascii_digit() || *c == '.')
                {
                    self.pos += 1;
                }
                let text: String = self.chars[start..self.pos].iter().collect();
                text.parse::<f64>()
                    .map(Expr::Number)
                    .map_err(|_| CalcError::InvalidNumber(text))
            }
            Some(ch) => Err(CalcError::UnexpectedChar { ch, pos: self.pos }),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), CalcError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(ch) => Err(CalcError::UnexpectedChar { ch, pos: self.pos }),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}

/// Parse calculation text into an [`Expr`].
pub fn parse(source: &str) -> Result<Expr, CalcError> {
    let mut parser = Parser::new(source);
    let expr = parser.expr(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(ch) => {
            log::trace!("Trailing input in calculation '{}'", parser.source);
            Err(CalcError::UnexpectedChar { ch, pos: parser.pos })
        }
    }
}
