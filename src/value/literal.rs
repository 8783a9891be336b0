//! Plain in-memory values.
//!
//! A `Literal` is what a model field holds at runtime. Binary operators on two
//! literals are evaluated in memory; when that is not possible the caller keeps
//! the operation symbolic instead (see [`Operand`](super::Operand)).

use std::cmp::Ordering;

use sea_query::Expr;
use serde::{Deserialize, Serialize};

use crate::expr::BinaryOp;

/// A plain value held by a model instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Literal {
    /// Short type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::Bool(_) => "bool",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Text(_) => "text",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Int(i) => Some(*i as f64),
            Literal::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Bound-parameter node for this value
    pub fn to_expr(&self) -> Expr {
        match self {
            Literal::Null => Expr::cust("NULL"),
            Literal::Bool(b) => Expr::val(*b),
            Literal::Int(i) => Expr::val(*i),
            Literal::Float(f) => Expr::val(*f),
            Literal::Text(s) => Expr::val(s.clone()),
        }
    }

    /// Evaluate `self <op> rhs` in memory.
    ///
    /// Returns `None` when the operation has no in-memory meaning for these
    /// operands (mismatched types, integer overflow, division by zero).
    /// With NULL on either side, `Eq`/`Ne` compare plainly (`Null == Null`
    /// holds) and every other operator yields NULL.
    pub fn combine(&self, op: BinaryOp, rhs: &Literal) -> Option<Literal> {
        match (self, rhs) {
            (Literal::Null, _) | (_, Literal::Null) => Some(match op {
                BinaryOp::Eq => Literal::Bool(self.is_null() && rhs.is_null()),
                BinaryOp::Ne => Literal::Bool(self.is_null() != rhs.is_null()),
                _ => Literal::Null,
            }),
            (Literal::Int(a), Literal::Int(b)) => int_op(op, *a, *b),
            (Literal::Int(a), Literal::Float(b)) => float_op(op, *a as f64, *b),
            (Literal::Float(a), Literal::Int(b)) => float_op(op, *a, *b as f64),
            (Literal::Float(a), Literal::Float(b)) => float_op(op, *a, *b),
            (Literal::Text(a), Literal::Text(b)) => text_op(op, a, b),
            (Literal::Bool(a), Literal::Bool(b)) => bool_op(op, *a, *b),
            _ => None,
        }
    }
}

fn compare(op: BinaryOp, ordering: Ordering) -> Option<Literal> {
    let result = match op {
        BinaryOp::Eq => ordering == Ordering::Equal,
        BinaryOp::Ne => ordering != Ordering::Equal,
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::Lte => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::Gte => ordering != Ordering::Less,
        _ => return None,
    };
    Some(Literal::Bool(result))
}

fn int_op(op: BinaryOp, a: i64, b: i64) -> Option<Literal> {
    match op {
        BinaryOp::Add => a.checked_add(b).map(Literal::Int),
        BinaryOp::Sub => a.checked_sub(b).map(Literal::Int),
        BinaryOp::Mul => a.checked_mul(b).map(Literal::Int),
        BinaryOp::Div => a.checked_div(b).map(Literal::Int),
        BinaryOp::Mod => a.checked_rem(b).map(Literal::Int),
        _ => compare(op, a.cmp(&b)),
    }
}

fn float_op(op: BinaryOp, a: f64, b: f64) -> Option<Literal> {
    match op {
        BinaryOp::Add => Some(Literal::Float(a + b)),
        BinaryOp::Sub => Some(Literal::Float(a - b)),
        BinaryOp::Mul => Some(Literal::Float(a * b)),
        BinaryOp::Div if b != 0.0 => Some(Literal::Float(a / b)),
        BinaryOp::Mod if b != 0.0 => Some(Literal::Float(a % b)),
        BinaryOp::Div | BinaryOp::Mod => None,
        _ => compare(op, a.partial_cmp(&b)?),
    }
}

fn text_op(op: BinaryOp, a: &str, b: &str) -> Option<Literal> {
    match op {
        BinaryOp::Add | BinaryOp::Concat => Some(Literal::Text(format!("{}{}", a, b))),
        BinaryOp::Like => Some(Literal::Bool(like_match(a, b))),
        BinaryOp::NotLike => Some(Literal::Bool(!like_match(a, b))),
        _ => compare(op, a.cmp(b)),
    }
}

fn bool_op(op: BinaryOp, a: bool, b: bool) -> Option<Literal> {
    match op {
        BinaryOp::And => Some(Literal::Bool(a && b)),
        BinaryOp::Or => Some(Literal::Bool(a || b)),
        BinaryOp::Eq => Some(Literal::Bool(a == b)),
        BinaryOp::Ne => Some(Literal::Bool(a != b)),
        _ => None,
    }
}

/// SQL `LIKE` matching: `%` is any run of characters, `_` is one character.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    // matches[j]: pattern[..j] matches the text consumed so far
    let mut matches = vec![false; pattern.len() + 1];
    matches[0] = true;
    for j in 1..=pattern.len() {
        matches[j] = matches[j - 1] && pattern[j - 1] == '%';
    }
    for c in text {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || matches[j],
                '_' => matches[j - 1],
                p => matches[j - 1] && p == c,
            };
        }
        matches = next;
    }
    matches[pattern.len()]
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value.into())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Text(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Text(value)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map_or(Literal::Null, Into::into)
    }
}
