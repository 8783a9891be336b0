//! Operators that can be routed through a hybrid comparator.
//!
//! [`BinaryOp`] always takes exactly one right-hand operand, so it can be
//! applied infallibly. [`Operator`] adds unary and n-ary forms and checks
//! operand counts when applied.

use std::fmt;

use sea_query::{BinOper, Expr, ExprTrait};

use crate::error::HybridError;

/// Binary comparison, arithmetic and logic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Like,
    NotLike,
    Concat,
    And,
    Or,
}

impl BinaryOp {
    /// Build `lhs <op> rhs`
    pub fn apply(self, lhs: Expr, rhs: Expr) -> Expr {
        match self {
            BinaryOp::Eq => ExprTrait::eq(lhs, rhs),
            BinaryOp::Ne => ExprTrait::ne(lhs, rhs),
            BinaryOp::Lt => ExprTrait::lt(lhs, rhs),
            BinaryOp::Lte => ExprTrait::lte(lhs, rhs),
            BinaryOp::Gt => ExprTrait::gt(lhs, rhs),
            BinaryOp::Gte => ExprTrait::gte(lhs, rhs),
            BinaryOp::Add => ExprTrait::add(lhs, rhs),
            BinaryOp::Sub => ExprTrait::sub(lhs, rhs),
            BinaryOp::Mul => ExprTrait::mul(lhs, rhs),
            BinaryOp::Div => ExprTrait::div(lhs, rhs),
            BinaryOp::Mod => ExprTrait::modulo(lhs, rhs),
            // `like()` only accepts patterns, not expressions
            BinaryOp::Like => Expr::Binary(Box::new(lhs), BinOper::Like, Box::new(rhs)),
            BinaryOp::NotLike => Expr::Binary(Box::new(lhs), BinOper::NotLike, Box::new(rhs)),
            BinaryOp::Concat => {
                Expr::Binary(Box::new(lhs), BinOper::Custom("||"), Box::new(rhs))
            }
            BinaryOp::And => ExprTrait::and(lhs, rhs),
            BinaryOp::Or => ExprTrait::or(lhs, rhs),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Like => "LIKE",
            BinaryOp::NotLike => "NOT LIKE",
            BinaryOp::Concat => "||",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }
}

/// Any operator a comparator can be asked to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Binary(BinaryOp),
    Not,
    IsNull,
    IsNotNull,
    Between,
    NotBetween,
    In,
    NotIn,
}

impl Operator {
    /// Apply the operator to `lhs` and the right-hand operands.
    pub fn apply(self, lhs: Expr, rhs: Vec<Expr>) -> Result<Expr, HybridError> {
        match self {
            Operator::Binary(op) => {
                let [rhs] = self.expect_operands::<1>(rhs)?;
                Ok(op.apply(lhs, rhs))
            }
            Operator::Not => {
                self.expect_operands::<0>(rhs)?;
                Ok(ExprTrait::not(lhs))
            }
            Operator::IsNull => {
                self.expect_operands::<0>(rhs)?;
                Ok(ExprTrait::is_null(lhs))
            }
            Operator::IsNotNull => {
                self.expect_operands::<0>(rhs)?;
                Ok(ExprTrait::is_not_null(lhs))
            }
            Operator::Between => {
                let [low, high] = self.expect_operands::<2>(rhs)?;
                Ok(ExprTrait::between(lhs, low, high))
            }
            Operator::NotBetween => {
                let [low, high] = self.expect_operands::<2>(rhs)?;
                Ok(ExprTrait::not_between(lhs, low, high))
            }
            Operator::In | Operator::NotIn if rhs.is_empty() => {
                Err(HybridError::InvalidOperandCount {
                    operator: self.to_string(),
                    expected: 1,
                    found: 0,
                })
            }
            Operator::In => Ok(ExprTrait::is_in(lhs, rhs)),
            Operator::NotIn => Ok(ExprTrait::is_not_in(lhs, rhs)),
        }
    }

    fn expect_operands<const N: usize>(self, rhs: Vec<Expr>) -> Result<[Expr; N], HybridError> {
        let found = rhs.len();
        <[Expr; N]>::try_from(rhs).map_err(|_| HybridError::InvalidOperandCount {
            operator: self.to_string(),
            expected: N,
            found,
        })
    }
}

impl From<BinaryOp> for Operator {
    fn from(op: BinaryOp) -> Self {
        Operator::Binary(op)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Binary(op) => f.write_str(op.symbol()),
            Operator::Not => f.write_str("NOT"),
            Operator::IsNull => f.write_str("IS NULL"),
            Operator::IsNotNull => f.write_str("IS NOT NULL"),
            Operator::Between => f.write_str("BETWEEN"),
            Operator::NotBetween => f.write_str("NOT BETWEEN"),
            Operator::In => f.write_str("IN"),
            Operator::NotIn => f.write_str("NOT IN"),
        }
    }
}
