//! Duck-typed scalars shared by value mode and expression mode.
//!
//! An [`Operand`] is whatever a hybrid getter reads from its receiver: a
//! [`Literal`] when the receiver is a model instance, a [`MappedColumn`] when
//! it is a model class. Operators on two literals are evaluated in memory;
//! every other combination builds a `sea_query::Expr`, so the same getter body
//! works in both modes.
//!
//! # Example
//!
//! ```no_run
//! use lifeguard_hybrid::{MappedColumn, Operand};
//!
//! // In memory
//! let length = Operand::from(10) - Operand::from(5);
//! assert_eq!(length, Operand::from(5));
//!
//! // Against columns
//! let end = MappedColumn::new("interval", "end");
//! let start = MappedColumn::new("interval", "start");
//! let length = Operand::from(end) - Operand::from(start);
//! assert!(length.as_literal().is_none());
//! ```

use std::ops::{Add, Div, Mul, Rem, Sub};

use sea_query::Expr;

use crate::entity::MappedColumn;
use crate::expr::BinaryOp;
use crate::value::Literal;

/// A value that is either known in memory or only known to the database
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Literal),
    Column(MappedColumn),
    Expr(Expr),
}

impl Operand {
    /// Apply a binary operator, evaluating in memory when both sides are literals.
    ///
    /// Two literals never produce an expression: an operation with no
    /// in-memory result (overflow, division by zero, mismatched types, NaN
    /// ordering) yields NULL.
    pub fn binary<R: Into<Operand>>(self, op: BinaryOp, rhs: R) -> Operand {
        let rhs = rhs.into();
        if let (Operand::Literal(l), Operand::Literal(r)) = (&self, &rhs) {
            let value = l.combine(op, r).unwrap_or_else(|| {
                log::trace!("{:?} {} {:?} has no in-memory result; yielding NULL", l, op.symbol(), r);
                Literal::Null
            });
            return Operand::Literal(value);
        }
        Operand::Expr(op.apply(self.into_expr(), rhs.into_expr()))
    }

    pub fn equals<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Eq, rhs)
    }

    pub fn not_equals<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Ne, rhs)
    }

    pub fn lt<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Lt, rhs)
    }

    pub fn lte<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Lte, rhs)
    }

    pub fn gt<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Gt, rhs)
    }

    pub fn gte<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Gte, rhs)
    }

    pub fn and<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::And, rhs)
    }

    pub fn or<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Or, rhs)
    }

    pub fn concat<R: Into<Operand>>(self, rhs: R) -> Operand {
        self.binary(BinaryOp::Concat, rhs)
    }

    pub fn like<R: Into<Operand>>(self, pattern: R) -> Operand {
        self.binary(BinaryOp::Like, pattern)
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Operand::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_literal().and_then(Literal::as_bool)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_literal().and_then(Literal::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_literal().and_then(Literal::as_str)
    }

    pub fn to_expr(&self) -> Expr {
        match self {
            Operand::Literal(l) => l.to_expr(),
            Operand::Column(c) => c.expr(),
            Operand::Expr(e) => e.clone(),
        }
    }

    pub fn into_expr(self) -> Expr {
        match self {
            Operand::Expr(e) => e,
            other => other.to_expr(),
        }
    }
}

macro_rules! impl_operand_from_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Operand {
                fn from(value: $t) -> Self {
                    Operand::Literal(Literal::from(value))
                }
            }
        )*
    };
}

impl_operand_from_literal!(bool, i32, i64, f64, &str, String);

impl From<Literal> for Operand {
    fn from(value: Literal) -> Self {
        Operand::Literal(value)
    }
}

impl From<MappedColumn> for Operand {
    fn from(value: MappedColumn) -> Self {
        Operand::Column(value)
    }
}

impl From<Expr> for Operand {
    fn from(value: Expr) -> Self {
        Operand::Expr(value)
    }
}

macro_rules! impl_operand_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<Operand>> $trait<R> for Operand {
            type Output = Operand;

            fn $method(self, rhs: R) -> Operand {
                self.binary($op, rhs)
            }
        }
    };
}

impl_operand_op!(Add, add, BinaryOp::Add);
impl_operand_op!(Sub, sub, BinaryOp::Sub);
impl_operand_op!(Mul, mul, BinaryOp::Mul);
impl_operand_op!(Div, div, BinaryOp::Div);
impl_operand_op!(Rem, rem, BinaryOp::Mod);
