//! Expression adapter.
//!
//! Anything that takes part in operator dispatch is first turned into a
//! [`Clause`], and every clause is reduced to a `sea_query::Expr` by [`adapt`]
//! before an operator is applied to it. Nodes pass through unchanged, columns
//! and instrumented attributes yield their clause element, literals become
//! bound values, and [`HasClauseElement`] values are asked for their clause.

use std::fmt;
use std::sync::Arc;

use sea_query::Expr;

use crate::config;
use crate::entity::MappedColumn;
use crate::error::HybridError;
use crate::hybrid::{InstrumentedAttribute, QueryableAttribute};
use crate::value::{Literal, Operand};

/// Clause-extraction capability.
///
/// Implement this for value objects that stand in for an expression (for
/// example a wrapper that lower-cases whatever it holds). The returned clause
/// must be an expression node, a column or an attribute; a bare literal is
/// rejected by [`adapt`] with `InvalidExpressionType`.
pub trait HasClauseElement: fmt::Debug + Send + Sync {
    fn clause_element(&self) -> Clause;
}

/// Something that can stand on either side of an operator
#[derive(Clone)]
pub enum Clause {
    /// A node of the expression tree
    Node(Expr),
    /// A plain value, bound as a parameter
    Literal(Literal),
    /// An ordinary mapped column
    Column(MappedColumn),
    /// Another hybrid's class-level attribute
    Attribute(InstrumentedAttribute),
    /// A value exposing its own clause element
    Extract(Arc<dyn HasClauseElement>),
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::Node(e) => f.debug_tuple("Node").field(e).finish(),
            Clause::Literal(l) => f.debug_tuple("Literal").field(l).finish(),
            Clause::Column(c) => f.debug_tuple("Column").field(c).finish(),
            Clause::Attribute(a) => f
                .debug_tuple("Attribute")
                .field(&format_args!("{}.{}", a.class().name(), a.key()))
                .finish(),
            Clause::Extract(source) => f.debug_tuple("Extract").field(source).finish(),
        }
    }
}

/// Reduce a clause to an expression node.
pub fn adapt(clause: &Clause) -> Result<Expr, HybridError> {
    adapt_nested(clause, config::current().max_adapt_depth)
}

/// Adapt every operand, stopping at the first failure.
pub fn adapt_all(clauses: &[Clause]) -> Result<Vec<Expr>, HybridError> {
    clauses.iter().map(adapt).collect()
}

fn adapt_nested(clause: &Clause, remaining: usize) -> Result<Expr, HybridError> {
    match clause {
        Clause::Node(e) => Ok(e.clone()),
        Clause::Literal(l) => Ok(l.to_expr()),
        Clause::Column(c) => Ok(c.expr()),
        Clause::Attribute(a) => a.clause_element(),
        Clause::Extract(source) => extract(source.as_ref(), remaining),
    }
}

fn extract(source: &dyn HasClauseElement, remaining: usize) -> Result<Expr, HybridError> {
    if remaining == 0 {
        return Err(HybridError::InvalidExpressionType {
            found: format!("{:?} (clause element nesting too deep)", source),
        });
    }
    match source.clause_element() {
        Clause::Literal(l) => Err(HybridError::InvalidExpressionType {
            found: format!("{} literal from {:?}", l.type_name(), source),
        }),
        // each indirection spends one level of the depth budget
        Clause::Extract(inner) => extract(inner.as_ref(), remaining - 1),
        other => adapt_nested(&other, remaining - 1),
    }
}

impl From<Expr> for Clause {
    fn from(value: Expr) -> Self {
        Clause::Node(value)
    }
}

impl From<Literal> for Clause {
    fn from(value: Literal) -> Self {
        Clause::Literal(value)
    }
}

impl From<MappedColumn> for Clause {
    fn from(value: MappedColumn) -> Self {
        Clause::Column(value)
    }
}

impl From<InstrumentedAttribute> for Clause {
    fn from(value: InstrumentedAttribute) -> Self {
        Clause::Attribute(value)
    }
}

impl From<Arc<dyn HasClauseElement>> for Clause {
    fn from(value: Arc<dyn HasClauseElement>) -> Self {
        Clause::Extract(value)
    }
}

impl From<Operand> for Clause {
    fn from(value: Operand) -> Self {
        match value {
            Operand::Literal(l) => Clause::Literal(l),
            Operand::Column(c) => Clause::Column(c),
            Operand::Expr(e) => Clause::Node(e),
        }
    }
}

macro_rules! impl_clause_from_literal {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Clause {
                fn from(value: $t) -> Self {
                    Clause::Literal(Literal::from(value))
                }
            }
        )*
    };
}

impl_clause_from_literal!(bool, i32, i64, f64, &str, String);
