//! Comparators: the expression-mode behaviour of a hybrid for one owning class.
//!
//! [`Comparator`] is the extension point for custom comparison semantics. Its
//! provided methods implement the default pass-through: every operator is
//! applied directly to the adapted expression. [`ExprComparator`] is the
//! comparator built for hybrids that define an expression (or fall back to
//! their getter).

use std::fmt;
use std::sync::Arc;

use sea_query::Expr;

use crate::entity::{AliasedClass, ModelClass};
use crate::error::HybridError;
use crate::expr::{adapt, adapt_all, Clause, Operator};
use crate::hybrid::attribute::QueryableAttribute;
use crate::hybrid::property::{HybridMeta, Info, UpdateBuilder};
use crate::hybrid::update::UpdateTuple;
use crate::value::Operand;

/// Expression-mode behaviour of a hybrid
///
/// Only [`expression`](Comparator::expression) is required. Override
/// [`operate`](Comparator::operate) to change how operators are rendered,
/// e.g. to compare case-insensitively:
///
/// ```no_run
/// use lifeguard_hybrid::{adapt, adapt_all, Clause, Comparator, HybridError, Operator};
/// use sea_query::{Expr, Func};
///
/// struct CaseInsensitive(Clause);
///
/// impl Comparator for CaseInsensitive {
///     fn expression(&self) -> Clause {
///         self.0.clone()
///     }
///
///     fn operate(&self, op: Operator, others: &[Clause]) -> Result<Expr, HybridError> {
///         let lhs = Expr::from(Func::lower(self.clause_element()?));
///         let rhs = adapt_all(others)?
///             .into_iter()
///             .map(|e| Expr::from(Func::lower(e)))
///             .collect();
///         op.apply(lhs, rhs)
///     }
/// }
/// ```
pub trait Comparator: Send + Sync {
    /// The wrapped expression
    fn expression(&self) -> Clause;

    /// The wrapped expression as a node of the expression tree
    fn clause_element(&self) -> Result<Expr, HybridError> {
        adapt(&self.expression())
    }

    /// `expression <op> others...`
    fn operate(&self, op: Operator, others: &[Clause]) -> Result<Expr, HybridError> {
        op.apply(self.clause_element()?, adapt_all(others)?)
    }

    /// `other <op> expression`
    fn reverse_operate(&self, op: Operator, other: &Clause) -> Result<Expr, HybridError> {
        op.apply(adapt(other)?, vec![self.clause_element()?])
    }

    /// Translate `attribute = value` in a bulk UPDATE into column assignments.
    ///
    /// The default only knows how to assign to a wrapped column or attribute.
    /// When it reports `AmbiguousUpdateTarget`, [`InstrumentedAttribute`]
    /// still assigns to the owner's column if the clause element is one.
    ///
    /// [`InstrumentedAttribute`]: crate::hybrid::InstrumentedAttribute
    fn bulk_update_tuples(&self, value: Operand) -> Result<Vec<UpdateTuple>, HybridError> {
        match self.expression() {
            Clause::Column(column) => column.bulk_update_tuples(value),
            Clause::Attribute(attribute) => attribute.bulk_update_tuples(value),
            other => Err(HybridError::AmbiguousUpdateTarget {
                attribute: format!("{:?}", other),
            }),
        }
    }

    /// Re-home this comparator onto an aliased owning entity.
    ///
    /// `None` keeps the comparator as it is.
    fn adapt_to_entity(&self, _alias: &AliasedClass) -> Option<Arc<dyn Comparator>> {
        None
    }

    /// Documentation shown on the class-level attribute
    fn doc(&self) -> Option<String> {
        None
    }
}

/// Comparator bound to one owning class and the expression computed for it
pub struct ExprComparator {
    class: ModelClass,
    expression: Clause,
    hybrid: HybridMeta,
    update_expr: Option<UpdateBuilder>,
}

impl ExprComparator {
    pub(crate) fn new(
        class: ModelClass,
        expression: Clause,
        hybrid: HybridMeta,
        update_expr: Option<UpdateBuilder>,
    ) -> Self {
        Self {
            class,
            expression,
            hybrid,
            update_expr,
        }
    }

    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    pub fn hybrid(&self) -> &HybridMeta {
        &self.hybrid
    }

    pub fn info(&self) -> &Info {
        self.hybrid.info()
    }
}

impl Comparator for ExprComparator {
    fn expression(&self) -> Clause {
        self.expression.clone()
    }

    fn bulk_update_tuples(&self, value: Operand) -> Result<Vec<UpdateTuple>, HybridError> {
        // A hybrid that re-exposes one attribute updates through that attribute,
        // even when it also defines an update expression.
        match &self.expression {
            Clause::Column(column) => return column.bulk_update_tuples(value),
            Clause::Attribute(attribute) => return attribute.bulk_update_tuples(value),
            _ => {}
        }
        // Explicit update builder
        if let Some(update_expr) = &self.update_expr {
            return update_expr(&self.class, value);
        }
        // A node that is exactly one of the owner's columns is still assignable
        let node = self.clause_element()?;
        match self.class.columns().into_iter().find(|column| column.expr() == node) {
            Some(column) => Ok(vec![(column, value)]),
            None => Err(HybridError::AmbiguousUpdateTarget {
                attribute: format!("{}.{}", self.class.name(), self.hybrid.name()),
            }),
        }
    }
}

impl fmt::Debug for ExprComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExprComparator")
            .field("class", &self.class.name())
            .field("expression", &self.expression)
            .field("hybrid", &self.hybrid.name())
            .finish()
    }
}
