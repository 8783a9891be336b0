//! Class-level attributes.
//!
//! [`QueryableAttribute`] is what downstream query code programs against. It
//! is implemented by [`MappedColumn`] and by [`InstrumentedAttribute`], the
//! object a hybrid returns when it is accessed through its class, so a hybrid
//! can be used anywhere an ordinary column can.

use std::fmt;
use std::sync::Arc;

use sea_query::Expr;

use crate::entity::{AliasedClass, MappedColumn, ModelClass};
use crate::error::HybridError;
use crate::expr::{adapt, adapt_all, BinaryOp, Clause, Operator};
use crate::hybrid::comparator::Comparator;
use crate::hybrid::property::{HybridMeta, Info};
use crate::hybrid::update::UpdateTuple;
use crate::value::Operand;

/// An attribute usable in filters, projections, ordering and bulk updates
///
/// # Example
///
/// ```no_run
/// use lifeguard_hybrid::{MappedColumn, QueryableAttribute};
///
/// let age = MappedColumn::new("users", "age");
/// let adults = age.gte(18).unwrap();
/// let teens = age.between(13, 19).unwrap();
/// ```
pub trait QueryableAttribute {
    /// The attribute's published name
    fn key(&self) -> &str;

    fn clause_element(&self) -> Result<Expr, HybridError>;

    fn operate(&self, op: Operator, others: &[Clause]) -> Result<Expr, HybridError>;

    fn reverse_operate(&self, op: Operator, other: &Clause) -> Result<Expr, HybridError>;

    fn bulk_update_tuples(&self, value: Operand) -> Result<Vec<UpdateTuple>, HybridError>;

    /// `attribute = value`
    fn equals<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Eq.into(), &[value.into()])
    }

    /// `attribute <> value`
    fn not_equals<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Ne.into(), &[value.into()])
    }

    fn lt<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Lt.into(), &[value.into()])
    }

    fn lte<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Lte.into(), &[value.into()])
    }

    fn gt<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Gt.into(), &[value.into()])
    }

    fn gte<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Gte.into(), &[value.into()])
    }

    fn like<V: Into<Clause>>(&self, pattern: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Like.into(), &[pattern.into()])
    }

    fn plus<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Add.into(), &[value.into()])
    }

    fn minus<V: Into<Clause>>(&self, value: V) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(BinaryOp::Sub.into(), &[value.into()])
    }

    fn is_null(&self) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(Operator::IsNull, &[])
    }

    fn is_not_null(&self) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(Operator::IsNotNull, &[])
    }

    fn between<L: Into<Clause>, H: Into<Clause>>(&self, low: L, high: H) -> Result<Expr, HybridError>
    where
        Self: Sized,
    {
        self.operate(Operator::Between, &[low.into(), high.into()])
    }

    #[allow(clippy::wrong_self_convention)]
    fn is_in<V, I>(&self, values: I) -> Result<Expr, HybridError>
    where
        Self: Sized,
        V: Into<Clause>,
        I: IntoIterator<Item = V>,
    {
        let values: Vec<Clause> = values.into_iter().map(Into::into).collect();
        self.operate(Operator::In, &values)
    }
}

impl QueryableAttribute for MappedColumn {
    fn key(&self) -> &str {
        self.name()
    }

    fn clause_element(&self) -> Result<Expr, HybridError> {
        Ok(self.expr())
    }

    fn operate(&self, op: Operator, others: &[Clause]) -> Result<Expr, HybridError> {
        op.apply(self.expr(), adapt_all(others)?)
    }

    fn reverse_operate(&self, op: Operator, other: &Clause) -> Result<Expr, HybridError> {
        op.apply(adapt(other)?, vec![self.expr()])
    }

    fn bulk_update_tuples(&self, value: Operand) -> Result<Vec<UpdateTuple>, HybridError> {
        Ok(vec![(self.clone(), value)])
    }
}

struct AttributeInner {
    class: ModelClass,
    /// Set when adapted onto an aliased entity
    alias: Option<String>,
    key: String,
    hybrid: HybridMeta,
    comparator: Arc<dyn Comparator>,
}

/// A hybrid accessed through its owning class
///
/// Carries the published name, the hybrid's metadata and the comparator all
/// operators are routed through. Cheap to clone.
#[derive(Clone)]
pub struct InstrumentedAttribute {
    inner: Arc<AttributeInner>,
}

impl InstrumentedAttribute {
    pub(crate) fn new(
        class: ModelClass,
        key: String,
        hybrid: HybridMeta,
        comparator: Arc<dyn Comparator>,
    ) -> Self {
        Self {
            inner: Arc::new(AttributeInner {
                class,
                alias: None,
                key,
                hybrid,
                comparator,
            }),
        }
    }

    pub fn class(&self) -> &ModelClass {
        &self.inner.class
    }

    /// The alias this attribute was adapted onto, if any
    pub fn alias(&self) -> Option<&str> {
        self.inner.alias.as_deref()
    }

    /// The hybrid this attribute was produced by
    pub fn hybrid(&self) -> &HybridMeta {
        &self.inner.hybrid
    }

    pub fn comparator(&self) -> &Arc<dyn Comparator> {
        &self.inner.comparator
    }

    /// The comparator's documentation, else the hybrid's
    pub fn doc(&self) -> Option<String> {
        self.inner
            .comparator
            .doc()
            .or_else(|| self.inner.hybrid.doc().map(str::to_string))
    }

    pub fn info(&self) -> &Info {
        self.inner.hybrid.info()
    }

    /// The expression wrapped by the comparator, unadapted
    pub fn expression(&self) -> Clause {
        self.inner.comparator.expression()
    }

    /// The same attribute against an aliased owning entity.
    ///
    /// Comparators that don't re-home themselves are kept as they are.
    pub fn adapt_to_entity(&self, alias: &AliasedClass) -> InstrumentedAttribute {
        match self.inner.comparator.adapt_to_entity(alias) {
            Some(comparator) => InstrumentedAttribute {
                inner: Arc::new(AttributeInner {
                    class: alias.class().clone(),
                    alias: Some(alias.alias().to_string()),
                    key: self.inner.key.clone(),
                    hybrid: self.inner.hybrid.clone(),
                    comparator,
                }),
            },
            None => self.clone(),
        }
    }

    /// Whether both handles are the same published attribute
    pub fn ptr_eq(&self, other: &InstrumentedAttribute) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl QueryableAttribute for InstrumentedAttribute {
    fn key(&self) -> &str {
        &self.inner.key
    }

    fn clause_element(&self) -> Result<Expr, HybridError> {
        self.inner.comparator.clause_element()
    }

    fn operate(&self, op: Operator, others: &[Clause]) -> Result<Expr, HybridError> {
        self.inner.comparator.operate(op, others)
    }

    fn reverse_operate(&self, op: Operator, other: &Clause) -> Result<Expr, HybridError> {
        self.inner.comparator.reverse_operate(op, other)
    }

    fn bulk_update_tuples(&self, value: Operand) -> Result<Vec<UpdateTuple>, HybridError> {
        match self.inner.comparator.bulk_update_tuples(value.clone()) {
            Err(HybridError::AmbiguousUpdateTarget { .. }) => {
                // comparators don't know their owner; match the node against its columns here
                let node = self.clause_element()?;
                let columns = match &self.inner.alias {
                    Some(alias) => self
                        .class()
                        .columns()
                        .into_iter()
                        .map(|column| column.requalified(alias.clone()))
                        .collect(),
                    None => self.class().columns(),
                };
                match columns.into_iter().find(|column| column.expr() == node) {
                    Some(column) => Ok(vec![(column, value)]),
                    None => Err(HybridError::AmbiguousUpdateTarget {
                        attribute: format!("{}.{}", self.class().name(), self.key()),
                    }),
                }
            }
            other => other,
        }
    }
}

impl fmt::Debug for InstrumentedAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedAttribute")
            .field("class", &self.class().name())
            .field("alias", &self.inner.alias)
            .field("key", &self.inner.key)
            .field("hybrid", &self.inner.hybrid.name())
            .finish()
    }
}
