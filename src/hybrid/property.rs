//! `HybridProperty`: one declared attribute, two evaluation modes.
//!
//! Accessed through a model instance, a hybrid calls its getter and returns the
//! raw result. Accessed through a model class, it builds (once per class) a
//! comparator over an expression and returns an [`InstrumentedAttribute`] that
//! query code can use exactly like a mapped column.
//!
//! Hybrids are immutable. Every `with_*` method returns a new hybrid sharing
//! all other parts with the original, which stays usable.
//!
//! # Example
//!
//! ```no_run
//! use lifeguard_hybrid::{Fields, HybridProperty, ModelClass, Operand, QueryableAttribute};
//!
//! struct Interval {
//!     start: i64,
//!     end: i64,
//! }
//!
//! impl Fields for Interval {
//!     fn field(&self, name: &str) -> Operand {
//!         match name {
//!             "start" => Operand::from(self.start),
//!             _ => Operand::from(self.end),
//!         }
//!     }
//! }
//!
//! let length: HybridProperty<Interval, Operand> =
//!     HybridProperty::new("length", |this| this.field("end") - this.field("start"));
//! let class = ModelClass::builder("Interval")
//!     .column("start")
//!     .column("end")
//!     .member("length", &length)
//!     .build();
//!
//! // Value mode
//! assert_eq!(length.value(&Interval { start: 5, end: 10 }), Operand::from(5));
//!
//! // Expression mode
//! let long_intervals = length.expression(&class).unwrap().gt(10).unwrap();
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config;
use crate::entity::{ClassId, Fields, Member, MemberId, ModelClass, Receiver};
use crate::error::HybridError;
use crate::expr::Clause;
use crate::hybrid::attribute::InstrumentedAttribute;
use crate::hybrid::comparator::{Comparator, ExprComparator};
use crate::hybrid::update::UpdateTuple;
use crate::value::Operand;

/// Free-form metadata attached to a hybrid
pub type Info = serde_json::Map<String, serde_json::Value>;

type Getter<M, T> = Arc<dyn for<'a> Fn(Receiver<'a, M>) -> T + Send + Sync>;
type Setter<M, T> = Arc<dyn Fn(&mut M, T) + Send + Sync>;
type Deleter<M> = Arc<dyn Fn(&mut M) + Send + Sync>;
type ExprBuilder = Arc<dyn Fn(&ModelClass) -> Clause + Send + Sync>;
type ComparatorFactory = Arc<dyn Fn(&ModelClass) -> Arc<dyn Comparator> + Send + Sync>;
pub(crate) type UpdateBuilder =
    Arc<dyn Fn(&ModelClass, Operand) -> Result<Vec<UpdateTuple>, HybridError> + Send + Sync>;

/// Identity and descriptive metadata of a hybrid
///
/// This is what class-level attributes keep of the hybrid that produced them.
#[derive(Debug, Clone)]
pub struct HybridMeta {
    id: MemberId,
    name: Arc<str>,
    doc: Option<Arc<str>>,
    info: Arc<Info>,
}

impl HybridMeta {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            id: MemberId::next(),
            name: Arc::from(name),
            doc: None,
            info: Arc::new(Info::new()),
        }
    }

    /// Same name, doc and info under a fresh identity
    pub(crate) fn renewed(&self) -> Self {
        Self {
            id: MemberId::next(),
            ..self.clone()
        }
    }

    pub(crate) fn with_doc(mut self, doc: &str) -> Self {
        self.doc = Some(Arc::from(doc));
        self
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    /// The name the hybrid was created with
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn info(&self) -> &Info {
        &self.info
    }
}

/// How a hybrid is being accessed
pub enum Access<'a, M> {
    /// Through a model instance: value mode
    Instance(&'a M),
    /// Through a model class: expression mode
    Class(&'a ModelClass),
    /// Without an owner: yields the hybrid itself
    Unbound,
}

/// The result of [`HybridProperty::get`]
pub enum Resolved<M, T> {
    Value(T),
    Expression(InstrumentedAttribute),
    Descriptor(HybridProperty<M, T>),
}

impl<M, T> Resolved<M, T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Resolved::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_expression(self) -> Option<InstrumentedAttribute> {
        match self {
            Resolved::Expression(attribute) => Some(attribute),
            _ => None,
        }
    }

    pub fn into_descriptor(self) -> Option<HybridProperty<M, T>> {
        match self {
            Resolved::Descriptor(hybrid) => Some(hybrid),
            _ => None,
        }
    }
}

/// Class-level views, one per owning class
#[derive(Default)]
struct ExprCache {
    views: RwLock<HashMap<ClassId, InstrumentedAttribute>>,
}

impl ExprCache {
    fn get(&self, class: ClassId) -> Option<InstrumentedAttribute> {
        self.views
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&class)
            .cloned()
    }

    /// Publish `view` unless another caller got there first; returns the
    /// published view either way.
    fn publish(&self, class: ClassId, view: InstrumentedAttribute) -> InstrumentedAttribute {
        self.views
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(class)
            .or_insert(view)
            .clone()
    }

    fn len(&self) -> usize {
        self.views.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// A computed attribute with an in-memory and a SQL-expression form
///
/// `M` is the model type, `T` the getter's result type. Clones share identity
/// and the class-level cache.
pub struct HybridProperty<M, T> {
    meta: HybridMeta,
    fget: Getter<M, T>,
    fset: Option<Setter<M, T>>,
    fdel: Option<Deleter<M>>,
    expr: Option<ExprBuilder>,
    custom_comparator: Option<ComparatorFactory>,
    update_expr: Option<UpdateBuilder>,
    cache: Arc<ExprCache>,
}

impl<M, T> Clone for HybridProperty<M, T> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            fget: Arc::clone(&self.fget),
            fset: self.fset.clone(),
            fdel: self.fdel.clone(),
            expr: self.expr.clone(),
            custom_comparator: self.custom_comparator.clone(),
            update_expr: self.update_expr.clone(),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<M: 'static, T: 'static> HybridProperty<M, T> {
    /// Create a hybrid from its getter.
    ///
    /// The getter receives either an instance or the owning class; when no
    /// expression or comparator is defined it is also what produces the
    /// class-level expression.
    pub fn new<F>(name: &str, fget: F) -> Self
    where
        F: for<'a> Fn(Receiver<'a, M>) -> T + Send + Sync + 'static,
    {
        Self {
            meta: HybridMeta::new(name),
            fget: Arc::new(fget),
            fset: None,
            fdel: None,
            expr: None,
            custom_comparator: None,
            update_expr: None,
            cache: Arc::default(),
        }
    }

    /// Copy with a fresh identity and an empty cache, then override
    fn rebind(&self, apply: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        next.meta = self.meta.renewed();
        next.cache = Arc::default();
        apply(&mut next);
        next
    }

    pub fn meta(&self) -> &HybridMeta {
        &self.meta
    }

    pub fn name(&self) -> &str {
        self.meta.name()
    }

    pub fn doc(&self) -> Option<&str> {
        self.meta.doc()
    }

    pub fn info(&self) -> &Info {
        self.meta.info()
    }

    pub fn has_setter(&self) -> bool {
        self.fset.is_some()
    }

    pub fn has_deleter(&self) -> bool {
        self.fdel.is_some()
    }

    pub fn has_expression(&self) -> bool {
        self.expr.is_some()
    }

    pub fn has_comparator(&self) -> bool {
        self.custom_comparator.is_some()
    }

    pub fn has_update_expression(&self) -> bool {
        self.update_expr.is_some()
    }

    /// Returns this hybrid; marks a subclass redeclaration of an inherited hybrid.
    ///
    /// ```no_run
    /// # use lifeguard_hybrid::{HybridProperty, Operand, Fields};
    /// # struct Interval;
    /// # impl Fields for Interval { fn field(&self, _: &str) -> Operand { Operand::from(0) } }
    /// # let length: HybridProperty<Interval, Operand> = HybridProperty::new("length", |this| this.field("end"));
    /// let sub_length = length
    ///     .overrides()
    ///     .with_expression(|_cls| sea_query::Expr::cust("0").into());
    /// ```
    pub fn overrides(&self) -> &Self {
        self
    }

    /// Value mode: call the getter on `instance`
    pub fn value(&self, instance: &M) -> T {
        (self.fget)(Receiver::Instance(instance))
    }

    pub fn set(&self, instance: &mut M, value: T) -> Result<(), HybridError> {
        match &self.fset {
            Some(fset) => {
                fset(instance, value);
                Ok(())
            }
            None => Err(HybridError::AttributeUnsettable {
                attribute: self.name().to_string(),
            }),
        }
    }

    pub fn delete(&self, instance: &mut M) -> Result<(), HybridError> {
        match &self.fdel {
            Some(fdel) => {
                fdel(instance);
                Ok(())
            }
            None => Err(HybridError::AttributeUndeletable {
                attribute: self.name().to_string(),
            }),
        }
    }

    pub fn with_getter<F>(&self, fget: F) -> Self
    where
        F: for<'a> Fn(Receiver<'a, M>) -> T + Send + Sync + 'static,
    {
        self.rebind(|next| next.fget = Arc::new(fget))
    }

    pub fn with_setter<F>(&self, fset: F) -> Self
    where
        F: Fn(&mut M, T) + Send + Sync + 'static,
    {
        self.rebind(|next| next.fset = Some(Arc::new(fset)))
    }

    pub fn with_deleter<F>(&self, fdel: F) -> Self
    where
        F: Fn(&mut M) + Send + Sync + 'static,
    {
        self.rebind(|next| next.fdel = Some(Arc::new(fdel)))
    }

    /// Define the class-level expression separately from the getter
    pub fn with_expression<F>(&self, expr: F) -> Self
    where
        F: Fn(&ModelClass) -> Clause + Send + Sync + 'static,
    {
        self.rebind(|next| next.expr = Some(Arc::new(expr)))
    }

    /// Define a custom comparator; takes priority over any expression
    pub fn with_comparator<F>(&self, comparator: F) -> Self
    where
        F: Fn(&ModelClass) -> Arc<dyn Comparator> + Send + Sync + 'static,
    {
        self.rebind(|next| next.custom_comparator = Some(Arc::new(comparator)))
    }

    /// Define how a bulk-assigned value becomes column assignments
    pub fn with_update_expression<F>(&self, update: F) -> Self
    where
        F: Fn(&ModelClass, Operand) -> Result<Vec<UpdateTuple>, HybridError>
            + Send
            + Sync
            + 'static,
    {
        self.rebind(|next| next.update_expr = Some(Arc::new(update)))
    }

    pub fn with_doc(&self, doc: &str) -> Self {
        self.rebind(|next| next.meta = next.meta.clone().with_doc(doc))
    }

    pub fn with_info(&self, info: Info) -> Self {
        self.rebind(|next| next.meta.info = Arc::new(info))
    }
}

impl<M, T> HybridProperty<M, T>
where
    M: Fields + 'static,
    T: Into<Clause> + 'static,
{
    /// Dispatch on how the hybrid is accessed
    pub fn get(&self, access: Access<'_, M>) -> Result<Resolved<M, T>, HybridError> {
        match access {
            Access::Instance(instance) => Ok(Resolved::Value(self.value(instance))),
            Access::Class(owner) => self.expression(owner).map(Resolved::Expression),
            Access::Unbound => Ok(Resolved::Descriptor(self.clone())),
        }
    }

    /// Expression mode: the class-level attribute for `owner`.
    ///
    /// Built on first access per owning class and cached afterwards. The
    /// cache lock is not held while building, so building may resolve other
    /// hybrids of the same class; concurrent first accesses all return the
    /// first published attribute.
    pub fn expression(&self, owner: &ModelClass) -> Result<InstrumentedAttribute, HybridError> {
        // fast path: read lock only
        if let Some(view) = self.cache.get(owner.id()) {
            log::trace!("hybrid '{}' on {}: cached", self.name(), owner.name());
            return Ok(view);
        }
        // built without holding the lock; a racing build may win the publish
        let view = self.build_view(owner)?;
        Ok(self.cache.publish(owner.id(), view))
    }

    /// Number of owning classes with a cached class-level attribute
    pub fn cached_classes(&self) -> usize {
        self.cache.len()
    }

    fn expr_comparator(&self, owner: &ModelClass) -> Arc<dyn Comparator> {
        // a custom comparator replaces the expression entirely
        if let Some(factory) = &self.custom_comparator {
            return factory(owner);
        }
        let expression = match &self.expr {
            Some(expr) => expr(owner),
            None => (self.fget)(Receiver::Class(owner)).into(),
        };
        Arc::new(ExprComparator::new(
            owner.clone(),
            expression,
            self.meta.clone(),
            self.update_expr.clone(),
        ))
    }

    fn build_view(&self, owner: &ModelClass) -> Result<InstrumentedAttribute, HybridError> {
        let comparator = self.expr_comparator(owner);
        // fail at first access rather than when the expression is first used
        comparator.clause_element()?;

        // most-derived registration wins
        let key = match owner.resolve_member_key(self.meta.id()) {
            Some(key) => key.to_string(),
            None => {
                log::warn!(
                    "hybrid '{}' is not registered on {} or its ancestors",
                    self.name(),
                    owner.name()
                );
                config::current().unknown_attribute_key.clone()
            }
        };
        log::debug!(
            "hybrid '{}' resolved on {} as '{}'",
            self.name(),
            owner.name(),
            key
        );
        Ok(InstrumentedAttribute::new(
            owner.clone(),
            key,
            self.meta.clone(),
            comparator,
        ))
    }
}

impl<M, T> Member for HybridProperty<M, T> {
    fn member_id(&self) -> MemberId {
        self.meta.id()
    }
}

impl<M, T> fmt::Debug for HybridProperty<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridProperty")
            .field("name", &self.meta.name())
            .field("id", &self.meta.id())
            .field("setter", &self.fset.is_some())
            .field("deleter", &self.fdel.is_some())
            .field("expression", &self.expr.is_some())
            .field("comparator", &self.custom_comparator.is_some())
            .field("update_expression", &self.update_expr.is_some())
            .finish()
    }
}
