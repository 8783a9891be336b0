//! `HybridMethod`: the method counterpart of [`HybridProperty`](super::HybridProperty).
//!
//! Called on an instance it runs the method body in memory; called on a class
//! it produces an expression node, either from a dedicated expression builder
//! or by running the same body against the class.

use std::fmt;
use std::sync::Arc;

use sea_query::Expr;

use crate::entity::{Member, MemberId, ModelClass, Receiver};
use crate::error::HybridError;
use crate::expr::{adapt, Clause};
use crate::hybrid::property::HybridMeta;

type MethodBody<M, A, T> = Arc<dyn for<'a> Fn(Receiver<'a, M>, A) -> T + Send + Sync>;
type MethodExpr<A> = Arc<dyn Fn(&ModelClass, A) -> Clause + Send + Sync>;

/// A computed method with an in-memory and a SQL-expression form
///
/// ```no_run
/// use lifeguard_hybrid::{Fields, HybridMethod, ModelClass, Operand};
///
/// struct Interval {
///     start: i64,
///     end: i64,
/// }
///
/// impl Fields for Interval {
///     fn field(&self, name: &str) -> Operand {
///         if name == "start" { Operand::from(self.start) } else { Operand::from(self.end) }
///     }
/// }
///
/// let contains: HybridMethod<Interval, i64, Operand> = HybridMethod::new("contains", |this, point| {
///     this.field("start").lte(point).and(this.field("end").gt(point))
/// });
///
/// let class = ModelClass::builder("Interval").column("start").column("end").build();
/// assert_eq!(contains.call(&Interval { start: 0, end: 10 }, 5), Operand::from(true));
/// let filter = contains.call_class(&class, 5).unwrap();
/// ```
pub struct HybridMethod<M, A, T> {
    meta: HybridMeta,
    func: MethodBody<M, A, T>,
    expr: Option<MethodExpr<A>>,
}

impl<M, A, T> Clone for HybridMethod<M, A, T> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            func: Arc::clone(&self.func),
            expr: self.expr.clone(),
        }
    }
}

impl<M: 'static, A: 'static, T: 'static> HybridMethod<M, A, T> {
    pub fn new<F>(name: &str, func: F) -> Self
    where
        F: for<'a> Fn(Receiver<'a, M>, A) -> T + Send + Sync + 'static,
    {
        Self {
            meta: HybridMeta::new(name),
            func: Arc::new(func),
            expr: None,
        }
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

    /// Value mode
    pub fn call(&self, instance: &M, args: A) -> T {
        (self.func)(Receiver::Instance(instance), args)
    }

    /// Define the class-level form separately from the method body
    pub fn with_expression<F>(&self, expr: F) -> Self
    where
        F: Fn(&ModelClass, A) -> Clause + Send + Sync + 'static,
    {
        Self {
            meta: self.meta.renewed(),
            func: Arc::clone(&self.func),
            expr: Some(Arc::new(expr)),
        }
    }

    pub fn with_doc(&self, doc: &str) -> Self {
        Self {
            meta: self.meta.renewed().with_doc(doc),
            func: Arc::clone(&self.func),
            expr: self.expr.clone(),
        }
    }
}

impl<M: 'static, A: 'static, T: Into<Clause> + 'static> HybridMethod<M, A, T> {
    /// Expression mode
    pub fn call_class(&self, owner: &ModelClass, args: A) -> Result<Expr, HybridError> {
        let clause = match &self.expr {
            Some(expr) => expr(owner, args),
            None => (self.func)(Receiver::Class(owner), args).into(),
        };
        log::trace!("hybrid method '{}' called on {}", self.name(), owner.name());
        adapt(&clause)
    }
}

impl<M, A, T> Member for HybridMethod<M, A, T> {
    fn member_id(&self) -> MemberId {
        self.meta.id()
    }
}

impl<M, A, T> fmt::Debug for HybridMethod<M, A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HybridMethod")
            .field("name", &self.meta.name())
            .field("id", &self.meta.id())
            .field("expression", &self.expr.is_some())
            .finish()
    }
}
