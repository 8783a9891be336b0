//! # Lifeguard Hybrid
//!
//! Hybrid attributes for SeaQuery-backed models: a computed attribute declared
//! once that evaluates in memory when read from a model instance, and renders
//! as a SQL expression when read from the model class.
//!
//! See [README on GitHub](https://github.com/microscaler/lifeguard) for the wider ORM.

pub mod config;
pub mod entity;
pub mod error;
pub mod expr;
pub mod hybrid;
pub mod value;

pub use config::HybridConfig;
pub use entity::{
    AliasedClass, ClassId, Fields, MappedColumn, Member, MemberId, ModelClass, ModelClassBuilder,
    Receiver,
};
pub use error::HybridError;
pub use expr::{adapt, adapt_all, BinaryOp, Clause, HasClauseElement, Operator};
pub use hybrid::{
    Access, BulkUpdate, Comparator, ExprComparator, HybridMeta, HybridMethod, HybridProperty,
    Info, InstrumentedAttribute, QueryableAttribute, Resolved, UpdateTuple,
};
pub use value::{Literal, Operand};
