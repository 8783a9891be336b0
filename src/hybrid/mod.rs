//! Hybrid attributes: one declaration, evaluated in memory on instances and
//! rendered as SQL expressions on classes.
//!
//! # Structure
//!
//! - `property`: `HybridProperty`, the descriptor and its per-class cache
//! - `method`: `HybridMethod`, the method form
//! - `comparator`: `Comparator` and the default `ExprComparator`
//! - `attribute`: `QueryableAttribute` and `InstrumentedAttribute`
//! - `update`: bulk-assignment tuples and `BulkUpdate`

pub mod attribute;
pub mod comparator;
pub mod method;
pub mod property;
pub mod update;

pub use attribute::{InstrumentedAttribute, QueryableAttribute};
pub use comparator::{Comparator, ExprComparator};
pub use method::HybridMethod;
pub use property::{Access, HybridMeta, HybridProperty, Info, Resolved};
pub use update::{BulkUpdate, UpdateTuple};
