//! Model classes and the columns they map.
//!
//! # Structure
//!
//! - `class`: `ModelClass`, member registration, aliased classes
//! - `column`: `MappedColumn`, an ordinary mapped column
//! - `fields`: `Fields` and the instance/class `Receiver`

pub mod class;
pub mod column;
pub mod fields;

pub use class::{AliasedClass, ClassId, Member, MemberId, ModelClass, ModelClassBuilder};
pub use column::MappedColumn;
pub use fields::{Fields, Receiver};
