//! Values read from hybrid receivers.
//!
//! - `literal`: plain in-memory values and their in-memory operators
//! - `operand`: literal-or-expression scalars used by hybrid getters

pub mod literal;
pub mod operand;

pub use literal::Literal;
pub use operand::Operand;
