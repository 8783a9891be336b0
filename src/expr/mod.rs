//! Expression plumbing between hybrids and SeaQuery.
//!
//! - `adapter`: `Clause`, `HasClauseElement` and `adapt()`
//! - `operator`: operators routed through comparators

pub mod adapter;
pub mod operator;

pub use adapter::{adapt, adapt_all, Clause, HasClauseElement};
pub use operator::{BinaryOp, Operator};
