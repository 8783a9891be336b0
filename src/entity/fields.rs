//! Field access shared by model instances and model classes.

use crate::entity::ModelClass;
use crate::value::Operand;

/// Look up a field by column name.
///
/// Model instances return the field's current value as a literal; model
/// classes return the mapped column. A hybrid getter written against this
/// trait therefore works in both value mode and expression mode.
///
/// # Example
///
/// ```no_run
/// use lifeguard_hybrid::{Fields, Operand};
///
/// struct Interval {
///     start: i64,
///     end: i64,
/// }
///
/// impl Fields for Interval {
///     fn field(&self, name: &str) -> Operand {
///         match name {
///             "start" => Operand::from(self.start),
///             "end" => Operand::from(self.end),
///             _ => Operand::from(lifeguard_hybrid::Literal::Null),
///         }
///     }
/// }
/// ```
pub trait Fields {
    fn field(&self, name: &str) -> Operand;
}

/// The receiver handed to hybrid getters: an instance or its class
pub enum Receiver<'a, M> {
    Instance(&'a M),
    Class(&'a ModelClass),
}

impl<'a, M> Receiver<'a, M> {
    pub fn instance(&self) -> Option<&'a M> {
        match self {
            Receiver::Instance(m) => Some(*m),
            Receiver::Class(_) => None,
        }
    }

    pub fn class(&self) -> Option<&'a ModelClass> {
        match self {
            Receiver::Instance(_) => None,
            Receiver::Class(c) => Some(*c),
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Receiver::Class(_))
    }
}

impl<M: Fields> Receiver<'_, M> {
    pub fn field(&self, name: &str) -> Operand {
        match self {
            Receiver::Instance(m) => m.field(name),
            Receiver::Class(c) => c.field(name),
        }
    }
}

impl<M> Clone for Receiver<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Receiver<'_, M> {}
