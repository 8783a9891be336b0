//! Error types for hybrid attribute operations.
//!
//! Every variant describes a mistake in how a hybrid was declared or used.
//! They are raised synchronously at the point of misuse and are never retried.

/// Error type for hybrid attribute operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HybridError {
    /// `set` was called on a hybrid without a setter
    AttributeUnsettable { attribute: String },
    /// `delete` was called on a hybrid without a deleter
    AttributeUndeletable { attribute: String },
    /// An expression builder or comparator produced something that is not
    /// an expression node
    InvalidExpressionType { found: String },
    /// Bulk assignment on a hybrid whose expression is not a single
    /// assignable column and which has no update expression
    AmbiguousUpdateTarget { attribute: String },
    /// An operator was applied to the wrong number of operands
    InvalidOperandCount {
        operator: String,
        expected: usize,
        found: usize,
    },
    /// A class was asked for a column it does not map
    UnknownColumn { class: String, column: String },
    /// Configuration could not be loaded
    Config(String),
}

impl std::fmt::Display for HybridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HybridError::AttributeUnsettable { attribute } => {
                write!(f, "can't set attribute '{}': hybrid has no setter", attribute)
            }
            HybridError::AttributeUndeletable { attribute } => {
                write!(f, "can't delete attribute '{}': hybrid has no deleter", attribute)
            }
            HybridError::InvalidExpressionType { found } => write!(
                f,
                "expected a SQL expression element, got {}",
                found
            ),
            HybridError::AmbiguousUpdateTarget { attribute } => write!(
                f,
                "cannot bulk-update hybrid '{}': its expression is not a single mapped column and no update expression is defined",
                attribute
            ),
            HybridError::InvalidOperandCount {
                operator,
                expected,
                found,
            } => write!(
                f,
                "operator {} takes {} operand(s), got {}",
                operator, expected, found
            ),
            HybridError::UnknownColumn { class, column } => {
                write!(f, "{} has no mapped column '{}'", class, column)
            }
            HybridError::Config(msg) => write!(f, "Hybrid configuration error: {}", msg),
        }
    }
}

impl std::error::Error for HybridError {}

impl From<config::ConfigError> for HybridError {
    fn from(err: config::ConfigError) -> Self {
        HybridError::Config(err.to_string())
    }
}
