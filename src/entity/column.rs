//! Ordinary mapped columns.

use sea_query::{Alias, Expr};

/// A column mapped on a model class, qualified by its table
///
/// This is the attribute a hybrid is designed to be indistinguishable from:
/// both implement [`QueryableAttribute`](crate::QueryableAttribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappedColumn {
    table: String,
    name: String,
}

impl MappedColumn {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The same column seen through another table name or alias
    pub fn requalified(&self, table: impl Into<String>) -> Self {
        Self::new(table, self.name.clone())
    }

    /// `"table"."column"`
    pub fn expr(&self) -> Expr {
        Expr::col((Alias::new(self.table.clone()), Alias::new(self.name.clone())))
    }
}
