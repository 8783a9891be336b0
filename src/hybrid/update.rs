//! Bulk assignment.
//!
//! A bulk UPDATE names attributes, not columns. Each attribute translates its
//! value into one or more `(column, value)` pairs through
//! [`QueryableAttribute::bulk_update_tuples`]; [`BulkUpdate`] collects those
//! pairs into a SeaQuery `UpdateStatement`.

use sea_query::{Alias, Expr, UpdateStatement};

use crate::entity::{MappedColumn, ModelClass};
use crate::error::HybridError;
use crate::hybrid::attribute::QueryableAttribute;
use crate::value::Operand;

/// One column assignment in a SET clause
pub type UpdateTuple = (MappedColumn, Operand);

/// Builder for `UPDATE <table> SET ... WHERE ...` over hybrids and columns
///
/// # Example
///
/// ```no_run
/// use lifeguard_hybrid::{BulkUpdate, ModelClass, QueryableAttribute};
/// use sea_query::PostgresQueryBuilder;
///
/// let class = ModelClass::builder("Interval").column("id").column("end").build();
/// let end = class.column("end").unwrap();
/// let id = class.column("id").unwrap();
///
/// let statement = BulkUpdate::new(&class)
///     .set(&end, 10)
///     .unwrap()
///     .filter(id.equals(1).unwrap())
///     .into_statement();
/// let sql = statement.to_string(PostgresQueryBuilder);
/// ```
#[derive(Debug, Clone)]
pub struct BulkUpdate {
    class: ModelClass,
    tuples: Vec<UpdateTuple>,
    filters: Vec<Expr>,
}

impl BulkUpdate {
    pub fn new(class: &ModelClass) -> Self {
        Self {
            class: class.clone(),
            tuples: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Assign `value` to `attribute`.
    ///
    /// A column assigned twice keeps its first position with the later value.
    pub fn set<A, V>(mut self, attribute: &A, value: V) -> Result<Self, HybridError>
    where
        A: QueryableAttribute + ?Sized,
        V: Into<Operand>,
    {
        for (column, value) in attribute.bulk_update_tuples(value.into())? {
            match self.tuples.iter_mut().find(|(existing, _)| *existing == column) {
                Some(slot) => {
                    log::debug!(
                        "column {}.{} assigned twice in bulk update; keeping the later value",
                        column.table(),
                        column.name()
                    );
                    slot.1 = value;
                }
                None => self.tuples.push((column, value)),
            }
        }
        Ok(self)
    }

    pub fn filter(mut self, condition: Expr) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn tuples(&self) -> &[UpdateTuple] {
        &self.tuples
    }

    pub fn into_statement(self) -> UpdateStatement {
        // Build UPDATE query
        let mut query = UpdateStatement::default();
        query.table(Alias::new(self.class.table().to_string()));
        for (column, value) in self.tuples {
            query.value(Alias::new(column.name().to_string()), value.into_expr());
        }
        for condition in self.filters {
            query.and_where(condition);
        }
        query
    }
}
