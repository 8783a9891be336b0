//! Model classes: the type-level handle a hybrid is accessed through.
//!
//! A [`ModelClass`] knows its table, its parent class, the columns it maps and
//! the hybrid members registered on it. Members are registered explicitly when
//! the class is built, which is how a hybrid recovers the name it was declared
//! under.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sea_query::{Alias, Expr};

use crate::config;
use crate::entity::{Fields, MappedColumn};
use crate::error::HybridError;
use crate::value::Operand;

static NEXT_CLASS_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_MEMBER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a model class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u64);

/// Identity of a hybrid member.
///
/// Clones of a hybrid share its id; every rebind mints a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u64);

impl MemberId {
    pub(crate) fn next() -> Self {
        MemberId(NEXT_MEMBER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Anything that can be registered on a model class
pub trait Member {
    fn member_id(&self) -> MemberId;
}

struct ClassInner {
    id: ClassId,
    name: String,
    table: String,
    parent: Option<ModelClass>,
    columns: Vec<MappedColumn>,
    members: Vec<(String, MemberId)>,
}

/// A model class handle
///
/// Cheap to clone; clones are the same class.
#[derive(Clone)]
pub struct ModelClass {
    inner: Arc<ClassInner>,
}

impl ModelClass {
    pub fn builder(name: impl Into<String>) -> ModelClassBuilder {
        ModelClassBuilder {
            name: name.into(),
            table: None,
            parent: None,
            columns: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> ClassId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn table(&self) -> &str {
        &self.inner.table
    }

    pub fn parent(&self) -> Option<&ModelClass> {
        self.inner.parent.as_ref()
    }

    /// This class followed by its ancestors, most-derived first
    pub fn mro(&self) -> impl Iterator<Item = &ModelClass> {
        std::iter::successors(Some(self), |class| class.parent())
    }

    pub fn is_subclass_of(&self, other: &ModelClass) -> bool {
        self.mro().any(|class| class == other)
    }

    /// Look a column up through the ancestry
    pub fn column(&self, name: &str) -> Option<MappedColumn> {
        self.mro()
            .flat_map(|class| class.inner.columns.iter())
            .find(|column| column.name() == name)
            .cloned()
    }

    /// Like [`column`](Self::column), failing with `UnknownColumn`
    pub fn require_column(&self, name: &str) -> Result<MappedColumn, HybridError> {
        self.column(name).ok_or_else(|| HybridError::UnknownColumn {
            class: self.name().to_string(),
            column: name.to_string(),
        })
    }

    /// Every column visible on this class, most-derived first
    pub fn columns(&self) -> Vec<MappedColumn> {
        let mut seen: Vec<MappedColumn> = Vec::new();
        for column in self.mro().flat_map(|class| class.inner.columns.iter()) {
            if !seen.iter().any(|c| c.name() == column.name()) {
                seen.push(column.clone());
            }
        }
        seen
    }

    /// Members declared on this class itself, in declaration order
    pub fn declared_members(&self) -> &[(String, MemberId)] {
        &self.inner.members
    }

    /// The name `id` was registered under, searching most-derived first
    pub fn resolve_member_key(&self, id: MemberId) -> Option<&str> {
        self.mro()
            .flat_map(|class| class.inner.members.iter())
            .find(|(_, member)| *member == id)
            .map(|(name, _)| name.as_str())
    }

    /// The member currently visible under `name`, searching most-derived first
    pub fn member(&self, name: &str) -> Option<MemberId> {
        self.mro()
            .flat_map(|class| class.inner.members.iter())
            .find(|(key, _)| key == name)
            .map(|(_, id)| *id)
    }

    pub fn aliased(&self, alias: impl Into<String>) -> AliasedClass {
        AliasedClass {
            class: self.clone(),
            alias: alias.into(),
        }
    }
}

impl Fields for ModelClass {
    fn field(&self, name: &str) -> Operand {
        match self.column(name) {
            Some(column) => Operand::Column(column),
            None => {
                if config::current().warn_on_unknown_field {
                    log::warn!(
                        "{} has no mapped column '{}'; using an unqualified reference",
                        self.name(),
                        name
                    );
                }
                Operand::Expr(Expr::col(Alias::new(name.to_string())))
            }
        }
    }
}

impl PartialEq for ModelClass {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ModelClass {}

impl fmt::Debug for ModelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelClass")
            .field("name", &self.name())
            .field("table", &self.table())
            .field("parent", &self.parent().map(ModelClass::name))
            .finish()
    }
}

/// Builder for [`ModelClass`]
pub struct ModelClassBuilder {
    name: String,
    table: Option<String>,
    parent: Option<ModelClass>,
    columns: Vec<String>,
    members: Vec<(String, MemberId)>,
}

impl ModelClassBuilder {
    /// Table name; defaults to the parent's table, else the lower-cased class name
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn inherits(mut self, parent: &ModelClass) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.columns.push(name.into());
        self
    }

    /// Register a hybrid under `name`.
    ///
    /// Registering a second member under the same name replaces the first.
    pub fn member(mut self, name: impl Into<String>, member: &dyn Member) -> Self {
        let name = name.into();
        let id = member.member_id();
        match self.members.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = id,
            None => self.members.push((name, id)),
        }
        self
    }

    pub fn build(self) -> ModelClass {
        // single-table inheritance: subclasses share the parent's table
        let table = self
            .table
            .or_else(|| self.parent.as_ref().map(|p| p.table().to_string()))
            .unwrap_or_else(|| self.name.to_lowercase());
        let columns = self
            .columns
            .into_iter()
            .map(|name| MappedColumn::new(table.clone(), name))
            .collect();
        ModelClass {
            inner: Arc::new(ClassInner {
                id: ClassId(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed)),
                name: self.name,
                table,
                parent: self.parent,
                columns,
                members: self.members,
            }),
        }
    }
}

/// A model class seen through a table alias
#[derive(Debug, Clone)]
pub struct AliasedClass {
    class: ModelClass,
    alias: String,
}

impl AliasedClass {
    pub fn class(&self) -> &ModelClass {
        &self.class
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// The class's column, qualified by the alias
    pub fn column(&self, name: &str) -> Option<MappedColumn> {
        self.class
            .column(name)
            .map(|column| column.requalified(self.alias.clone()))
    }
}

impl Fields for AliasedClass {
    fn field(&self, name: &str) -> Operand {
        match self.column(name) {
            Some(column) => Operand::Column(column),
            None => self.class.field(name),
        }
    }
}
