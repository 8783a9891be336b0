//! Integration tests for a hybrid with a custom comparator
//!
//! `word_insensitive` compares case-insensitively in both modes: on the class
//! it renders `LOWER(word) = LOWER(value)`, on an instance it returns a value
//! object applying the same lowering in memory.

use std::sync::Arc;

use lifeguard_hybrid::{
    adapt_all, AliasedClass, Clause, Comparator, Fields, HybridError, HybridProperty, ModelClass,
    Operand, Operator, QueryableAttribute,
};
use sea_query::{Expr, ExprTrait, Func, PostgresQueryBuilder, Query, QueryStatementWriter};
use serde_json::json;

// ============================================================================
// Test Model
// ============================================================================

#[derive(Debug, Clone)]
pub struct SearchWord {
    pub id: i64,
    pub word: String,
}

impl Fields for SearchWord {
    fn field(&self, name: &str) -> Operand {
        match name {
            "id" => Operand::from(self.id),
            _ => Operand::from(self.word.as_str()),
        }
    }
}

/// Value object returned by the getter
#[derive(Debug, Clone)]
pub struct CaseInsensitiveWord(Operand);

impl CaseInsensitiveWord {
    pub fn equals(&self, other: &str) -> bool {
        self.0
            .as_str()
            .map(|word| word.to_lowercase() == other.to_lowercase())
            .unwrap_or(false)
    }
}

impl From<CaseInsensitiveWord> for Clause {
    fn from(word: CaseInsensitiveWord) -> Self {
        Clause::from(word.0)
    }
}

// ============================================================================
// Comparator
// ============================================================================

#[derive(Debug)]
struct CaseInsensitiveComparator {
    word: Clause,
}

fn lower(expr: Expr) -> Expr {
    Expr::from(Func::lower(expr))
}

impl Comparator for CaseInsensitiveComparator {
    fn expression(&self) -> Clause {
        self.word.clone()
    }

    fn operate(&self, op: Operator, others: &[Clause]) -> Result<Expr, HybridError> {
        let rhs = adapt_all(others)?.into_iter().map(lower).collect();
        op.apply(lower(self.clause_element()?), rhs)
    }

    fn adapt_to_entity(&self, alias: &AliasedClass) -> Option<Arc<dyn Comparator>> {
        let word = alias.column("word")?;
        Some(Arc::new(CaseInsensitiveComparator { word: word.into() }))
    }

    fn doc(&self) -> Option<String> {
        Some("Case-insensitive view of the word".to_string())
    }
}

fn word_insensitive() -> HybridProperty<SearchWord, CaseInsensitiveWord> {
    HybridProperty::new("word_insensitive", |this| {
        CaseInsensitiveWord(this.field("word"))
    })
    .with_comparator(|cls| {
        Arc::new(CaseInsensitiveComparator {
            word: cls.field("word").into(),
        })
    })
}

fn search_word_class(hybrid: &HybridProperty<SearchWord, CaseInsensitiveWord>) -> ModelClass {
    ModelClass::builder("SearchWord")
        .table("search_word")
        .column("id")
        .column("word")
        .member("word_insensitive", hybrid)
        .build()
}

fn render(expr: Expr) -> String {
    Query::select().expr(expr).to_string(PostgresQueryBuilder)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_class_comparison_lowers_both_sides() {
    let hybrid = word_insensitive();
    let class = search_word_class(&hybrid);
    let attribute = hybrid.expression(&class).unwrap();
    let word = class.column("word").unwrap();

    let condition = attribute.equals("Trucks").unwrap();
    assert_eq!(
        condition,
        ExprTrait::eq(lower(word.expr()), lower(Expr::val("Trucks")))
    );
    assert_eq!(
        render(condition),
        r#"SELECT LOWER("search_word"."word") = LOWER('Trucks')"#
    );
}

#[test]
fn test_instance_comparison_lowers_in_memory() {
    let hybrid = word_insensitive();
    let truck = SearchWord {
        id: 1,
        word: "TRUCKS".to_string(),
    };
    assert!(hybrid.value(&truck).equals("Trucks"));
    assert!(!hybrid.value(&truck).equals("Cars"));
}

#[test]
fn test_custom_comparator_doc_wins() {
    let hybrid = word_insensitive().with_doc("hybrid doc");
    let class = search_word_class(&hybrid);
    let attribute = hybrid.expression(&class).unwrap();
    assert_eq!(
        attribute.doc().as_deref(),
        Some("Case-insensitive view of the word")
    );
    assert_eq!(hybrid.doc(), Some("hybrid doc"));
}

#[test]
fn test_info_is_carried_to_the_attribute() {
    let mut info = lifeguard_hybrid::Info::new();
    info.insert("searchable".to_string(), json!(true));
    let hybrid = word_insensitive().with_info(info);
    let class = search_word_class(&hybrid);
    let attribute = hybrid.expression(&class).unwrap();
    assert_eq!(attribute.info().get("searchable"), Some(&json!(true)));
}

#[test]
fn test_adapt_to_alias_requalifies_column() {
    let hybrid = word_insensitive();
    let class = search_word_class(&hybrid);
    let alias = class.aliased("sw2");
    let attribute = hybrid.expression(&class).unwrap().adapt_to_entity(&alias);

    assert_eq!(attribute.key(), "word_insensitive");
    assert_eq!(
        render(attribute.equals("Trucks").unwrap()),
        r#"SELECT LOWER("sw2"."word") = LOWER('Trucks')"#
    );
}

#[test]
fn test_reverse_operate_keeps_default_rendering() {
    let hybrid = word_insensitive();
    let class = search_word_class(&hybrid);
    let attribute = hybrid.expression(&class).unwrap();
    let word = class.column("word").unwrap();
    assert_eq!(
        attribute
            .reverse_operate(Operator::from(lifeguard_hybrid::BinaryOp::Eq), &Clause::from("x"))
            .unwrap(),
        ExprTrait::eq(Expr::val("x"), word.expr())
    );
}
