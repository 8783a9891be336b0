//! Integration tests for bulk assignment through hybrids
//!
//! Covers how a hybrid's value becomes SET-clause column assignments and the
//! order in which the possible translations are tried.

use std::sync::Arc;

use lifeguard_hybrid::{
    BulkUpdate, Clause, Fields, HybridError, HybridProperty, ModelClass, Operand,
    QueryableAttribute, Receiver,
};
use sea_query::{PostgresQueryBuilder, QueryStatementWriter};

// ============================================================================
// Test Model
// ============================================================================

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub balance: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Fields for Account {
    fn field(&self, name: &str) -> Operand {
        match name {
            "id" => Operand::from(self.id),
            "balance" => Operand::from(self.balance),
            "first_name" => Operand::from(self.first_name.as_str()),
            _ => Operand::from(self.last_name.as_str()),
        }
    }
}

fn balance_getter(this: Receiver<'_, Account>) -> Operand {
    this.field("balance")
}

fn account_class(members: &[(&str, &HybridProperty<Account, Operand>)]) -> ModelClass {
    let mut builder = ModelClass::builder("Account")
        .table("account")
        .column("id")
        .column("balance")
        .column("first_name")
        .column("last_name");
    for (name, hybrid) in members {
        builder = builder.member(*name, *hybrid);
    }
    builder.build()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_column_wrapping_hybrid_updates_the_column() {
    let amount = HybridProperty::new("amount", balance_getter);
    let class = account_class(&[("amount", &amount)]);
    let attribute = amount.expression(&class).unwrap();
    let balance = class.column("balance").unwrap();

    assert_eq!(
        attribute.bulk_update_tuples(Operand::from(100)).unwrap(),
        vec![(balance, Operand::from(100))]
    );
}

#[test]
fn test_wrapped_column_beats_update_expression() {
    let amount = HybridProperty::new("amount", balance_getter)
        .with_update_expression(|cls, value| Ok(vec![(cls.require_column("id")?, value)]));
    let class = account_class(&[("amount", &amount)]);
    let attribute = amount.expression(&class).unwrap();
    let balance = class.column("balance").unwrap();

    assert_eq!(
        attribute.bulk_update_tuples(Operand::from(5)).unwrap(),
        vec![(balance, Operand::from(5))]
    );
}

#[test]
fn test_wrapped_attribute_delegates_to_that_attribute() {
    let amount = HybridProperty::new("amount", balance_getter);
    let amount_for_alias = amount.clone();
    let shadow: HybridProperty<Account, Operand> =
        HybridProperty::new("shadow", |this| this.field("balance")).with_expression(move |cls| {
            match amount_for_alias.expression(cls) {
                Ok(attribute) => Clause::Attribute(attribute),
                Err(_) => cls.field("balance").into(),
            }
        });
    let class = account_class(&[("amount", &amount), ("shadow", &shadow)]);
    let attribute = shadow.expression(&class).unwrap();
    let balance = class.column("balance").unwrap();

    assert_eq!(
        attribute.bulk_update_tuples(Operand::from(7)).unwrap(),
        vec![(balance.clone(), Operand::from(7))]
    );
    assert_eq!(attribute.clause_element().unwrap(), balance.expr());
}

#[test]
fn test_update_expression_splits_into_several_columns() {
    let full_name: HybridProperty<Account, Operand> =
        HybridProperty::new("full_name", |this| {
            this.field("first_name").concat(" ").concat(this.field("last_name"))
        })
        .with_update_expression(|cls, value| {
            let text = value.as_str().unwrap_or_default().to_string();
            let (first, last) = text.split_once(' ').unwrap_or((text.as_str(), ""));
            Ok(vec![
                (cls.require_column("first_name")?, Operand::from(first)),
                (cls.require_column("last_name")?, Operand::from(last)),
            ])
        });
    let class = account_class(&[("full_name", &full_name)]);
    let attribute = full_name.expression(&class).unwrap();
    let id = class.column("id").unwrap();

    let sql = BulkUpdate::new(&class)
        .set(&attribute, "Ada Lovelace")
        .unwrap()
        .filter(id.equals(1).unwrap())
        .into_statement()
        .to_string(PostgresQueryBuilder);
    assert_eq!(
        sql,
        r#"UPDATE "account" SET "first_name" = 'Ada', "last_name" = 'Lovelace' WHERE "account"."id" = 1"#
    );
}

#[test]
fn test_update_expression_errors_propagate() {
    let broken = HybridProperty::new("broken", balance_getter)
        .with_expression(|cls| (cls.field("balance") * 2).into())
        .with_update_expression(|cls, value| Ok(vec![(cls.require_column("missing")?, value)]));
    let class = account_class(&[("broken", &broken)]);
    let attribute = broken.expression(&class).unwrap();

    let err = BulkUpdate::new(&class).set(&attribute, 1).unwrap_err();
    assert_eq!(
        err,
        HybridError::UnknownColumn {
            class: "Account".to_string(),
            column: "missing".to_string(),
        }
    );
}

#[test]
fn test_custom_comparator_without_column_is_ambiguous() {
    use lifeguard_hybrid::Comparator;

    struct Doubled(Clause);
    impl Comparator for Doubled {
        fn expression(&self) -> Clause {
            self.0.clone()
        }
    }

    let doubled = HybridProperty::new("doubled", balance_getter).with_comparator(|cls| {
        Arc::new(Doubled((cls.field("balance") * 2).into()))
    });
    let class = account_class(&[("doubled", &doubled)]);
    let attribute = doubled.expression(&class).unwrap();

    assert_eq!(
        attribute.bulk_update_tuples(Operand::from(1)).unwrap_err(),
        HybridError::AmbiguousUpdateTarget {
            attribute: "Account.doubled".to_string()
        }
    );
}
