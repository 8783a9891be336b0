//! Integration tests for hybrids across class inheritance
//!
//! A subclass that redeclares an inherited hybrid through `overrides()` gets
//! its own expression while the parent keeps resolving the original one.

use lifeguard_hybrid::{
    Fields, HybridProperty, Member, ModelClass, Operand, QueryableAttribute, Receiver,
};
use sea_query::{Expr, ExprTrait};

// ============================================================================
// Test Model
// ============================================================================

#[derive(Debug, Clone)]
pub struct Interval {
    pub start: i64,
    pub end: i64,
}

impl Fields for Interval {
    fn field(&self, name: &str) -> Operand {
        match name {
            "start" => Operand::from(self.start),
            _ => Operand::from(self.end),
        }
    }
}

fn length_getter(this: Receiver<'_, Interval>) -> Operand {
    this.field("end") - this.field("start")
}

struct Classes {
    length: HybridProperty<Interval, Operand>,
    doubled: HybridProperty<Interval, Operand>,
    parent: ModelClass,
    child: ModelClass,
    grandchild: ModelClass,
}

fn classes() -> Classes {
    let length = HybridProperty::new("length", length_getter);
    let doubled = length
        .overrides()
        .with_expression(|cls| ((cls.field("end") - cls.field("start")) * 2).into());

    let parent = ModelClass::builder("Interval")
        .table("interval")
        .column("start")
        .column("end")
        .member("length", &length)
        .build();
    let child = ModelClass::builder("DoubledInterval")
        .inherits(&parent)
        .member("length", &doubled)
        .build();
    let grandchild = ModelClass::builder("TaggedInterval")
        .inherits(&child)
        .column("tag")
        .build();

    Classes {
        length,
        doubled,
        parent,
        child,
        grandchild,
    }
}

fn length_expr(class: &ModelClass) -> Expr {
    ExprTrait::sub(
        class.column("end").unwrap().expr(),
        class.column("start").unwrap().expr(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_override_keeps_parent_getter() {
    let c = classes();
    let interval = Interval { start: 2, end: 9 };
    assert_eq!(c.doubled.value(&interval), c.length.value(&interval));
    assert_eq!(c.doubled.name(), "length");
    assert_ne!(c.doubled.member_id(), c.length.member_id());
}

#[test]
fn test_parent_still_resolves_original_expression() {
    let c = classes();
    let parent_view = c.length.expression(&c.parent).unwrap();
    assert_eq!(parent_view.clause_element().unwrap(), length_expr(&c.parent));
    assert_eq!(parent_view.key(), "length");
}

#[test]
fn test_child_resolves_override() {
    let c = classes();
    let child_view = c.doubled.expression(&c.child).unwrap();
    assert_eq!(child_view.key(), "length");
    assert_eq!(
        child_view.clause_element().unwrap(),
        ExprTrait::mul(length_expr(&c.child), Expr::val(2i64))
    );
}

#[test]
fn test_class_member_lookup_sees_most_derived() {
    let c = classes();
    assert_eq!(c.parent.member("length"), Some(c.length.member_id()));
    assert_eq!(c.child.member("length"), Some(c.doubled.member_id()));
    assert_eq!(c.grandchild.member("length"), Some(c.doubled.member_id()));
    assert!(c.grandchild.is_subclass_of(&c.parent));
}

#[test]
fn test_inherited_hybrid_resolves_name_through_ancestry() {
    let c = classes();
    let view = c.doubled.expression(&c.grandchild).unwrap();
    assert_eq!(view.key(), "length");
    assert_eq!(view.class().name(), "TaggedInterval");
    // one cached view per owning class
    c.doubled.expression(&c.child).unwrap();
    assert_eq!(c.doubled.cached_classes(), 2);
}

#[test]
fn test_unregistered_hybrid_publishes_unknown_key() {
    let c = classes();
    let stray = HybridProperty::new("stray", length_getter);
    let view = stray.expression(&c.child).unwrap();
    assert_eq!(view.key(), "<unknown>");
}
