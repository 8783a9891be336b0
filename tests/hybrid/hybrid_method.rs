//! Integration tests for hybrid methods
//!
//! A hybrid method takes arguments and, like a hybrid property, evaluates in
//! memory on instances and as an expression on classes.

use lifeguard_hybrid::{Fields, HybridMethod, Member, ModelClass, Operand, Receiver};
use sea_query::{PostgresQueryBuilder, Query, QueryStatementWriter};

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

fn contains_body(this: Receiver<'_, Interval>, point: i64) -> Operand {
    this.field("start").lte(point).and(this.field("end").gt(point))
}

fn intersects_body(this: Receiver<'_, Interval>, other: (i64, i64)) -> Operand {
    this.field("start").lt(other.1).and(this.field("end").gt(other.0))
}

fn interval_class(members: &[(&str, &dyn Member)]) -> ModelClass {
    let mut builder = ModelClass::builder("Interval")
        .table("interval")
        .column("start")
        .column("end");
    for (name, member) in members {
        builder = builder.member(*name, *member);
    }
    builder.build()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_contains_in_both_modes() {
    let contains = HybridMethod::new("contains", contains_body).with_doc("start <= point < end");
    let class = interval_class(&[("contains", &contains as &dyn Member)]);
    let interval = Interval { start: 5, end: 10 };

    assert_eq!(contains.call(&interval, 5), Operand::from(true));
    assert_eq!(contains.call(&interval, 10), Operand::from(false));
    assert_eq!(contains.doc(), Some("start <= point < end"));

    let sql = Query::select()
        .expr(contains.call_class(&class, 7).unwrap())
        .to_string(PostgresQueryBuilder);
    assert!(sql.contains(r#""interval"."start" <= 7"#), "{}", sql);
    assert!(sql.contains(r#""interval"."end" > 7"#), "{}", sql);
    assert!(sql.contains(" AND "), "{}", sql);
}

#[test]
fn test_tuple_arguments() {
    let intersects = HybridMethod::new("intersects", intersects_body);
    let interval = Interval { start: 5, end: 10 };
    assert_eq!(intersects.call(&interval, (8, 20)), Operand::from(true));
    assert_eq!(intersects.call(&interval, (10, 20)), Operand::from(false));
}

#[test]
fn test_methods_register_like_properties() {
    let contains = HybridMethod::new("contains", contains_body);
    let intersects = HybridMethod::new("intersects", intersects_body);
    let class = interval_class(&[
        ("contains", &contains as &dyn Member),
        ("intersects", &intersects as &dyn Member),
    ]);

    assert_eq!(class.member("contains"), Some(contains.member_id()));
    assert_eq!(class.resolve_member_key(intersects.member_id()), Some("intersects"));
}
