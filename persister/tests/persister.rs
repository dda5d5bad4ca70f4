//! Behavior of the typed namespaces and the child multimap.

use persister::{ErrorKind, Persister, PersisterError, ValueKind};

fn fresh() -> Persister {
    persister_testhelpers::setup();
    Persister::new()
}

// ============================================================================
// Typed namespaces
// ============================================================================

#[test]
fn namespaces_iterate_in_insertion_order() {
    let mut p = fresh();
    p.put_string("z", "last").unwrap();
    p.put_string("a", "first").unwrap();
    p.put_string("z", "again").unwrap();
    p.put_int("b", 2).unwrap();
    p.put_int("a", 1).unwrap();
    p.put_long("big", i64::MAX).unwrap();
    p.put_long("small", i64::MIN).unwrap();
    p.put_double("pi", 3.5).unwrap();
    p.put_double("e", 2.75).unwrap();

    assert_eq!(p.strings().collect::<Vec<_>>(), vec![("z", "again"), ("a", "first")]);
    assert_eq!(p.ints().collect::<Vec<_>>(), vec![("b", 2), ("a", 1)]);
    assert_eq!(
        p.longs().collect::<Vec<_>>(),
        vec![("big", i64::MAX), ("small", i64::MIN)]
    );
    assert_eq!(p.doubles().collect::<Vec<_>>(), vec![("pi", 3.5), ("e", 2.75)]);
    assert_eq!(p.doubles().len(), 2);
}

#[test]
fn put_and_get_each_type() {
    let mut p = fresh();
    p.put_string("s", "hello").unwrap();
    p.put_int("i", 42).unwrap();
    p.put_long("l", 1_699_999_999_999).unwrap();
    p.put_double("d", 0.25).unwrap();

    assert_eq!(p.get_string("s").unwrap(), "hello");
    assert_eq!(p.get_int("i").unwrap(), 42);
    assert_eq!(p.get_long("l").unwrap(), 1_699_999_999_999);
    assert_eq!(p.get_double("d").unwrap(), 0.25);
}

#[test]
fn default_is_ignored_when_value_is_present() {
    let mut p = fresh();
    p.put_int("x", 42).unwrap();
    p.put_string("x", "present").unwrap();
    assert_eq!(p.get_int_or("x", 99), 42);
    assert_eq!(p.get_string_or("x", "fallback"), "present");
}

#[test]
fn check_on_empty_node_is_absent_for_every_type() {
    let p = fresh();
    assert_eq!(p.check_string("x"), None);
    assert_eq!(p.check_int("x"), None);
    assert_eq!(p.check_long("x"), None);
    assert_eq!(p.check_double("x"), None);
}

#[test]
fn get_or_on_empty_node_returns_default() {
    let p = fresh();
    assert_eq!(p.get_string_or("x", "dflt"), "dflt");
    assert_eq!(p.get_int_or("x", 42), 42);
    assert_eq!(p.get_long_or("x", -7), -7);
    assert_eq!(p.get_double_or("x", 1.5), 1.5);
}

#[test]
fn get_on_empty_node_is_not_found() {
    let p = fresh();
    let errors = [
        (p.get_string("x").unwrap_err(), ValueKind::String),
        (p.get_int("x").unwrap_err(), ValueKind::Int),
        (p.get_long("x").unwrap_err(), ValueKind::Long),
        (p.get_double("x").unwrap_err(), ValueKind::Double),
    ];
    for (err, kind) in errors {
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(
            err,
            PersisterError::NotFound {
                key: "x".into(),
                kind
            }
        );
    }
}

#[test]
fn not_found_message_names_key_and_type() {
    let p = fresh();
    assert_eq!(p.get_long("now").unwrap_err().to_string(), "no such long: now");
}

#[test]
fn overwrite_int_key() {
    let mut p = fresh();
    p.put_int("x", 1).unwrap();
    p.put_int("x", 2).unwrap();
    assert_eq!(p.get_int("x").unwrap(), 2);
}

#[test]
fn keys_for_different_value_types_do_not_overwrite_each_other() {
    let mut p = fresh();
    p.put_int("x", 1).unwrap();
    p.put_string("x", "a").unwrap();
    p.put_long("x", 2).unwrap();
    p.put_double("x", 0.5).unwrap();

    assert_eq!(p.get_int("x").unwrap(), 1);
    assert_eq!(p.get_string("x").unwrap(), "a");
    assert_eq!(p.get_long("x").unwrap(), 2);
    assert_eq!(p.get_double("x").unwrap(), 0.5);
}

// ============================================================================
// Rejected input
// ============================================================================

#[test]
fn empty_string_key_is_rejected() {
    let mut p = fresh();
    let err = p.put_string("", "v").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert!(p.is_empty());
}

#[test]
fn nul_string_value_is_rejected() {
    let mut p = fresh();
    let err = p.put_string("k", "\0").unwrap_err();
    assert_eq!(err, PersisterError::InvalidValue { key: "k".into() });
    assert_eq!(p.check_string("k"), None);
}

#[test]
fn empty_int_key_is_rejected() {
    let mut p = fresh();
    let err = p.put_int("", 1).unwrap_err();
    assert_eq!(
        err,
        PersisterError::InvalidKey {
            key: String::new(),
            kind: ValueKind::Int
        }
    );
    assert!(p.is_empty());
}

#[test]
fn key_with_nul_is_rejected_for_every_type() {
    let mut p = fresh();
    assert!(p.put_string("a\0b", "v").is_err());
    assert!(p.put_int("a\0b", 1).is_err());
    assert!(p.put_long("a\0b", 1).is_err());
    assert!(p.put_double("a\0b", 1.0).is_err());
    assert!(p.is_empty());
}

#[test]
fn empty_child_name_is_rejected() {
    let mut p = fresh();
    let err = p.new_child("").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(p.child_names().len(), 0);
}

// ============================================================================
// Children
// ============================================================================

#[test]
fn empty_children() {
    let p = fresh();
    assert!(p.get_children("child").is_empty());
}

#[test]
fn list_of_children() {
    let mut p = fresh();
    p.new_child("child").unwrap().put_int("n", 1).unwrap();
    p.new_child("child").unwrap().put_int("n", 2).unwrap();

    let kids = p.get_children("child");
    assert_eq!(kids.len(), 2);
    assert_eq!(kids[0].get_int("n").unwrap(), 1);
    assert_eq!(kids[1].get_int("n").unwrap(), 2);
}

#[test]
fn single_child_is_the_created_instance() {
    let mut p = fresh();
    let created: *const Persister = p.new_child("child").unwrap();
    let fetched: *const Persister = p.get_child("child").unwrap();
    assert!(std::ptr::eq(created, fetched));
}

#[test]
fn asking_for_single_child_fails_when_no_children() {
    let p = fresh();
    let err = p.get_child("missing").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(
        err,
        PersisterError::ChildCount {
            name: "missing".into(),
            count: 0
        }
    );
}

#[test]
fn asking_for_single_child_fails_when_multiple_children() {
    let mut p = fresh();
    p.new_child("c").unwrap();
    p.new_child("c").unwrap();
    let err = p.get_child("c").unwrap_err();
    assert_eq!(
        err,
        PersisterError::ChildCount {
            name: "c".into(),
            count: 2
        }
    );
}

#[test]
fn children_can_be_edited_after_creation() {
    let mut p = fresh();
    p.new_child("window").unwrap();
    p.get_child_mut("window")
        .unwrap()
        .put_int("width", 640)
        .unwrap();
    for kid in p.get_children_mut("window") {
        kid.put_int("height", 480).unwrap();
    }

    let window = p.get_child("window").unwrap();
    assert_eq!(window.get_int("width").unwrap(), 640);
    assert_eq!(window.get_int("height").unwrap(), 480);
    assert!(p.get_children_mut("nothing").is_empty());
}

#[test]
fn deep_trees_compare_structurally() {
    fn build(order_flipped: bool) -> Persister {
        let mut p = Persister::new();
        if order_flipped {
            p.put_double("w", 12345.6789).unwrap();
            p.put_string("z", "zebra").unwrap();
        } else {
            p.put_string("z", "zebra").unwrap();
            p.put_double("w", 12345.6789).unwrap();
        }
        let c = p.new_child("c").unwrap();
        c.new_child("c2").unwrap().put_string("color", "yellow").unwrap();
        p
    }

    persister_testhelpers::setup();
    assert_eq!(build(false), build(true));

    let mut changed = build(false);
    changed
        .get_child_mut("c")
        .unwrap()
        .get_child_mut("c2")
        .unwrap()
        .put_string("color", "green")
        .unwrap();
    assert_ne!(build(false), changed);
}
