//! Тесты системы непересекающихся множеств

use crate::util::union_find::UnionFind;

#[test]
fn test_add_and_get() {
    let mut cells: UnionFind<i32> = UnionFind::new();
    let a = cells.add(1);
    let b = cells.add(2);

    assert_eq!(*cells.value(a), 1);
    assert_eq!(*cells.value(b), 2);
}

#[test]
fn test_set_value_updates_component() {
    let mut cells: UnionFind<i32> = UnionFind::new();
    let a = cells.add(1);

    cells.set_value(a, 5);
    assert_eq!(*cells.value(a), 5);
}

#[test]
fn test_union_with_equal_values() {
    let mut cells: UnionFind<i32> = UnionFind::new();
    let a = cells.add(7);
    let b = cells.add(7);

    assert!(cells.union(a, b));
    assert!(cells.same_component(a, b));

    cells.set_value(a, 9);
    assert_eq!(*cells.value(b), 9);
}

#[test]
fn test_union_with_conflicting_values_fails() {
    let mut cells: UnionFind<i32> = UnionFind::new();
    let a = cells.add(1);
    let b = cells.add(2);

    assert!(!cells.union(a, b));
    assert!(!cells.same_component(a, b));
    assert_eq!(*cells.value(a), 1);
    assert_eq!(*cells.value(b), 2);
}

#[test]
fn test_union_is_idempotent() {
    let mut cells: UnionFind<i32> = UnionFind::new();
    let a = cells.add(3);
    let b = cells.add(3);

    assert!(cells.union(a, b));
    assert!(cells.union(a, b));
    assert!(cells.union(b, a));
}

#[test]
fn test_union_is_transitive() {
    let mut cells: UnionFind<&str> = UnionFind::new();
    let a = cells.add("x");
    let b = cells.add("x");
    let c = cells.add("x");

    assert!(cells.union(a, b));
    assert!(cells.union(b, c));
    assert!(cells.same_component(a, c));

    cells.set_value(c, "y");
    assert_eq!(*cells.value(a), "y");
}

#[test]
fn test_chain_of_unions_keeps_single_value() {
    let mut cells: UnionFind<i32> = UnionFind::new();
    let ids: Vec<_> = (0..10).map(|_| cells.add(42)).collect();

    for pair in ids.windows(2) {
        assert!(cells.union(pair[0], pair[1]));
    }

    cells.set_value(ids[0], 7);
    for id in &ids {
        assert_eq!(*cells.value(*id), 7);
    }
}
