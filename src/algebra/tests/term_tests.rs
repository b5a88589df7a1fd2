//! Тесты унификации термов

use crate::algebra::term::{Term, TermKind};

#[test]
fn test_unify_with_different_kinds() {
    let constant = Term::constant("hello");
    let dist = Term::dist();
    let multiset = Term::multiset();
    let set = Term::set();

    assert_eq!(constant.unify_with(&constant), Some(constant.clone()));
    assert_eq!(constant.unify_with(&dist), Some(constant.clone()));
    assert_eq!(constant.unify_with(&multiset), Some(constant.clone()));
    assert_eq!(constant.unify_with(&set), Some(constant.clone()));

    assert_eq!(dist.unify_with(&constant), Some(constant.clone()));
    assert_eq!(dist.unify_with(&dist), Some(dist.clone()));
    assert_eq!(dist.unify_with(&multiset), Some(dist.clone()));
    assert_eq!(dist.unify_with(&set), Some(dist.clone()));

    assert_eq!(multiset.unify_with(&constant), Some(constant.clone()));
    assert_eq!(multiset.unify_with(&dist), Some(dist.clone()));
    assert_eq!(multiset.unify_with(&multiset), Some(multiset.clone()));
    assert_eq!(multiset.unify_with(&set), Some(multiset.clone()));

    assert_eq!(set.unify_with(&constant), Some(constant.clone()));
    assert_eq!(set.unify_with(&dist), Some(dist.clone()));
    assert_eq!(set.unify_with(&multiset), Some(multiset.clone()));
    assert_eq!(set.unify_with(&set), Some(set.clone()));
}

#[test]
fn test_unify_with_is_order_independent() {
    let terms = vec![
        Term::constant(7i64),
        Term::dist(),
        Term::multiset(),
        Term::set(),
    ];

    for left in &terms {
        for right in &terms {
            assert_eq!(
                left.unify_with(right),
                right.unify_with(left),
                "Унификация {} и {} зависит от порядка",
                left,
                right
            );
        }
    }
}

#[test]
fn test_unify_with_equal_constants() {
    let first = Term::constant("hello");
    let second = Term::constant("hello");

    assert_eq!(first.unify_with(&second), Some(first.clone()));
    assert_eq!(second.unify_with(&first), Some(second.clone()));
}

#[test]
fn test_unify_with_not_equal_constants() {
    let first = Term::constant("hello");
    let second = Term::constant("goodbye");

    assert_eq!(first.unify_with(&second), None);
    assert_eq!(second.unify_with(&first), None);
}

#[test]
fn test_unify_with_int_and_string_constants_differ() {
    let number = Term::constant(103i64);
    let text = Term::constant("103");

    assert_eq!(number.unify_with(&text), None);
}

#[test]
fn test_unify_with_same_kind_variables() {
    let dist1 = Term::dist();
    let dist2 = Term::dist();
    let result = dist1.unify_with(&dist2).unwrap();
    assert!(result == dist1 || result == dist2);
    assert_eq!(result.kind(), TermKind::Dist);

    let multiset1 = Term::multiset();
    let multiset2 = Term::multiset();
    let result = multiset1.unify_with(&multiset2).unwrap();
    assert!(result == multiset1 || result == multiset2);
    assert_eq!(result.kind(), TermKind::Multiset);

    let set1 = Term::set();
    let set2 = Term::set();
    let result = set1.unify_with(&set2).unwrap();
    assert!(result == set1 || result == set2);
    assert_eq!(result.kind(), TermKind::Set);
}

#[test]
fn test_fresh_variables_are_distinct() {
    assert_ne!(Term::dist(), Term::dist());
    assert_ne!(Term::multiset(), Term::multiset());
    assert_ne!(Term::set(), Term::set());
}

#[test]
fn test_priority_order() {
    assert!(TermKind::Constant.priority() < TermKind::Dist.priority());
    assert!(TermKind::Dist.priority() < TermKind::Multiset.priority());
    assert!(TermKind::Multiset.priority() < TermKind::Set.priority());
}

#[test]
fn test_variable_with_kind() {
    assert_eq!(
        Term::variable_with_kind(TermKind::Dist).kind(),
        TermKind::Dist
    );
    assert_eq!(
        Term::variable_with_kind(TermKind::Multiset).kind(),
        TermKind::Multiset
    );
    assert_eq!(Term::variable_with_kind(TermKind::Set).kind(), TermKind::Set);
}

#[test]
#[should_panic]
fn test_variable_with_kind_rejects_constant() {
    Term::variable_with_kind(TermKind::Constant);
}

#[test]
fn test_constant_display() {
    assert_eq!(Term::constant(103i64).to_string(), "103");
    assert_eq!(Term::constant("red").to_string(), "'red'");
}
