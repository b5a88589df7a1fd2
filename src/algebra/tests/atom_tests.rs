//! Тесты атомов

use crate::algebra::atom::Atom;
use crate::algebra::relation::Relation;
use crate::algebra::term::{Term, TermKind};

#[test]
#[should_panic]
fn test_atom_arity_mismatch_panics() {
    let rel = Relation::with_columns("Rel", &["X", "Y"]);
    Atom::set_atom(&rel, vec![Term::dist()]);
}

#[test]
fn test_unify_with_different_relations() {
    let rel1 = Relation::with_columns("R", &["X"]);
    let rel2 = Relation::with_columns("S", &["X"]);

    let left = Atom::set_atom(&rel1, vec![Term::dist()]);
    let right = Atom::set_atom(&rel2, vec![Term::dist()]);

    assert!(left.unify_with(&right).is_none());
    assert!(!left.is_compatible_with(&right));
}

#[test]
fn test_unify_with_distributes_constants() {
    let rel = Relation::with_columns("Rel", &["X"]);

    let dist = Atom::set_atom(&rel, vec![Term::dist()]);
    let constant = Atom::set_atom(&rel, vec![Term::constant("hello")]);

    let forward = dist.unify_with(&constant).unwrap();
    assert_eq!(forward.arguments(), &[Term::constant("hello")]);

    let backward = constant.unify_with(&dist).unwrap();
    assert_eq!(backward.arguments(), &[Term::constant("hello")]);
}

#[test]
fn test_unify_with_repeated_variable_and_constants() {
    let rel = Relation::with_columns("Rel", &["X", "Y"]);

    let shared = Term::multiset();
    let repeated = Atom::set_atom(&rel, vec![shared.clone(), shared]);

    let equal_constants = Atom::set_atom(
        &rel,
        vec![Term::constant(0i64), Term::constant(0i64)],
    );
    let unequal_constants = Atom::set_atom(
        &rel,
        vec![Term::constant(0i64), Term::constant(1i64)],
    );

    let unified = repeated.unify_with(&equal_constants).unwrap();
    assert_eq!(
        unified.arguments(),
        &[Term::constant(0i64), Term::constant(0i64)]
    );

    assert!(repeated.unify_with(&unequal_constants).is_none());
}

#[test]
fn test_unify_with_links_repeated_variables() {
    let rel = Relation::with_columns("Rel", &["X", "Y"]);

    // Повтор переменной слева связывает обе позиции справа
    let shared = Term::multiset();
    let repeated = Atom::set_atom(&rel, vec![shared.clone(), shared]);
    let pair = Atom::set_atom(&rel, vec![Term::constant(5i64), Term::multiset()]);

    let unified = repeated.unify_with(&pair).unwrap();
    assert_eq!(
        unified.arguments(),
        &[Term::constant(5i64), Term::constant(5i64)]
    );
}

#[test]
fn test_is_compatible_with_ignores_variable_kinds() {
    let rel = Relation::with_columns("Rel", &["X", "Y"]);

    let shared_multiset = Term::multiset();
    let repeated_multiset =
        Atom::set_atom(&rel, vec![shared_multiset.clone(), shared_multiset]);

    let shared_set = Term::set();
    let repeated_set = Atom::set_atom(&rel, vec![shared_set.clone(), shared_set]);
    let distinct_sets = Atom::set_atom(&rel, vec![Term::set(), Term::set()]);

    assert!(repeated_multiset.is_compatible_with(&repeated_set));
    assert!(repeated_multiset.is_compatible_with(&distinct_sets));
}

#[test]
fn test_unify_with_copy_variables() {
    let rel = Relation::with_columns("Rel", &["X"]);

    let set_atom = Atom::set_atom(&rel, vec![Term::dist()]);
    let multiset_atom = Atom::multiset_atom(&rel, vec![Term::dist()]);

    // Копийные переменные унифицируются в более сильную
    let unified = set_atom.unify_with(&multiset_atom).unwrap();
    assert_eq!(unified.copy_variable().kind(), TermKind::Multiset);
}

#[test]
fn test_variables_excludes_constants() {
    let rel = Relation::with_columns("Rel", &["X", "Y", "Z"]);

    let dist = Term::dist();
    let set = Term::set();
    let atom = Atom::set_atom(
        &rel,
        vec![dist.clone(), set.clone(), Term::constant("A")],
    );

    let variables = atom.variables();
    assert_eq!(variables.len(), 2);
    assert!(variables.contains(&dist));
    assert!(variables.contains(&set));
}

#[test]
fn test_atom_equality_ignores_copy_variable() {
    let rel = Relation::with_columns("Rel", &["X"]);

    let term = Term::dist();
    let left = Atom::set_atom(&rel, vec![term.clone()]);
    let right = Atom::multiset_atom(&rel, vec![term]);

    assert_eq!(left, right);
}

#[test]
fn test_apply_maps_arguments_and_copy_variable() {
    let rel = Relation::with_columns("Rel", &["X", "Y"]);
    use crate::algebra::unify::Homomorphism;

    let source = Atom::set_atom(&rel, vec![Term::set(), Term::set()]);
    let target = Atom::set_atom(&rel, vec![Term::dist(), Term::constant(1i64)]);

    let mut hom = Homomorphism::new().extend(&source, &target).unwrap();
    let mapped = source.apply(&mut hom);

    assert_eq!(mapped.arguments(), target.arguments());
    assert_eq!(mapped.copy_variable(), target.copy_variable());
}
