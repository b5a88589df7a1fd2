//! Тесты представлений и отношения предшествования

use crate::algebra::atom::Atom;
use crate::algebra::relation::Relation;
use crate::algebra::term::{Term, TermKind};
use crate::algebra::unify::{Homomorphism, Specialization};
use crate::algebra::view::View;
use crate::common::test_utils::views_equivalent;
use std::rc::Rc;

fn relation_for_arity(arity: usize) -> Rc<Relation> {
    match arity {
        0 => Relation::with_columns("R0", &[]),
        1 => Relation::with_columns("R1", &["col1"]),
        2 => Relation::with_columns("R2", &["col1", "col2"]),
        _ => panic!("Неожиданная арность: {}", arity),
    }
}

fn make_view(arguments: &[Term]) -> View {
    let relation = relation_for_arity(arguments.len());
    View::create(
        "Q",
        Atom::set_atom(&relation, arguments.to_vec()),
        Vec::new(),
    )
}

#[test]
fn test_is_compatible_with_empty_argument_list() {
    assert!(make_view(&[]).is_compatible_with(&make_view(&[])));
}

#[test]
fn test_is_compatible_with_single_argument() {
    let terms = vec![
        Term::dist(),
        Term::multiset(),
        Term::set(),
        Term::constant(0i64),
    ];

    // Любая пара из переменных и равных констант совместима
    for left in &terms {
        for right in &terms {
            assert!(make_view(&[left.clone()]).is_compatible_with(&make_view(&[right.clone()])));
        }
    }

    assert!(!make_view(&[Term::constant(0i64)])
        .is_compatible_with(&make_view(&[Term::constant(1i64)])));
}

#[test]
fn test_is_compatible_with_two_arguments_and_constants() {
    let shared = Term::multiset();
    let repeated = make_view(&[shared.clone(), shared]);
    let distinct = make_view(&[Term::multiset(), Term::multiset()]);

    let const00 = make_view(&[Term::constant(0i64), Term::constant(0i64)]);
    let const01 = make_view(&[Term::constant(0i64), Term::constant(1i64)]);

    assert!(repeated.is_compatible_with(&const00));
    assert!(!repeated.is_compatible_with(&const01));
    assert!(distinct.is_compatible_with(&const00));
    assert!(distinct.is_compatible_with(&const01));
}

#[test]
fn test_precedes_different_relations() {
    let r_rel = Relation::with_columns("R", &[]);
    let s_rel = Relation::with_columns("S", &[]);

    let view1 = View::create("Q", Atom::set_atom(&r_rel, vec![]), vec![]);
    let view2 = View::create("Q", Atom::set_atom(&s_rel, vec![]), vec![]);

    assert!(!view1.precedes(&view2));
    assert!(!view2.precedes(&view1));
}

#[test]
fn test_precedes_identical() {
    assert!(make_view(&[]).precedes(&make_view(&[])));
}

#[test]
fn test_precedes_single_argument_matrix() {
    let dist = Term::dist();
    let multiset = Term::multiset();
    let set = Term::set();
    let constant = Term::constant(0i64);

    assert!(make_view(&[dist.clone()]).precedes(&make_view(&[dist.clone()])));
    assert!(!make_view(&[dist.clone()]).precedes(&make_view(&[multiset.clone()])));
    assert!(!make_view(&[dist.clone()]).precedes(&make_view(&[set.clone()])));
    assert!(!make_view(&[dist.clone()]).precedes(&make_view(&[constant.clone()])));

    assert!(make_view(&[multiset.clone()]).precedes(&make_view(&[dist.clone()])));
    assert!(make_view(&[multiset.clone()]).precedes(&make_view(&[multiset.clone()])));
    assert!(!make_view(&[multiset.clone()]).precedes(&make_view(&[set.clone()])));
    assert!(!make_view(&[multiset.clone()]).precedes(&make_view(&[constant.clone()])));

    assert!(make_view(&[set.clone()]).precedes(&make_view(&[dist.clone()])));
    assert!(make_view(&[set.clone()]).precedes(&make_view(&[multiset.clone()])));
    assert!(make_view(&[set.clone()]).precedes(&make_view(&[set.clone()])));
    assert!(!make_view(&[set.clone()]).precedes(&make_view(&[constant.clone()])));

    assert!(make_view(&[constant.clone()]).precedes(&make_view(&[dist])));
    assert!(!make_view(&[constant.clone()]).precedes(&make_view(&[multiset])));
    assert!(!make_view(&[constant.clone()]).precedes(&make_view(&[set])));
    assert!(make_view(&[constant.clone()]).precedes(&make_view(&[constant.clone()])));
}

#[test]
fn test_precedes_single_argument_same_kind() {
    assert!(make_view(&[Term::dist()]).precedes(&make_view(&[Term::dist()])));
    assert!(make_view(&[Term::multiset()]).precedes(&make_view(&[Term::multiset()])));
    assert!(make_view(&[Term::set()]).precedes(&make_view(&[Term::set()])));
    assert!(!make_view(&[Term::constant(0i64)]).precedes(&make_view(&[Term::constant(1i64)])));
}

#[test]
fn test_precedes_two_arguments_sharing() {
    // Повторенная переменная раскрывает меньше, чем пара различных
    let dist = Term::dist();
    let repeated_dist = make_view(&[dist.clone(), dist]);
    let distinct_dist = make_view(&[Term::dist(), Term::dist()]);

    assert!(repeated_dist.precedes(&repeated_dist));
    assert!(repeated_dist.precedes(&distinct_dist));
    assert!(!distinct_dist.precedes(&repeated_dist));

    let multiset = Term::multiset();
    let repeated_multiset = make_view(&[multiset.clone(), multiset]);
    let distinct_multiset = make_view(&[Term::multiset(), Term::multiset()]);

    assert!(repeated_multiset.precedes(&repeated_multiset));
    assert!(!repeated_multiset.precedes(&distinct_multiset));
    assert!(!distinct_multiset.precedes(&repeated_multiset));
    assert!(distinct_multiset.precedes(&distinct_multiset));

    let set = Term::set();
    let repeated_set = make_view(&[set.clone(), set]);
    let distinct_set = make_view(&[Term::set(), Term::set()]);

    assert!(repeated_set.precedes(&repeated_set));
    assert!(!repeated_set.precedes(&distinct_set));
    assert!(!distinct_set.precedes(&repeated_set));
    assert!(distinct_set.precedes(&distinct_set));
}

#[test]
fn test_precedes_two_multiset_existential_arguments() {
    let multiset_pair = make_view(&[Term::multiset(), Term::multiset()]);
    let set_pair = make_view(&[Term::set(), Term::set()]);
    let mixed = make_view(&[Term::multiset(), Term::set()]);
    let mixed_reversed = make_view(&[Term::set(), Term::multiset()]);

    assert!(multiset_pair.precedes(&multiset_pair));
    assert!(!mixed.precedes(&multiset_pair));
    assert!(!mixed_reversed.precedes(&multiset_pair));
    assert!(set_pair.precedes(&multiset_pair));
}

#[test]
fn test_precedes_set_and_multiset_copy_variables() {
    let rel = Relation::with_columns("Rel", &["X", "Y"]);

    let multiset_view = View::create(
        "Q",
        Atom::multiset_atom(&rel, vec![Term::dist(), Term::dist()]),
        vec![],
    );
    let set_view = View::create(
        "Q",
        Atom::set_atom(&rel, vec![Term::dist(), Term::dist()]),
        vec![],
    );

    assert!(multiset_view.precedes(&multiset_view));
    assert!(!multiset_view.precedes(&set_view));
    assert!(set_view.precedes(&multiset_view));
    assert!(set_view.precedes(&set_view));
}

#[test]
fn test_precedes_conditional_simple() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let uid = Term::dist();
    let alice = Term::constant("alice");

    let uids_of_alice_friends = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid.clone(), Term::set()]),
        vec![Atom::set_atom(&friend, vec![alice, uid.clone()])],
    );
    let uids_of_all_users = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid, Term::set()]),
        vec![],
    );

    assert!(uids_of_alice_friends.precedes(&uids_of_alice_friends));
    assert!(uids_of_alice_friends.precedes(&uids_of_all_users));
    assert!(!uids_of_all_users.precedes(&uids_of_alice_friends));
    assert!(uids_of_all_users.precedes(&uids_of_all_users));
}

#[test]
fn test_precedes_conditional_specialization() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let one = Term::constant(1i64);
    let two = Term::constant(2i64);

    // Q(name) :- User(2, name) при Friend(1, 2)
    let name_of_one_friend = View::create(
        "Q",
        Atom::set_atom(&user, vec![two.clone(), Term::dist()]),
        vec![Atom::set_atom(&friend, vec![one.clone(), two])],
    );

    // Q(uid, name) :- User(uid, name) при Friend(1, uid)
    let uid = Term::dist();
    let names_of_all_friends = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid.clone(), Term::dist()]),
        vec![Atom::set_atom(&friend, vec![one, uid])],
    );

    assert!(name_of_one_friend.precedes(&name_of_one_friend));
    assert!(name_of_one_friend.precedes(&names_of_all_friends));
    assert!(!names_of_all_friends.precedes(&name_of_one_friend));
    assert!(names_of_all_friends.precedes(&names_of_all_friends));
}

#[test]
fn test_precedes_conditional_two_joins() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let me = Term::constant(1i64);
    let uid1 = Term::dist();
    let set_uid2 = Term::set();
    let constant_uid2 = Term::constant(42i64);

    let friends_of_one_friend = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid1.clone(), Term::dist()]),
        vec![
            Atom::set_atom(&friend, vec![constant_uid2.clone(), uid1.clone()]),
            Atom::set_atom(&friend, vec![me.clone(), constant_uid2]),
        ],
    );

    let friends_of_all_friends = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid1.clone(), Term::dist()]),
        vec![
            Atom::set_atom(&friend, vec![set_uid2.clone(), uid1]),
            Atom::set_atom(&friend, vec![me, set_uid2]),
        ],
    );

    assert!(friends_of_one_friend.precedes(&friends_of_one_friend));
    assert!(friends_of_one_friend.precedes(&friends_of_all_friends));
    assert!(!friends_of_all_friends.precedes(&friends_of_one_friend));
    assert!(friends_of_all_friends.precedes(&friends_of_all_friends));
}

#[test]
fn test_precedes_conditional_fail_in_body() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let name_of_one_friend = View::create(
        "Q",
        Atom::set_atom(&user, vec![Term::constant(2i64), Term::dist()]),
        vec![Atom::set_atom(
            &friend,
            vec![Term::constant(1i64), Term::set()],
        )],
    );

    let uid = Term::dist();
    let uids_of_all_friends = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid.clone(), Term::set()]),
        vec![Atom::set_atom(&friend, vec![Term::constant(1i64), uid])],
    );

    assert!(name_of_one_friend.precedes(&name_of_one_friend));
    assert!(!name_of_one_friend.precedes(&uids_of_all_friends));
    assert!(!uids_of_all_friends.precedes(&name_of_one_friend));
    assert!(uids_of_all_friends.precedes(&uids_of_all_friends));
}

#[test]
fn test_precedes_conditional_fail_in_condition() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let name_of_one_friend = View::create(
        "Q",
        Atom::set_atom(&user, vec![Term::set(), Term::dist()]),
        vec![Atom::set_atom(
            &friend,
            vec![Term::constant(1i64), Term::constant(2i64)],
        )],
    );

    let uid = Term::dist();
    let names_of_all_friends = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid.clone(), Term::set()]),
        vec![Atom::set_atom(&friend, vec![Term::constant(1i64), uid])],
    );

    assert!(name_of_one_friend.precedes(&name_of_one_friend));
    assert!(!name_of_one_friend.precedes(&names_of_all_friends));
    assert!(!names_of_all_friends.precedes(&name_of_one_friend));
    assert!(names_of_all_friends.precedes(&names_of_all_friends));
}

#[test]
fn test_precedes_conditional_folding() {
    let sailors = Relation::with_columns("Sailors", &["sid", "sname", "rating", "age"]);

    let rating = Term::dist();
    let unconditional = View::create(
        "Q",
        Atom::multiset_atom(
            &sailors,
            vec![
                Term::multiset(),
                Term::multiset(),
                rating.clone(),
                Term::dist(),
            ],
        ),
        vec![],
    );

    let conditional = View::create(
        "Q",
        Atom::multiset_atom(
            &sailors,
            vec![
                Term::multiset(),
                Term::multiset(),
                rating.clone(),
                Term::dist(),
            ],
        ),
        vec![Atom::set_atom(
            &sailors,
            vec![Term::set(), Term::set(), rating, Term::set()],
        )],
    );

    assert!(unconditional.precedes(&conditional));
    assert!(conditional.precedes(&unconditional));
}

#[test]
#[should_panic]
fn test_create_rejects_multiset_variable_in_condition() {
    let rel = Relation::with_columns("Rel", &["A"]);
    let multiset = Term::multiset();

    View::create(
        "Q",
        Atom::set_atom(&rel, vec![multiset.clone()]),
        vec![Atom::set_atom(&rel, vec![multiset])],
    );
}

#[test]
#[should_panic]
fn test_create_rejects_shared_set_variable_in_condition() {
    let rel = Relation::with_columns("Rel", &["A"]);
    let set = Term::set();

    View::create(
        "Q",
        Atom::set_atom(&rel, vec![set.clone()]),
        vec![Atom::set_atom(&rel, vec![set])],
    );
}

#[test]
fn test_convert_demotes_condition_only_variables() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let uid = Term::dist();
    let stray_multiset = Term::multiset();

    let view = View::convert(
        "Q",
        Atom::set_atom(&user, vec![uid.clone(), Term::set()]),
        vec![Atom::set_atom(&friend, vec![uid.clone(), stray_multiset])],
    );

    // Переменная тела сохраняется, посторонняя понижается до множественной
    assert_eq!(view.conditions()[0].arguments()[0], uid);
    assert_eq!(
        view.conditions()[0].arguments()[1].kind(),
        TermKind::Set
    );
}

#[test]
fn test_convert_keeps_shared_demotions_consistent() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let shared = Term::multiset();
    let view = View::convert(
        "Q",
        Atom::set_atom(&user, vec![Term::dist(), Term::set()]),
        vec![
            Atom::set_atom(&friend, vec![shared.clone(), Term::set()]),
            Atom::set_atom(&friend, vec![shared, Term::set()]),
        ],
    );

    // Общая понижаемая переменная остается общей между условиями
    assert_eq!(
        view.conditions()[0].arguments()[0],
        view.conditions()[1].arguments()[0]
    );
}

#[test]
fn test_convert_equals_create_without_conditions() {
    let user = Relation::with_columns("User", &["uid", "name"]);

    let body = Atom::multiset_atom(&user, vec![Term::dist(), Term::dist()]);
    let converted = View::convert("Q", body.clone(), vec![]);
    let created = View::create("Q", body, vec![]);

    assert!(views_equivalent(&converted, &created));
}

#[test]
fn test_fresh_copy_is_equivalent() {
    let user = Relation::with_columns("User", &["uid", "name"]);
    let friend = Relation::with_columns("Friend", &["uid1", "uid2"]);

    let uid = Term::dist();
    let view = View::create(
        "Q",
        Atom::set_atom(&user, vec![uid.clone(), Term::set()]),
        vec![Atom::set_atom(&friend, vec![Term::constant(1i64), uid])],
    );

    let copy = view.fresh_copy();
    assert!(views_equivalent(&view, &copy));
    // Свежая копия не разделяет переменных с оригиналом
    assert_ne!(copy.body().arguments()[0], view.body().arguments()[0]);
}

#[test]
fn test_single_atom_specialization_matches_homomorphism_pair() {
    let rel = Relation::with_columns("R", &["X"]);

    let terms: Vec<Term> = vec![
        Term::dist(),
        Term::dist(),
        Term::multiset(),
        Term::multiset(),
        Term::set(),
        Term::set(),
        Term::constant("A"),
        Term::constant("B"),
    ];

    let atoms: Vec<Atom> = terms
        .iter()
        .map(|term| Atom::set_atom(&rel, vec![term.clone()]))
        .collect();

    // Для одиночных атомов взаимная специализация совпадает с взаимным
    // гомоморфизмом
    for atom1 in &atoms {
        for atom2 in &atoms {
            let has_specializations = Specialization::new().extend(atom1, atom2).is_some()
                && Specialization::new().extend(atom2, atom1).is_some();
            let has_homomorphisms = Homomorphism::new().extend(atom1, atom2).is_some()
                && Homomorphism::new().extend(atom2, atom1).is_some();

            assert_eq!(
                has_specializations, has_homomorphisms,
                "Расхождение на {} и {}",
                atom1, atom2
            );
        }
    }
}
