//! Атомы конъюнктивных запросов
//!
//! Атом связывает отношение с упорядоченным списком термов-аргументов.
//! Помимо аргументов атом несет копийную переменную, фиксирующую режим
//! вычисления: мультимножественный (дубликаты различимы) или
//! множественный.

use crate::algebra::relation::Relation;
use crate::algebra::term::{Term, TermKind};
use crate::algebra::unify::TermMap;
use crate::util::union_find::{CellId, UnionFind};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Атом конъюнктивного запроса
#[derive(Debug, Clone, Serialize)]
pub struct Atom {
    relation: Rc<Relation>,
    arguments: Vec<Term>,
    copy_variable: Term,
}

impl Atom {
    fn new(relation: Rc<Relation>, arguments: Vec<Term>, copy_variable: Term) -> Atom {
        assert_eq!(
            relation.arity(),
            arguments.len(),
            "atom has wrong number of arguments for {}",
            relation.name()
        );

        Atom {
            relation,
            arguments,
            copy_variable,
        }
    }

    /// Создает атом с множественным режимом вычисления
    pub fn set_atom(relation: &Rc<Relation>, arguments: Vec<Term>) -> Atom {
        Atom::new(relation.clone(), arguments, Term::set())
    }

    /// Создает атом с мультимножественным режимом вычисления
    pub fn multiset_atom(relation: &Rc<Relation>, arguments: Vec<Term>) -> Atom {
        Atom::new(relation.clone(), arguments, Term::multiset())
    }

    /// Отношение атома
    pub fn relation(&self) -> &Rc<Relation> {
        &self.relation
    }

    /// Аргументы атома
    pub fn arguments(&self) -> &[Term] {
        &self.arguments
    }

    /// Копийная переменная атома
    pub fn copy_variable(&self) -> &Term {
        &self.copy_variable
    }

    /// Множество переменных среди аргументов (константы не входят)
    pub fn variables(&self) -> HashSet<Term> {
        self.arguments
            .iter()
            .filter(|term| term.kind() != TermKind::Constant)
            .cloned()
            .collect()
    }

    /// Применяет отображение термов к аргументам и копийной переменной
    pub fn apply(&self, map: &mut impl TermMap) -> Atom {
        let arguments = self.arguments.iter().map(|term| map.apply(term)).collect();
        let copy_variable = map.apply(&self.copy_variable);
        Atom::new(self.relation.clone(), arguments, copy_variable)
    }

    /// Унифицирует два атома одного отношения
    ///
    /// На каждый различный терм каждого атома заводится ячейка системы
    /// непересекающихся множеств; пары аргументов унифицируются через
    /// представителей компонент, несовместимость любой пары отменяет
    /// всю унификацию. При успехе возвращается атом с разрешенными
    /// аргументами и унифицированной копийной переменной.
    pub fn unify_with(&self, other: &Atom) -> Option<Atom> {
        if self.relation != other.relation {
            return None;
        }

        let mut cells: UnionFind<Term> = UnionFind::new();
        let mine = cells_for_terms(&mut cells, &self.arguments);
        let theirs = cells_for_terms(&mut cells, &other.arguments);

        for (left, right) in self.arguments.iter().zip(&other.arguments) {
            let left_cell = mine[left];
            let right_cell = theirs[right];

            let left_term = cells.value(left_cell).clone();
            let unifier = left_term.unify_with(cells.value(right_cell))?;
            cells.set_value(left_cell, unifier.clone());
            cells.set_value(right_cell, unifier);

            let merged = cells.union(left_cell, right_cell);
            debug_assert!(merged, "cells with equal values must merge");
        }

        let arguments = self
            .arguments
            .iter()
            .map(|term| cells.value(mine[term]).clone())
            .collect();
        let copy_variable = self.copy_variable.unify_with(&other.copy_variable)?;

        Some(Atom::new(self.relation.clone(), arguments, copy_variable))
    }

    /// Совместимы ли атомы: существует ли вообще строка, которую оба
    /// могут обозначать (пере-аппроксимация сверху)
    pub fn is_compatible_with(&self, other: &Atom) -> bool {
        self.unify_with(other).is_some()
    }
}

fn cells_for_terms<'a>(
    cells: &mut UnionFind<Term>,
    terms: &'a [Term],
) -> HashMap<&'a Term, CellId> {
    let mut map: HashMap<&Term, CellId> = HashMap::new();
    for term in terms {
        if !map.contains_key(term) {
            let cell = cells.add(term.clone());
            map.insert(term, cell);
        }
    }
    map
}

/// Атомы равны по отношению и аргументам; копийная переменная в
/// сравнении не участвует
impl PartialEq for Atom {
    fn eq(&self, other: &Atom) -> bool {
        self.relation == other.relation && self.arguments == other.arguments
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.relation.hash(state);
        self.arguments.hash(state);
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arguments: Vec<String> = self.arguments.iter().map(|t| t.to_string()).collect();
        write!(
            f,
            "{}({}; {})",
            self.relation.name(),
            arguments.join(", "),
            self.copy_variable
        )
    }
}
