//! Представления: тело, условия и отношение предшествования
//!
//! Представление описывает раскрываемую информацию одного вхождения
//! таблицы: телесный атом плюс условные атомы по таблицам-партнерам.
//! Ограничение на условия: переменная условного атома — это либо
//! константа, либо выделенная переменная, встречающаяся и в теле, либо
//! множественная переменная, в теле не встречающаяся.

use crate::algebra::atom::Atom;
use crate::algebra::conjunction::Conjunction;
use crate::algebra::relation::Relation;
use crate::algebra::term::{Term, TermKind};
use crate::algebra::unify::{Specialization, TermMap};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Представление с телом и условиями
#[derive(Debug, Clone, Serialize)]
pub struct View {
    name: String,
    body: Atom,
    conditions: Vec<Atom>,
    #[serde(skip)]
    relations: HashSet<Rc<Relation>>,
}

impl View {
    /// Создает представление без понижения переменных
    ///
    /// Вызывающий отвечает за соблюдение ограничения на условия; в
    /// отладочной сборке нарушение приводит к панике.
    pub fn create(name: impl Into<String>, body: Atom, conditions: Vec<Atom>) -> View {
        let mut relations = HashSet::new();
        relations.insert(body.relation().clone());
        for condition in &conditions {
            relations.insert(condition.relation().clone());
        }

        let view = View {
            name: name.into(),
            body,
            conditions,
            relations,
        };

        debug_assert!(
            view.obeys_condition_restriction(),
            "view violates the condition restriction: {:?}",
            view
        );

        view
    }

    /// Создает представление, понижая недопустимые переменные условий
    ///
    /// Каждая переменная условий, не встречающаяся в теле (включая
    /// копийные переменные условных атомов), заменяется свежей
    /// множественной переменной; замена запоминается, так что общая
    /// переменная двух условий остается общей.
    pub fn convert(name: impl Into<String>, body: Atom, conditions: Vec<Atom>) -> View {
        let mut demoter = VariableDemoter::new(body.variables());
        let safe_conditions = conditions
            .iter()
            .map(|condition| condition.apply(&mut demoter))
            .collect();

        View::create(name, body, safe_conditions)
    }

    fn obeys_condition_restriction(&self) -> bool {
        let body_variables = self.body.variables();

        self.conditions.iter().all(|condition| {
            condition.arguments().iter().all(|term| match term.kind() {
                TermKind::Constant => true,
                TermKind::Dist => body_variables.contains(term),
                TermKind::Multiset => false,
                TermKind::Set => !body_variables.contains(term),
            })
        })
    }

    /// Имя представления
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Телесный атом
    pub fn body(&self) -> &Atom {
        &self.body
    }

    /// Условные атомы
    pub fn conditions(&self) -> &[Atom] {
        &self.conditions
    }

    /// Отношение телесного атома
    pub fn body_relation(&self) -> &Rc<Relation> {
        self.body.relation()
    }

    fn body_and_conditions(&self) -> Conjunction {
        let mut atoms = Vec::with_capacity(self.conditions.len() + 1);
        atoms.push(self.body.clone());
        atoms.extend(self.conditions.iter().cloned());
        Conjunction::create(atoms)
    }

    /// Предшествует ли текущее представление представлению `other`
    ///
    /// "Предшествует" означает: любой ответ, порождаемый `other`,
    /// порождается на той же базе данных и текущим представлением, то
    /// есть текущее представление раскрывает не больше, чем `other`.
    /// Сначала тело `other` специализируется до текущего тела, затем
    /// ищется гомоморфизм специализированной конъюнкции `other` на
    /// конъюнкцию текущего представления. Проверка множеств отношений
    /// учитывает отношения условий, а не только тела.
    pub fn precedes(&self, other: &View) -> bool {
        if !other
            .relations
            .iter()
            .all(|relation| self.relations.contains(relation))
        {
            return false;
        }

        let mut specialization = match Specialization::new().extend(&other.body, &self.body) {
            Some(specialization) => specialization,
            None => return false,
        };

        let source = other.body_and_conditions().apply(&mut specialization);
        let target = self.body_and_conditions();

        source.find_homomorphism(&target).is_some()
    }

    /// Совместимы ли тела двух представлений
    pub fn is_compatible_with(&self, other: &View) -> bool {
        self.body.is_compatible_with(&other.body)
    }

    /// Применяет отображение термов к телу и условиям
    pub fn apply(&self, map: &mut impl TermMap) -> View {
        let body = self.body.apply(map);
        let conditions = self
            .conditions
            .iter()
            .map(|condition| condition.apply(map))
            .collect();
        View::convert(self.name.clone(), body, conditions)
    }

    /// Копия представления со свежими переменными
    pub fn fresh_copy(&self) -> View {
        let mut refresh = RefreshMap::new();
        let body = self.body.apply(&mut refresh);
        let conditions = self
            .conditions
            .iter()
            .map(|condition| condition.apply(&mut refresh))
            .collect();
        View::create(self.name.clone(), body, conditions)
    }
}

/// Представления равны по телу и условиям; имя в сравнении не участвует
impl PartialEq for View {
    fn eq(&self, other: &View) -> bool {
        self.body == other.body && self.conditions == other.conditions
    }
}

impl Eq for View {}

/// Понижение переменных условий до множественных
struct VariableDemoter {
    forward: HashMap<Term, Term>,
}

impl VariableDemoter {
    fn new(body_variables: HashSet<Term>) -> VariableDemoter {
        let forward = body_variables
            .into_iter()
            .map(|term| (term.clone(), term))
            .collect();
        VariableDemoter { forward }
    }
}

impl TermMap for VariableDemoter {
    fn apply(&mut self, term: &Term) -> Term {
        if term.kind() == TermKind::Constant {
            return term.clone();
        }

        self.forward
            .entry(term.clone())
            .or_insert_with(Term::set)
            .clone()
    }
}

/// Замена всех переменных свежими с сохранением разделения
struct RefreshMap {
    mapping: HashMap<Term, Term>,
}

impl RefreshMap {
    fn new() -> RefreshMap {
        RefreshMap {
            mapping: HashMap::new(),
        }
    }
}

impl TermMap for RefreshMap {
    fn apply(&mut self, term: &Term) -> Term {
        if term.kind() == TermKind::Constant {
            return term.clone();
        }

        self.mapping
            .entry(term.clone())
            .or_insert_with(|| Term::variable_with_kind(term.kind()))
            .clone()
    }
}
