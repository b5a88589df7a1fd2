//! Термы конъюнктивных запросов
//!
//! Терм — это либо константа, либо переменная одного из трех видов:
//! выделенная (видимая в результате запроса), мультимножественная
//! экзистенциальная или множественная экзистенциальная. У каждого вида
//! фиксированный приоритет унификации: при унификации термов разных видов
//! побеждает терм с меньшим приоритетом.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Счетчик для выдачи уникальных идентификаторов переменных
static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(1);

fn fresh_variable_id() -> u64 {
    NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Значение константы в запросе
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Целочисленный литерал
    Int(i64),
    /// Строковый литерал
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "'{}'", value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

/// Вид терма
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TermKind {
    /// Константа
    Constant,
    /// Выделенная переменная
    Dist,
    /// Мультимножественная экзистенциальная переменная
    Multiset,
    /// Множественная экзистенциальная переменная
    Set,
}

impl TermKind {
    /// Приоритет унификации: чем меньше, тем сильнее раскрытие
    pub fn priority(self) -> u8 {
        match self {
            TermKind::Constant => 0,
            TermKind::Dist => 1,
            TermKind::Multiset => 2,
            TermKind::Set => 3,
        }
    }

    /// Является ли вид экзистенциальным
    pub fn is_existential(self) -> bool {
        matches!(self, TermKind::Multiset | TermKind::Set)
    }
}

/// Терм конъюнктивного запроса
///
/// Переменные различаются по идентификатору: два вызова [`Term::dist`]
/// дают разные переменные. Константы равны тогда и только тогда, когда
/// равны их значения.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Term {
    /// Константа
    Constant(Value),
    /// Выделенная переменная
    Dist(u64),
    /// Мультимножественная экзистенциальная переменная
    Multiset(u64),
    /// Множественная экзистенциальная переменная
    Set(u64),
}

impl Term {
    /// Создает константу с заданным значением
    pub fn constant(value: impl Into<Value>) -> Term {
        Term::Constant(value.into())
    }

    /// Создает свежую выделенную переменную
    pub fn dist() -> Term {
        Term::Dist(fresh_variable_id())
    }

    /// Создает свежую мультимножественную переменную
    pub fn multiset() -> Term {
        Term::Multiset(fresh_variable_id())
    }

    /// Создает свежую множественную переменную
    pub fn set() -> Term {
        Term::Set(fresh_variable_id())
    }

    /// Создает свежую переменную заданного вида
    ///
    /// Паникует для [`TermKind::Constant`]: у константы нет "свежего"
    /// экземпляра.
    pub fn variable_with_kind(kind: TermKind) -> Term {
        match kind {
            TermKind::Dist => Term::dist(),
            TermKind::Multiset => Term::multiset(),
            TermKind::Set => Term::set(),
            TermKind::Constant => panic!("variable_with_kind: constants have no fresh instances"),
        }
    }

    /// Вид терма
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Constant(_) => TermKind::Constant,
            Term::Dist(_) => TermKind::Dist,
            Term::Multiset(_) => TermKind::Multiset,
            Term::Set(_) => TermKind::Set,
        }
    }

    /// Унифицирует два терма
    ///
    /// Результат `C = A.unify_with(B)` обладает свойством: запрос
    /// `Q(...) :- R(A, B), A = B` эквивалентен `Q(...) :- R(C, C)`.
    /// Термы разных видов всегда унифицируются в терм с меньшим
    /// приоритетом. Однотипные переменные структурно эквивалентны, так
    /// что можно вернуть любую из двух; разные константы не
    /// унифицируются.
    pub fn unify_with(&self, other: &Term) -> Option<Term> {
        if self.kind() == other.kind() {
            match (self, other) {
                (Term::Constant(left), Term::Constant(right)) => {
                    if left == right {
                        Some(self.clone())
                    } else {
                        None
                    }
                }
                _ => Some(self.clone()),
            }
        } else if self.kind().priority() < other.kind().priority() {
            Some(self.clone())
        } else {
            Some(other.clone())
        }
    }

    /// Может ли гомоморфизм отобразить текущий терм в `target`
    pub(crate) fn can_fold(&self, target: &Term) -> bool {
        match self {
            Term::Constant(_) => self == target,
            Term::Dist(_) => target.kind() == TermKind::Dist,
            Term::Multiset(_) => target.kind() == TermKind::Multiset,
            Term::Set(_) => true,
        }
    }

    /// Может ли гомоморфизм отобразить `source` и `old_source` в текущий
    /// терм (вызывается на терме-цели)
    pub(crate) fn can_fold_from_both(&self, source: &Term, old_source: &Term) -> bool {
        match self {
            Term::Dist(_) => {
                source.kind() != TermKind::Dist || old_source.kind() != TermKind::Dist
            }
            _ => true,
        }
    }

    /// Может ли специализация отобразить текущий терм в `target`
    ///
    /// `multiset_image` — вид, в который эта специализация уже отображала
    /// мультимножественные переменные; все последующие мультимножественные
    /// источники обязаны отображаться в цель того же вида.
    pub(crate) fn can_specialize(&self, target: &Term, multiset_image: Option<TermKind>) -> bool {
        match self {
            Term::Constant(_) => self == target,
            Term::Dist(_) => true,
            Term::Multiset(_) => {
                (multiset_image.is_none() || multiset_image == Some(target.kind()))
                    && target.kind().is_existential()
            }
            Term::Set(_) => target.kind() == TermKind::Set,
        }
    }

    /// Может ли специализация отобразить два разных источника в текущий
    /// терм (вызывается на терме-цели)
    pub(crate) fn can_specialize_from_both(&self) -> bool {
        match self {
            Term::Constant(_) | Term::Dist(_) => true,
            Term::Multiset(_) | Term::Set(_) => false,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(value) => write!(f, "{}", value),
            Term::Dist(id) => write!(f, "Dist[{}]", id),
            Term::Multiset(id) => write!(f, "Multiset[{}]", id),
            Term::Set(id) => write!(f, "Set[{}]", id),
        }
    }
}
