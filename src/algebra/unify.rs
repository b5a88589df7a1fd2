//! Инкрементальные унификаторы: гомоморфизм и специализация
//!
//! Унификатор хранит прямое отображение термов и обратное к нему и
//! расширяется поатомно: либо все пары аргументов двух атомов удается
//! добавить в отображение, либо исходный унификатор остается нетронутым.
//! Две дисциплины расширения различаются допустимыми парами
//! источник/цель: гомоморфизм "складывает" термы для проверки
//! вложенности конъюнктивных запросов, специализация "усиливает" термы
//! для проверки предшествования представлений.

use crate::algebra::atom::Atom;
use crate::algebra::term::{Term, TermKind};
use std::collections::HashMap;

/// Отображение термов, применяемое к атомам и конъюнкциям
///
/// `apply` принимает `&mut self`: некоторые отображения (например,
/// понижение переменных при построении представления) выдают свежие
/// переменные и запоминают их.
pub trait TermMap {
    /// Отображает терм; термы вне области определения остаются собой
    fn apply(&mut self, term: &Term) -> Term;
}

/// Дисциплина расширения унификатора
pub trait UnifyDiscipline: Clone {
    /// Можно ли добавить пару `source -> target`, если `old_source` —
    /// текущий прообраз цели
    fn can_extend(&self, source: &Term, target: &Term, old_source: Option<&Term>) -> bool;

    /// Вызывается после успешного добавления пары
    fn did_extend(&mut self, _from: &Term, _to: &Term) {}
}

/// Инкрементальный унификатор с дисциплиной `D`
#[derive(Debug, Clone)]
pub struct Unifier<D> {
    forward: HashMap<Term, Term>,
    backward: HashMap<Term, Term>,
    discipline: D,
}

/// Дисциплина складывания (гомоморфизм)
#[derive(Debug, Clone, Default)]
pub struct Folding;

/// Дисциплина усиления (специализация)
///
/// Отслеживает вид, в который уже отображались мультимножественные
/// источники: представление не может специализировать одно вхождение
/// мультимножественной колонки одним способом, а другое — другим.
#[derive(Debug, Clone, Default)]
pub struct Specializing {
    multiset_image: Option<TermKind>,
}

/// Гомоморфизм: проверка выводимости одной конъюнкции из другой
pub type Homomorphism = Unifier<Folding>;

/// Специализация: проверка усиления термов между представлениями
pub type Specialization = Unifier<Specializing>;

impl UnifyDiscipline for Folding {
    fn can_extend(&self, source: &Term, target: &Term, old_source: Option<&Term>) -> bool {
        if !source.can_fold(target) {
            return false;
        }

        match old_source {
            None => true,
            Some(old) => target.can_fold_from_both(source, old),
        }
    }
}

impl UnifyDiscipline for Specializing {
    fn can_extend(&self, source: &Term, target: &Term, old_source: Option<&Term>) -> bool {
        if !source.can_specialize(target, self.multiset_image) {
            return false;
        }

        match old_source {
            None => true,
            Some(_) => target.can_specialize_from_both(),
        }
    }

    fn did_extend(&mut self, from: &Term, to: &Term) {
        if from.kind() == TermKind::Multiset {
            self.multiset_image = Some(to.kind());
        }
    }
}

impl<D: UnifyDiscipline + Default> Unifier<D> {
    /// Создает пустой унификатор
    pub fn new() -> Self {
        Unifier {
            forward: HashMap::new(),
            backward: HashMap::new(),
            discipline: D::default(),
        }
    }
}

impl<D: UnifyDiscipline + Default> Default for Unifier<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: UnifyDiscipline> Unifier<D> {
    /// Добавляет пару `from -> to` в отображение
    ///
    /// Повторное добавление уже отображенного источника допустимо только
    /// в ту же цель.
    fn augment(&mut self, from: &Term, to: &Term) -> bool {
        if let Some(existing) = self.forward.get(from) {
            return existing == to;
        }

        let old_source = self.backward.get(to);
        if !self.discipline.can_extend(from, to, old_source) {
            return false;
        }

        self.forward.insert(from.clone(), to.clone());
        self.backward.insert(to.clone(), from.clone());
        self.discipline.did_extend(from, to);
        true
    }

    /// Расширяет унификатор парой атомов
    ///
    /// Расширение "все или ничего": работает на приватной копии, так что
    /// при неудаче текущий унификатор не меняется. Атомы обязаны
    /// принадлежать одному отношению; помимо аргументов отображаются и
    /// копийные переменные.
    pub fn extend(&self, from: &Atom, to: &Atom) -> Option<Self> {
        if from.relation() != to.relation() {
            return None;
        }

        let mut result = self.clone();
        for (source, target) in from.arguments().iter().zip(to.arguments()) {
            if !result.augment(source, target) {
                return None;
            }
        }

        if !result.augment(from.copy_variable(), to.copy_variable()) {
            return None;
        }

        Some(result)
    }
}

impl<D: UnifyDiscipline> TermMap for Unifier<D> {
    fn apply(&mut self, term: &Term) -> Term {
        match self.forward.get(term) {
            Some(image) => image.clone(),
            None => term.clone(),
        }
    }
}
