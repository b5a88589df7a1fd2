//! Конъюнкции атомов и поиск гомоморфизмов

use crate::algebra::atom::Atom;
use crate::algebra::unify::{Homomorphism, TermMap};
use serde::Serialize;

/// Конъюнкция — упорядоченный список атомов
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conjunction {
    atoms: Vec<Atom>,
}

impl Conjunction {
    /// Создает конъюнкцию из списка атомов
    pub fn create(atoms: Vec<Atom>) -> Conjunction {
        Conjunction { atoms }
    }

    /// Атомы конъюнкции
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// Применяет отображение термов ко всем атомам
    pub fn apply(&self, map: &mut impl TermMap) -> Conjunction {
        Conjunction {
            atoms: self.atoms.iter().map(|atom| atom.apply(map)).collect(),
        }
    }

    /// Ищет гомоморфизм из текущей конъюнкции в `other`
    ///
    /// Поиск с возвратом: для каждого атома-источника по порядку
    /// пробуются все атомы-цели; в худшем случае экспоненциален по числу
    /// атомов.
    pub fn find_homomorphism(&self, other: &Conjunction) -> Option<Homomorphism> {
        self.search(other, Homomorphism::new(), 0)
    }

    fn search(
        &self,
        other: &Conjunction,
        partial: Homomorphism,
        source_index: usize,
    ) -> Option<Homomorphism> {
        if source_index == self.atoms.len() {
            return Some(partial);
        }

        let source = &self.atoms[source_index];
        for target in &other.atoms {
            if let Some(candidate) = partial.extend(source, target) {
                if let Some(extension) = self.search(other, candidate, source_index + 1) {
                    return Some(extension);
                }
            }
        }

        None
    }

    /// Гомоморфны ли конъюнкции в обе стороны (эквивалентность)
    pub fn is_homomorphic_to(&self, other: &Conjunction) -> bool {
        self.find_homomorphism(other).is_some() && other.find_homomorphism(self).is_some()
    }
}
