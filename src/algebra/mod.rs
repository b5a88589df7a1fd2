//! Алгебра термов, атомов и представлений
//!
//! Ядро анализа раскрытия: термы с приоритетной унификацией, атомы с
//! копийными переменными, конъюнкции с поиском гомоморфизмов и
//! представления с отношением предшествования.

pub mod atom;
pub mod conjunction;
pub mod relation;
pub mod render;
pub mod term;
pub mod unify;
pub mod view;

#[cfg(test)]
pub mod tests;

// Переэкспортируем основные типы
pub use atom::Atom;
pub use conjunction::Conjunction;
pub use relation::Relation;
pub use render::{RenderMode, ViewRenderer};
pub use term::{Term, TermKind, Value};
pub use unify::{Homomorphism, Specialization, TermMap, UnifyDiscipline, Unifier};
pub use view::View;
