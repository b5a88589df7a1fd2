//! Ограничения равенства, найденные в предикатах запроса

use crate::algebra::term::Value;
use crate::analyzer::scope::ColumnId;
use std::fmt;

/// Аргумент ограничения равенства
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EqualityArg {
    /// Колонка базовой таблицы
    Column(ColumnId),
    /// Константа
    Constant(Value),
}

/// Ограничение равенства двух аргументов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualityConstraint {
    pub left: EqualityArg,
    pub right: EqualityArg,
}

impl EqualityConstraint {
    /// Создает ограничение равенства
    pub fn new(left: EqualityArg, right: EqualityArg) -> Self {
        EqualityConstraint { left, right }
    }
}

impl fmt::Display for EqualityConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arg = |a: &EqualityArg| match a {
            EqualityArg::Column(id) => format!("col#{}", id.0),
            EqualityArg::Constant(value) => value.to_string(),
        };
        write!(f, "Eq({}, {})", arg(&self.left), arg(&self.right))
    }
}
