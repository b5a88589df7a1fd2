//! Отношения (схемы таблиц) для атомов конъюнктивных запросов

use serde::Serialize;
use std::fmt;
use std::rc::Rc;

/// Отношение: имя и упорядоченный список имен колонок
///
/// Два отношения равны, если совпадают имя и список колонок. Атомы
/// разделяют одно отношение через [`Rc`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    name: String,
    columns: Vec<String>,
}

impl Relation {
    /// Создает отношение с заданным именем и колонками
    pub fn create(name: impl Into<String>, columns: Vec<String>) -> Rc<Relation> {
        Rc::new(Relation {
            name: name.into(),
            columns,
        })
    }

    /// Удобный конструктор для тестов и демонстраций
    pub fn with_columns(name: &str, columns: &[&str]) -> Rc<Relation> {
        Relation::create(name, columns.iter().map(|c| c.to_string()).collect())
    }

    /// Имя отношения
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Арность (число колонок)
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Имена колонок
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.columns.join(", "))
    }
}
