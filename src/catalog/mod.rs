//! Каталог отношений базы данных
//!
//! Типизированные отношения и схема — набор отношений с поиском по
//! имени. Имя таблицы ищется без учета регистра, как принято в SQL.

pub mod parser;

#[cfg(test)]
pub mod tests;

use crate::algebra::relation::Relation;
use crate::common::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

// Переэкспортируем основные типы
pub use parser::parse_relation;

/// Примитивный тип колонки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Числовой тип
    Numeric,
    /// Строковый тип
    Str,
    /// Логический тип
    Bool,
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Numeric => write!(f, "numeric"),
            PrimitiveType::Str => write!(f, "string"),
            PrimitiveType::Bool => write!(f, "bool"),
        }
    }
}

impl std::str::FromStr for PrimitiveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "numeric" | "int" | "integer" => Ok(PrimitiveType::Numeric),
            "string" | "str" | "varchar" | "text" => Ok(PrimitiveType::Str),
            "bool" | "boolean" => Ok(PrimitiveType::Bool),
            other => Err(Error::configuration(format!(
                "unknown column type: {}",
                other
            ))),
        }
    }
}

/// Отношение с типами колонок
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedRelation {
    relation: Rc<Relation>,
    types: Vec<PrimitiveType>,
}

impl TypedRelation {
    /// Создает построитель отношения
    pub fn builder(name: impl Into<String>) -> TypedRelationBuilder {
        TypedRelationBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Нетипизированное отношение для атомов
    pub fn relation(&self) -> &Rc<Relation> {
        &self.relation
    }

    /// Имя отношения
    pub fn name(&self) -> &str {
        self.relation.name()
    }

    /// Арность отношения
    pub fn arity(&self) -> usize {
        self.relation.arity()
    }

    /// Имена колонок
    pub fn column_names(&self) -> &[String] {
        self.relation.column_names()
    }

    /// Типы колонок
    pub fn column_types(&self) -> &[PrimitiveType] {
        &self.types
    }
}

impl fmt::Display for TypedRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<String> = self
            .column_names()
            .iter()
            .zip(&self.types)
            .map(|(name, ty)| format!("{}:{}", name, ty))
            .collect();
        write!(f, "{}({})", self.name(), columns.join(", "))
    }
}

/// Построитель типизированного отношения
pub struct TypedRelationBuilder {
    name: String,
    columns: Vec<(String, PrimitiveType)>,
}

impl TypedRelationBuilder {
    /// Добавляет колонку
    pub fn column(mut self, name: impl Into<String>, ty: PrimitiveType) -> Self {
        self.columns.push((name.into(), ty));
        self
    }

    /// Завершает построение
    pub fn build(self) -> Rc<TypedRelation> {
        let (names, types): (Vec<String>, Vec<PrimitiveType>) = self.columns.into_iter().unzip();
        Rc::new(TypedRelation {
            relation: Relation::create(self.name, names),
            types,
        })
    }
}

/// Схема: набор отношений с поиском по имени
#[derive(Debug, Clone, Default)]
pub struct Schema {
    relations: IndexMap<String, Rc<TypedRelation>>,
}

impl Schema {
    /// Создает пустую схему
    pub fn new() -> Self {
        Schema {
            relations: IndexMap::new(),
        }
    }

    /// Создает схему из списка отношений
    pub fn of(relations: impl IntoIterator<Item = Rc<TypedRelation>>) -> Self {
        let mut schema = Schema::new();
        for relation in relations {
            schema.add(relation);
        }
        schema
    }

    /// Добавляет отношение; повторное имя замещает прежнее
    pub fn add(&mut self, relation: Rc<TypedRelation>) {
        self.relations
            .insert(relation.name().to_ascii_lowercase(), relation);
    }

    /// Ищет отношение по имени без учета регистра
    pub fn find_relation(&self, name: &str) -> Option<&Rc<TypedRelation>> {
        self.relations.get(name.to_ascii_lowercase().as_str())
    }

    /// Отношения схемы в порядке добавления
    pub fn relations(&self) -> impl Iterator<Item = &Rc<TypedRelation>> {
        self.relations.values()
    }

    /// Число отношений в схеме
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Пуста ли схема
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}
