//! Конвейер извлечения представлений
//!
//! Последовательность проходов над одним запросом: парсинг, разрешение
//! имен, инициализация термов, построение графа условий и извлечение
//! представлений. Каждый вызов обрабатывает один запрос от начала до
//! конца на свежем состоянии.

pub mod cond_graph;
pub mod constraint;
pub mod extractor;
pub mod term_init;

#[cfg(test)]
pub mod tests;

use crate::algebra::view::View;
use crate::catalog::Schema;
use crate::common::error::Result;
use crate::parser::ast::SelectStmt;
use crate::parser::parser::SqlParser;
use log::debug;

// Переэкспортируем основные типы
pub use cond_graph::{build_condition_graph, ConditionGraph, VertexKey};
pub use constraint::{EqualityArg, EqualityConstraint};
pub use extractor::extract_views;
pub use term_init::initialize_terms;

/// Конвейер извлечения представлений для фиксированной схемы
pub struct ViewExtractionPipeline {
    schema: Schema,
}

impl ViewExtractionPipeline {
    /// Создает конвейер для схемы
    pub fn new(schema: Schema) -> Self {
        ViewExtractionPipeline { schema }
    }

    /// Схема конвейера
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Разбирает SQL текст и извлекает представления
    pub fn execute(&self, sql: &str) -> Result<Vec<View>> {
        debug!("executing query: {}", sql);
        let stmt = SqlParser::new(sql)?.parse()?;
        self.execute_stmt(stmt)
    }

    /// Извлекает представления из разобранного запроса
    pub fn execute_stmt(&self, stmt: SelectStmt) -> Result<Vec<View>> {
        let mut query = crate::analyzer::resolver::resolve(&self.schema, stmt)?;
        initialize_terms(&mut query);
        let cond_graph = build_condition_graph(&query);
        Ok(extract_views(&query, &cond_graph))
    }
}
