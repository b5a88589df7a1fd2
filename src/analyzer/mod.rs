//! Разрешение имен и модель разрешенного запроса
//!
//! Этот модуль строит представление запроса, которое потребляет
//! конвейер извлечения: области видимости, вхождения базовых таблиц с
//! колонками и их термами, разрешенные ссылки и оценки числа строк.

pub mod resolver;
pub mod row_count;
pub mod scope;

#[cfg(test)]
pub mod tests;

// Переэкспортируем основные типы
pub use resolver::resolve;
pub use row_count::{plain_row_count, select_row_count, RowCount};
pub use scope::{
    BaseColumn, BaseTable, ColumnId, ResolvedColumn, ResolvedQuery, ScopeId, TableId,
};
