//! Вспомогательные структуры данных для sqlviews

pub mod graph;
pub mod union_find;

#[cfg(test)]
pub mod tests;

// Переэкспортируем основные типы
pub use graph::{Graph, VertexId};
pub use union_find::{CellId, UnionFind};
