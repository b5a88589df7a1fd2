//! sqlviews - Анализ раскрытия информации SQL запросами
//!
//! Библиотека определяет для SQL запроса минимальный набор простых
//! представлений (фильтрация и проекция), совокупные ответы которых
//! раскрывают не больше информации, чем исходный запрос. На каждое
//! вхождение базовой таблицы извлекается одно представление; отношение
//! предшествования представлений позволяет сравнивать раскрытие.

pub mod algebra;
pub mod analyzer;
pub mod catalog;
pub mod cli;
pub mod common;
pub mod parser;
pub mod pipeline;
pub mod util;

pub use common::error::{Error, Result};

/// Версия библиотеки
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
