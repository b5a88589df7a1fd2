//! Тесты вспомогательных структур данных

pub mod union_find_tests;
