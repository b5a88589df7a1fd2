//! Тесты алгебры термов, атомов и представлений

pub mod atom_tests;
pub mod term_tests;
pub mod view_tests;
