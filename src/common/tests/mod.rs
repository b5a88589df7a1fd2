//! Тесты общих типов
