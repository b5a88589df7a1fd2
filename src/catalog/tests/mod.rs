//! Тесты каталога отношений
