//! Тесты конвейера извлечения представлений
