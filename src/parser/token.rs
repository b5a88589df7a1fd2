//! Токены SQL лексера
//!
//! Типы токенов запросной части SQL: ключевые слова, идентификаторы,
//! литералы, операторы и разделители.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

/// Позиция токена в исходном тексте
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn start() -> Self {
        Self::new(1, 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Типы токенов SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // === Ключевые слова ===
    Select,
    Distinct,
    All,
    From,
    Where,
    Group,
    By,
    Having,
    Limit,
    Offset,
    As,
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    On,
    Union,
    Intersect,
    Except,
    And,
    Or,
    Not,
    In,
    Exists,
    Is,
    Null,
    Like,
    Count,
    Sum,
    Avg,
    Min,
    Max,

    // === Идентификаторы и литералы ===
    /// Идентификатор (имя таблицы, колонки и т.п.)
    Identifier,
    /// Строковый литерал
    StringLiteral,
    /// Целое число
    IntegerLiteral,

    // === Операторы ===
    Plus,         // +
    Minus,        // -
    Multiply,     // *
    Divide,       // /
    Equal,        // =
    NotEqual,     // <> или !=
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=

    // === Разделители ===
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Semicolon,  // ;
    Dot,        // .

    /// Конец ввода
    Eof,
}

/// Токен с позицией и исходным текстом
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: String,
    pub position: Position,
}

impl Token {
    pub fn new(token_type: TokenType, value: String, position: Position) -> Self {
        Self {
            token_type,
            value,
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?}('{}') at {}",
            self.token_type, self.value, self.position
        )
    }
}

lazy_static! {
    /// Карта ключевых слов (в верхнем регистре)
    static ref KEYWORDS: HashMap<&'static str, TokenType> = {
        let mut map = HashMap::new();
        map.insert("SELECT", TokenType::Select);
        map.insert("DISTINCT", TokenType::Distinct);
        map.insert("ALL", TokenType::All);
        map.insert("FROM", TokenType::From);
        map.insert("WHERE", TokenType::Where);
        map.insert("GROUP", TokenType::Group);
        map.insert("BY", TokenType::By);
        map.insert("HAVING", TokenType::Having);
        map.insert("LIMIT", TokenType::Limit);
        map.insert("OFFSET", TokenType::Offset);
        map.insert("AS", TokenType::As);
        map.insert("JOIN", TokenType::Join);
        map.insert("INNER", TokenType::Inner);
        map.insert("LEFT", TokenType::Left);
        map.insert("RIGHT", TokenType::Right);
        map.insert("FULL", TokenType::Full);
        map.insert("OUTER", TokenType::Outer);
        map.insert("CROSS", TokenType::Cross);
        map.insert("ON", TokenType::On);
        map.insert("UNION", TokenType::Union);
        map.insert("INTERSECT", TokenType::Intersect);
        map.insert("EXCEPT", TokenType::Except);
        map.insert("AND", TokenType::And);
        map.insert("OR", TokenType::Or);
        map.insert("NOT", TokenType::Not);
        map.insert("IN", TokenType::In);
        map.insert("EXISTS", TokenType::Exists);
        map.insert("IS", TokenType::Is);
        map.insert("NULL", TokenType::Null);
        map.insert("LIKE", TokenType::Like);
        map.insert("COUNT", TokenType::Count);
        map.insert("SUM", TokenType::Sum);
        map.insert("AVG", TokenType::Avg);
        map.insert("MIN", TokenType::Min);
        map.insert("MAX", TokenType::Max);
        map
    };
}

/// Ищет ключевое слово без учета регистра
pub fn lookup_keyword(word: &str) -> Option<TokenType> {
    KEYWORDS.get(word.to_ascii_uppercase().as_str()).copied()
}
