//! Лексический анализатор SQL
//!
//! Преобразует входной текст запроса в последовательность токенов.
//! Поддерживает ключевые слова без учета регистра, идентификаторы,
//! целочисленные и строковые литералы, операторы сравнения и
//! комментарии (`--` и `/* */`).

use crate::common::error::{Error, Result};
use crate::parser::token::{lookup_keyword, Position, Token, TokenType};

/// Лексический анализатор SQL
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Создает лексер для входного текста
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Разбирает весь вход в список токенов, завершаемый [`TokenType::Eof`]
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn current_position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.peek() {
                Some(ch) if ch.is_whitespace() => {
                    self.advance();
                }
                Some('-') if self.peek_next() == Some('-') => {
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') if self.peek_next() == Some('*') => {
                    let start = self.current_position();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            Some('*') if self.peek_next() == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                            None => {
                                return Err(Error::lexer(format!(
                                    "unterminated block comment at {}",
                                    start
                                )));
                            }
                        }
                    }
                }
                _ => break,
            }
        }

        Ok(())
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        let position = self.current_position();
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Ok(Token::new(TokenType::Eof, String::new(), position)),
        };

        if ch.is_ascii_digit() {
            return self.read_number(position);
        }

        if ch.is_alphabetic() || ch == '_' {
            return self.read_word(position);
        }

        if ch == '\'' {
            return self.read_string(position);
        }

        self.advance();
        let token = |token_type: TokenType, value: &str| {
            Ok(Token::new(token_type, value.to_string(), position))
        };

        match ch {
            '+' => token(TokenType::Plus, "+"),
            '-' => token(TokenType::Minus, "-"),
            '*' => token(TokenType::Multiply, "*"),
            '/' => token(TokenType::Divide, "/"),
            '=' => token(TokenType::Equal, "="),
            '(' => token(TokenType::LeftParen, "("),
            ')' => token(TokenType::RightParen, ")"),
            ',' => token(TokenType::Comma, ","),
            ';' => token(TokenType::Semicolon, ";"),
            '.' => token(TokenType::Dot, "."),
            '<' => {
                if self.peek() == Some('>') {
                    self.advance();
                    token(TokenType::NotEqual, "<>")
                } else if self.peek() == Some('=') {
                    self.advance();
                    token(TokenType::LessEqual, "<=")
                } else {
                    token(TokenType::Less, "<")
                }
            }
            '>' => {
                if self.peek() == Some('=') {
                    self.advance();
                    token(TokenType::GreaterEqual, ">=")
                } else {
                    token(TokenType::Greater, ">")
                }
            }
            '!' => {
                if self.peek() == Some('=') {
                    self.advance();
                    token(TokenType::NotEqual, "!=")
                } else {
                    Err(Error::lexer(format!(
                        "unexpected character '!' at {}",
                        position
                    )))
                }
            }
            other => Err(Error::lexer(format!(
                "unexpected character '{}' at {}",
                other, position
            ))),
        }
    }

    fn read_number(&mut self, position: Position) -> Result<Token> {
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Числа с плавающей точкой анализу не нужны
        if self.peek() == Some('.') && self.peek_next().map_or(false, |c| c.is_ascii_digit()) {
            return Err(Error::lexer(format!(
                "floating point literals are not supported at {}",
                position
            )));
        }

        Ok(Token::new(TokenType::IntegerLiteral, value, position))
    }

    fn read_word(&mut self, position: Position) -> Result<Token> {
        let mut value = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match lookup_keyword(&value) {
            Some(token_type) => Ok(Token::new(token_type, value, position)),
            None => Ok(Token::new(TokenType::Identifier, value, position)),
        }
    }

    fn read_string(&mut self, position: Position) -> Result<Token> {
        self.advance(); // открывающая кавычка
        let mut value = String::new();

        loop {
            match self.peek() {
                Some('\'') => {
                    self.advance();
                    // Удвоенная кавычка — экранированная кавычка в литерале
                    if self.peek() == Some('\'') {
                        value.push('\'');
                        self.advance();
                    } else {
                        return Ok(Token::new(TokenType::StringLiteral, value, position));
                    }
                }
                Some(ch) => {
                    value.push(ch);
                    self.advance();
                }
                None => {
                    return Err(Error::lexer(format!(
                        "unterminated string literal at {}",
                        position
                    )));
                }
            }
        }
    }
}
