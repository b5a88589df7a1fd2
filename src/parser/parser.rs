//! Парсер запросной части SQL
//!
//! Рекурсивный спуск по списку токенов. Парсер выдает идентификаторы
//! узлов, на которые ссылаются таблицы аннотаций анализатора.

use crate::common::error::{Error, Result};
use crate::parser::ast::*;
use crate::parser::lexer::Lexer;
use crate::parser::token::{Token, TokenType};

/// Рекурсивный парсер SQL запросов
pub struct SqlParser {
    tokens: Vec<Token>,
    position: usize,
    next_node_id: NodeId,
}

impl SqlParser {
    /// Создает парсер для входного текста
    pub fn new(input: &str) -> Result<Self> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
            next_node_id: 0,
        })
    }

    /// Парсит один SELECT запрос до конца ввода
    pub fn parse(&mut self) -> Result<SelectStmt> {
        let stmt = self.parse_select_stmt()?;

        if self.check(TokenType::Semicolon) {
            self.advance();
        }
        if !self.check(TokenType::Eof) {
            return Err(self.unexpected("end of input"));
        }

        Ok(stmt)
    }

    fn next_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    fn current(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current().token_type == token_type
    }

    fn check_ahead(&self, offset: usize, token_type: TokenType) -> bool {
        self.tokens
            .get(self.position + offset)
            .map_or(false, |token| token.token_type == token_type)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn matches(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token_type: TokenType, what: &str) -> Result<Token> {
        if self.check(token_type) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        let token = self.current();
        Error::sql_parsing(format!(
            "expected {}, found {:?} '{}' at {}",
            expected, token.token_type, token.value, token.position
        ))
    }

    fn parse_select_stmt(&mut self) -> Result<SelectStmt> {
        let mut result = SelectStmt::Plain(Box::new(self.parse_plain_select()?));

        loop {
            let kind = match self.current().token_type {
                TokenType::Union => SetOpKind::Union,
                TokenType::Intersect => SetOpKind::Intersect,
                TokenType::Except => SetOpKind::Except,
                _ => break,
            };
            self.advance();
            let all = self.matches(TokenType::All);
            let id = self.next_id();
            let right = SelectStmt::Plain(Box::new(self.parse_plain_select()?));

            result = SelectStmt::SetOp(Box::new(SetOperation {
                id,
                kind,
                all,
                left: result,
                right,
            }));
        }

        Ok(result)
    }

    fn parse_plain_select(&mut self) -> Result<PlainSelect> {
        self.expect(TokenType::Select, "SELECT")?;
        let id = self.next_id();

        let distinct = if self.matches(TokenType::Distinct) {
            true
        } else {
            self.matches(TokenType::All);
            false
        };

        let mut items = vec![self.parse_select_item()?];
        while self.matches(TokenType::Comma) {
            items.push(self.parse_select_item()?);
        }

        let mut from = Vec::new();
        if self.matches(TokenType::From) {
            from.push(self.parse_from_item()?);
            while self.matches(TokenType::Comma) {
                from.push(self.parse_from_item()?);
            }
        }

        let where_clause = if self.matches(TokenType::Where) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let mut group_by = Vec::new();
        if self.matches(TokenType::Group) {
            self.expect(TokenType::By, "BY")?;
            group_by.push(self.parse_expression()?);
            while self.matches(TokenType::Comma) {
                group_by.push(self.parse_expression()?);
            }
        }

        let having = if self.matches(TokenType::Having) {
            Some(self.parse_expression()?)
        } else {
            None
        };

        let limit = if self.matches(TokenType::Limit) {
            Some(self.parse_unsigned("LIMIT count")?)
        } else {
            None
        };

        let offset = if self.matches(TokenType::Offset) {
            Some(self.parse_unsigned("OFFSET count")?)
        } else {
            None
        };

        Ok(PlainSelect {
            id,
            distinct,
            items,
            from,
            where_clause,
            group_by,
            having,
            limit,
            offset,
        })
    }

    fn parse_unsigned(&mut self, what: &str) -> Result<u64> {
        let token = self.expect(TokenType::IntegerLiteral, what)?;
        token
            .value
            .parse::<u64>()
            .map_err(|_| Error::sql_parsing(format!("invalid {}: {}", what, token.value)))
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.matches(TokenType::Multiply) {
            return Ok(SelectItem::AllColumns { id: self.next_id() });
        }

        if self.check(TokenType::Identifier)
            && self.check_ahead(1, TokenType::Dot)
            && self.check_ahead(2, TokenType::Multiply)
        {
            let table = self.advance().value;
            self.advance(); // точка
            self.advance(); // звездочка
            return Ok(SelectItem::AllColumnsInTable {
                id: self.next_id(),
                table,
            });
        }

        let expr = self.parse_expression()?;
        let alias = self.parse_optional_alias()?;

        Ok(SelectItem::Expression {
            id: self.next_id(),
            expr,
            alias,
        })
    }

    fn parse_optional_alias(&mut self) -> Result<Option<String>> {
        if self.matches(TokenType::As) {
            let token = self.expect(TokenType::Identifier, "alias")?;
            return Ok(Some(token.value));
        }

        if self.check(TokenType::Identifier) {
            return Ok(Some(self.advance().value));
        }

        Ok(None)
    }

    fn parse_from_item(&mut self) -> Result<FromItem> {
        let mut left = self.parse_from_primary()?;

        loop {
            let kind = if self.check(TokenType::Join) {
                self.advance();
                JoinKind::Inner
            } else if self.check(TokenType::Inner) {
                self.advance();
                self.expect(TokenType::Join, "JOIN")?;
                JoinKind::Inner
            } else if self.check(TokenType::Left) {
                self.advance();
                self.matches(TokenType::Outer);
                self.expect(TokenType::Join, "JOIN")?;
                JoinKind::LeftOuter
            } else if self.check(TokenType::Right) {
                self.advance();
                self.matches(TokenType::Outer);
                self.expect(TokenType::Join, "JOIN")?;
                JoinKind::RightOuter
            } else if self.check(TokenType::Full) {
                self.advance();
                self.matches(TokenType::Outer);
                self.expect(TokenType::Join, "JOIN")?;
                JoinKind::FullOuter
            } else if self.check(TokenType::Cross) {
                self.advance();
                self.expect(TokenType::Join, "JOIN")?;
                JoinKind::Cross
            } else {
                break;
            };

            let id = self.next_id();
            let right = self.parse_from_primary()?;

            let on = if kind != JoinKind::Cross && self.matches(TokenType::On) {
                Some(self.parse_expression()?)
            } else {
                None
            };

            left = FromItem::Join(Box::new(JoinItem {
                id,
                kind,
                left,
                right,
                on,
            }));
        }

        Ok(left)
    }

    fn parse_from_primary(&mut self) -> Result<FromItem> {
        if self.matches(TokenType::LeftParen) {
            if !self.check(TokenType::Select) {
                return Err(self.unexpected("subquery in FROM"));
            }

            let id = self.next_id();
            let select = self.parse_select_stmt()?;
            self.expect(TokenType::RightParen, "')'")?;

            self.matches(TokenType::As);
            let alias = self
                .expect(TokenType::Identifier, "derived table alias")?
                .value;

            return Ok(FromItem::SubSelect { id, select, alias });
        }

        let name = self.expect(TokenType::Identifier, "table name")?.value;
        let id = self.next_id();
        let alias = self.parse_optional_alias()?;

        Ok(FromItem::BaseTable { id, name, alias })
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;

        while self.matches(TokenType::Or) {
            let right = self.parse_and()?;
            left = Expression::Binary {
                op: BinaryOperator::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_not()?;

        while self.matches(TokenType::And) {
            let right = self.parse_not()?;
            left = Expression::Binary {
                op: BinaryOperator::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expression> {
        if self.check(TokenType::Not) {
            // NOT EXISTS помечает сам EXISTS, а не оборачивается в Unary
            if self.check_ahead(1, TokenType::Exists) {
                self.advance();
                return self.parse_exists(true);
            }

            self.advance();
            let operand = self.parse_not()?;
            return Ok(Expression::Unary {
                op: UnaryOperator::Not,
                operand: Box::new(operand),
            });
        }

        self.parse_comparison()
    }

    fn parse_exists(&mut self, negated: bool) -> Result<Expression> {
        self.expect(TokenType::Exists, "EXISTS")?;
        self.expect(TokenType::LeftParen, "'('")?;
        let select = self.parse_select_stmt()?;
        self.expect(TokenType::RightParen, "')'")?;

        Ok(Expression::Exists {
            negated,
            select: Box::new(select),
        })
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        if self.check(TokenType::Exists) {
            return self.parse_exists(false);
        }

        let left = self.parse_additive()?;

        let op = match self.current().token_type {
            TokenType::Equal => Some(BinaryOperator::Eq),
            TokenType::NotEqual => Some(BinaryOperator::NotEq),
            TokenType::Less => Some(BinaryOperator::Less),
            TokenType::LessEqual => Some(BinaryOperator::LessEq),
            TokenType::Greater => Some(BinaryOperator::Greater),
            TokenType::GreaterEqual => Some(BinaryOperator::GreaterEq),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let right = self.parse_additive()?;
            return Ok(Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        if self.matches(TokenType::Is) {
            let negated = self.matches(TokenType::Not);
            self.expect(TokenType::Null, "NULL")?;
            return Ok(Expression::IsNull {
                negated,
                operand: Box::new(left),
            });
        }

        if self.matches(TokenType::In) {
            return self.parse_in(left, false);
        }

        if self.matches(TokenType::Like) {
            let pattern = self.parse_additive()?;
            return Ok(Expression::Like {
                negated: false,
                operand: Box::new(left),
                pattern: Box::new(pattern),
            });
        }

        if self.check(TokenType::Not)
            && (self.check_ahead(1, TokenType::In) || self.check_ahead(1, TokenType::Like))
        {
            self.advance();
            if self.matches(TokenType::In) {
                return self.parse_in(left, true);
            }
            self.expect(TokenType::Like, "LIKE")?;
            let pattern = self.parse_additive()?;
            return Ok(Expression::Like {
                negated: true,
                operand: Box::new(left),
                pattern: Box::new(pattern),
            });
        }

        Ok(left)
    }

    fn parse_in(&mut self, operand: Expression, negated: bool) -> Result<Expression> {
        self.expect(TokenType::LeftParen, "'('")?;

        if self.check(TokenType::Select) {
            let select = self.parse_select_stmt()?;
            self.expect(TokenType::RightParen, "')'")?;
            return Ok(Expression::InSubSelect {
                negated,
                operand: Box::new(operand),
                select: Box::new(select),
            });
        }

        let mut items = vec![self.parse_expression()?];
        while self.matches(TokenType::Comma) {
            items.push(self.parse_expression()?);
        }
        self.expect(TokenType::RightParen, "')'")?;

        Ok(Expression::InList {
            negated,
            operand: Box::new(operand),
            items,
        })
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current().token_type {
                TokenType::Plus => BinaryOperator::Add,
                TokenType::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current().token_type {
                TokenType::Multiply => BinaryOperator::Multiply,
                TokenType::Divide => BinaryOperator::Divide,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expression::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.matches(TokenType::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expression::Unary {
                op: UnaryOperator::Negate,
                operand: Box::new(operand),
            });
        }

        if self.matches(TokenType::Plus) {
            return self.parse_unary();
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        match self.current().token_type {
            TokenType::IntegerLiteral => {
                let token = self.advance();
                let value = token.value.parse::<i64>().map_err(|_| {
                    Error::sql_parsing(format!("invalid integer literal: {}", token.value))
                })?;
                Ok(Expression::IntegerConstant(value))
            }
            TokenType::StringLiteral => {
                let token = self.advance();
                Ok(Expression::StringConstant(token.value))
            }
            TokenType::Null => {
                self.advance();
                Ok(Expression::Null)
            }
            TokenType::Count
            | TokenType::Sum
            | TokenType::Avg
            | TokenType::Min
            | TokenType::Max => self.parse_aggregate(),
            TokenType::LeftParen => {
                self.advance();
                if self.check(TokenType::Select) {
                    let select = self.parse_select_stmt()?;
                    self.expect(TokenType::RightParen, "')'")?;
                    return Ok(Expression::SubSelect(Box::new(select)));
                }

                let expr = self.parse_expression()?;
                self.expect(TokenType::RightParen, "')'")?;
                Ok(expr)
            }
            TokenType::Identifier => {
                let first = self.advance();

                if self.check(TokenType::Dot) {
                    self.advance();
                    let column = self.expect(TokenType::Identifier, "column name")?;
                    return Ok(Expression::ColumnReference {
                        id: self.next_id(),
                        table: Some(first.value),
                        column: column.value,
                    });
                }

                Ok(Expression::ColumnReference {
                    id: self.next_id(),
                    table: None,
                    column: first.value,
                })
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_aggregate(&mut self) -> Result<Expression> {
        let func = match self.current().token_type {
            TokenType::Count => AggregateFunction::Count,
            TokenType::Sum => AggregateFunction::Sum,
            TokenType::Avg => AggregateFunction::Avg,
            TokenType::Min => AggregateFunction::Min,
            TokenType::Max => AggregateFunction::Max,
            _ => return Err(self.unexpected("aggregate function")),
        };
        self.advance();

        self.expect(TokenType::LeftParen, "'('")?;
        self.matches(TokenType::Distinct);

        let argument = if func == AggregateFunction::Count && self.matches(TokenType::Multiply) {
            None
        } else {
            Some(Box::new(self.parse_expression()?))
        };

        self.expect(TokenType::RightParen, "')'")?;

        Ok(Expression::Aggregate { func, argument })
    }
}
