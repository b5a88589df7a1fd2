//! Разрешение имен таблиц и колонок
//!
//! Один проход по дереву запроса: создает области видимости, регистрирует
//! вхождения базовых и производных таблиц, разрешает ссылки на колонки
//! (включая коррелированные) и раскрывает `*`/`table.*`. Заодно
//! запоминает оценку числа строк каждого простого SELECT.

use crate::analyzer::row_count::plain_row_count;
use crate::analyzer::scope::{ResolvedQuery, ScopeId};
use crate::catalog::Schema;
use crate::common::error::{Error, Result};
use crate::parser::ast::{Expression, FromItem, PlainSelect, SelectItem, SelectStmt};
use log::{debug, trace};

/// Разрешает имена запроса относительно схемы
pub fn resolve(schema: &Schema, stmt: SelectStmt) -> Result<ResolvedQuery> {
    let mut resolver = Resolver {
        schema,
        query: ResolvedQuery::new(stmt),
    };

    // Модель владеет деревом; проход читает копию, привязка аннотаций
    // идет по идентификаторам узлов
    let stmt = resolver.query.stmt().clone();
    resolver.resolve_stmt(&stmt, None)?;

    debug!(
        "resolved query: {} base table occurrence(s), {} scope(s)",
        resolver.query.tables.len(),
        resolver.query.scopes.len()
    );

    Ok(resolver.query)
}

struct Resolver<'a> {
    schema: &'a Schema,
    query: ResolvedQuery,
}

impl Resolver<'_> {
    fn resolve_stmt(&mut self, stmt: &SelectStmt, parent: Option<ScopeId>) -> Result<()> {
        match stmt {
            SelectStmt::Plain(plain) => self.resolve_plain(plain, parent),
            SelectStmt::SetOp(set_op) => {
                self.resolve_stmt(&set_op.left, parent)?;
                self.resolve_stmt(&set_op.right, parent)
            }
        }
    }

    fn resolve_plain(&mut self, select: &PlainSelect, parent: Option<ScopeId>) -> Result<()> {
        let scope = self.query.add_scope(select.id, parent);

        // FROM раньше остальных клаузул: ссылки разрешаются в таблицы
        for item in &select.from {
            self.resolve_from(item, scope)?;
        }

        for item in &select.items {
            match item {
                SelectItem::AllColumns { id } => {
                    let columns = self.query.local_columns(scope);
                    if columns.is_empty() {
                        return Err(Error::resolution(
                            "SELECT * requires at least one table in FROM",
                        ));
                    }
                    self.query.stars.insert(*id, columns);
                }
                SelectItem::AllColumnsInTable { id, table } => {
                    let columns = self.query.columns_in_table(scope, table)?;
                    self.query.stars.insert(*id, columns);
                }
                SelectItem::Expression { expr, .. } => {
                    self.resolve_expr(expr, scope)?;
                }
            }
        }

        if let Some(where_clause) = &select.where_clause {
            self.resolve_expr(where_clause, scope)?;
        }
        for group_expr in &select.group_by {
            self.resolve_expr(group_expr, scope)?;
        }
        if let Some(having) = &select.having {
            self.resolve_expr(having, scope)?;
        }

        self.query
            .row_counts
            .insert(select.id, plain_row_count(select));

        Ok(())
    }

    fn resolve_from(&mut self, item: &FromItem, scope: ScopeId) -> Result<()> {
        match item {
            FromItem::BaseTable { id, name, alias } => {
                let relation = self
                    .schema
                    .find_relation(name)
                    .ok_or_else(|| Error::resolution(format!("couldn't find table: {}", name)))?
                    .clone();

                let alias = alias.clone().unwrap_or_else(|| name.clone());
                trace!("registering base table {} as '{}'", name, alias);
                self.query.add_base_table(*id, relation, alias, scope);
                Ok(())
            }
            FromItem::SubSelect { select, alias, .. } => {
                self.resolve_stmt(select, Some(scope))?;
                let columns = self.output_names(select);
                self.query.scopes[scope.0]
                    .derived
                    .push(crate::analyzer::scope::DerivedTable {
                        alias: alias.clone(),
                        columns,
                    });
                Ok(())
            }
            FromItem::Join(join) => {
                self.resolve_from(&join.left, scope)?;
                self.resolve_from(&join.right, scope)?;
                if let Some(on) = &join.on {
                    self.resolve_expr(on, scope)?;
                }
                Ok(())
            }
        }
    }

    fn resolve_expr(&mut self, expr: &Expression, scope: ScopeId) -> Result<()> {
        match expr {
            Expression::ColumnReference { id, table, column } => {
                let resolved = self.query.find_column(scope, table.as_deref(), column)?;
                trace!("resolved {}.{:?} -> {:?}", column, table, resolved);
                self.query.refs.insert(*id, resolved);
                Ok(())
            }
            Expression::IntegerConstant(_) | Expression::StringConstant(_) | Expression::Null => {
                Ok(())
            }
            Expression::Binary { left, right, .. } => {
                self.resolve_expr(left, scope)?;
                self.resolve_expr(right, scope)
            }
            Expression::Unary { operand, .. } => self.resolve_expr(operand, scope),
            Expression::Aggregate { argument, .. } => match argument {
                Some(argument) => self.resolve_expr(argument, scope),
                None => Ok(()),
            },
            Expression::Exists { select, .. } => self.resolve_stmt(select, Some(scope)),
            Expression::InSubSelect {
                operand, select, ..
            } => {
                self.resolve_expr(operand, scope)?;
                self.resolve_stmt(select, Some(scope))
            }
            Expression::InList { operand, items, .. } => {
                self.resolve_expr(operand, scope)?;
                for item in items {
                    self.resolve_expr(item, scope)?;
                }
                Ok(())
            }
            Expression::IsNull { operand, .. } => self.resolve_expr(operand, scope),
            Expression::Like {
                operand, pattern, ..
            } => {
                self.resolve_expr(operand, scope)?;
                self.resolve_expr(pattern, scope)
            }
            Expression::SubSelect(select) => self.resolve_stmt(select, Some(scope)),
        }
    }

    /// Имена выходных колонок подзапроса (для производной таблицы)
    fn output_names(&self, stmt: &SelectStmt) -> Vec<String> {
        match stmt {
            SelectStmt::Plain(plain) => {
                let mut names = Vec::new();
                for (index, item) in plain.items.iter().enumerate() {
                    match item {
                        SelectItem::AllColumns { id }
                        | SelectItem::AllColumnsInTable { id, .. } => {
                            if let Some(columns) = self.query.star_columns(*id) {
                                for column in columns {
                                    names.push(
                                        self.query.resolved_column_name(column).to_string(),
                                    );
                                }
                            }
                        }
                        SelectItem::Expression { expr, alias, .. } => {
                            let name = match (alias, expr) {
                                (Some(alias), _) => alias.clone(),
                                (None, Expression::ColumnReference { column, .. }) => {
                                    column.clone()
                                }
                                (None, _) => format!("column{}", index + 1),
                            };
                            names.push(name);
                        }
                    }
                }
                names
            }
            SelectStmt::SetOp(set_op) => self.output_names(&set_op.left),
        }
    }
}
