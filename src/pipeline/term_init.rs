//! Инициализация термов колонок
//!
//! Каждая колонка каждого вхождения базовой таблицы получает свежую
//! мультимножественную переменную, после чего все колонки, которые
//! запрос проецирует или на которые ссылается, продвигаются до
//! выделенных. Внутри EXISTS продвижение по собственному списку выборки
//! подавляется: его строки только проверяются на существование.

use crate::algebra::term::Term;
use crate::analyzer::scope::{ColumnId, ResolvedColumn, ResolvedQuery};
use crate::parser::ast::{Expression, FromItem, PlainSelect, SelectItem, SelectStmt};
use log::debug;

/// Инициализирует термы всех колонок разрешенного запроса
pub fn initialize_terms(query: &mut ResolvedQuery) {
    for column in &mut query.columns {
        column.set_term(Term::multiset());
    }

    let stmt = query.stmt().clone();
    let promoted = {
        let mut collector = PromotionCollector {
            query,
            promoted: Vec::new(),
        };
        collector.walk_stmt(&stmt, true);
        collector.promoted
    };

    debug!("promoting {} column reference(s)", promoted.len());

    for column_id in promoted {
        let column = query.column_mut(column_id);
        if let Some(term) = column.term().unify_with(&Term::dist()) {
            column.set_term(term);
        }
    }
}

struct PromotionCollector<'a> {
    query: &'a ResolvedQuery,
    promoted: Vec<ColumnId>,
}

impl PromotionCollector<'_> {
    fn promote_resolved(&mut self, resolved: &ResolvedColumn) {
        if let ResolvedColumn::Base(column_id) = resolved {
            self.promoted.push(*column_id);
        }
    }

    fn walk_stmt(&mut self, stmt: &SelectStmt, follow_items: bool) {
        match stmt {
            SelectStmt::Plain(plain) => self.walk_plain(plain, follow_items),
            SelectStmt::SetOp(set_op) => {
                self.walk_stmt(&set_op.left, follow_items);
                self.walk_stmt(&set_op.right, follow_items);
            }
        }
    }

    fn walk_plain(&mut self, select: &PlainSelect, follow_items: bool) {
        if follow_items {
            for item in &select.items {
                match item {
                    SelectItem::AllColumns { id } | SelectItem::AllColumnsInTable { id, .. } => {
                        if let Some(columns) = self.query.star_columns(*id) {
                            for column in columns {
                                self.promote_resolved(column);
                            }
                        }
                    }
                    SelectItem::Expression { expr, .. } => self.walk_expr(expr),
                }
            }
        }

        for item in &select.from {
            self.walk_from(item, follow_items);
        }

        if let Some(where_clause) = &select.where_clause {
            self.walk_expr(where_clause);
        }
        for group_expr in &select.group_by {
            self.walk_expr(group_expr);
        }
        if let Some(having) = &select.having {
            self.walk_expr(having);
        }
    }

    fn walk_from(&mut self, item: &FromItem, follow_items: bool) {
        match item {
            FromItem::BaseTable { .. } => {}
            // Производная таблица наследует режим списка выборки
            FromItem::SubSelect { select, .. } => self.walk_stmt(select, follow_items),
            FromItem::Join(join) => {
                self.walk_from(&join.left, follow_items);
                self.walk_from(&join.right, follow_items);
                if let Some(on) = &join.on {
                    self.walk_expr(on);
                }
            }
        }
    }

    fn walk_expr(&mut self, expr: &Expression) {
        match expr {
            Expression::ColumnReference { id, .. } => {
                if let Some(resolved) = self.query.resolved_ref(*id) {
                    self.promote_resolved(resolved);
                }
            }
            Expression::IntegerConstant(_) | Expression::StringConstant(_) | Expression::Null => {}
            Expression::Binary { left, right, .. } => {
                self.walk_expr(left);
                self.walk_expr(right);
            }
            Expression::Unary { operand, .. } => self.walk_expr(operand),
            Expression::Aggregate { argument, .. } => {
                if let Some(argument) = argument {
                    self.walk_expr(argument);
                }
            }
            // Строки EXISTS только проверяются на существование — его
            // собственный список выборки не продвигается
            Expression::Exists { select, .. } => self.walk_stmt(select, false),
            Expression::InSubSelect {
                operand, select, ..
            } => {
                self.walk_expr(operand);
                self.walk_stmt(select, true);
            }
            Expression::InList { operand, items, .. } => {
                self.walk_expr(operand);
                for item in items {
                    self.walk_expr(item);
                }
            }
            Expression::IsNull { operand, .. } => self.walk_expr(operand),
            Expression::Like {
                operand, pattern, ..
            } => {
                self.walk_expr(operand);
                self.walk_expr(pattern);
            }
            Expression::SubSelect(select) => self.walk_stmt(select, true),
        }
    }
}
