//! Оценка числа строк подзапросов
//!
//! Построителю графа условий от проверки типов нужен единственный факт:
//! выдает ли подзапрос не более одной строки. Одну строку дают запросы
//! без FROM и запросы, чей список выборки целиком агрегатный при
//! отсутствии GROUP BY.

use crate::parser::ast::{Expression, PlainSelect, SelectItem, SelectStmt};

/// Оценка числа строк результата
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    /// Не более одной строки
    SingleRow,
    /// Неограниченно много строк
    Unlimited,
}

/// Оценивает число строк оператора SELECT
pub fn select_row_count(stmt: &SelectStmt) -> RowCount {
    match stmt {
        SelectStmt::Plain(plain) => plain_row_count(plain),
        SelectStmt::SetOp(_) => RowCount::Unlimited,
    }
}

/// Оценивает число строк простого SELECT
pub fn plain_row_count(select: &PlainSelect) -> RowCount {
    if select.from.is_empty() {
        return RowCount::SingleRow;
    }

    if select.group_by.is_empty()
        && !select.items.is_empty()
        && select.items.iter().all(is_aggregate_item)
    {
        return RowCount::SingleRow;
    }

    RowCount::Unlimited
}

fn is_aggregate_item(item: &SelectItem) -> bool {
    match item {
        SelectItem::Expression { expr, .. } => {
            let shape = expression_shape(expr);
            shape.has_aggregate && !shape.has_bare_reference
        }
        SelectItem::AllColumns { .. } | SelectItem::AllColumnsInTable { .. } => false,
    }
}

struct ExpressionShape {
    has_aggregate: bool,
    has_bare_reference: bool,
}

/// Агрегатным считается выражение, содержащее агрегат и не содержащее
/// ссылок на колонки вне агрегатов (например, `MAX(rating) + 1`)
fn expression_shape(expr: &Expression) -> ExpressionShape {
    match expr {
        Expression::Aggregate { .. } => ExpressionShape {
            has_aggregate: true,
            has_bare_reference: false,
        },
        Expression::ColumnReference { .. } => ExpressionShape {
            has_aggregate: false,
            has_bare_reference: true,
        },
        Expression::IntegerConstant(_)
        | Expression::StringConstant(_)
        | Expression::Null
        | Expression::Exists { .. }
        | Expression::SubSelect(_) => ExpressionShape {
            has_aggregate: false,
            has_bare_reference: false,
        },
        Expression::Binary { left, right, .. } => {
            combine(expression_shape(left), expression_shape(right))
        }
        Expression::Unary { operand, .. } => expression_shape(operand),
        Expression::IsNull { operand, .. } => expression_shape(operand),
        Expression::Like {
            operand, pattern, ..
        } => combine(expression_shape(operand), expression_shape(pattern)),
        Expression::InSubSelect { operand, .. } => expression_shape(operand),
        Expression::InList { operand, items, .. } => items
            .iter()
            .map(expression_shape)
            .fold(expression_shape(operand), combine),
    }
}

fn combine(left: ExpressionShape, right: ExpressionShape) -> ExpressionShape {
    ExpressionShape {
        has_aggregate: left.has_aggregate || right.has_aggregate,
        has_bare_reference: left.has_bare_reference || right.has_bare_reference,
    }
}
