//! Построение графа условий
//!
//! Один обход разрешенного запроса строит граф достижимости: вершины —
//! вхождения базовых таблиц, элементы FROM, соединения и простые
//! SELECT; ребра кодируют совместную достижимость как партнеров по
//! соединению. Предикаты WHERE/HAVING/ON обходятся прозрачно для AND и
//! непрозрачно для отрицаний; конъюнкты-равенства оседают на вершинах
//! как ограничения равенства.

use crate::analyzer::row_count::RowCount;
use crate::analyzer::scope::{ResolvedColumn, ResolvedQuery, TableId};
use crate::parser::ast::{
    BinaryOperator, Expression, FromItem, NodeId, PlainSelect, SelectItem, SelectStmt,
    UnaryOperator,
};
use crate::pipeline::constraint::{EqualityArg, EqualityConstraint};
use crate::util::graph::{Graph, VertexId};
use log::{debug, trace};
use std::collections::HashMap;

/// Ключ вершины графа условий
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKey {
    /// Вхождение базовой таблицы
    BaseTable(TableId),
    /// Элемент FROM
    FromItem(NodeId),
    /// Соединение
    Join(NodeId),
    /// Простой SELECT
    Select(NodeId),
}

/// Граф условий запроса
#[derive(Debug)]
pub struct ConditionGraph {
    pub(crate) graph: Graph<VertexKey, EqualityConstraint>,
    pub(crate) table_vertex: HashMap<TableId, VertexId>,
}

impl ConditionGraph {
    /// Вершина вхождения базовой таблицы
    pub fn table_vertex(&self, table: TableId) -> VertexId {
        self.table_vertex[&table]
    }

    /// Внутренний граф достижимости
    pub fn graph(&self) -> &Graph<VertexKey, EqualityConstraint> {
        &self.graph
    }
}

/// Строит граф условий разрешенного запроса
pub fn build_condition_graph(query: &ResolvedQuery) -> ConditionGraph {
    let mut builder = Builder {
        query,
        graph: Graph::new(),
        table_vertex: HashMap::new(),
        select_vertex: HashMap::new(),
    };

    builder.walk_stmt(query.stmt(), None);

    debug!(
        "condition graph: {} vertices, {} base table(s)",
        builder.graph.vertex_count(),
        builder.table_vertex.len()
    );

    ConditionGraph {
        graph: builder.graph,
        table_vertex: builder.table_vertex,
    }
}

struct Builder<'a> {
    query: &'a ResolvedQuery,
    graph: Graph<VertexKey, EqualityConstraint>,
    table_vertex: HashMap<TableId, VertexId>,
    select_vertex: HashMap<NodeId, VertexId>,
}

impl Builder<'_> {
    fn walk_stmt(&mut self, stmt: &SelectStmt, outer_select: Option<VertexId>) {
        match stmt {
            SelectStmt::Plain(plain) => self.walk_plain(plain, outer_select),
            SelectStmt::SetOp(set_op) => {
                self.walk_stmt(&set_op.left, outer_select);
                self.walk_stmt(&set_op.right, outer_select);
            }
        }
    }

    fn walk_plain(&mut self, select: &PlainSelect, outer_select: Option<VertexId>) {
        let select_vertex = self.graph.add_vertex(VertexKey::Select(select.id));
        self.select_vertex.insert(select.id, select_vertex);

        // Вложенный SELECT видит внешний, но не наоборот
        if let Some(outer) = outer_select {
            self.graph.add_edge(select_vertex, outer);
        }

        for item in &select.from {
            let item_vertex = self.walk_from(item, select_vertex);
            self.graph.add_edge(item_vertex, select_vertex);
            self.graph.add_edge(select_vertex, item_vertex);
        }

        if let Some(where_clause) = &select.where_clause {
            self.walk_predicate(where_clause, select_vertex, select_vertex);
        }
        if let Some(having) = &select.having {
            self.walk_predicate(having, select_vertex, select_vertex);
        }
        for group_expr in &select.group_by {
            self.walk_default_expr(group_expr, select_vertex);
        }
        for item in &select.items {
            if let SelectItem::Expression { expr, .. } = item {
                self.walk_default_expr(expr, select_vertex);
            }
        }
    }

    fn walk_from(&mut self, item: &FromItem, select_vertex: VertexId) -> VertexId {
        match item {
            FromItem::BaseTable { id, .. } => {
                let table_id = self
                    .query
                    .table_of_node(*id)
                    .expect("from item is not resolved to a base table");

                let table_vertex = self.graph.add_vertex(VertexKey::BaseTable(table_id));
                self.table_vertex.insert(table_id, table_vertex);

                let item_vertex = self.graph.add_vertex(VertexKey::FromItem(*id));
                self.graph.add_edge(table_vertex, item_vertex);
                self.graph.add_edge(item_vertex, table_vertex);

                item_vertex
            }
            FromItem::SubSelect { id, select, .. } => {
                let item_vertex = self.graph.add_vertex(VertexKey::FromItem(*id));
                self.walk_stmt(select, Some(select_vertex));
                item_vertex
            }
            FromItem::Join(join) => {
                let join_vertex = self.graph.add_vertex(VertexKey::Join(join.id));

                let left_vertex = self.walk_from(&join.left, select_vertex);
                self.graph.add_edge(left_vertex, join_vertex);
                if join.kind.preserves_left() {
                    self.graph.add_edge(join_vertex, left_vertex);
                }

                let right_vertex = self.walk_from(&join.right, select_vertex);
                self.graph.add_edge(right_vertex, join_vertex);
                if join.kind.preserves_right() {
                    self.graph.add_edge(join_vertex, right_vertex);
                }

                if let Some(on) = &join.on {
                    self.walk_predicate(on, join_vertex, select_vertex);
                }

                join_vertex
            }
        }
    }

    /// Обход предиката: прозрачен для AND, непрозрачен для отрицаний
    fn walk_predicate(&mut self, expr: &Expression, start: VertexId, select_vertex: VertexId) {
        match expr {
            Expression::Binary {
                op: BinaryOperator::And,
                left,
                right,
            } => {
                self.walk_predicate(left, start, select_vertex);
                self.walk_predicate(right, start, select_vertex);
            }
            Expression::Binary {
                op: BinaryOperator::Eq,
                left,
                right,
            } => {
                if let (Some(left_arg), Some(right_arg)) =
                    (self.equality_arg(left), self.equality_arg(right))
                {
                    trace!("equality constraint: {:?} = {:?}", left_arg, right_arg);
                    self.graph
                        .annotate(start, EqualityConstraint::new(left_arg, right_arg));
                }
                self.walk_default_expr(left, select_vertex);
                self.walk_default_expr(right, select_vertex);
            }
            Expression::Exists { negated, select } => {
                self.walk_stmt(select, Some(select_vertex));
                if !*negated {
                    self.add_subselect_edge(start, select);
                }
            }
            Expression::InSubSelect {
                negated,
                operand,
                select,
            } => {
                // Связь по значению записывается и для NOT IN: анализ
                // пере-аппроксимирует раскрытие сверху
                if let (Some(left_arg), Some(right_arg)) =
                    (self.equality_arg(operand), self.output_arg(select))
                {
                    trace!("IN constraint: {:?} = {:?}", left_arg, right_arg);
                    self.graph
                        .annotate(start, EqualityConstraint::new(left_arg, right_arg));
                }

                self.walk_default_expr(operand, select_vertex);
                self.walk_stmt(select, Some(select_vertex));

                if !*negated {
                    self.add_subselect_edge(start, select);
                }
            }
            Expression::Unary {
                op: UnaryOperator::Not,
                operand,
            } => {
                self.walk_default_expr(operand, select_vertex);
            }
            other => self.walk_default_expr(other, select_vertex),
        }
    }

    /// Ребро от стартовой вершины к подзапросу; подзапросы с одной
    /// строкой сворачиваются в ограничения равенства и ребра не получают
    fn add_subselect_edge(&mut self, start: VertexId, select: &SelectStmt) {
        if let SelectStmt::Plain(plain) = select {
            if self.query.stmt_row_count(select) == RowCount::Unlimited {
                let inner = self.select_vertex[&plain.id];
                self.graph.add_edge(start, inner);
            }
        }
    }

    /// Обход вне предикатного контекста: только подключает вложенные
    /// SELECT к графу
    fn walk_default_expr(&mut self, expr: &Expression, select_vertex: VertexId) {
        match expr {
            Expression::ColumnReference { .. }
            | Expression::IntegerConstant(_)
            | Expression::StringConstant(_)
            | Expression::Null => {}
            Expression::Binary { left, right, .. } => {
                self.walk_default_expr(left, select_vertex);
                self.walk_default_expr(right, select_vertex);
            }
            Expression::Unary { operand, .. } => self.walk_default_expr(operand, select_vertex),
            Expression::Aggregate { argument, .. } => {
                if let Some(argument) = argument {
                    self.walk_default_expr(argument, select_vertex);
                }
            }
            Expression::Exists { select, .. } => self.walk_stmt(select, Some(select_vertex)),
            Expression::InSubSelect {
                operand, select, ..
            } => {
                self.walk_default_expr(operand, select_vertex);
                self.walk_stmt(select, Some(select_vertex));
            }
            Expression::InList { operand, items, .. } => {
                self.walk_default_expr(operand, select_vertex);
                for item in items {
                    self.walk_default_expr(item, select_vertex);
                }
            }
            Expression::IsNull { operand, .. } => self.walk_default_expr(operand, select_vertex),
            Expression::Like {
                operand, pattern, ..
            } => {
                self.walk_default_expr(operand, select_vertex);
                self.walk_default_expr(pattern, select_vertex);
            }
            Expression::SubSelect(select) => self.walk_stmt(select, Some(select_vertex)),
        }
    }

    /// Аргумент ограничения равенства для выражения
    fn equality_arg(&self, expr: &Expression) -> Option<EqualityArg> {
        match expr {
            Expression::ColumnReference { id, .. } => match self.query.resolved_ref(*id) {
                Some(ResolvedColumn::Base(column_id)) => Some(EqualityArg::Column(*column_id)),
                _ => None,
            },
            Expression::IntegerConstant(value) => Some(EqualityArg::Constant((*value).into())),
            Expression::StringConstant(value) => {
                Some(EqualityArg::Constant(value.clone().into()))
            }
            Expression::Unary {
                op: UnaryOperator::Negate,
                operand,
            } => match operand.as_ref() {
                Expression::IntegerConstant(value) => Some(EqualityArg::Constant((-value).into())),
                _ => None,
            },
            Expression::SubSelect(select) => {
                // Скалярный подзапрос сворачивается, только если он
                // гарантированно одно-строчный
                if self.query.stmt_row_count(select) == RowCount::SingleRow {
                    self.output_arg(select)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Аргумент равенства для выходной колонки подзапроса
    fn output_arg(&self, stmt: &SelectStmt) -> Option<EqualityArg> {
        match stmt {
            SelectStmt::Plain(plain) => {
                if plain.items.len() != 1 {
                    return None;
                }
                match &plain.items[0] {
                    SelectItem::Expression { expr, .. } => self.equality_arg(expr),
                    _ => None,
                }
            }
            SelectStmt::SetOp(_) => None,
        }
    }
}
