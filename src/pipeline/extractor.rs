//! Извлечение представлений
//!
//! На каждое вхождение базовой таблицы строится одно представление: по
//! вершине вхождения собираются достижимые базовые таблицы, их колонки
//! получают ячейки системы непересекающихся множеств, ограничения
//! равенства достижимых вершин проигрываются унификацией термов, после
//! чего якорная таблица дает телесный атом, а остальные достижимые —
//! условные.

use crate::algebra::atom::Atom;
use crate::algebra::term::Term;
use crate::algebra::view::View;
use crate::analyzer::scope::{ColumnId, ResolvedQuery, TableId};
use crate::pipeline::cond_graph::{ConditionGraph, VertexKey};
use crate::pipeline::constraint::{EqualityArg, EqualityConstraint};
use crate::util::union_find::{CellId, UnionFind};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// Извлекает представления для всех вхождений базовых таблиц
pub fn extract_views(query: &ResolvedQuery, cond_graph: &ConditionGraph) -> Vec<View> {
    let mut views = Vec::with_capacity(query.tables().len());

    for (index, table) in query.tables().iter().enumerate() {
        let name = format!("Q{}", index + 1);
        views.push(extract_one(query, cond_graph, table.id(), name));
    }

    debug!("extracted {} view(s)", views.len());
    views
}

fn extract_one(
    query: &ResolvedQuery,
    cond_graph: &ConditionGraph,
    anchor: TableId,
    name: String,
) -> View {
    let graph = cond_graph.graph();
    let start = cond_graph.table_vertex(anchor);

    // Ячейка на колонку каждой достижимой таблицы; таблица
    // регистрируется ровно один раз
    let mut cells: UnionFind<Term> = UnionFind::new();
    let mut column_cells: HashMap<ColumnId, CellId> = HashMap::new();
    let mut registered: HashSet<TableId> = HashSet::new();

    graph.visit_reachable(start, &mut |vertex| {
        if let VertexKey::BaseTable(table_id) = graph.key(vertex) {
            if registered.insert(*table_id) {
                for column_id in query.table(*table_id).columns() {
                    let term = query.column(*column_id).term().clone();
                    let cell = cells.add(term);
                    column_cells.insert(*column_id, cell);
                }
            }
        }
    });

    // Проигрывание ограничений равенства достижимых вершин
    graph.visit_reachable(start, &mut |vertex| {
        for constraint in graph.annotations(vertex) {
            apply_constraint(constraint, &mut cells, &column_cells);
        }
    });

    // Первая посещенная таблица — якорь — дает тело, остальные — условия
    let mut body: Option<Atom> = None;
    let mut conditions: Vec<Atom> = Vec::new();

    graph.visit_reachable(start, &mut |vertex| {
        if let VertexKey::BaseTable(table_id) = graph.key(vertex) {
            let atom = make_atom(query, &mut cells, &column_cells, *table_id);
            if body.is_none() {
                body = Some(atom);
            } else {
                conditions.push(atom);
            }
        }
    });

    let body = body.expect("anchor table vertex must be visited first");
    View::convert(name, body, conditions)
}

fn apply_constraint(
    constraint: &EqualityConstraint,
    cells: &mut UnionFind<Term>,
    column_cells: &HashMap<ColumnId, CellId>,
) {
    match (&constraint.left, &constraint.right) {
        (EqualityArg::Constant(_), EqualityArg::Constant(_)) => {}
        (EqualityArg::Constant(value), EqualityArg::Column(column))
        | (EqualityArg::Column(column), EqualityArg::Constant(value)) => {
            let cell = match column_cells.get(column) {
                Some(cell) => *cell,
                None => return,
            };

            let constant = Term::constant(value.clone());
            match constant.unify_with(cells.value(cell)) {
                Some(unifier) => cells.set_value(cell, unifier),
                None => warn!("ignoring incompatible constraint: {}", constraint),
            }
        }
        (EqualityArg::Column(left), EqualityArg::Column(right)) => {
            let (left_cell, right_cell) =
                match (column_cells.get(left), column_cells.get(right)) {
                    (Some(left_cell), Some(right_cell)) => (*left_cell, *right_cell),
                    _ => return,
                };

            let unifier = {
                let left_term = cells.value(left_cell).clone();
                left_term.unify_with(cells.value(right_cell))
            };

            match unifier {
                Some(unifier) => {
                    cells.set_value(left_cell, unifier.clone());
                    cells.set_value(right_cell, unifier);
                    cells.union(left_cell, right_cell);
                }
                None => warn!("ignoring incompatible constraint: {}", constraint),
            }
        }
    }
}

fn make_atom(
    query: &ResolvedQuery,
    cells: &mut UnionFind<Term>,
    column_cells: &HashMap<ColumnId, CellId>,
    table_id: TableId,
) -> Atom {
    let table = query.table(table_id);

    let terms = table
        .columns()
        .iter()
        .map(|column_id| cells.value(column_cells[column_id]).clone())
        .collect();

    Atom::multiset_atom(table.relation().relation(), terms)
}
