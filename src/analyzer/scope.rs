//! Модель разрешенного запроса
//!
//! Арены вхождений базовых таблиц и их колонок, цепочка областей
//! видимости и таблицы аннотаций, привязанные к узлам дерева по
//! идентификаторам. Эту модель строит [`resolver`](crate::analyzer::resolver)
//! и потребляют проходы конвейера.

use crate::algebra::term::Term;
use crate::analyzer::row_count::RowCount;
use crate::catalog::{PrimitiveType, TypedRelation};
use crate::common::error::{Error, Result};
use crate::parser::ast::{NodeId, SelectStmt};
use std::collections::HashMap;
use std::rc::Rc;

/// Идентификатор вхождения базовой таблицы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(pub(crate) usize);

/// Идентификатор колонки базовой таблицы
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub(crate) usize);

/// Идентификатор области видимости
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

/// Колонка вхождения базовой таблицы
///
/// Слот терма заполняется инициализатором термов и далее уточняется
/// продвижением до выделенной переменной.
#[derive(Debug)]
pub struct BaseColumn {
    name: String,
    table: TableId,
    ty: PrimitiveType,
    term: Option<Term>,
}

impl BaseColumn {
    /// Имя колонки
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Вхождение таблицы, которому принадлежит колонка
    pub fn table(&self) -> TableId {
        self.table
    }

    /// Тип колонки
    pub fn column_type(&self) -> PrimitiveType {
        self.ty
    }

    /// Текущий терм колонки; паникует до инициализации термов
    pub fn term(&self) -> &Term {
        self.term
            .as_ref()
            .expect("column term is not initialized yet")
    }

    /// Устанавливает терм колонки
    pub fn set_term(&mut self, term: Term) {
        self.term = Some(term);
    }
}

/// Вхождение базовой таблицы в запросе
#[derive(Debug)]
pub struct BaseTable {
    id: TableId,
    node: NodeId,
    relation: Rc<TypedRelation>,
    alias: String,
    scope: ScopeId,
    columns: Vec<ColumnId>,
}

impl BaseTable {
    /// Идентификатор вхождения
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Узел FROM, породивший вхождение
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Отношение таблицы
    pub fn relation(&self) -> &Rc<TypedRelation> {
        &self.relation
    }

    /// Псевдоним вхождения
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Область видимости вхождения
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    /// Колонки вхождения в порядке колонок отношения
    pub fn columns(&self) -> &[ColumnId] {
        &self.columns
    }
}

/// Производная таблица (подзапрос во FROM)
///
/// Ее колонки не привязаны к физическим таблицам и исключены из
/// продвижения термов и ограничений равенства.
#[derive(Debug)]
pub struct DerivedTable {
    pub(crate) alias: String,
    pub(crate) columns: Vec<String>,
}

/// Область видимости одного простого SELECT
#[derive(Debug)]
pub struct Scope {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) select: NodeId,
    pub(crate) tables: Vec<TableId>,
    pub(crate) derived: Vec<DerivedTable>,
}

/// Результат разрешения ссылки на колонку
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedColumn {
    /// Колонка базовой таблицы
    Base(ColumnId),
    /// Производная колонка (не привязана к одной физической таблице)
    Derived { table: String, column: String },
}

/// Разрешенный запрос: дерево плюс таблицы аннотаций
#[derive(Debug)]
pub struct ResolvedQuery {
    stmt: SelectStmt,
    pub(crate) tables: Vec<BaseTable>,
    pub(crate) columns: Vec<BaseColumn>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) refs: HashMap<NodeId, ResolvedColumn>,
    pub(crate) stars: HashMap<NodeId, Vec<ResolvedColumn>>,
    pub(crate) scope_of_select: HashMap<NodeId, ScopeId>,
    pub(crate) row_counts: HashMap<NodeId, RowCount>,
    pub(crate) table_by_node: HashMap<NodeId, TableId>,
}

impl ResolvedQuery {
    pub(crate) fn new(stmt: SelectStmt) -> Self {
        ResolvedQuery {
            stmt,
            tables: Vec::new(),
            columns: Vec::new(),
            scopes: Vec::new(),
            refs: HashMap::new(),
            stars: HashMap::new(),
            scope_of_select: HashMap::new(),
            row_counts: HashMap::new(),
            table_by_node: HashMap::new(),
        }
    }

    /// Дерево запроса
    pub fn stmt(&self) -> &SelectStmt {
        &self.stmt
    }

    /// Вхождения базовых таблиц в порядке документа
    pub fn tables(&self) -> &[BaseTable] {
        &self.tables
    }

    /// Вхождение таблицы по идентификатору
    pub fn table(&self, id: TableId) -> &BaseTable {
        &self.tables[id.0]
    }

    /// Колонка по идентификатору
    pub fn column(&self, id: ColumnId) -> &BaseColumn {
        &self.columns[id.0]
    }

    /// Изменяемая колонка по идентификатору
    pub fn column_mut(&mut self, id: ColumnId) -> &mut BaseColumn {
        &mut self.columns[id.0]
    }

    /// Разрешение ссылки на колонку по узлу
    pub fn resolved_ref(&self, node: NodeId) -> Option<&ResolvedColumn> {
        self.refs.get(&node)
    }

    /// Раскрытие `*` или `table.*` по узлу элемента выборки
    pub fn star_columns(&self, node: NodeId) -> Option<&[ResolvedColumn]> {
        self.stars.get(&node).map(|columns| columns.as_slice())
    }

    /// Область видимости простого SELECT
    pub fn scope_of_select(&self, select: NodeId) -> Option<ScopeId> {
        self.scope_of_select.get(&select).copied()
    }

    /// Вхождение таблицы по узлу FROM
    pub fn table_of_node(&self, node: NodeId) -> Option<TableId> {
        self.table_by_node.get(&node).copied()
    }

    /// Оценка числа строк оператора SELECT
    pub fn stmt_row_count(&self, stmt: &SelectStmt) -> RowCount {
        match stmt {
            SelectStmt::Plain(plain) => self
                .row_counts
                .get(&plain.id)
                .copied()
                .unwrap_or(RowCount::Unlimited),
            SelectStmt::SetOp(_) => RowCount::Unlimited,
        }
    }

    pub(crate) fn add_scope(&mut self, select: NodeId, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            parent,
            select,
            tables: Vec::new(),
            derived: Vec::new(),
        });
        self.scope_of_select.insert(select, id);
        id
    }

    pub(crate) fn add_base_table(
        &mut self,
        node: NodeId,
        relation: Rc<TypedRelation>,
        alias: String,
        scope: ScopeId,
    ) -> TableId {
        let id = TableId(self.tables.len());

        let mut columns = Vec::with_capacity(relation.arity());
        for (name, ty) in relation.column_names().iter().zip(relation.column_types()) {
            let column_id = ColumnId(self.columns.len());
            self.columns.push(BaseColumn {
                name: name.clone(),
                table: id,
                ty: *ty,
                term: None,
            });
            columns.push(column_id);
        }

        self.tables.push(BaseTable {
            id,
            node,
            relation,
            alias,
            scope,
            columns,
        });
        self.scopes[scope.0].tables.push(id);
        self.table_by_node.insert(node, id);

        id
    }

    fn find_column_local(
        &self,
        scope: ScopeId,
        table_alias: Option<&str>,
        column: &str,
    ) -> Result<Option<ResolvedColumn>> {
        let scope = &self.scopes[scope.0];

        if let Some(alias) = table_alias {
            for table_id in &scope.tables {
                let table = &self.tables[table_id.0];
                if table.alias.eq_ignore_ascii_case(alias) {
                    if let Some(found) = self.column_in_table(*table_id, column) {
                        return Ok(Some(found));
                    }
                }
            }

            for derived in &scope.derived {
                if derived.alias.eq_ignore_ascii_case(alias) {
                    if let Some(name) = derived
                        .columns
                        .iter()
                        .find(|name| name.eq_ignore_ascii_case(column))
                    {
                        return Ok(Some(ResolvedColumn::Derived {
                            table: derived.alias.clone(),
                            column: name.clone(),
                        }));
                    }
                }
            }

            return Ok(None);
        }

        let mut matches: Vec<ResolvedColumn> = Vec::new();

        for table_id in &scope.tables {
            if let Some(found) = self.column_in_table(*table_id, column) {
                matches.push(found);
            }
        }
        for derived in &scope.derived {
            if let Some(name) = derived
                .columns
                .iter()
                .find(|name| name.eq_ignore_ascii_case(column))
            {
                matches.push(ResolvedColumn::Derived {
                    table: derived.alias.clone(),
                    column: name.clone(),
                });
            }
        }

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            _ => Err(Error::resolution(format!(
                "ambiguous column reference: {}",
                column
            ))),
        }
    }

    fn column_in_table(&self, table_id: TableId, column: &str) -> Option<ResolvedColumn> {
        let table = &self.tables[table_id.0];
        table
            .columns
            .iter()
            .find(|column_id| {
                self.columns[column_id.0]
                    .name
                    .eq_ignore_ascii_case(column)
            })
            .map(|column_id| ResolvedColumn::Base(*column_id))
    }

    /// Ищет колонку в цепочке областей видимости
    ///
    /// Поиск идет от внутренней области к внешним, так что коррелированные
    /// ссылки разрешаются во внешние таблицы.
    pub fn find_column(
        &self,
        scope: ScopeId,
        table_alias: Option<&str>,
        column: &str,
    ) -> Result<ResolvedColumn> {
        let mut current = Some(scope);

        while let Some(scope_id) = current {
            if let Some(found) = self.find_column_local(scope_id, table_alias, column)? {
                return Ok(found);
            }
            current = self.scopes[scope_id.0].parent;
        }

        let full_name = match table_alias {
            Some(alias) => format!("{}.{}", alias, column),
            None => column.to_string(),
        };
        Err(Error::resolution(format!(
            "couldn't resolve column: {}",
            full_name
        )))
    }

    /// Все колонки таблицы с заданным псевдонимом (для `table.*`)
    pub fn columns_in_table(&self, scope: ScopeId, alias: &str) -> Result<Vec<ResolvedColumn>> {
        let mut current = Some(scope);

        while let Some(scope_id) = current {
            let scope_data = &self.scopes[scope_id.0];

            for table_id in &scope_data.tables {
                let table = &self.tables[table_id.0];
                if table.alias.eq_ignore_ascii_case(alias) {
                    return Ok(table
                        .columns
                        .iter()
                        .map(|column_id| ResolvedColumn::Base(*column_id))
                        .collect());
                }
            }

            for derived in &scope_data.derived {
                if derived.alias.eq_ignore_ascii_case(alias) {
                    return Ok(derived
                        .columns
                        .iter()
                        .map(|name| ResolvedColumn::Derived {
                            table: derived.alias.clone(),
                            column: name.clone(),
                        })
                        .collect());
                }
            }

            current = scope_data.parent;
        }

        Err(Error::resolution(format!(
            "couldn't resolve table: {}",
            alias
        )))
    }

    /// Все локальные колонки области видимости (для `*`)
    pub fn local_columns(&self, scope: ScopeId) -> Vec<ResolvedColumn> {
        let scope = &self.scopes[scope.0];
        let mut result = Vec::new();

        for table_id in &scope.tables {
            for column_id in &self.tables[table_id.0].columns {
                result.push(ResolvedColumn::Base(*column_id));
            }
        }
        for derived in &scope.derived {
            for name in &derived.columns {
                result.push(ResolvedColumn::Derived {
                    table: derived.alias.clone(),
                    column: name.clone(),
                });
            }
        }

        result
    }

    /// Имя разрешенной колонки
    pub fn resolved_column_name<'a>(&'a self, column: &'a ResolvedColumn) -> &'a str {
        match column {
            ResolvedColumn::Base(id) => &self.columns[id.0].name,
            ResolvedColumn::Derived { column, .. } => column,
        }
    }
}
