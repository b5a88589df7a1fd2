//! Абстрактное синтаксическое дерево запросной части SQL
//!
//! Узлы, к которым последующие проходы прикрепляют информацию (простые
//! SELECT, элементы FROM, ссылки на колонки, элементы списка выборки),
//! несут идентификаторы, выдаваемые парсером; сами аннотации живут во
//! внешних таблицах анализатора.

use serde::{Deserialize, Serialize};

/// Идентификатор узла дерева
pub type NodeId = u32;

/// Оператор SELECT: простой запрос или операция над множествами
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectStmt {
    /// Простой SELECT
    Plain(Box<PlainSelect>),
    /// UNION / INTERSECT / EXCEPT
    SetOp(Box<SetOperation>),
}

/// Операция над множествами
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOperation {
    pub id: NodeId,
    pub kind: SetOpKind,
    pub all: bool,
    pub left: SelectStmt,
    pub right: SelectStmt,
}

/// Вид операции над множествами
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetOpKind {
    Union,
    Intersect,
    Except,
}

/// Простой SELECT запрос
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainSelect {
    pub id: NodeId,
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Vec<FromItem>,
    pub where_clause: Option<Expression>,
    pub group_by: Vec<Expression>,
    pub having: Option<Expression>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Элемент списка выборки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectItem {
    /// Все колонки (*)
    AllColumns { id: NodeId },
    /// Все колонки таблицы (t.*)
    AllColumnsInTable { id: NodeId, table: String },
    /// Выражение с необязательным псевдонимом
    Expression {
        id: NodeId,
        expr: Expression,
        alias: Option<String>,
    },
}

/// Элемент FROM клаузулы
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FromItem {
    /// Базовая таблица
    BaseTable {
        id: NodeId,
        name: String,
        alias: Option<String>,
    },
    /// Подзапрос (производная таблица)
    SubSelect {
        id: NodeId,
        select: SelectStmt,
        alias: String,
    },
    /// Соединение
    Join(Box<JoinItem>),
}

impl FromItem {
    /// Идентификатор узла элемента FROM
    pub fn id(&self) -> NodeId {
        match self {
            FromItem::BaseTable { id, .. } => *id,
            FromItem::SubSelect { id, .. } => *id,
            FromItem::Join(join) => join.id,
        }
    }
}

/// Соединение двух элементов FROM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinItem {
    pub id: NodeId,
    pub kind: JoinKind,
    pub left: FromItem,
    pub right: FromItem,
    pub on: Option<Expression>,
}

/// Вид соединения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
    Cross,
}

impl JoinKind {
    /// Сохраняет ли соединение все строки левой стороны
    pub fn preserves_left(self) -> bool {
        matches!(self, JoinKind::Inner | JoinKind::Cross | JoinKind::LeftOuter)
    }

    /// Сохраняет ли соединение все строки правой стороны
    pub fn preserves_right(self) -> bool {
        matches!(
            self,
            JoinKind::Inner | JoinKind::Cross | JoinKind::RightOuter
        )
    }
}

/// Агрегатная функция
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

/// Бинарный оператор
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOperator {
    And,
    Or,
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Унарный оператор
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    Negate,
}

/// Выражение SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Ссылка на колонку, возможно с префиксом таблицы
    ColumnReference {
        id: NodeId,
        table: Option<String>,
        column: String,
    },
    /// Целочисленная константа
    IntegerConstant(i64),
    /// Строковая константа
    StringConstant(String),
    /// NULL
    Null,
    /// Бинарное выражение
    Binary {
        op: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Унарное выражение
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
    /// Агрегатная функция; `None` в аргументе означает COUNT(*)
    Aggregate {
        func: AggregateFunction,
        argument: Option<Box<Expression>>,
    },
    /// EXISTS (подзапрос)
    Exists {
        negated: bool,
        select: Box<SelectStmt>,
    },
    /// Выражение IN с подзапросом
    InSubSelect {
        negated: bool,
        operand: Box<Expression>,
        select: Box<SelectStmt>,
    },
    /// Выражение IN со списком значений
    InList {
        negated: bool,
        operand: Box<Expression>,
        items: Vec<Expression>,
    },
    /// Проверка на NULL
    IsNull {
        negated: bool,
        operand: Box<Expression>,
    },
    /// Сопоставление с шаблоном
    Like {
        negated: bool,
        operand: Box<Expression>,
        pattern: Box<Expression>,
    },
    /// Скалярный подзапрос
    SubSelect(Box<SelectStmt>),
}
