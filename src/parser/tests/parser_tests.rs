//! Тесты синтаксического анализатора

use crate::common::error::Error;
use crate::parser::ast::*;
use crate::parser::parser::SqlParser;

fn parse(sql: &str) -> SelectStmt {
    SqlParser::new(sql).unwrap().parse().unwrap()
}

fn parse_plain(sql: &str) -> PlainSelect {
    match parse(sql) {
        SelectStmt::Plain(plain) => *plain,
        other => panic!("Ожидался простой SELECT, получено {:?}", other),
    }
}

#[test]
fn test_parse_select_star() {
    let select = parse_plain("SELECT * FROM Sailors");

    assert_eq!(select.items.len(), 1);
    assert!(matches!(select.items[0], SelectItem::AllColumns { .. }));
    assert_eq!(select.from.len(), 1);
    assert!(matches!(
        &select.from[0],
        FromItem::BaseTable { name, alias: None, .. } if name == "Sailors"
    ));
}

#[test]
fn test_parse_table_star() {
    let select = parse_plain("SELECT S.* FROM Sailors S");

    assert!(matches!(
        &select.items[0],
        SelectItem::AllColumnsInTable { table, .. } if table == "S"
    ));
    assert!(matches!(
        &select.from[0],
        FromItem::BaseTable { alias: Some(alias), .. } if alias == "S"
    ));
}

#[test]
fn test_parse_column_list_with_aliases() {
    let select = parse_plain("SELECT S.sname AS name, age FROM Sailors AS S");

    assert_eq!(select.items.len(), 2);
    match &select.items[0] {
        SelectItem::Expression { expr, alias, .. } => {
            assert_eq!(alias.as_deref(), Some("name"));
            assert!(matches!(
                expr,
                Expression::ColumnReference { table: Some(table), column, .. }
                    if table == "S" && column == "sname"
            ));
        }
        other => panic!("Ожидалось выражение, получено {:?}", other),
    }
    match &select.items[1] {
        SelectItem::Expression { expr, alias, .. } => {
            assert!(alias.is_none());
            assert!(matches!(
                expr,
                Expression::ColumnReference { table: None, column, .. } if column == "age"
            ));
        }
        other => panic!("Ожидалось выражение, получено {:?}", other),
    }
}

#[test]
fn test_parse_select_without_from() {
    let select = parse_plain("SELECT 1");

    assert!(select.from.is_empty());
    assert!(matches!(
        &select.items[0],
        SelectItem::Expression { expr: Expression::IntegerConstant(1), .. }
    ));
}

#[test]
fn test_parse_distinct() {
    assert!(parse_plain("SELECT DISTINCT sname FROM Sailors").distinct);
    assert!(!parse_plain("SELECT ALL sname FROM Sailors").distinct);
    assert!(!parse_plain("SELECT sname FROM Sailors").distinct);
}

#[test]
fn test_parse_comma_separated_from() {
    let select = parse_plain("SELECT S.sname FROM Sailors S, Reserves R, Boats B");
    assert_eq!(select.from.len(), 3);
}

#[test]
fn test_parse_where_predicate_precedence() {
    let select = parse_plain("SELECT sid FROM Reserves WHERE bid = 103 AND day = 'mon' OR sid = 1");

    // OR связывает слабее AND
    match select.where_clause.unwrap() {
        Expression::Binary {
            op: BinaryOperator::Or,
            left,
            ..
        } => {
            assert!(matches!(
                *left,
                Expression::Binary { op: BinaryOperator::And, .. }
            ));
        }
        other => panic!("Ожидался OR на вершине, получено {:?}", other),
    }
}

#[test]
fn test_parse_arithmetic_precedence() {
    let select = parse_plain("SELECT sid FROM Sailors WHERE 2 * rating = age - 1");

    match select.where_clause.unwrap() {
        Expression::Binary {
            op: BinaryOperator::Eq,
            left,
            right,
        } => {
            assert!(matches!(
                *left,
                Expression::Binary { op: BinaryOperator::Multiply, .. }
            ));
            assert!(matches!(
                *right,
                Expression::Binary { op: BinaryOperator::Subtract, .. }
            ));
        }
        other => panic!("Ожидалось равенство, получено {:?}", other),
    }
}

#[test]
fn test_parse_joins() {
    let select = parse_plain(
        "SELECT S.sname FROM Sailors S LEFT OUTER JOIN Reserves R ON S.sid = R.sid",
    );

    match &select.from[0] {
        FromItem::Join(join) => {
            assert_eq!(join.kind, JoinKind::LeftOuter);
            assert!(join.on.is_some());
            assert!(matches!(&join.left, FromItem::BaseTable { .. }));
            assert!(matches!(&join.right, FromItem::BaseTable { .. }));
        }
        other => panic!("Ожидалось соединение, получено {:?}", other),
    }
}

#[test]
fn test_parse_join_kinds() {
    let kinds = [
        ("JOIN", JoinKind::Inner),
        ("INNER JOIN", JoinKind::Inner),
        ("LEFT JOIN", JoinKind::LeftOuter),
        ("RIGHT OUTER JOIN", JoinKind::RightOuter),
        ("FULL JOIN", JoinKind::FullOuter),
        ("CROSS JOIN", JoinKind::Cross),
    ];

    for (sql_join, expected) in kinds {
        let sql = format!("SELECT 1 FROM A {} B", sql_join);
        let select = parse_plain(&sql);
        match &select.from[0] {
            FromItem::Join(join) => assert_eq!(join.kind, expected, "для {}", sql_join),
            other => panic!("Ожидалось соединение, получено {:?}", other),
        }
    }
}

#[test]
fn test_parse_nested_joins_are_left_associative() {
    let select = parse_plain("SELECT 1 FROM A JOIN B ON x = y JOIN C ON y = z");

    match &select.from[0] {
        FromItem::Join(outer) => {
            assert!(matches!(&outer.left, FromItem::Join(_)));
            assert!(matches!(&outer.right, FromItem::BaseTable { name, .. } if name == "C"));
        }
        other => panic!("Ожидалось соединение, получено {:?}", other),
    }
}

#[test]
fn test_parse_derived_table() {
    let select = parse_plain("SELECT T.x FROM (SELECT sid AS x FROM Sailors) T");

    match &select.from[0] {
        FromItem::SubSelect { alias, select, .. } => {
            assert_eq!(alias, "T");
            assert!(matches!(select, SelectStmt::Plain(_)));
        }
        other => panic!("Ожидалась производная таблица, получено {:?}", other),
    }
}

#[test]
fn test_parse_derived_table_requires_alias() {
    let result = SqlParser::new("SELECT 1 FROM (SELECT sid FROM Sailors)")
        .unwrap()
        .parse();
    assert!(matches!(result, Err(Error::SqlParsing { .. })));
}

#[test]
fn test_parse_exists() {
    let select = parse_plain(
        "SELECT S.sname FROM Sailors S WHERE EXISTS (SELECT * FROM Reserves R WHERE R.sid = S.sid)",
    );

    assert!(matches!(
        select.where_clause.unwrap(),
        Expression::Exists { negated: false, .. }
    ));
}

#[test]
fn test_parse_not_exists() {
    let select = parse_plain(
        "SELECT S.sname FROM Sailors S WHERE NOT EXISTS (SELECT * FROM Reserves R)",
    );

    // NOT EXISTS помечает сам узел EXISTS
    assert!(matches!(
        select.where_clause.unwrap(),
        Expression::Exists { negated: true, .. }
    ));
}

#[test]
fn test_parse_in_subselect() {
    let select = parse_plain(
        "SELECT sname FROM Sailors WHERE sid IN (SELECT sid FROM Reserves)",
    );

    assert!(matches!(
        select.where_clause.unwrap(),
        Expression::InSubSelect { negated: false, .. }
    ));
}

#[test]
fn test_parse_not_in_subselect() {
    let select = parse_plain(
        "SELECT sname FROM Sailors WHERE sid NOT IN (SELECT sid FROM Reserves)",
    );

    assert!(matches!(
        select.where_clause.unwrap(),
        Expression::InSubSelect { negated: true, .. }
    ));
}

#[test]
fn test_parse_in_list() {
    let select = parse_plain("SELECT sname FROM Sailors WHERE rating IN (7, 8, 9)");

    match select.where_clause.unwrap() {
        Expression::InList { negated, items, .. } => {
            assert!(!negated);
            assert_eq!(items.len(), 3);
        }
        other => panic!("Ожидался IN со списком, получено {:?}", other),
    }
}

#[test]
fn test_parse_is_null_and_like() {
    let select = parse_plain(
        "SELECT sname FROM Sailors WHERE age IS NOT NULL AND sname LIKE 'L%'",
    );

    match select.where_clause.unwrap() {
        Expression::Binary { left, right, .. } => {
            assert!(matches!(*left, Expression::IsNull { negated: true, .. }));
            assert!(matches!(*right, Expression::Like { negated: false, .. }));
        }
        other => panic!("Ожидался AND, получено {:?}", other),
    }
}

#[test]
fn test_parse_scalar_subselect() {
    let select = parse_plain(
        "SELECT sname FROM Sailors WHERE rating = (SELECT MAX(rating) FROM Sailors)",
    );

    match select.where_clause.unwrap() {
        Expression::Binary { right, .. } => {
            assert!(matches!(*right, Expression::SubSelect(_)));
        }
        other => panic!("Ожидалось равенство, получено {:?}", other),
    }
}

#[test]
fn test_parse_aggregates() {
    let select = parse_plain("SELECT COUNT(*), MAX(rating) FROM Sailors");

    assert!(matches!(
        &select.items[0],
        SelectItem::Expression {
            expr: Expression::Aggregate {
                func: AggregateFunction::Count,
                argument: None,
            },
            ..
        }
    ));
    assert!(matches!(
        &select.items[1],
        SelectItem::Expression {
            expr: Expression::Aggregate {
                func: AggregateFunction::Max,
                argument: Some(_),
            },
            ..
        }
    ));
}

#[test]
fn test_parse_group_by_having() {
    let select = parse_plain(
        "SELECT rating, COUNT(*) FROM Sailors GROUP BY rating HAVING COUNT(*) > 1",
    );

    assert_eq!(select.group_by.len(), 1);
    assert!(select.having.is_some());
}

#[test]
fn test_parse_limit_offset() {
    let select = parse_plain("SELECT sname FROM Sailors LIMIT 10 OFFSET 5");

    assert_eq!(select.limit, Some(10));
    assert_eq!(select.offset, Some(5));
}

#[test]
fn test_parse_union() {
    let stmt = parse("SELECT sid FROM Sailors UNION ALL SELECT sid FROM Reserves");

    match stmt {
        SelectStmt::SetOp(set_op) => {
            assert_eq!(set_op.kind, SetOpKind::Union);
            assert!(set_op.all);
            assert!(matches!(set_op.left, SelectStmt::Plain(_)));
            assert!(matches!(set_op.right, SelectStmt::Plain(_)));
        }
        other => panic!("Ожидалась операция над множествами, получено {:?}", other),
    }
}

#[test]
fn test_parse_chained_set_operations_are_left_associative() {
    let stmt = parse("SELECT 1 UNION SELECT 2 EXCEPT SELECT 3");

    match stmt {
        SelectStmt::SetOp(outer) => {
            assert_eq!(outer.kind, SetOpKind::Except);
            assert!(matches!(outer.left, SelectStmt::SetOp(_)));
        }
        other => panic!("Ожидалась операция над множествами, получено {:?}", other),
    }
}

#[test]
fn test_parse_trailing_tokens_fail() {
    let result = SqlParser::new("SELECT 1 FROM Sailors garbage tokens")
        .unwrap()
        .parse();
    assert!(matches!(result, Err(Error::SqlParsing { .. })));
}

#[test]
fn test_parse_negative_literal() {
    let select = parse_plain("SELECT sname FROM Sailors WHERE rating = -1");

    match select.where_clause.unwrap() {
        Expression::Binary { right, .. } => {
            assert!(matches!(
                *right,
                Expression::Unary { op: UnaryOperator::Negate, .. }
            ));
        }
        other => panic!("Ожидалось равенство, получено {:?}", other),
    }
}

#[test]
fn test_node_ids_are_unique() {
    let select = parse_plain("SELECT S.sname, R.bid FROM Sailors S, Reserves R WHERE S.sid = R.sid");

    let mut ids = vec![select.id];
    for item in &select.items {
        match item {
            SelectItem::Expression { id, .. }
            | SelectItem::AllColumns { id }
            | SelectItem::AllColumnsInTable { id, .. } => ids.push(*id),
        }
    }
    for from in &select.from {
        ids.push(from.id());
    }

    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "Идентификаторы узлов повторяются");
}
