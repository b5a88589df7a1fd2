//! Парсер компактных объявлений отношений
//!
//! Формат: `Имя(колонка:тип, ...)`, например
//! `Sailors(sid:numeric, sname:string, rating:numeric, age:numeric)`.

use crate::catalog::{PrimitiveType, TypedRelation};
use crate::common::error::{Error, Result};
use std::rc::Rc;

/// Разбирает одно объявление отношения
pub fn parse_relation(input: &str) -> Result<Rc<TypedRelation>> {
    let input = input.trim();

    let open = input
        .find('(')
        .ok_or_else(|| Error::configuration(format!("missing '(' in declaration: {}", input)))?;
    if !input.ends_with(')') {
        return Err(Error::configuration(format!(
            "missing ')' in declaration: {}",
            input
        )));
    }

    let name = input[..open].trim();
    if name.is_empty() || !is_valid_identifier(name) {
        return Err(Error::configuration(format!(
            "invalid relation name in declaration: {}",
            input
        )));
    }

    let body = &input[open + 1..input.len() - 1];
    let mut builder = TypedRelation::builder(name);
    let mut column_count = 0;

    for part in body.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err(Error::configuration(format!(
                "empty column in declaration: {}",
                input
            )));
        }

        let (column, ty) = match part.split_once(':') {
            Some((column, ty)) => (column.trim(), ty.trim().parse::<PrimitiveType>()?),
            None => {
                return Err(Error::configuration(format!(
                    "missing column type in declaration: {}",
                    part
                )));
            }
        };

        if !is_valid_identifier(column) {
            return Err(Error::configuration(format!(
                "invalid column name: {}",
                column
            )));
        }

        builder = builder.column(column, ty);
        column_count += 1;
    }

    if column_count == 0 {
        return Err(Error::configuration(format!(
            "relation has no columns: {}",
            input
        )));
    }

    Ok(builder.build())
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
