//! Отображение представлений в строку
//!
//! Два режима: расширенный (с копийными переменными и списком
//! мультимножественных переменных в фигурных скобках) и упрощенный.
//! Имена переменных выводятся из имен колонок; коллизии разрешаются
//! суффиксами с ограниченным бюджетом попыток.

use crate::algebra::atom::Atom;
use crate::algebra::term::{Term, TermKind};
use crate::algebra::view::View;
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Бюджет суффиксов для одного имени колонки
const MAX_COLUMN_INSTANCES: usize = 100;

/// Режим отображения представления
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Полный формат с копийными переменными и мультимножественным списком
    Advanced,
    /// Сокращенный формат
    Simplified,
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Advanced => write!(f, "advanced"),
            RenderMode::Simplified => write!(f, "simplified"),
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "advanced" => Ok(RenderMode::Advanced),
            "simplified" => Ok(RenderMode::Simplified),
            other => Err(Error::configuration(format!(
                "unknown render mode: {}",
                other
            ))),
        }
    }
}

/// Построитель строкового представления
///
/// Держит состояние именования одной сессии отображения: соответствие
/// термов именам и набор уже занятых имен.
pub struct ViewRenderer {
    view_name: String,
    mode: RenderMode,
    distinct_term_names: HashMap<Term, String>,
    head_term_names: Vec<String>,
    multiset_variable_names: Vec<String>,
    body_atom_names: Vec<String>,
    condition_atom_names: Vec<String>,
    variable_names: HashSet<String>,
}

impl ViewRenderer {
    /// Создает построитель для представления с заданным именем
    pub fn new(view_name: impl Into<String>, mode: RenderMode) -> ViewRenderer {
        ViewRenderer {
            view_name: view_name.into(),
            mode,
            distinct_term_names: HashMap::new(),
            head_term_names: Vec::new(),
            multiset_variable_names: Vec::new(),
            body_atom_names: Vec::new(),
            condition_atom_names: Vec::new(),
            variable_names: HashSet::new(),
        }
    }

    /// Выдает незанятое имя переменной на основе имени колонки
    ///
    /// Если базовое имя занято, перебираются суффиксы `2..=100`
    /// (через подчеркивание, когда имя уже оканчивается цифрой); после
    /// исчерпания бюджета отображение завершается ошибкой.
    fn fresh_variable_name(&mut self, column_name: &str) -> Result<String> {
        debug_assert!(!column_name.is_empty(), "column name must not be empty");

        if self.variable_names.insert(column_name.to_string()) {
            return Ok(column_name.to_string());
        }

        let ends_with_digit = column_name
            .chars()
            .last()
            .map_or(false, |c| c.is_ascii_digit());

        for counter in 2..=MAX_COLUMN_INSTANCES {
            let candidate = if ends_with_digit {
                format!("{}_{}", column_name, counter)
            } else {
                format!("{}{}", column_name, counter)
            };

            if self.variable_names.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }

        Err(Error::rendering(format!(
            "too many variables with the same column name: {}",
            column_name
        )))
    }

    fn register_term(&mut self, column_name: &str, term: &Term) -> Result<()> {
        if self.distinct_term_names.contains_key(term) {
            return Ok(());
        }

        match term.kind() {
            TermKind::Dist => {
                // В атомах выделенная переменная показывается сырым именем
                // колонки, дедуплицированное имя попадает в голову
                self.distinct_term_names
                    .insert(term.clone(), column_name.to_string());
                let fresh = self.fresh_variable_name(column_name)?;
                self.head_term_names.push(fresh);
            }
            TermKind::Multiset => {
                self.distinct_term_names
                    .insert(term.clone(), column_name.to_string());
                let fresh = self.fresh_variable_name(column_name)?;
                self.multiset_variable_names.push(fresh);
            }
            TermKind::Set => {
                let fresh = self.fresh_variable_name(column_name)?;
                self.distinct_term_names.insert(term.clone(), fresh);
            }
            TermKind::Constant => {
                self.distinct_term_names
                    .insert(term.clone(), term.to_string());
            }
        }

        Ok(())
    }

    fn atom_to_string(&mut self, atom: &Atom) -> Result<String> {
        let column_names = atom.relation().column_names();
        let mut argument_names = Vec::with_capacity(atom.arguments().len());

        for (term, column_name) in atom.arguments().iter().zip(column_names) {
            self.register_term(column_name, term)?;
            argument_names.push(self.distinct_term_names[term].clone());
        }

        let mut result = format!("{}({}", atom.relation().name(), argument_names.join(", "));

        if self.mode == RenderMode::Advanced {
            let copy_variable = atom.copy_variable();
            self.register_term("i", copy_variable)?;
            result.push_str("; ");
            result.push_str(&self.distinct_term_names[copy_variable]);
        }

        result.push(')');
        Ok(result)
    }

    /// Добавляет телесный атом
    pub fn append_body_atom(&mut self, atom: &Atom) -> Result<&mut Self> {
        let rendered = self.atom_to_string(atom)?;
        self.body_atom_names.push(rendered);
        Ok(self)
    }

    /// Добавляет условный атом
    pub fn append_condition_atom(&mut self, atom: &Atom) -> Result<&mut Self> {
        let rendered = self.atom_to_string(atom)?;
        self.condition_atom_names.push(rendered);
        Ok(self)
    }

    /// Собирает итоговую строку
    pub fn finish(&self) -> String {
        let mut result = String::new();

        result.push_str(&self.view_name);
        result.push('(');
        result.push_str(&self.head_term_names.join(", "));
        result.push_str(") :- ");
        result.push_str(&self.body_atom_names.join(", "));

        if !self.condition_atom_names.is_empty() {
            result.push_str(" \u{22c9} ");
            result.push_str(&self.condition_atom_names.join(", "));
        }

        if self.mode == RenderMode::Advanced {
            if self.multiset_variable_names.is_empty() {
                result.push_str(" {}");
            } else {
                result.push_str(" { ");
                result.push_str(&self.multiset_variable_names.join(", "));
                result.push_str(" }");
            }
        }

        result
    }
}

impl View {
    /// Отображает представление в строку в заданном режиме
    pub fn render(&self, mode: RenderMode) -> Result<String> {
        let mut renderer = ViewRenderer::new(self.name(), mode);
        renderer.append_body_atom(self.body())?;
        for condition in self.conditions() {
            renderer.append_condition_atom(condition)?;
        }
        Ok(renderer.finish())
    }
}
