//! CLI интерфейс для sqlviews
//!
//! Командная строка: извлечение представлений из одного запроса,
//! интерактивная консоль и информация о системе.

use crate::algebra::render::RenderMode;
use crate::algebra::view::View;
use crate::common::config::AppConfig;
use crate::common::error::Result;
use crate::pipeline::ViewExtractionPipeline;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// sqlviews - анализ раскрытия информации SQL запросами
#[derive(Parser)]
#[command(name = "sqlviews")]
#[command(about = "sqlviews - disclosure view extraction for SQL queries")]
#[command(version)]
pub struct Cli {
    /// Конфигурационный файл со схемой
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Извлечь представления из SQL запроса
    Extract {
        /// SQL запрос
        sql: String,

        /// Вывести представления в формате JSON
        #[arg(long)]
        json: bool,

        /// Использовать упрощенный формат вывода
        #[arg(long)]
        simplified: bool,
    },

    /// Запустить интерактивную консоль
    Console {
        /// Использовать упрощенный формат вывода
        #[arg(long)]
        simplified: bool,
    },

    /// Показать информацию о системе
    Info,
}

/// Печатает представления в выбранном режиме
fn print_views(views: &[View], mode: RenderMode, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("Запрос не раскрывает ни одной таблицы");
        return Ok(());
    }

    for view in views {
        println!("{}", view.render(mode)?);
    }

    Ok(())
}

/// Выполняет команду extract
pub fn run_extract(config: &AppConfig, sql: &str, json: bool, simplified: bool) -> Result<()> {
    let schema = config.to_schema()?;
    let pipeline = ViewExtractionPipeline::new(schema);

    let mode = if simplified {
        RenderMode::Simplified
    } else {
        config.render_mode()?
    };

    let views = pipeline.execute(sql)?;
    print_views(&views, mode, json)
}

/// Запускает интерактивную консоль
pub fn run_console(config: &AppConfig, simplified: bool) -> Result<()> {
    let schema = config.to_schema()?;
    let pipeline = ViewExtractionPipeline::new(schema);

    let mode = if simplified {
        RenderMode::Simplified
    } else {
        config.render_mode()?
    };

    println!("Интерактивная консоль sqlviews (exit для выхода)");
    for relation in pipeline.schema().relations() {
        println!("  {}", relation);
    }

    let stdin = std::io::stdin();
    loop {
        print!("sqlviews> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        match pipeline.execute(line) {
            Ok(views) => print_views(&views, mode, false)?,
            Err(error) => println!("Ошибка: {}", error),
        }
    }

    println!("До свидания!");
    Ok(())
}

/// Печатает информацию о системе
pub fn run_info(config: &AppConfig) {
    println!("sqlviews v{}", crate::VERSION);
    println!("Режим вывода: {}", config.general.render_mode);
    println!("Отношений в схеме: {}", config.relations.len());
}
