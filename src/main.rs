//! Главный исполняемый файл sqlviews

use anyhow::Context;
use clap::Parser;
use sqlviews::cli::{run_console, run_extract, run_info, Cli, Commands};
use sqlviews::common::config::AppConfig;
use sqlviews::VERSION;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("не удалось загрузить конфигурацию {}", path.display()))?,
        None => AppConfig::default(),
    };

    match &cli.command {
        Some(Commands::Extract {
            sql,
            json,
            simplified,
        }) => {
            run_extract(&config, sql, *json, *simplified)?;
        }
        Some(Commands::Console { simplified }) => {
            run_console(&config, *simplified)?;
        }
        Some(Commands::Info) => {
            run_info(&config);
        }
        None => {
            println!("Добро пожаловать в sqlviews v{}!", VERSION);
            println!("Используйте --help для получения справки");
        }
    }

    Ok(())
}
