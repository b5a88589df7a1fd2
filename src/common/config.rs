//! Конфигурация приложения sqlviews
//!
//! TOML файл со схемой базы данных (компактные объявления отношений) и
//! настройками вывода. Используется консольной утилитой; библиотечному
//! API конфигурация не нужна.

use crate::algebra::render::RenderMode;
use crate::catalog::{parse_relation, Schema};
use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Конфигурация приложения
///
/// Объявления отношений идут раньше секции настроек: в TOML значения
/// верхнего уровня должны предшествовать таблицам.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Компактные объявления отношений схемы
    #[serde(default)]
    pub relations: Vec<String>,
    /// Общие настройки
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Общие настройки приложения
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Режим отображения представлений: advanced или simplified
    pub render_mode: String,
    /// Уровень логирования по умолчанию
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            render_mode: "advanced".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relations: Vec::new(),
            general: GeneralConfig::default(),
        }
    }
}

impl AppConfig {
    /// Загружает конфигурацию из TOML файла
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Сохраняет конфигурацию в TOML файл
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::configuration(format!("can't serialize config: {}", e)))?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Проверяет согласованность конфигурации
    pub fn validate(&self) -> Result<()> {
        self.general.render_mode.parse::<RenderMode>()?;

        for declaration in &self.relations {
            parse_relation(declaration)?;
        }

        Ok(())
    }

    /// Режим отображения представлений
    pub fn render_mode(&self) -> Result<RenderMode> {
        self.general.render_mode.parse()
    }

    /// Строит схему из объявлений отношений
    pub fn to_schema(&self) -> Result<Schema> {
        let mut schema = Schema::new();
        for declaration in &self.relations {
            schema.add(parse_relation(declaration)?);
        }
        Ok(schema)
    }
}
