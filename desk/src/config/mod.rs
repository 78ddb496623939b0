// Desk configuration: the embedded defaults in assets/config/default.json,
// deep-merged with an optional user file.
use anyhow::{anyhow, Context};
use client::config::settings::ApiSettings;
use serde::Deserialize;
use serde_json::Value;
use shared::catalog::Resource;
use shared::models::ColumnDescriptor;
use shared::table::PAGE_SIZE_OPTIONS;
use shared::utils::merge_json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = include_str!("../../assets/config/default.json");

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub version: String,
    pub app: AppSettings,
    pub api: ApiSettings,
    pub table: TableSettings,
    // Column presets keyed by resource path, replacing the built-in ones.
    #[serde(default)]
    pub columns: BTreeMap<String, Vec<ColumnDescriptor>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub language: String, // used until the user picks one
    pub log_level: String,
    pub preferences_file: PathBuf,
    pub export_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TableSettings {
    pub per_page: usize,
}

impl AppConfig {
    pub fn load_default() -> anyhow::Result<Self> {
        Self::load(None)
    }

    /// Embedded defaults, overlaid with `user_file` when given.
    pub fn load(user_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut merged: Value =
            serde_json::from_str(DEFAULT_CONFIG).context("Embedded default configuration is invalid")?;
        if let Some(path) = user_file {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
            let overlay: Value = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
            merge_json(&mut merged, overlay);
        }
        let config: AppConfig = serde_json::from_value(merged).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !PAGE_SIZE_OPTIONS.contains(&self.table.per_page) {
            return Err(anyhow!(
                "table.per_page must be one of {:?}, got {}",
                PAGE_SIZE_OPTIONS,
                self.table.per_page
            ));
        }
        for key in self.columns.keys() {
            key.parse::<Resource>().map_err(|e| anyhow!("columns: {}", e))?;
        }
        self.api.validate()?;
        Ok(())
    }

    pub fn columns_for(&self, resource: Resource) -> Vec<ColumnDescriptor> {
        self.columns
            .get(resource.path())
            .cloned()
            .unwrap_or_else(|| resource.default_columns())
    }
}
