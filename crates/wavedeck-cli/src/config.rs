// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use wavedeck_engine::page::ensure_page_size;
use wavedeck_model::{DEFAULT_PAGE_SIZE, Region};

const CONFIG_VERSION: i64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub dashboard: Dashboard,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            dashboard: Dashboard::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub db_path: Option<String>,
    pub sheets_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    pub region: Option<String>,
    pub page_size: Option<usize>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            region: Some(Region::Nam.as_str().to_owned()),
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("WAVEDECK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set WAVEDECK_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(wavedeck_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and move values under [storage] and [dashboard]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(db_path) = &self.storage.db_path {
            wavedeck_db::validate_db_path(db_path)?;
        }

        if let Some(region) = &self.dashboard.region
            && Region::parse(region).is_none()
        {
            bail!(
                "dashboard.region in {} must be NAM or APAC, got {region:?}",
                path.display()
            );
        }

        if let Some(page_size) = self.dashboard.page_size {
            ensure_page_size(page_size).with_context(|| {
                format!("dashboard.page_size in {} is out of range", path.display())
            })?;
        }

        Ok(())
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.db_path {
            return Ok(PathBuf::from(path));
        }
        if let Some(path) = env::var_os("WAVEDECK_DB_PATH") {
            return Ok(PathBuf::from(path));
        }

        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [storage].db_path or WAVEDECK_DB_PATH")
        })?;
        let app_dir = data_root.join(wavedeck_db::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create data directory {}", app_dir.display()))?;
        Ok(app_dir.join("wavedeck.db"))
    }

    pub fn sheets_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.storage.sheets_dir {
            return Some(PathBuf::from(dir));
        }
        env::var_os("WAVEDECK_SHEETS_DIR").map(PathBuf::from)
    }

    pub fn region(&self) -> Region {
        self.dashboard
            .region
            .as_deref()
            .and_then(Region::parse)
            .unwrap_or(Region::Nam)
    }

    pub fn page_size(&self) -> usize {
        self.dashboard.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# wavedeck config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/wavedeck/wavedeck.db)\n# db_path = \"/absolute/path/to/wavedeck.db\"\n# Directory holding projects.csv, single_users.csv, security_group_users.csv\n# sheets_dir = \"/absolute/path/to/sheets\"\n\n[dashboard]\nregion = \"NAM\"\npage_size = {DEFAULT_PAGE_SIZE}\n",
            path.display(),
        )
    }
}
