//! Configuration file handling

use crate::error::{Result, TabreconError};
use crate::options::{MissingColumnPolicy, ReconcileOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `tabrecon.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconConfig {
    pub include_unchanged: bool,
    pub strict_types: bool,
    pub numeric_cross_type: bool,
    pub missing_columns: MissingColumnPolicy,
    pub status_column: String,
    pub parallel_threshold: usize,
    /// DuckDB memory limit used while loading inputs
    pub memory_limit: String,
    /// Rows shown by the pretty renderer
    pub row_limit: usize,
}

impl Default for ReconConfig {
    fn default() -> Self {
        let options = ReconcileOptions::default();
        Self {
            include_unchanged: options.include_unchanged,
            strict_types: options.strict_types,
            numeric_cross_type: options.numeric_cross_type,
            missing_columns: options.missing_columns,
            status_column: options.status_column,
            parallel_threshold: options.parallel_threshold,
            memory_limit: crate::DEFAULT_MEMORY_LIMIT.to_string(),
            row_limit: crate::DEFAULT_ROW_LIMIT,
        }
    }
}

impl ReconConfig {
    /// Load from an explicit path, else `tabrecon.json` in `dir`, else defaults
    pub fn load(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(TabreconError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        let default_path = Self::default_path(dir);
        if default_path.exists() {
            Self::from_file(&default_path)
        } else {
            log::debug!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn default_path(dir: &Path) -> PathBuf {
        dir.join(crate::CONFIG_FILE_NAME)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            TabreconError::config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the configuration, refusing to overwrite unless `force`
    pub fn write(&self, path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(TabreconError::config(format!(
                "Config file already exists: {}",
                path.display()
            )));
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.status_column.is_empty() {
            return Err(TabreconError::config("status_column must not be empty"));
        }
        if self.memory_limit.is_empty() {
            return Err(TabreconError::config("memory_limit must not be empty"));
        }
        Ok(())
    }

    pub fn to_options(&self) -> ReconcileOptions {
        ReconcileOptions {
            include_unchanged: self.include_unchanged,
            strict_types: self.strict_types,
            numeric_cross_type: self.numeric_cross_type,
            missing_columns: self.missing_columns,
            status_column: self.status_column.clone(),
            parallel_threshold: self.parallel_threshold,
        }
    }
}
