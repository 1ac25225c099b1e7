//! Configuration Management
//!
//! Handles persistent configuration storage for gcf-inventory.

use crate::manager::DisplayOffset;
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How collected responses are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Project to collect when none is given on the command line
    #[serde(default)]
    pub project_id: Option<String>,
    /// Hours added to UTC deployment times for display (default +9)
    #[serde(default)]
    pub display_offset_hours: Option<i32>,
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gcf-inventory").join("config.json"))
    }

    /// Load configuration from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective project (CLI > config > gcloud default)
    pub fn effective_project(&self) -> Option<String> {
        self.project_id
            .clone()
            .or_else(crate::gcp::auth::get_default_project)
    }

    /// Get effective display offset (CLI > config > +9h)
    pub fn effective_display_offset(&self, cli: Option<i32>) -> Result<DisplayOffset> {
        match cli.or(self.display_offset_hours) {
            Some(hours) => DisplayOffset::from_hours(hours),
            None => Ok(DisplayOffset::default()),
        }
    }

    pub fn effective_output_format(&self, cli: Option<OutputFormat>) -> OutputFormat {
        cli.or(self.output_format).unwrap_or_default()
    }

    /// Set project and save
    pub fn set_project(&mut self, project_id: &str) -> Result<()> {
        self.project_id = Some(project_id.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("gcf-inventory-{}", uuid::Uuid::new_v4()))
            .join("config.json")
    }

    #[test]
    fn test_round_trip_through_disk() {
        let path = temp_path();
        let config = Config {
            project_id: Some("my-project-123".to_string()),
            display_offset_hours: Some(-5),
            output_format: Some(OutputFormat::Yaml),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.project_id.as_deref(), Some("my-project-123"));
        assert_eq!(loaded.display_offset_hours, Some(-5));
        assert_eq!(loaded.output_format, Some(OutputFormat::Yaml));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_or_broken_file_gives_defaults() {
        let path = temp_path();
        assert!(Config::load_from(&path).project_id.is_none());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();
        assert!(Config::load_from(&path).project_id.is_none());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_effective_settings_prefer_cli() {
        let config = Config {
            project_id: None,
            display_offset_hours: Some(0),
            output_format: Some(OutputFormat::Yaml),
        };

        assert_eq!(config.effective_display_offset(None).unwrap().hours(), 0);
        assert_eq!(config.effective_display_offset(Some(2)).unwrap().hours(), 2);
        assert!(config.effective_display_offset(Some(99)).is_err());
        assert_eq!(
            Config::default().effective_display_offset(None).unwrap(),
            DisplayOffset::KST
        );

        assert_eq!(config.effective_output_format(None), OutputFormat::Yaml);
        assert_eq!(
            config.effective_output_format(Some(OutputFormat::Json)),
            OutputFormat::Json
        );
    }
}
