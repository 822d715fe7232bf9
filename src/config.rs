//! Application configuration.
//!
//! TOML file with the rider's physical parameters and the drivetrain to
//! simulate. The gear tables come from a named preset (`standard` or
//! `compact`), optionally overridden by explicit tooth tables; they are fixed
//! for the lifetime of the process.

use crate::drivetrain::GearLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rider parameters
    pub rider: RiderSettings,
    /// Drivetrain selection
    pub drivetrain: DrivetrainSettings,
}

/// Rider parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiderSettings {
    /// Rider mass in kilograms
    pub mass_kg: f64,
    /// Start with target power driven externally instead of derived from
    /// cadence and gradient
    pub erg_mode: bool,
}

impl Default for RiderSettings {
    fn default() -> Self {
        Self {
            mass_kg: 75.0,
            erg_mode: false,
        }
    }
}

/// Drivetrain selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrivetrainSettings {
    /// Named preset: "standard" (39/53) or "compact" (24/34)
    pub preset: String,
    /// Explicit chainring tooth table, overriding the preset's
    pub chainrings: Option<Vec<u32>>,
    /// Explicit sprocket tooth table, overriding the preset's
    pub sprockets: Option<Vec<u32>>,
}

impl Default for DrivetrainSettings {
    fn default() -> Self {
        Self {
            preset: "standard".to_string(),
            chainrings: None,
            sprockets: None,
        }
    }
}

impl AppConfig {
    /// Resolve the configured gear layout.
    pub fn gear_layout(&self) -> Result<GearLayout, ConfigError> {
        let mut layout = match self.drivetrain.preset.as_str() {
            "standard" => GearLayout::standard(),
            "compact" => GearLayout::compact(),
            other => return Err(ConfigError::UnknownPreset(other.to_string())),
        };

        if let Some(chainrings) = &self.drivetrain.chainrings {
            layout.chainrings = chainrings.clone();
        }
        if let Some(sprockets) = &self.drivetrain.sprockets {
            layout.sprockets = sprockets.clone();
        }

        if layout.chainrings.is_empty() {
            return Err(ConfigError::InvalidLayout(
                "at least one chainring required".to_string(),
            ));
        }
        if layout.sprockets.len() < 2 {
            return Err(ConfigError::InvalidLayout(
                "at least two sprockets required".to_string(),
            ));
        }

        Ok(layout)
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "ergodrive", "ErgoDrive")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load configuration from the default path; a missing file yields defaults.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load configuration from an explicit path; a missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Save configuration to an explicit path, creating parent directories.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Save configuration to the default path.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Unknown drivetrain preset: {0}")]
    UnknownPreset(String),

    #[error("Invalid gear layout: {0}")]
    InvalidLayout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_resolves_standard_layout() {
        let config = AppConfig::default();
        let layout = config.gear_layout().unwrap();
        assert_eq!(layout, GearLayout::standard());
    }

    #[test]
    fn test_compact_preset() {
        let config = AppConfig {
            drivetrain: DrivetrainSettings {
                preset: "compact".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.gear_layout().unwrap(), GearLayout::compact());
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let config = AppConfig {
            drivetrain: DrivetrainSettings {
                preset: "nina".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            config.gear_layout(),
            Err(ConfigError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_explicit_tables_override_preset() {
        let config = AppConfig {
            drivetrain: DrivetrainSettings {
                preset: "standard".to_string(),
                chainrings: Some(vec![34, 50]),
                sprockets: None,
            },
            ..Default::default()
        };
        let layout = config.gear_layout().unwrap();
        assert_eq!(layout.chainrings, vec![34, 50]);
        assert_eq!(layout.sprockets, GearLayout::standard().sprockets);
    }

    #[test]
    fn test_degenerate_tables_are_rejected() {
        let config = AppConfig {
            drivetrain: DrivetrainSettings {
                preset: "standard".to_string(),
                chainrings: Some(vec![]),
                sprockets: None,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.gear_layout(),
            Err(ConfigError::InvalidLayout(_))
        ));

        let config = AppConfig {
            drivetrain: DrivetrainSettings {
                preset: "standard".to_string(),
                chainrings: None,
                sprockets: Some(vec![11]),
            },
            ..Default::default()
        };
        assert!(matches!(
            config.gear_layout(),
            Err(ConfigError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [drivetrain]
            preset = "compact"
            "#,
        )
        .unwrap();

        assert_eq!(config.drivetrain.preset, "compact");
        assert_eq!(config.rider.mass_kg, 75.0);
        assert!(!config.rider.erg_mode);
    }
}
