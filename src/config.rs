use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::hydration::tracker::{DEFAULT_CUP_ML, DEFAULT_GOAL_ML};
use crate::hydration::FALLBACK_INTERVAL_MINUTES;
use crate::logging::LogConfig;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// General application settings
    pub settings: AppSettings,

    /// Hydration reminder settings
    pub hydration: HydrationSettings,

    /// Logging settings
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Data directory path (plan database lives here)
    pub data_dir: PathBuf,

    /// Default training days per week when a plan does not say
    pub default_days_per_week: Option<u8>,
}

/// Hydration reminder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydrationSettings {
    /// Daily intake goal in milliliters
    pub daily_goal_ml: u32,

    /// Typical workout intensity (light, moderate, intense)
    pub workout_intensity: String,

    /// Reminder interval override in minutes; the model's inferred interval
    /// is used when unset
    pub reminder_interval_minutes: Option<u32>,

    /// Cup size for cup arithmetic, in milliliters
    pub cup_size_ml: u32,

    /// Whether reminder checks are enabled
    pub reminders_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            settings: AppSettings::default(),
            hydration: HydrationSettings::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            data_dir: PathBuf::from("./data"),
            default_days_per_week: None,
        }
    }
}

impl Default for HydrationSettings {
    fn default() -> Self {
        HydrationSettings {
            daily_goal_ml: DEFAULT_GOAL_ML,
            workout_intensity: "moderate".to_string(),
            reminder_interval_minutes: None,
            cup_size_ml: DEFAULT_CUP_ML,
            reminders_enabled: false,
        }
    }
}

impl HydrationSettings {
    /// Reminder interval to use when the model is unavailable
    pub fn interval_or_fallback(&self) -> u32 {
        self.reminder_interval_minutes
            .unwrap_or(FALLBACK_INTERVAL_MINUTES)
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        // Update modification timestamp
        self.metadata.updated_at = Utc::now();

        // Create directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coachrs")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to default location
    pub fn save_default(&mut self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to_file(config_path)
    }

    /// Path of the plan database inside the data directory
    pub fn database_path(&self) -> PathBuf {
        self.settings.data_dir.join("coachrs.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.metadata.version, deserialized.metadata.version);
        assert_eq!(
            config.hydration.daily_goal_ml,
            deserialized.hydration.daily_goal_ml
        );
    }

    #[test]
    fn test_hydration_defaults() {
        let settings = HydrationSettings::default();
        assert_eq!(settings.daily_goal_ml, 2500);
        assert_eq!(settings.cup_size_ml, 250);
        assert_eq!(settings.workout_intensity, "moderate");
        assert_eq!(settings.interval_or_fallback(), 45);
        assert!(!settings.reminders_enabled);
    }

    #[test]
    fn test_interval_override_wins() {
        let settings = HydrationSettings {
            reminder_interval_minutes: Some(30),
            ..HydrationSettings::default()
        };
        assert_eq!(settings.interval_or_fallback(), 30);
    }

    #[test]
    fn test_config_file_io() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let mut original_config = AppConfig::default();
        original_config.hydration.daily_goal_ml = 3000;
        original_config.settings.default_days_per_week = Some(4);

        // Save and reload
        original_config.save_to_file(&config_path).unwrap();
        let loaded_config = AppConfig::load_from_file(&config_path).unwrap();

        assert_eq!(loaded_config.hydration.daily_goal_ml, 3000);
        assert_eq!(loaded_config.settings.default_days_per_week, Some(4));
    }

    #[test]
    fn test_database_path_under_data_dir() {
        let mut config = AppConfig::default();
        config.settings.data_dir = PathBuf::from("/tmp/coach-data");
        assert_eq!(
            config.database_path(),
            PathBuf::from("/tmp/coach-data/coachrs.db")
        );
    }
}
