use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::command::Color;
use crate::error::ConfigError;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 600;
pub const DEFAULT_TITLE: &str = "mainwindow";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerPreference {
    #[default]
    Low,
    High,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(preference: PowerPreference) -> Self {
        match preference {
            PowerPreference::Low => wgpu::PowerPreference::LowPower,
            PowerPreference::High => wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// 窗口参数，缺省字段取默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub visible: bool,
    pub vsync: bool,
    pub clear_color: Color,
    pub icon: Option<PathBuf>,
    pub power_preference: PowerPreference,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            resizable: true,
            visible: true,
            vsync: true,
            clear_color: Color::BLACK,
            icon: None,
            power_preference: PowerPreference::default(),
        }
    }
}

impl WindowConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file: "mainwindow.log".to_string(),
        }
    }
}

/// 演示程序配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = WindowConfig::from_toml_str("").unwrap();
        assert_eq!(config, WindowConfig::default());
        assert_eq!((config.width, config.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert!(config.vsync);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = WindowConfig::from_toml_str(
            r#"
            title = "demo"
            width = 320
            vsync = false
            clear_color = { r = 0.5, g = 0.25, b = 0.0, a = 1.0 }
            power_preference = "high"
            "#,
        )
        .unwrap();

        assert_eq!(config.title, "demo");
        assert_eq!(config.width, 320);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert!(!config.vsync);
        assert_eq!(config.clear_color, Color::new(0.5, 0.25, 0.0, 1.0));
        assert_eq!(config.power_preference, PowerPreference::High);
        assert_eq!(
            wgpu::PowerPreference::from(config.power_preference),
            wgpu::PowerPreference::HighPerformance
        );
    }

    #[test]
    fn wrong_type_is_a_parse_error() {
        let err = WindowConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = WindowConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn app_config_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [window]
            height = 240

            [log]
            file = "run.log"
            "#,
        )
        .unwrap();
        assert_eq!(config.window.height, 240);
        assert_eq!(config.window.width, DEFAULT_WIDTH);
        assert_eq!(config.log.file, "run.log");
        assert_eq!(config.log.directory, PathBuf::from("."));
    }

    #[test]
    fn app_config_errors_match_window_config() {
        let err = AppConfig::from_toml_str("[window]\nwidth = -1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = AppConfig::load("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert_eq!(AppConfig::from_toml_str("").unwrap(), AppConfig::default());
    }

    #[test]
    fn builders() {
        let config = WindowConfig::default().with_size(1, 2).with_title("t");
        assert_eq!((config.width, config.height), (1, 2));
        assert_eq!(config.title, "t");
    }
}
