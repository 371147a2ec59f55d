//! Tutorial program configuration.
//!
//! Every tutorial binary accepts an optional JSON config file as its first argument.
//! Missing fields fall back to their defaults, and the `HELLOGL_LOG` environment
//! variable overrides the log level.

use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{abs::ShaderConfig, error::ConfigError};

/// Environment variable overriding [`DemoConfig::log_level`].
pub const LOG_ENV_VAR: &str = "HELLOGL_LOG";

/// Window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title. Each program supplies its own when this is `None`.
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
    /// When set, `width` and `height` are ignored and the desktop resolution is used.
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 800,
            height: 600,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub log_level: LevelFilter,
    /// RGBA color the framebuffer is cleared to every frame.
    pub clear_color: [f32; 4],
    pub shader: ShaderConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            log_level: LevelFilter::Debug,
            clear_color: [0.2, 0.3, 0.3, 1.0],
            shader: ShaderConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Reads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the config of a tutorial program from its command line: the first
    /// argument, if any, names a JSON config file. `HELLOGL_LOG` is applied on top.
    pub fn from_args() -> Result<Self, ConfigError> {
        let mut config = match std::env::args_os().nth(1) {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(level) = std::env::var(LOG_ENV_VAR)
            .ok()
            .and_then(|v| parse_level(&v))
        {
            config.log_level = level;
        }
        Ok(config)
    }
}

/// Parses a level name such as `info` or `TRACE`. Unknown names give `None`.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: DemoConfig =
            serde_json::from_str(r#"{ "window": { "width": 1000, "height": 1000 } }"#).unwrap();
        assert_eq!(config.window.width, 1000);
        assert_eq!(config.window.height, 1000);
        assert!(!config.window.fullscreen);
        assert_eq!(config.window.title_or("hello_shaders"), "hello_shaders");
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.shader.info_log_capacity, crate::abs::INFO_LOG_CAPACITY);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.json");
        std::fs::write(
            &path,
            r#"{
                "window": { "title": "Square" },
                "log_level": "WARN",
                "clear_color": [0.0, 0.0, 0.0, 1.0],
                "shader": { "info_log_capacity": 64 }
            }"#,
        )
        .unwrap();

        let config = DemoConfig::load(&path).unwrap();
        assert_eq!(config.window.title_or("fallback"), "Square");
        assert_eq!(config.window.width, 800);
        assert_eq!(config.log_level, LevelFilter::Warn);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.shader.info_log_capacity, 64);
    }

    #[test]
    fn test_bad_files_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            DemoConfig::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ window: ").unwrap();
        assert!(matches!(
            DemoConfig::load(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("info"), Some(LevelFilter::Info));
        assert_eq!(parse_level(" TRACE "), Some(LevelFilter::Trace));
        assert_eq!(parse_level("loud"), None);
    }
}
