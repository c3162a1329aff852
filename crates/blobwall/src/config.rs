use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Errors produced while loading the optional settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Optional settings file. Every field mirrors a CLI flag; the flag wins
/// when both are present.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub size: Option<String>,
    pub fps: Option<f32>,
    pub background: Option<bool>,
    pub opaque: Option<bool>,
    pub antialias: Option<String>,
    pub color_space: Option<String>,
    pub power: Option<String>,
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Default settings path under the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    directories_next::ProjectDirs::from("", "", "blobwall")
        .map(|dirs| dirs.config_dir().join("blobwall.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_settings_file() {
        let settings = Settings::from_toml_str(
            r#"
size = "2560x1440"
fps = 48.0
background = true
antialias = "4"
color_space = "gamma"
power = "high"
"#,
        )
        .unwrap();
        assert_eq!(settings.size.as_deref(), Some("2560x1440"));
        assert_eq!(settings.fps, Some(48.0));
        assert_eq!(settings.background, Some(true));
        assert_eq!(settings.opaque, None);
        assert_eq!(settings.antialias.as_deref(), Some("4"));
        assert_eq!(settings.color_space.as_deref(), Some("gamma"));
        assert_eq!(settings.power.as_deref(), Some("high"));
    }

    #[test]
    fn empty_settings_default_everything() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::from_toml_str("frames = 12").is_err());
    }

    #[test]
    fn loads_settings_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("blobwall.toml");
        fs::write(&path, "fps = 30.0\nopaque = true\n").unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.fps, Some(30.0));
        assert_eq!(settings.opaque, Some(true));

        let missing = Settings::load(&dir.path().join("absent.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
