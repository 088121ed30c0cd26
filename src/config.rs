//! Runtime settings.
//!
//! Built-in defaults, overridden by an optional JSON settings file, then by
//! command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DATA_FILE: &str = "duke.txt";
pub const DEFAULT_SETTINGS_FILE: &str = "settings.json";

/// Values read from the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub data_file: Option<PathBuf>,
    pub color: Option<bool>,
    pub banner: Option<bool>,
}

impl SettingsFile {
    /// Load a settings file. A missing file yields the empty settings.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_file: PathBuf,
    pub color: bool,
    pub banner: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_file: Path::new(DEFAULT_DATA_DIR).join(DEFAULT_DATA_FILE),
            color: true,
            banner: true,
        }
    }
}

/// Overrides taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_file: Option<PathBuf>,
    pub no_color: bool,
    pub quiet: bool,
}

impl Settings {
    /// Layer the settings file and the command-line overrides on the defaults.
    pub fn resolve(file: SettingsFile, overrides: Overrides) -> Self {
        let defaults = Settings::default();
        Settings {
            data_file: overrides
                .data_file
                .or(file.data_file)
                .unwrap_or(defaults.data_file),
            color: !overrides.no_color && file.color.unwrap_or(defaults.color),
            banner: !overrides.quiet && file.banner.unwrap_or(defaults.banner),
        }
    }
}

/// Settings file consulted when `--config` is not given.
pub fn default_settings_path() -> PathBuf {
    Path::new(DEFAULT_DATA_DIR).join(DEFAULT_SETTINGS_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_point_at_data_dir() {
        let settings = Settings::resolve(SettingsFile::default(), Overrides::default());
        assert_eq!(settings.data_file, PathBuf::from("data").join("duke.txt"));
        assert!(settings.color);
        assert!(settings.banner);
    }

    #[test]
    fn flags_override_file() {
        let file = SettingsFile {
            data_file: Some(PathBuf::from("from-file.txt")),
            color: Some(true),
            banner: Some(true),
        };
        let overrides = Overrides {
            data_file: Some(PathBuf::from("from-flag.txt")),
            no_color: true,
            quiet: true,
        };
        let settings = Settings::resolve(file, overrides);
        assert_eq!(settings.data_file, PathBuf::from("from-flag.txt"));
        assert!(!settings.color);
        assert!(!settings.banner);
    }

    #[test]
    fn load_reads_partial_json() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("settings.json");
        fs::write(&path, r#"{ "color": false }"#).unwrap();
        let file = SettingsFile::load(&path).unwrap();
        assert_eq!(file.color, Some(false));
        assert_eq!(file.data_file, None);
    }

    #[test]
    fn load_missing_is_empty_and_bad_json_fails() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("settings.json");
        assert_eq!(SettingsFile::load(&path).unwrap(), SettingsFile::default());

        fs::write(&path, r#"{ "colour": false }"#).unwrap();
        assert!(matches!(
            SettingsFile::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
