//! User configuration – reads/writes `~/.rah/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use rah_dataset::{LogFormat, DEFAULT_NAME};
use serde::{Deserialize, Serialize};

pub const ROOT_ENV: &str = "RAH_DATASET_ROOT";
pub const NAME_ENV: &str = "RAH_DATASET_NAME";

/// Persisted user configuration stored in `~/.rah/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the unit folders.
    #[serde(default = "default_root")]
    pub dataset_root: PathBuf,

    /// Label printed above the unit catalog.
    #[serde(default = "default_name")]
    pub dataset_name: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset_root: default_root(),
            dataset_name: default_name(),
            log_format: LogFormat::default(),
        }
    }
}

/// Return the path to `~/.rah/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".rah").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

pub(crate) fn load_from(path: &Path) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    Ok(Some(cfg))
}

/// Effective configuration: file (or defaults), then `RAH_*` variables.
pub fn resolve() -> Result<Config, String> {
    let mut cfg = load()?.unwrap_or_default();
    apply_env_overrides(&mut cfg);
    Ok(cfg)
}

/// Apply `RAH_*` environment variable overrides to `cfg`.
///
/// | Variable | Config field |
/// |---|---|
/// | `RAH_DATASET_ROOT` | `dataset_root` |
/// | `RAH_DATASET_NAME` | `dataset_name` |
pub fn apply_env_overrides(cfg: &mut Config) {
    apply_overrides_from(cfg, |key| std::env::var(key).ok());
}

pub(crate) fn apply_overrides_from(cfg: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup(ROOT_ENV).filter(|v| !v.is_empty()) {
        cfg.dataset_root = PathBuf::from(v);
    }
    if let Some(v) = lookup(NAME_ENV).filter(|v| !v.is_empty()) {
        cfg.dataset_name = v;
    }
}

/// Save the config to disk, creating `~/.rah/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

pub(crate) fn save_to(cfg: &Config, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let raw = toml::to_string_pretty(cfg)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        save_to(&Config::default(), &path).expect("save");

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.dataset_root, PathBuf::from("."));
        assert_eq!(loaded.dataset_name, "MyRobot@Home");
        assert_eq!(loaded.log_format, LogFormat::Compact);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "log_format = \"json\"\n").unwrap();
        let cfg = load_from(&path).unwrap().unwrap();
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.dataset_name, DEFAULT_NAME);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "dataset_root = [").unwrap();
        assert!(load_from(&path).unwrap_err().starts_with("Failed to parse config"));
    }

    #[test]
    fn config_path_points_to_rah_dir() {
        let p = config_path_for_home("/home/testuser");
        assert_eq!(p, PathBuf::from("/home/testuser/.rah/config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        assert!(load_from(&path).expect("no error").is_none());
    }

    #[test]
    fn env_overrides_replace_root_and_name() {
        let mut cfg = Config::default();
        apply_overrides_from(&mut cfg, |key| match key {
            ROOT_ENV => Some("/data/rah".into()),
            NAME_ENV => Some("Lab".into()),
            _ => None,
        });
        assert_eq!(cfg.dataset_root, PathBuf::from("/data/rah"));
        assert_eq!(cfg.dataset_name, "Lab");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut cfg = Config::default();
        apply_overrides_from(&mut cfg, |_| Some(String::new()));
        assert_eq!(cfg, Config::default());
    }
}
