//! kj.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KjConfig {
    #[serde(default)]
    pub show: ShowConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowConfig {
    /// Display name of the event, used in log lines only.
    #[serde(default = "default_show_name")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `kj.redb`.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// File name of the queue database inside `store.data_dir`.
pub const DB_FILE_NAME: &str = "kj.redb";

fn default_show_name() -> String {
    "karaoke night".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./kjdata")
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            name: default_show_name(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl KjConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KjConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.is_file() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of the queue database file.
    pub fn db_path(&self) -> PathBuf {
        self.store.data_dir.join(DB_FILE_NAME)
    }

    /// Scaffold a kj.toml for a named show.
    pub fn scaffold(show_name: &str) -> Self {
        KjConfig {
            show: ShowConfig {
                name: show_name.to_string(),
            },
            ..KjConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let config = KjConfig::scaffold("friday-night");
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("friday-night"));
        assert!(toml_str.contains("5000"));
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config: KjConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.db_path(), PathBuf::from("./kjdata/kj.redb"));
    }

    #[test]
    fn test_parse_partial_section() {
        let toml_str = r#"
[server]
port = 8080

[store]
data_dir = "/var/lib/kj"
"#;
        let config: KjConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.db_path(), PathBuf::from("/var/lib/kj/kj.redb"));
        assert_eq!(config.show.name, "karaoke night");
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = KjConfig::load_or_default(&dir.path().join("kj.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_scaffold_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kj.toml");
        std::fs::write(&path, KjConfig::scaffold("open mic").to_toml_string().unwrap()).unwrap();

        let config = KjConfig::from_file(&path).unwrap();
        assert_eq!(config.show.name, "open mic");
    }
}
