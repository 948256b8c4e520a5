use super::Result;
use crate::error::StorageError;
use crate::utils::logging::log_warning;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable overriding the stored base URL.
pub const ENV_BASE_URL: &str = "OSTICKET_BASE_URL";
/// Environment variable overriding the stored API key.
pub const ENV_API_KEY: &str = "OSTICKET_API_KEY";

/// Persisted CLI configuration.
///
/// Effective values are resolved per field: a non-empty environment variable
/// wins, otherwise the stored value. Resolution happens on every accessor
/// call; nothing is cached. The two fields are never merged across sources.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
}

/// Where a resolved value came from, for `config show`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    Env(&'static str),
    File,
    Unset,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::Env(var) => write!(f, "env:{}", var),
            ValueSource::File => write!(f, "config"),
            ValueSource::Unset => write!(f, "not set"),
        }
    }
}

impl Config {
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        // Bootstrap the config directory up front; failing is a warning,
        // not a reason to refuse read-only operation.
        if let Some(parent) = config_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log_warning(&format!(
                    "could not create config directory {}: {}",
                    parent.display(),
                    e
                ));
            }
        }

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| StorageError::Parse {
            path: config_path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Writes the config atomically: serialize, write a `.tmp` sibling,
    /// rename into place. Every `set`/`clear` rewrites the whole file.
    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path()?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string_pretty(self).map_err(|e| StorageError::Parse {
            path: config_path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;

        let tmp_path = config_path.with_extension("toml.tmp");
        fs::write(&tmp_path, toml_content).map_err(|source| StorageError::FileIo {
            path: tmp_path.to_string_lossy().to_string(),
            source,
        })?;
        fs::rename(&tmp_path, &config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        Ok(())
    }

    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(StorageError::DirUnavailable)?;
        Ok(config_dir.join("osticket-cli").join("config.toml"))
    }

    /// Effective base URL: `OSTICKET_BASE_URL` if non-empty, else the stored
    /// value (which may itself be empty).
    pub fn base_url(&self) -> String {
        resolve(env_value(ENV_BASE_URL), &self.base_url)
    }

    /// Effective API key: `OSTICKET_API_KEY` if non-empty, else the stored
    /// value.
    pub fn api_key(&self) -> String {
        resolve(env_value(ENV_API_KEY), &self.api_key)
    }

    /// True iff both effective values are non-empty.
    pub fn is_configured(&self) -> bool {
        !self.base_url().is_empty() && !self.api_key().is_empty()
    }

    pub fn base_url_source(&self) -> ValueSource {
        source(env_value(ENV_BASE_URL), &self.base_url, ENV_BASE_URL)
    }

    pub fn api_key_source(&self) -> ValueSource {
        source(env_value(ENV_API_KEY), &self.api_key, ENV_API_KEY)
    }

    pub fn clear(&mut self) {
        self.base_url.clear();
        self.api_key.clear();
    }
}

fn env_value(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.is_empty())
}

fn resolve(env_value: Option<String>, stored: &str) -> String {
    match env_value {
        Some(v) => v,
        None => stored.to_string(),
    }
}

fn source(env_value: Option<String>, stored: &str, var: &'static str) -> ValueSource {
    if env_value.is_some() {
        ValueSource::Env(var)
    } else if !stored.is_empty() {
        ValueSource::File
    } else {
        ValueSource::Unset
    }
}

/// Masks an API key for display: long keys keep the first 8 and last 4
/// characters, anything else is shown as-is (matching the upstream CLI).
/// Counts characters, not bytes; keys are user input and need not be ASCII.
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 12 {
        let head: String = chars[..8].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default_is_empty() {
        let config = Config::default();
        assert_eq!(config.base_url, "");
        assert_eq!(config.api_key, "");
        assert!(!config.is_configured());
    }

    #[test]
    fn test_resolve_prefers_env() {
        assert_eq!(
            resolve(Some("https://y".to_string()), "https://x"),
            "https://y"
        );
        assert_eq!(resolve(None, "https://x"), "https://x");
        assert_eq!(resolve(None, ""), "");
    }

    #[test]
    fn test_source_reporting() {
        assert_eq!(
            source(Some("v".to_string()), "stored", ENV_BASE_URL),
            ValueSource::Env(ENV_BASE_URL)
        );
        assert_eq!(source(None, "stored", ENV_BASE_URL), ValueSource::File);
        assert_eq!(source(None, "", ENV_BASE_URL), ValueSource::Unset);
        assert_eq!(
            format!("{}", ValueSource::Env(ENV_API_KEY)),
            "env:OSTICKET_API_KEY"
        );
    }

    #[test]
    fn test_is_configured_requires_both_fields() {
        // Resolution falls back to stored values when the env vars are
        // absent; fields are checked independently.
        let config = Config {
            base_url: "https://helpdesk.example.com".to_string(),
            api_key: String::new(),
        };
        assert!(!config.is_configured());

        let config = Config {
            base_url: String::new(),
            api_key: "ABCDEF0123456789".to_string(),
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_config_load_save_round_trip() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            base_url: "https://helpdesk.example.com/api/http.php".to_string(),
            api_key: "ABCDEF0123456789".to_string(),
        };

        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        let loaded = Config::load(Some(config_path)).expect("Failed to load config");
        assert_eq!(loaded.base_url, config.base_url);
        assert_eq!(loaded.api_key, config.api_key);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");

        let config = Config::default();
        config
            .save(Some(config_path.clone()))
            .expect("Failed to save config");

        assert!(config_path.exists());
        assert!(!config_path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_load_missing_file_yields_default() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nope").join("config.toml");

        let config = Config::load(Some(config_path)).expect("Failed to load default config");
        assert_eq!(config.base_url, "");
        assert_eq!(config.api_key, "");
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "base_url = [not toml").expect("write failed");

        let err = Config::load(Some(config_path)).unwrap_err();
        assert!(matches!(err, StorageError::Parse { .. }));
    }

    #[test]
    fn test_clear_blanks_both_fields() {
        let mut config = Config {
            base_url: "https://helpdesk.example.com".to_string(),
            api_key: "ABCDEF0123456789".to_string(),
        };
        config.clear();
        assert_eq!(config.base_url, "");
        assert_eq!(config.api_key, "");
    }

    #[test]
    fn test_mask_api_key() {
        assert_eq!(mask_api_key("short"), "short");
        assert_eq!(
            mask_api_key("ABCDEF0123456789XYZW"),
            "ABCDEF01...XYZW"
        );
    }

    #[test]
    fn test_mask_api_key_multibyte() {
        // Char boundaries must not be assumed at byte offsets 8 and len-4.
        assert_eq!(mask_api_key("1234567édeadbeef"), "1234567é...beef");
        assert_eq!(mask_api_key("ééééééééééééé"), "éééééééé...éééé");
        assert_eq!(mask_api_key("éééééééééééé"), "éééééééééééé");
    }
}
