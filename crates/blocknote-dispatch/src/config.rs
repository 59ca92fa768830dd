//! TOML configuration shared by the CLI and the server.
//!
//! Loaded from an explicit path, else `$XDG_CONFIG_HOME/blocknote/config.toml`,
//! else defaults. Every field is optional.
//!
//! ```toml
//! [client]
//! endpoint = "http://127.0.0.1:3000"
//! timeout_secs = 30
//!
//! [server]
//! listen = "127.0.0.1:3000"
//!
//! [gemini]
//! api_key_env = "GEMINI_API_KEY"
//! model = "gemini-1.5-flash"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Errors from reading a config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlocknoteConfig {
    pub client: ClientConfig,
    pub server: ServerConfig,
    pub gemini: GeminiConfig,
}

impl BlocknoteConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("blocknote").join("config.toml"))
    }

    /// Load from `path` if given, else from [`default_path`] if that file
    /// exists, else defaults. An explicit path that doesn't exist is an error.
    ///
    /// [`default_path`]: Self::default_path
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read and parse one file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Settings for the prompt and summarize clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the server; `/api/generate` is appended.
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:3000".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Settings for `blocknote serve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Settings for the Gemini backend behind the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key inline. Takes precedence over `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-1.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
        }
    }
}

impl GeminiConfig {
    /// Resolve API key from config or environment. Blank keys count as unset.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.trim().is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BlocknoteConfig::default();
        assert_eq!(config.client.endpoint, "http://127.0.0.1:3000");
        assert_eq!(config.server.listen, "127.0.0.1:3000");
        assert_eq!(config.gemini.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.gemini.model, "gemini-1.5-flash");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nendpoint = \"http://notes.local:8080\"").unwrap();

        let config = BlocknoteConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.client.endpoint, "http://notes.local:8080");
        assert_eq!(config.client.timeout_secs, 30);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = BlocknoteConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client\nendpoint = ").unwrap();
        let err = BlocknoteConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_inline_api_key_wins() {
        let gemini = GeminiConfig {
            api_key: Some("inline".into()),
            api_key_env: "BLOCKNOTE_TEST_UNSET_KEY_VAR".into(),
            ..Default::default()
        };
        assert_eq!(gemini.resolve_api_key().as_deref(), Some("inline"));
    }

    #[test]
    fn test_unset_env_resolves_none() {
        let gemini = GeminiConfig {
            api_key: Some("  ".into()),
            api_key_env: "BLOCKNOTE_TEST_UNSET_KEY_VAR".into(),
            ..Default::default()
        };
        assert_eq!(gemini.resolve_api_key(), None);
    }
}
