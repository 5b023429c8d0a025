//! Client configuration.
//!
//! Read from `$MINITEST_CONFIG`, or `config.toml` in the platform config
//! directory. A missing file is not an error: every field has a default.
//! `MINITEST_BASE_URL` and `MINITEST_SESSION_FILE` override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV: &str = "MINITEST_CONFIG";
pub const BASE_URL_ENV: &str = "MINITEST_BASE_URL";
pub const SESSION_FILE_ENV: &str = "MINITEST_SESSION_FILE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

/// Where the three remote operations live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub base_url: String,
    pub redeem_path: String,
    pub questions_path: String,
    pub answer_path: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gn50.aixstudio.kr/minitest/".into(),
            redeem_path: "minitest_surveyTokens.php".into(),
            questions_path: "minitest_detail_list.php".into(),
            answer_path: "minitest_answer.php".into(),
        }
    }
}

impl EndpointConfig {
    /// Point every endpoint at a different base URL, keeping the paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn redeem_url(&self) -> String {
        self.url_for(&self.redeem_path)
    }

    pub fn questions_url(&self) -> String {
        self.url_for(&self.questions_path)
    }

    pub fn answer_url(&self) -> String {
        self.url_for(&self.answer_path)
    }

    /// Join a path onto the base URL. Absolute URLs are used as given.
    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means a request may stay pending forever.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Session file. Unset means `session.json` in the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
}

impl ClientConfig {
    /// Load from the default location and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Apply `MINITEST_*` environment overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.endpoints.base_url = url;
        }
        if let Some(file) = lookup(SESSION_FILE_ENV).filter(|v| !v.trim().is_empty()) {
            self.storage.session_file = Some(PathBuf::from(file));
        }
    }

    /// Resolve the session file path.
    pub fn session_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.storage.session_file {
            return Ok(path.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join("session.json"))
            .context("Could not determine a data directory for the session file")
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("kr", "aixstudio", "minitest")
}

/// `config.toml` in the platform config directory.
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_minitest_service() {
        let config = ClientConfig::default();
        assert_eq!(
            config.endpoints.redeem_url(),
            "https://gn50.aixstudio.kr/minitest/minitest_surveyTokens.php"
        );
        assert_eq!(
            config.endpoints.questions_url(),
            "https://gn50.aixstudio.kr/minitest/minitest_detail_list.php"
        );
        assert_eq!(
            config.endpoints.answer_url(),
            "https://gn50.aixstudio.kr/minitest/minitest_answer.php"
        );
        assert_eq!(config.http.timeout(), None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            [endpoints]
            base_url = "http://localhost:8080"

            [http]
            timeout_secs = 10
            "#,
        )
        .unwrap();

        assert_eq!(
            config.endpoints.answer_url(),
            "http://localhost:8080/minitest_answer.php"
        );
        assert_eq!(config.http.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn absolute_paths_are_used_as_given() {
        let endpoints = EndpointConfig {
            answer_path: "https://other.example/answer".into(),
            ..EndpointConfig::default()
        };
        assert_eq!(endpoints.answer_url(), "https://other.example/answer");
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|key| match key {
            BASE_URL_ENV => Some("http://127.0.0.1:9000/".into()),
            SESSION_FILE_ENV => Some("/tmp/minitest.json".into()),
            _ => None,
        });

        assert_eq!(
            config.endpoints.redeem_url(),
            "http://127.0.0.1:9000/minitest_surveyTokens.php"
        );
        assert_eq!(
            config.session_file().unwrap(),
            PathBuf::from("/tmp/minitest.json")
        );
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut config = ClientConfig::default();
        config.apply_overrides(|_| Some("  ".into()));
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = ClientConfig {
            http: HttpConfig {
                timeout_secs: Some(5),
            },
            ..ClientConfig::default()
        };
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(ClientConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn unreadable_file_names_the_path() {
        let err = ClientConfig::load_from(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
