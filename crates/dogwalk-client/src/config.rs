//! Client configuration resolution.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global settings (`~/.config/dogwalk/settings.json`)
//! 3. Environment variables (`DOGWALK_*`)
//! 4. CLI arguments (highest priority)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use dogwalk_core::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3002/api";

/// How the client obtains bearer tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// `POST /auth/login` on the Dogwalk server itself.
    #[default]
    Local,
    /// A Cognito user pool.
    Cognito {
        region: String,
        user_pool_id: String,
        client_id: String,
    },
}

/// Fully resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API resource root, e.g. `http://localhost:3002/api`.
    pub api_base_url: String,
    pub auth: AuthMode,
    /// Build timestamp of this client, shown by `dogwalk version`.
    pub build_timestamp: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth: AuthMode::Local,
            build_timestamp: None,
        }
    }
}

/// One layer of settings. Every field is optional; later layers win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    /// `local` or `cognito`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognito_user_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognito_client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_timestamp: Option<String>,
}

impl Settings {
    /// Overwrite every field `overlay` sets.
    pub fn merge(&mut self, overlay: Self) {
        fn take(base: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *base = value;
            }
        }
        take(&mut self.api_base_url, overlay.api_base_url);
        take(&mut self.auth_mode, overlay.auth_mode);
        take(&mut self.aws_region, overlay.aws_region);
        take(&mut self.cognito_user_pool_id, overlay.cognito_user_pool_id);
        take(&mut self.cognito_client_id, overlay.cognito_client_id);
        take(&mut self.build_timestamp, overlay.build_timestamp);
    }

    /// Settings from environment variables, read through `var`.
    pub fn from_env_with(var: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| var(name).filter(|v| !v.is_empty());
        Self {
            api_base_url: get("DOGWALK_API_BASE_URL"),
            auth_mode: get("DOGWALK_AUTH_MODE"),
            aws_region: get("DOGWALK_AWS_REGION"),
            cognito_user_pool_id: get("DOGWALK_COGNITO_USER_POOL_ID"),
            cognito_client_id: get("DOGWALK_COGNITO_CLIENT_ID"),
            build_timestamp: get("DOGWALK_BUILD_TIMESTAMP"),
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Turn merged settings into a configuration.
    pub fn resolve(self) -> Result<ClientConfig> {
        let auth = match self.auth_mode.as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("local") => AuthMode::Local,
            Some("cognito") => {
                let require = |value: Option<String>, what: &str| {
                    value.ok_or_else(|| Error::Config(format!("Cognito auth requires {what}")))
                };
                AuthMode::Cognito {
                    region: require(self.aws_region, "DOGWALK_AWS_REGION")?,
                    user_pool_id: require(self.cognito_user_pool_id, "DOGWALK_COGNITO_USER_POOL_ID")?,
                    client_id: require(self.cognito_client_id, "DOGWALK_COGNITO_CLIENT_ID")?,
                }
            }
            Some(other) => {
                return Err(Error::Config(format!(
                    "Unknown auth mode \"{other}\" (expected \"local\" or \"cognito\")"
                )));
            }
        };

        Ok(ClientConfig {
            api_base_url: self
                .api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            auth,
            build_timestamp: self.build_timestamp,
        })
    }
}

/// Global settings file path.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dogwalk").join("settings.json"))
}

/// Resolve configuration: defaults, global file, environment, then `cli`.
pub fn load_config(cli: Settings) -> Result<ClientConfig> {
    let mut settings = Settings::default();

    if let Some(path) = global_config_path() {
        if path.exists() {
            settings.merge(load_settings_file(&path)?);
        }
    }
    settings.merge(Settings::from_env());
    settings.merge(cli);

    settings.resolve()
}

fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}
