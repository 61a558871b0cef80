use std::path::PathBuf;

use serde::Deserialize;

/// Prefix shared by every environment variable the server reads.
pub const ENV_PREFIX: &str = "SUGGESTION_";

/// Server configuration, read from `SUGGESTION_*` environment variables.
#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    /// SQLite database file (`SUGGESTION_DB_PATH`)
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
    /// Built single-page app to serve for non-API paths (`SUGGESTION_FRONTEND_DIST_PATH`)
    #[serde(default)]
    pub frontend_dist_path: Option<PathBuf>,
    /// Listen address (`SUGGESTION_BIND_ADDR`)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// Deployment environment (`SUGGESTION_ENV`)
    #[serde(default)]
    pub env: Environment,
    /// Comma separated CORS origins (`SUGGESTION_ALLOWED_ORIGINS`)
    #[serde(default)]
    pub allowed_origins: Option<String>,
    /// Pool size (`SUGGESTION_DB_MAX_CONNECTIONS`)
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("suggestions.db")
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

const fn default_db_max_connections() -> u32 {
    5
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Allowed CORS origins, empty when every origin is accepted.
    pub fn parsed_allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}
