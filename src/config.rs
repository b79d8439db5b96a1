use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where the single access-token slot lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBackend {
    /// `auth_tokens` table in the configured database (survives restarts
    /// when the database is a file).
    Database,
    /// Process memory only.
    Memory,
}

impl FromStr for TokenBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" | "sqlite" => Ok(TokenBackend::Database),
            "memory" | "mem" => Ok(TokenBackend::Memory),
            other => anyhow::bail!("unknown token backend '{}': expected 'database' or 'memory'", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_title: String,
    pub api_version: String,
    pub token_backend: TokenBackend,
    /// Exact origin allowed by CORS, with credentials. `None` allows any origin.
    pub cors_allow_origin: Option<String>,
    /// Plain-text log copy next to the console output. `None` disables it.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Directory and file name for the log file appender.
    pub fn log_file_location(&self) -> Option<(PathBuf, String)> {
        let path = self.log_file.as_deref()?;
        let name = path.file_name()?.to_str()?.to_string();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };
        Some((dir, name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            database_url: "sqlite://carecloud.db?mode=rwc".into(),
            api_title: "Fake CareCloud API".into(),
            api_version: "1.0.0".into(),
            token_backend: TokenBackend::Database,
            cors_allow_origin: None,
            log_file: Some(PathBuf::from("fake_carecloud.log")),
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let defaults = Config::default();

    let token_backend = match std::env::var("FAKE_CARECLOUD_TOKEN_STORE") {
        Ok(raw) => raw.parse()?,
        Err(_) => defaults.token_backend,
    };

    Ok(Config {
        host: std::env::var("FAKE_CARECLOUD_HOST").unwrap_or(defaults.host),
        port: std::env::var("FAKE_CARECLOUD_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port),
        database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
        api_title: std::env::var("API_TITLE").unwrap_or(defaults.api_title),
        api_version: std::env::var("API_VERSION").unwrap_or(defaults.api_version),
        token_backend,
        cors_allow_origin: std::env::var("CORS_ALLOW_ORIGIN")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && v != "*"),
        log_file: match std::env::var("FAKE_CARECLOUD_LOG_FILE") {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(PathBuf::from(raw.trim())),
            Err(_) => defaults.log_file,
        },
    })
}
