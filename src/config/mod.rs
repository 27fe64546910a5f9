//! Runtime settings read from the environment (optionally seeded from `.env`).

use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    Dev,
    Prod,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
    pub bind_addr: String,
    pub run_mode: RunMode,
    /// Served under `/docs` in prod mode.
    pub docs_dir: PathBuf,
    /// Daily rolling `run.log` goes here when set.
    pub log_dir: Option<PathBuf>,
    pub log_format: LogFormat,
    pub api_tokens: Vec<String>,
    pub body_limit_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_url: "sqlite://./datas/default.db".into(),
            max_connections: 30,
            busy_timeout_secs: 5,
            bind_addr: "0.0.0.0:8080".into(),
            run_mode: RunMode::Dev,
            docs_dir: PathBuf::from("./swagger"),
            log_dir: None,
            log_format: LogFormat::Text,
            api_tokens: Vec::new(),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut c = AppConfig::default();
        if let Some(v) = get("DATABASE_URL") {
            c.database_url = v;
        }
        if let Some(v) = get("DB_MAX_CONNECTIONS") {
            c.max_connections = parse("DB_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = get("DB_BUSY_TIMEOUT_SECS") {
            c.busy_timeout_secs = parse("DB_BUSY_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = get("BIND_ADDR") {
            c.bind_addr = v;
        }
        if let Some(v) = get("RUN_MODE") {
            c.run_mode = match v.to_lowercase().as_str() {
                "dev" => RunMode::Dev,
                "prod" => RunMode::Prod,
                _ => return Err(ConfigError::Invalid { key: "RUN_MODE", value: v }),
            };
        }
        if let Some(v) = get("DOCS_DIR") {
            c.docs_dir = PathBuf::from(v);
        }
        c.log_dir = get("LOG_DIR").map(PathBuf::from);
        if let Some(v) = get("LOG_FORMAT") {
            c.log_format = match v.to_lowercase().as_str() {
                "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                _ => return Err(ConfigError::Invalid { key: "LOG_FORMAT", value: v }),
            };
        }
        if let Some(v) = get("API_TOKENS") {
            c.api_tokens = v
                .split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(v) = get("BODY_LIMIT_BYTES") {
            c.body_limit_bytes = parse("BODY_LIMIT_BYTES", v)?;
        }
        if c.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "0".into(),
            });
        }
        Ok(c)
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::Invalid { key, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = from(&[]).unwrap();
        assert_eq!(c.database_url, "sqlite://./datas/default.db");
        assert_eq!(c.max_connections, 30);
        assert_eq!(c.run_mode, RunMode::Dev);
        assert!(c.log_dir.is_none());
        assert!(c.api_tokens.is_empty());
    }

    #[test]
    fn overrides() {
        let c = from(&[
            ("DB_MAX_CONNECTIONS", "4"),
            ("RUN_MODE", "PROD"),
            ("LOG_DIR", "./log"),
            ("LOG_FORMAT", "json"),
            ("API_TOKENS", "a, b,,c"),
        ])
        .unwrap();
        assert_eq!(c.max_connections, 4);
        assert_eq!(c.run_mode, RunMode::Prod);
        assert_eq!(c.log_dir, Some(PathBuf::from("./log")));
        assert_eq!(c.log_format, LogFormat::Json);
        assert_eq!(c.api_tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn invalid_values() {
        assert!(matches!(
            from(&[("DB_MAX_CONNECTIONS", "lots")]),
            Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            from(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            from(&[("RUN_MODE", "staging")]),
            Err(ConfigError::Invalid { key: "RUN_MODE", .. })
        ));
    }
}
