use std::path::PathBuf;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

/// How user passwords are written to the users collection.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PasswordScheme {
    /// Stored and compared verbatim.
    #[default]
    Plaintext,
    /// Stored as an Argon2 PHC string.
    Argon2,
}

impl std::str::FromStr for PasswordScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plaintext" => Ok(Self::Plaintext),
            "argon2" => Ok(Self::Argon2),
            other => Err(anyhow!("unknown password scheme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_users_file")]
    pub users_file: String,
    #[serde(default = "default_tweets_file")]
    pub tweets_file: String,
    #[serde(default)]
    pub password_scheme: PasswordScheme,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            users_file: default_users_file(),
            tweets_file: default_tweets_file(),
            password_scheme: PasswordScheme::default(),
        }
    }
}

fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_users_file() -> String { "users.json".into() }
fn default_tweets_file() -> String { "tweets.json".into() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_log_format() -> String { "compact".into() }

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load from `CONFIG_PATH`/`config.toml`; when that file does not exist,
    /// fall back to defaults overridden by environment variables.
    pub fn load_and_validate() -> Result<Self> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path).map_err(|e| anyhow!("{path}: {e}"))?
        } else {
            Self::from_env()?
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            cfg.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            cfg.server.port = port.parse().map_err(|e| anyhow!("SERVER_PORT: {e}"))?;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            cfg.server.worker_threads = Some(w);
        }
        if let Ok(dir) = std::env::var("DATA_DIR") {
            cfg.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(scheme) = std::env::var("PASSWORD_SCHEME") {
            cfg.storage.password_scheme = scheme.parse()?;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            cfg.logging.format = format;
        }
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn tweets_path(&self) -> PathBuf {
        self.data_dir.join(&self.tweets_file)
    }

    pub fn validate(&self) -> Result<()> {
        if self.users_file.trim().is_empty() || self.tweets_file.trim().is_empty() {
            return Err(anyhow!("storage.users_file and storage.tweets_file must not be empty"));
        }
        if self.users_file == self.tweets_file {
            return Err(anyhow!("storage.users_file and storage.tweets_file must differ"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_config() -> Result<()> {
        let mut cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000
            worker_threads = 0

            [storage]
            data_dir = "/var/lib/tweets"
            password_scheme = "argon2"

            [logging]
            format = "json"
            "#,
        )?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.storage.password_scheme, PasswordScheme::Argon2);
        assert_eq!(cfg.storage.users_path(), PathBuf::from("/var/lib/tweets/users.json"));
        assert_eq!(cfg.storage.tweets_path(), PathBuf::from("/var/lib/tweets/tweets.json"));
        assert_eq!(cfg.logging.format, "json");
        Ok(())
    }

    #[test]
    fn empty_config_uses_defaults() -> Result<()> {
        let mut cfg = parse("")?;
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.storage.password_scheme, PasswordScheme::Plaintext);
        assert_eq!(cfg.storage.users_path(), PathBuf::from("data/users.json"));
        Ok(())
    }

    #[test]
    fn rejects_port_zero_and_shared_files() {
        let mut cfg = parse("[server]\nhost = \"\"\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = parse("[storage]\nusers_file = \"all.json\"\ntweets_file = \"all.json\"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn password_scheme_from_str() {
        assert_eq!("Argon2".parse::<PasswordScheme>().unwrap(), PasswordScheme::Argon2);
        assert_eq!(" plaintext ".parse::<PasswordScheme>().unwrap(), PasswordScheme::Plaintext);
        assert!("md5".parse::<PasswordScheme>().is_err());
    }
}
