use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variables read by [`AppConfig`].
///
/// Integer variables that do not parse fall back to their defaults. Ports are
/// `u16`, pool sizes and the Redis DB index `u32`, timeouts `u64` seconds, so
/// negative or out-of-range values fall back as well.
pub const ENV_VARS: &[&str] = &[
    "SERVER_PORT",
    "SERVER_MODE",
    "SERVER_READ_TIMEOUT",
    "SERVER_WRITE_TIMEOUT",
    "SERVER_IDLE_TIMEOUT",
    "DB_HOST",
    "DB_PORT",
    "DB_USER",
    "DB_PASSWORD",
    "DB_NAME",
    "DB_SSL_MODE",
    "DB_MAX_CONNS",
    "DB_MAX_IDLE",
    "REDIS_HOST",
    "REDIS_PORT",
    "REDIS_PASSWORD",
    "REDIS_DB",
    "LLM_PROVIDER",
    "LLM_API_KEY",
    "LLM_MODEL",
    "LLM_BASE_URL",
];

/// Top-level application configuration loaded from `.env` + environment.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub llm: LlmConfig,
}

/// An environment value that could not be parsed and was replaced by its default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedVar {
    pub name: &'static str,
    pub value: String,
}

impl fmt::Display for RejectedVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.name, self.value)
    }
}

impl AppConfig {
    /// Load configuration from the environment, bootstrapping from `.env` if present.
    ///
    /// Malformed integer values fall back to their defaults; they never fail the load.
    /// Negative numbers count as malformed: `REDIS_DB=-1` yields `0`,
    /// `SERVER_READ_TIMEOUT=-5` yields ten seconds.
    pub fn load() -> Result<Self> {
        Self::load_with_report().map(|(config, _)| config)
    }

    /// Same as [`AppConfig::load`], also returning every value that was rejected.
    pub fn load_with_report() -> Result<(Self, Vec<RejectedVar>)> {
        // Missing or unreadable .env is not an error; existing variables are not overridden.
        let _ = dotenvy::dotenv();

        let vars = ENV_VARS
            .iter()
            .filter_map(|name| env::var(name).ok().map(|value| (name.to_string(), value)))
            .collect();

        Self::from_vars(vars)
    }

    /// Load configuration from a key=value file only, ignoring the process environment.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<(Self, Vec<RejectedVar>)> {
        let path = path.as_ref();
        let vars = dotenvy::from_path_iter(path)
            .with_context(|| format!("failed to open env file {:?}", path))?
            .collect::<std::result::Result<config::Map<String, String>, _>>()
            .with_context(|| format!("failed to parse env file {:?}", path))?;

        Self::from_vars(vars)
    }

    /// Build configuration from an explicit set of variables keyed by their upper-case names.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<(Self, Vec<RejectedVar>)> {
        // Every value arrives as a string; typed parsing is lenient and per field.
        let raw: RawEnv = config::Config::builder()
            .add_source(config::Environment::default().source(Some(vars)))
            .build()
            .context("failed to collect environment variables")?
            .try_deserialize()
            .context("failed to read environment variables")?;

        let mut fields = Lenient::default();

        let server = ServerConfig {
            port: fields.int("SERVER_PORT", raw.server_port, 8080),
            mode: text(raw.server_mode, "debug"),
            read_timeout: fields.secs("SERVER_READ_TIMEOUT", raw.server_read_timeout, 10),
            write_timeout: fields.secs("SERVER_WRITE_TIMEOUT", raw.server_write_timeout, 10),
            idle_timeout: fields.secs("SERVER_IDLE_TIMEOUT", raw.server_idle_timeout, 120),
        };

        let database = DatabaseConfig {
            host: text(raw.db_host, "localhost"),
            port: fields.int("DB_PORT", raw.db_port, 5432),
            user: text(raw.db_user, "postgres"),
            password: text(raw.db_password, ""),
            name: text(raw.db_name, "blackswan"),
            ssl_mode: text(raw.db_ssl_mode, "disable"),
            max_conns: fields.int("DB_MAX_CONNS", raw.db_max_conns, 25),
            max_idle: fields.int("DB_MAX_IDLE", raw.db_max_idle, 10),
        };

        let redis = RedisConfig {
            host: text(raw.redis_host, "localhost"),
            port: fields.int("REDIS_PORT", raw.redis_port, 6379),
            password: text(raw.redis_password, ""),
            db: fields.int("REDIS_DB", raw.redis_db, 0),
        };

        let llm = LlmConfig {
            provider: text(raw.llm_provider, "openai"),
            api_key: text(raw.llm_api_key, ""),
            model: text(raw.llm_model, "gpt-4o-mini"),
            base_url: text(raw.llm_base_url, ""),
        };

        let config = Self {
            server,
            database,
            redis,
            llm,
        };

        Ok((config, fields.rejected))
    }

    pub fn is_release(&self) -> bool {
        self.server.mode == "release"
    }

    /// Tracing filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_release() {
            "blackswan=info,tower_http=info"
        } else {
            "blackswan=debug,tower_http=debug"
        }
    }
}

/// Environment as collected by `config::Environment`, which lower-cases keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEnv {
    server_port: Option<String>,
    server_mode: Option<String>,
    server_read_timeout: Option<String>,
    server_write_timeout: Option<String>,
    server_idle_timeout: Option<String>,
    db_host: Option<String>,
    db_port: Option<String>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_name: Option<String>,
    db_ssl_mode: Option<String>,
    db_max_conns: Option<String>,
    db_max_idle: Option<String>,
    redis_host: Option<String>,
    redis_port: Option<String>,
    redis_password: Option<String>,
    redis_db: Option<String>,
    llm_provider: Option<String>,
    llm_api_key: Option<String>,
    llm_model: Option<String>,
    llm_base_url: Option<String>,
}

fn text(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

/// Typed parsing that falls back to the default and remembers what it rejected.
#[derive(Default)]
struct Lenient {
    rejected: Vec<RejectedVar>,
}

impl Lenient {
    fn int<T: FromStr>(&mut self, name: &'static str, value: Option<String>, default: T) -> T {
        let Some(value) = value else {
            return default;
        };

        match value.parse() {
            Ok(parsed) => parsed,
            Err(_) => {
                self.rejected.push(RejectedVar { name, value });
                default
            }
        }
    }

    fn secs(&mut self, name: &'static str, value: Option<String>, default: u64) -> Duration {
        Duration::from_secs(self.int(name, value, default))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub mode: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            mode: "debug".to_string(),
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_conns: u32,
    pub max_idle: u32,
}

impl DatabaseConfig {
    /// PostgreSQL key/value connection string. Values are not escaped.
    pub fn dsn(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode={}",
            self.host, self.port, self.user, self.password, self.name, self.ssl_mode
        )
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            name: "blackswan".to_string(),
            ssl_mode: "disable".to_string(),
            max_conns: 25,
            max_idle: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: String,
    pub db: u32,
}

impl RedisConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6379,
            password: String::new(),
            db: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    pub provider: String,
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl LlmConfig {
    /// Base URL override, `None` when unset or empty.
    pub fn base_url_override(&self) -> Option<&str> {
        let trimmed = self.base_url.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: String::new(),
        }
    }
}
