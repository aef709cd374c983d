//! Application configuration.
//!
//! Values are resolved with priority: config.toml > environment (.env is
//! loaded first) > built-in defaults.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Defaults ====================

pub const DEFAULT_DB_PATH: &str = "data/cipherstudio.db";

/// Server address to bind to
pub const DEFAULT_SERVER_ADDR: &str = "0.0.0.0";

/// Server port
pub const DEFAULT_SERVER_PORT: u16 = 5000;

/// Session token lifetime in days
pub const DEFAULT_TOKEN_DAYS: i64 = 30;

/// Longest accepted session token lifetime in days
pub const MAX_TOKEN_DAYS: i64 = 365;

/// Frontend dev server
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

// ==================== config.toml ====================

/// Configuration file structure for config.toml
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    database: Option<DatabaseSection>,
    server: Option<ServerSection>,
    auth: Option<AuthSection>,
    cors: Option<CorsSection>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabaseSection {
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    addr: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct AuthSection {
    token_secret: Option<String>,
    token_days: Option<i64>,
    secure_cookies: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct CorsSection {
    origins: Option<Vec<String>>,
}

// ==================== Resolved configuration ====================

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub server_addr: String,
    pub server_port: u16,
    /// None means no secret was configured
    pub token_secret: Option<String>,
    pub token_days: i64,
    pub secure_cookies: bool,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_PATH),
            server_addr: DEFAULT_SERVER_ADDR.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            token_secret: None,
            token_days: DEFAULT_TOKEN_DAYS,
            secure_cookies: true,
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
        }
    }
}

impl Config {
    /// Load from ./config.toml and the process environment
    pub fn load() -> Self {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let contents = std::fs::read_to_string("config.toml").ok();
        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    pub fn from_sources(toml_contents: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = match toml_contents.map(toml::from_str::<FileConfig>) {
            Some(Ok(file)) => file,
            Some(Err(e)) => {
                tracing::warn!("Ignoring unreadable config.toml: {}", e);
                FileConfig::default()
            }
            None => FileConfig::default(),
        };
        let database = file.database.unwrap_or_default();
        let server = file.server.unwrap_or_default();
        let auth = file.auth.unwrap_or_default();
        let cors = file.cors.unwrap_or_default();
        let defaults = Config::default();

        let database_path = database
            .path
            .or_else(|| env("DATABASE_PATH"))
            .map(PathBuf::from)
            .unwrap_or(defaults.database_path);

        let server_addr = server
            .addr
            .or_else(|| env("SERVER_ADDR"))
            .unwrap_or(defaults.server_addr);

        let server_port = server
            .port
            .or_else(|| parse_env(&env, "PORT"))
            .unwrap_or(defaults.server_port);

        let token_secret = auth
            .token_secret
            .or_else(|| env("TOKEN_SECRET"))
            .filter(|s| !s.is_empty());

        let token_days = auth
            .token_days
            .or_else(|| parse_env(&env, "TOKEN_DAYS"))
            .filter(|days| *days > 0)
            .map(|days| {
                if days > MAX_TOKEN_DAYS {
                    tracing::warn!("token_days {} exceeds {}, clamping", days, MAX_TOKEN_DAYS);
                }
                days.min(MAX_TOKEN_DAYS)
            })
            .unwrap_or(defaults.token_days);

        let secure_cookies = auth
            .secure_cookies
            .or_else(|| parse_env(&env, "SECURE_COOKIES"))
            .unwrap_or(defaults.secure_cookies);

        let cors_origins = cors
            .origins
            .or_else(|| {
                env("CORS_ORIGINS").map(|raw| {
                    raw.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            database_path,
            server_addr,
            server_port,
            token_secret,
            token_days,
            secure_cookies,
            cors_origins,
        }
    }

    /// Get the full server bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_addr, self.server_port)
    }
}

fn parse_env<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
