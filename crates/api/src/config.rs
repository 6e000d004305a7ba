use std::fmt;
use std::path::PathBuf;

use fantrax_core::schedule::{PostingSchedule, DEFAULT_TIME, DEFAULT_TIMEZONE, DEFAULT_WEEKDAYS};

/// Used when `ADMIN_PASSWORD` is unset. Startup logs a warning.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Bot credentials. Both parts must be present for posting to be enabled.
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    /// `None` disables posting entirely.
    pub telegram: Option<TelegramConfig>,
    /// Shared code submitters must know.
    pub access_code: String,
    pub admin_password: String,
    pub schedule: PostingSchedule,
    /// Directory holding `index.html` and the form assets.
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("telegram", &self.telegram)
            .field("schedule", &self.schedule.to_string())
            .field("static_dir", &self.static_dir)
            .field("log_format", &self.log_format)
            .finish_non_exhaustive()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                            |
    /// | `PORT`                 | `8000`                               |
    /// | `CORS_ORIGINS`         | `http://localhost:8000`              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                 |
    /// | `DATABASE_URL`         | `postgres://localhost/indie_fantrax` |
    /// | `TELEGRAM_BOT_TOKEN`   | unset (posting disabled)             |
    /// | `TELEGRAM_CHAT_ID`     | unset (posting disabled)             |
    /// | `ACCESS_CODE`          | `music123`                           |
    /// | `ADMIN_PASSWORD`       | `admin`                              |
    /// | `TIMEZONE`             | `Europe/London`                      |
    /// | `POST_WEEKDAYS`        | `mon,wed,fri`                        |
    /// | `POST_TIME`            | `07:00`                              |
    /// | `STATIC_DIR`           | `static`                             |
    /// | `LOG_FORMAT`           | `text` (`json` for JSON lines)       |
    ///
    /// Panics on invalid values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        // Empty values count as unset.
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let host = var_or("HOST", "0.0.0.0");

        let port: u16 = var_or("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = var_or("CORS_ORIGINS", "http://localhost:8000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = var_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let database_url = var_or("DATABASE_URL", "postgres://localhost/indie_fantrax");

        let telegram = match (var("TELEGRAM_BOT_TOKEN"), var("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        let schedule = PostingSchedule::parse(
            &var_or("POST_WEEKDAYS", DEFAULT_WEEKDAYS),
            &var_or("POST_TIME", DEFAULT_TIME),
            &var_or("TIMEZONE", DEFAULT_TIMEZONE),
        )
        .unwrap_or_else(|e| panic!("Invalid posting schedule: {e}"));

        let log_format = match var_or("LOG_FORMAT", "text").to_ascii_lowercase().as_str() {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => panic!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            telegram,
            access_code: var_or("ACCESS_CODE", "music123"),
            admin_password: var_or("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            schedule,
            static_dir: PathBuf::from(var_or("STATIC_DIR", "static")),
            log_format,
        }
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
