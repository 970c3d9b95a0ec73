use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database and log root |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | ENVIRONMENT | development | development, staging or production |
/// | ADMIN_PASSPHRASE | admin123 | Shared admin passphrase |
/// | CHAT_PHONE | 5511958877900 | WhatsApp number receiving orders |
/// | CHAT_BASE_URL | https://wa.me | Chat deep-link provider |
/// | SEED_DEFAULT_MENU | true | Seed the default menu into an empty catalog |
/// | SEED_ITEM_TIMEOUT_MS | 10000 | Per-meal write timeout during seed |
/// | SEED_TIMEOUT_MS | 60000 | Whole seed timeout |
/// | INSIGHT_TIMEOUT_MS | 15000 | Nutrition insight request timeout |
/// | GEMINI_API_KEY | (unset) | Insight disabled (fallback text) when unset |
/// | GEMINI_MODEL | gemini-3-flash-preview | Text generation model |
/// | GEMINI_BASE_URL | https://generativelanguage.googleapis.com | API root |
/// | REDIRECT_DELAY_MS | 1500 | Delay before the QR redirect page navigates |
/// | LOG_LEVEL | info | Default log filter when RUST_LOG is unset |
/// | LOG_DIR | (unset) | Daily rolling log files when set |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | Graceful shutdown budget |
///
/// ```ignore
/// WORK_DIR=/srv/matelli HTTP_PORT=8080 cargo run -p matelli-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: String,
    pub http_port: u16,
    pub environment: String,
    pub admin_passphrase: String,

    // === Chat hand-off ===
    pub chat_phone: String,
    pub chat_base_url: String,

    // === Catalog seed ===
    pub seed_default_menu: bool,
    pub seed_item_timeout_ms: u64,
    pub seed_timeout_ms: u64,

    // === Nutrition insight ===
    pub insight_timeout_ms: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,

    pub redirect_delay_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub shutdown_timeout_ms: u64,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            work_dir: env_or("WORK_DIR", "./data"),
            http_port: env_parse("HTTP_PORT", 3000),
            environment: env_or("ENVIRONMENT", "development"),
            admin_passphrase: env_or("ADMIN_PASSPHRASE", "admin123"),
            chat_phone: env_or("CHAT_PHONE", "5511958877900"),
            chat_base_url: env_or("CHAT_BASE_URL", "https://wa.me"),
            seed_default_menu: env_parse("SEED_DEFAULT_MENU", true),
            seed_item_timeout_ms: env_parse("SEED_ITEM_TIMEOUT_MS", 10_000),
            seed_timeout_ms: env_parse("SEED_TIMEOUT_MS", 60_000),
            insight_timeout_ms: env_parse("INSIGHT_TIMEOUT_MS", 15_000),
            gemini_api_key: env_opt("GEMINI_API_KEY"),
            gemini_model: env_or("GEMINI_MODEL", "gemini-3-flash-preview"),
            gemini_base_url: env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            redirect_delay_ms: env_parse("REDIRECT_DELAY_MS", 1500),
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: env_opt("LOG_DIR"),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10_000),
        }
    }

    /// Override work dir and port, mostly for tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// `<WORK_DIR>/database/matelli.redb`
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir)
            .join("database")
            .join("matelli.redb")
    }

    pub fn seed_item_timeout(&self) -> Duration {
        Duration::from_millis(self.seed_item_timeout_ms)
    }

    pub fn seed_timeout(&self) -> Duration {
        Duration::from_millis(self.seed_timeout_ms)
    }

    pub fn insight_timeout(&self) -> Duration {
        Duration::from_millis(self.insight_timeout_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
