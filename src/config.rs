use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub jwt_secret: String,
    /// Newest receipts scanned by search
    pub search_limit: usize,
    pub dashboard_cache_ttl_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("jwt_secret", &"<redacted>")
            .field("search_limit", &self.search_limit)
            .field("dashboard_cache_ttl_secs", &self.dashboard_cache_ttl_secs)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_string(),
            jwt_secret: "secret".to_string(),
            search_limit: 100,
            dashboard_cache_ttl_secs: 300,
        }
    }
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        let defaults = Config::default();

        Self {
            port: parsed("PORT", defaults.port),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            jwt_secret: env::var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            search_limit: parsed("SEARCH_LIMIT", defaults.search_limit),
            dashboard_cache_ttl_secs: parsed("DASHBOARD_CACHE_TTL_SECS", defaults.dashboard_cache_ttl_secs),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
