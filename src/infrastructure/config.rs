use std::env;

/// Request bodies may carry a 16 MiB image plus multipart framing.
const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Empty means any origin
    pub cors_allowed_origins: Vec<String>,
    pub static_dir: String,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://booktrack.db?mode=rwc".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5500),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 5500,
            cors_allowed_origins: Vec::new(),
            static_dir: "public".to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}
