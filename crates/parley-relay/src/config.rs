//! Environment-driven relay configuration.

use parley_gemini::DEFAULT_BASE_URL;

/// Environment variable names
pub mod env {
    pub const API_KEY: &str = "GEMINI_API_KEY";
    pub const PORT: &str = "PARLEY_PORT";
    pub const MODEL: &str = "PARLEY_MODEL";
    pub const MAX_HISTORY_TURNS: &str = "PARLEY_MAX_HISTORY_TURNS";
    pub const PUBLIC_DIR: &str = "PARLEY_PUBLIC_DIR";
    pub const GEMINI_BASE_URL: &str = "PARLEY_GEMINI_BASE_URL";
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub port: u16,
    /// Provider credential; absence surfaces per request, not at startup
    pub api_key: Option<String>,
    pub model: String,
    /// Histories longer than this are trimmed to their most recent turns
    /// before forwarding
    pub max_history_turns: usize,
    pub public_dir: String,
    pub gemini_base_url: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            max_history_turns: 64,
            public_dir: "public".to_string(),
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: read_parsed(env::PORT).unwrap_or(defaults.port),
            api_key: std::env::var(env::API_KEY).ok().filter(|k| !k.is_empty()),
            model: std::env::var(env::MODEL).ok().unwrap_or(defaults.model),
            max_history_turns: read_parsed(env::MAX_HISTORY_TURNS)
                .unwrap_or(defaults.max_history_turns),
            public_dir: std::env::var(env::PUBLIC_DIR)
                .ok()
                .unwrap_or(defaults.public_dir),
            gemini_base_url: std::env::var(env::GEMINI_BASE_URL)
                .ok()
                .unwrap_or(defaults.gemini_base_url),
        }
    }
}

fn read_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
