/// Configuration management for the social web backend
///
/// Loads configuration from environment variables.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Hosted backend configuration
    pub supabase: SupabaseConfig,
    /// Presentation settings
    pub display: DisplayConfig,
    /// Profile search settings
    pub search: SearchConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Public origin of the site, used for the email callback link
    pub site_url: String,
    /// Comma-separated list of allowed origins
    pub cors_allowed_origins: String,
    /// Mark session cookies `Secure`
    pub cookie_secure: bool,
}

/// Hosted backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project URL
    pub url: String,
    /// Public anon key
    pub anon_key: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Offset from UTC used when formatting timestamps
    pub utc_offset_minutes: i32,
}

/// Profile search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a keystroke turns into a query
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of profiles returned
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

// Default values
fn default_timeout_secs() -> u64 {
    30
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_result_limit() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            result_limit: default_result_limit(),
        }
    }
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        matches!(self.env.as_str(), "development" | "dev" | "local" | "test")
    }

    /// Where the confirmation email sends a new user
    pub fn auth_callback_url(&self) -> String {
        format!("{}/auth/callback", self.site_url.trim_end_matches('/'))
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let development = matches!(env.as_str(), "development" | "dev" | "local" | "test");

        let app = AppConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            site_url: std::env::var("SITE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(!development),
            env,
        };

        let supabase = SupabaseConfig {
            url: std::env::var("SUPABASE_URL")
                .context("SUPABASE_URL environment variable not set")?,
            anon_key: std::env::var("SUPABASE_ANON_KEY")
                .context("SUPABASE_ANON_KEY environment variable not set")?,
            timeout_secs: std::env::var("SUPABASE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_timeout_secs),
        };

        let display = DisplayConfig {
            utc_offset_minutes: std::env::var("DISPLAY_UTC_OFFSET_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|m: &i32| m.abs() < 24 * 60)
                .unwrap_or(0),
        };

        let search = SearchConfig {
            debounce_ms: std::env::var("SEARCH_DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_debounce_ms),
            result_limit: std::env::var("SEARCH_RESULT_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or_else(default_result_limit),
        };

        Ok(Config {
            app,
            supabase,
            display,
            search,
        })
    }
}
