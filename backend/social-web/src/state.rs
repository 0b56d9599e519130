//! Shared application state handed to every handler through `web::Data`.

use std::time::Duration;

use supabase_rest::SupabaseClient;

use crate::config::Config;
use crate::error::Result;
use crate::services::{AuthService, SearchRegistry, TimestampFormatter};

pub struct AppState {
    /// Anonymous client; per-request clients are derived with the session token
    pub client: SupabaseClient,
    pub auth: AuthService,
    pub formatter: TimestampFormatter,
    pub searches: SearchRegistry,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let client = SupabaseClient::new(
            &config.supabase.url,
            &config.supabase.anon_key,
            Duration::from_secs(config.supabase.timeout_secs),
        )?;

        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: SupabaseClient, config: &Config) -> Self {
        Self {
            auth: AuthService::new(client.clone(), config.app.auth_callback_url()),
            client,
            formatter: TimestampFormatter::new(config.display.utc_offset_minutes),
            searches: SearchRegistry::new(
                Duration::from_millis(config.search.debounce_ms),
                config.search.result_limit,
            ),
            cookie_secure: config.app.cookie_secure,
        }
    }
}
