//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::service::relay_service::DEFAULT_MAX_IDLE_ROOMS;

/// Default bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5174";

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:5174`).
    pub listen_addr: SocketAddr,

    /// Base URL clients use to reach this server; uploaded decks are
    /// exposed as `<public_base_url>/files/<name>`. No trailing slash.
    pub public_base_url: String,

    /// Directory uploaded decks are written to and served from.
    pub uploads_dir: PathBuf,

    /// Largest accepted upload body, in bytes.
    pub max_upload_bytes: usize,

    /// Frames buffered per connection before broadcasts skip it.
    pub outbound_buffer: usize,

    /// Timeout for plain HTTP requests, in seconds.
    pub request_timeout_secs: u64,

    /// Timeout for `POST /upload`, in seconds. Kept apart from
    /// `request_timeout_secs` since a full-size deck takes longer to send.
    pub upload_timeout_secs: u64,

    /// Rooms without any member that uploads may leave in memory.
    pub max_idle_rooms: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5174)),
            public_base_url: "http://localhost:5174".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            max_upload_bytes: 50 * 1024 * 1024,
            outbound_buffer: 64,
            request_timeout_secs: 30,
            upload_timeout_secs: 300,
            max_idle_rooms: DEFAULT_MAX_IDLE_ROOMS,
            log_json: false,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
            .parse()?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.public_base_url, |v| {
                v.trim().trim_end_matches('/').to_string()
            });

        let uploads_dir = std::env::var("UPLOADS_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.uploads_dir, PathBuf::from);

        Ok(Self {
            listen_addr,
            public_base_url,
            uploads_dir,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
            outbound_buffer: parse_env("OUTBOUND_BUFFER", defaults.outbound_buffer).max(1),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            upload_timeout_secs: parse_env("UPLOAD_TIMEOUT_SECS", defaults.upload_timeout_secs),
            max_idle_rooms: parse_env("MAX_IDLE_ROOMS", defaults.max_idle_rooms),
            log_json: parse_env_bool("LOG_JSON", defaults.log_json),
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
