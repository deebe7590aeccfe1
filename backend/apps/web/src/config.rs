//! Server Configuration
//!
//! Read once at startup from the environment (and `.env`, loaded by `main`).

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use auth::application::config::{DEFAULT_SESSION_TTL, random_secret};
use platform::crypto::from_base64;

/// Listen address when `ADDR` is unset
pub const DEFAULT_ADDR: &str = "0.0.0.0:4000";

/// Directory holding `html/` and `static/` when `UI_DIR` is unset
pub const DEFAULT_UI_DIR: &str = "./ui";

/// Longest accepted `SESSION_TTL_HOURS`, one leap year
pub const MAX_SESSION_TTL_HOURS: u64 = 366 * 24;

#[derive(Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub database_url: String,
    pub session_secret: [u8; 32],
    pub cookie_secure: bool,
    pub session_ttl: Duration,
    pub ui_dir: PathBuf,
}

impl fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebConfig")
            .field("addr", &self.addr)
            .field("database_url", &"[REDACTED]")
            .field("session_secret", &"[REDACTED]")
            .field("cookie_secure", &self.cookie_secure)
            .field("session_ttl", &self.session_ttl)
            .field("ui_dir", &self.ui_dir)
            .finish()
    }
}

impl WebConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`.
    ///
    /// `SESSION_SECRET` may only be omitted in debug builds, where a random
    /// secret is generated (sessions then do not survive a restart).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr: SocketAddr = lookup("ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()
            .context("ADDR must be a socket address such as 0.0.0.0:4000")?;

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let session_secret = match lookup("SESSION_SECRET") {
            Some(encoded) => decode_secret(&encoded)?,
            None if cfg!(debug_assertions) => {
                tracing::warn!("SESSION_SECRET not set, using a random secret");
                random_secret()
            }
            None => bail!("SESSION_SECRET must be set in production"),
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => parse_bool(&value).context("COOKIE_SECURE must be true or false")?,
            None => !cfg!(debug_assertions),
        };

        let session_ttl = match lookup("SESSION_TTL_HOURS") {
            Some(hours) => {
                let hours: u64 = hours
                    .parse()
                    .context("SESSION_TTL_HOURS must be a whole number")?;
                let secs = hours
                    .checked_mul(3600)
                    .filter(|_| (1..=MAX_SESSION_TTL_HOURS).contains(&hours));
                match secs {
                    Some(secs) => Duration::from_secs(secs),
                    None => bail!("SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}"),
                }
            }
            None => DEFAULT_SESSION_TTL,
        };

        let ui_dir: PathBuf = lookup("UI_DIR")
            .unwrap_or_else(|| DEFAULT_UI_DIR.to_string())
            .into();

        Ok(Self {
            addr,
            database_url,
            session_secret,
            cookie_secure,
            session_ttl,
            ui_dir,
        })
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.ui_dir.join("html")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.ui_dir.join("static")
    }
}

fn decode_secret(encoded: &str) -> Result<[u8; 32]> {
    let bytes = from_base64(encoded.trim()).context("SESSION_SECRET must be base64")?;

    bytes
        .try_into()
        .map_err(|bytes: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must be 32 bytes, got {}", bytes.len()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
