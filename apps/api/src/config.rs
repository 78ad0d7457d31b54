use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::session::ViewState;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Application configuration loaded from environment variables.
///
/// The Gemini key is deliberately optional: a missing key is reported on every
/// analysis attempt as a configuration error instead of stopping the server.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub port: u16,
    pub rust_log: String,
    /// View a session lands on after `Reset`.
    pub reset_target: ViewState,
    pub preferences_path: PathBuf,
    pub max_upload_bytes: usize,
    /// Sessions untouched for longer than this are evicted.
    pub session_idle_ttl: Duration,
    /// Live session cap; the least recently touched session makes room.
    pub max_sessions: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY").filter(|k| is_usable_api_key(k)),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: optional_env("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            reset_target: parse_reset_target(optional_env("RESET_TARGET").as_deref())?,
            preferences_path: optional_env("PREFERENCES_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("preferences.json")),
            max_upload_bytes: match optional_env("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
            session_idle_ttl: match optional_env("SESSION_IDLE_TTL_SECS") {
                Some(raw) => Duration::from_secs(
                    raw.parse::<u64>()
                        .context("SESSION_IDLE_TTL_SECS must be a number of seconds")?,
                ),
                None => DEFAULT_SESSION_IDLE_TTL,
            },
            max_sessions: parse_max_sessions(optional_env("MAX_SESSIONS").as_deref())?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: DEFAULT_GEMINI_API_BASE.to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            reset_target: ViewState::Landing,
            preferences_path: PathBuf::from("preferences.json"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            session_idle_ttl: DEFAULT_SESSION_IDLE_TTL,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Build pipelines sometimes inject the literal string "undefined" for unset
/// secrets, and no real key is shorter than a handful of characters.
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != "undefined" && key.len() >= 5
}

fn parse_reset_target(raw: Option<&str>) -> Result<ViewState> {
    match raw.map(|s| s.to_ascii_lowercase()) {
        None => Ok(ViewState::Landing),
        Some(s) if s == "landing" => Ok(ViewState::Landing),
        Some(s) if s == "upload" => Ok(ViewState::Upload),
        Some(other) => bail!("RESET_TARGET must be 'landing' or 'upload', got '{other}'"),
    }
}

fn parse_max_sessions(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_MAX_SESSIONS);
    };
    let max = raw
        .parse::<usize>()
        .context("MAX_SESSIONS must be a positive number")?;
    if max == 0 {
        bail!("MAX_SESSIONS must be at least 1");
    }
    Ok(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_rejects_placeholder_values() {
        assert!(!is_usable_api_key(""));
        assert!(!is_usable_api_key("   "));
        assert!(!is_usable_api_key("undefined"));
        assert!(!is_usable_api_key("abc"));
        assert!(is_usable_api_key("AIzaSyExampleKey"));
    }

    #[test]
    fn test_reset_target_defaults_to_landing() {
        assert_eq!(parse_reset_target(None).unwrap(), ViewState::Landing);
    }

    #[test]
    fn test_reset_target_accepts_upload_case_insensitively() {
        assert_eq!(parse_reset_target(Some("Upload")).unwrap(), ViewState::Upload);
    }

    #[test]
    fn test_reset_target_rejects_other_views() {
        assert!(parse_reset_target(Some("result")).is_err());
    }

    #[test]
    fn test_max_sessions_parsing() {
        assert_eq!(parse_max_sessions(None).unwrap(), DEFAULT_MAX_SESSIONS);
        assert_eq!(parse_max_sessions(Some("25")).unwrap(), 25);
        assert!(parse_max_sessions(Some("0")).is_err());
        assert!(parse_max_sessions(Some("many")).is_err());
    }
}
