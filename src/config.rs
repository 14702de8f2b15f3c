//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.
//! A `.env` file, when present, is merged into the environment first.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveTime;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// JSON file backing the product store (in-memory only when unset)
    pub store_path: Option<PathBuf>,
    /// SMTP relay host
    pub email_host: Option<String>,
    /// SMTP relay port
    pub email_port: u16,
    /// SMTP username
    pub email_user: Option<String>,
    /// SMTP password
    pub email_pass: Option<String>,
    /// Sender address, falls back to the SMTP username
    pub email_from: Option<String>,
    /// Fixed recipient of every expiry notice
    pub email_to: Option<String>,
    /// Local wall-clock time of the daily expiration scan
    pub scan_time: NaiveTime,
    /// Upper bound for a single notification send, in seconds
    pub send_timeout: u64,
}

/// Mail settings, present only when a notice can actually be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub credentials: Option<(String, String)>,
    pub from: String,
    pub to: String,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EMAIL_PORT: u16 = 587;
const DEFAULT_SEND_TIMEOUT: u64 = 30;

fn midnight() -> NaiveTime {
    NaiveTime::MIN
}

fn non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Loads a `.env` file into the process environment.
///
/// `ENV_FILE` names the file explicitly; otherwise `.env` is searched for in
/// the working directory and its parents. Variables already set in the
/// environment win over the file.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    match env::var_os("ENV_FILE") {
        Some(path) => {
            let path = PathBuf::from(path);
            dotenvy::from_path(&path)?;
            Ok(path)
        }
        None => dotenvy::dotenv(),
    }
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `STORE_PATH` - JSON file for product persistence (default: none)
    /// - `EMAIL_HOST`, `EMAIL_PORT` (default: 587), `EMAIL_USER`, `EMAIL_PASS`
    /// - `EMAIL_FROM` - Sender address (default: `EMAIL_USER`)
    /// - `EMAIL_TO` - Recipient of expiry notices
    /// - `SCAN_TIME` - Daily scan time as `HH:MM` (default: 00:00)
    /// - `SEND_TIMEOUT_SECS` - Per-send timeout (default: 30)
    pub fn from_env() -> Self {
        let email_user = non_empty("EMAIL_USER");
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            store_path: non_empty("STORE_PATH").map(PathBuf::from),
            email_host: non_empty("EMAIL_HOST"),
            email_port: env::var("EMAIL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_EMAIL_PORT),
            email_from: non_empty("EMAIL_FROM").or_else(|| email_user.clone()),
            email_user,
            email_pass: non_empty("EMAIL_PASS"),
            email_to: non_empty("EMAIL_TO"),
            scan_time: env::var("SCAN_TIME")
                .ok()
                .and_then(|v| NaiveTime::parse_from_str(v.trim(), "%H:%M").ok())
                .unwrap_or_else(midnight),
            send_timeout: env::var("SEND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_SEND_TIMEOUT),
        }
    }

    /// Returns the mail settings if host, sender and recipient are all known.
    pub fn mail(&self) -> Option<MailConfig> {
        let credentials = match (&self.email_user, &self.email_pass) {
            (Some(user), Some(pass)) => Some((user.clone(), pass.clone())),
            _ => None,
        };
        Some(MailConfig {
            host: self.email_host.clone()?,
            port: self.email_port,
            credentials,
            from: self.email_from.clone()?,
            to: self.email_to.clone()?,
        })
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_PORT,
            store_path: None,
            email_host: None,
            email_port: DEFAULT_EMAIL_PORT,
            email_user: None,
            email_pass: None,
            email_from: None,
            email_to: None,
            scan_time: midnight(),
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}
