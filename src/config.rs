//! Configuration loading and resolution.
//!
//! Everything resolves from environment variables with working defaults so a
//! scheduled run needs no flags. Paths default under `~/.pricewatch/`.

use std::fmt;
use std::path::PathBuf;

/// Desktop-browser user-agent sent with every page fetch. Some partner
/// storefronts answer bot user-agents with a 403.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request timeout. A hung page must never hang the whole batch.
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Runtime configuration for one pricewatch invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Single-column flat file of candidate source URLs.
    pub sources_path: PathBuf,
    /// Directory holding the snapshot, the change report, and the run lock.
    pub state_dir: PathBuf,
    /// Price snapshot persisted between runs.
    pub snapshot_path: PathBuf,
    /// Change report written when a run detects differences.
    pub report_path: PathBuf,
    /// User-agent header for page fetches.
    pub user_agent: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// SMTP settings; `None` means alerts cannot be emailed.
    pub smtp: Option<SmtpConfig>,
}

/// SMTP relay settings for alert delivery.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    /// Sender address, also used as the SMTP login user.
    pub from: String,
    pub password: String,
    pub to: String,
}

// Keep the password out of debug logs.
impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("from", &self.from)
            .field("password", &"<redacted>")
            .field("to", &self.to)
            .finish()
    }
}

impl Config {
    /// Resolve configuration from the environment.
    pub fn from_env() -> Self {
        let state_dir = read_env_path("PRICEWATCH_STATE_DIR").unwrap_or_else(default_state_dir);
        let snapshot_path = read_env_path("PRICEWATCH_SNAPSHOT")
            .unwrap_or_else(|| state_dir.join("current-prices.csv"));
        let report_path = read_env_path("PRICEWATCH_REPORT")
            .unwrap_or_else(|| state_dir.join("price-changes.csv"));

        Self {
            sources_path: read_env_path("PRICEWATCH_SOURCES")
                .unwrap_or_else(|| PathBuf::from("partners.csv")),
            state_dir,
            snapshot_path,
            report_path,
            user_agent: read_env_string("PRICEWATCH_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout_ms: read_env_u64("PRICEWATCH_TIMEOUT_MS", DEFAULT_TIMEOUT_MS),
            smtp: SmtpConfig::from_env(),
        }
    }

    /// Path of the lock file that serializes concurrent runs.
    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join("pricewatch.lock")
    }
}

impl SmtpConfig {
    /// Host, sender, password, and recipient must all be present; otherwise
    /// mail stays unconfigured and the run degrades to report-only.
    fn from_env() -> Option<Self> {
        Some(Self {
            host: read_env_string("PRICEWATCH_SMTP_HOST")?,
            port: read_env_u64("PRICEWATCH_SMTP_PORT", 587) as u16,
            from: read_env_string("PRICEWATCH_EMAIL_FROM")?,
            password: read_env_string("PRICEWATCH_EMAIL_PASSWORD")?,
            to: read_env_string("PRICEWATCH_EMAIL_TO")?,
        })
    }
}

fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pricewatch")
}

fn read_env_u64(name: &str, default_value: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default_value)
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_env_path(name: &str) -> Option<PathBuf> {
    read_env_string(name).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_debug_redacts_password() {
        let smtp = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            from: "alerts@example.com".to_string(),
            password: "hunter2".to_string(),
            to: "team@example.com".to_string(),
        };
        let rendered = format!("{smtp:?}");
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_read_env_u64_falls_back_on_garbage() {
        std::env::set_var("PRICEWATCH_TEST_U64", "not-a-number");
        assert_eq!(read_env_u64("PRICEWATCH_TEST_U64", 42), 42);
        std::env::remove_var("PRICEWATCH_TEST_U64");
    }

    #[test]
    fn test_read_env_string_treats_blank_as_unset() {
        std::env::set_var("PRICEWATCH_TEST_BLANK", "   ");
        assert_eq!(read_env_string("PRICEWATCH_TEST_BLANK"), None);
        std::env::remove_var("PRICEWATCH_TEST_BLANK");
    }

    #[test]
    fn test_default_state_dir_is_under_home() {
        let dir = default_state_dir();
        assert!(dir.ends_with(".pricewatch"));
    }
}
