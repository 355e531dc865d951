//! Engine configuration loaded from TOML.
//!
//! Every section is optional and falls back to its defaults:
//!
//! ```toml
//! [assignment]
//! batch_cap = 5
//!
//! [notifications]
//! app_base_url = "https://app.example.com"
//! from_address = "Workdeck <noreply@example.com>"
//!
//! [notifications.smtp]
//! host = "smtp.example.com"
//! port = 587
//! username = "mailer"
//! password = "secret"
//!
//! [webhook]
//! timeout_secs = 10
//! user_agent = "workdeck/0.1.0"
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Default number of tasks handled by one AI auto-assign run.
pub const DEFAULT_BATCH_CAP: usize = 5;
/// Default SMTP submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Default outbound webhook timeout in seconds.
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`EngineConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is outside its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Assignment settings.
    pub assignment: AssignmentConfig,
    /// Reminder notification settings.
    pub notifications: NotificationConfig,
    /// Outbound webhook settings.
    pub webhook: WebhookConfig,
}

/// Settings for bulk auto-assignment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssignmentConfig {
    /// Maximum number of tasks assigned per AI auto-assign run.
    pub batch_cap: usize,
}

impl Default for AssignmentConfig {
    fn default() -> Self {
        Self {
            batch_cap: DEFAULT_BATCH_CAP,
        }
    }
}

/// Settings for reminder notifications.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotificationConfig {
    /// Base URL used to build task links in reminders.
    pub app_base_url: String,
    /// Sender mailbox for reminders.
    pub from_address: String,
    /// SMTP relay, when email delivery is enabled.
    pub smtp: Option<SmtpConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_base_url: "http://localhost:3000".to_owned(),
            from_address: "Workdeck <noreply@localhost>".to_owned(),
            smtp: None,
        }
    }
}

/// SMTP relay credentials.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// Relay host name.
    pub host: String,
    /// Relay port.
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Login user name.
    pub username: String,
    /// Login password.
    pub password: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

const fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

/// Settings for outbound webhook calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header sent with every call.
    pub user_agent: String,
}

impl WebhookConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            user_agent: format!("workdeck/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl EngineConfig {
    /// Loads and validates `file_name` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the directory or file cannot be
    /// read, [`ConfigError::Parse`] for malformed TOML, or
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn load(dir: &Utf8Path, file_name: &str) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: dir.join(file_name),
            source,
        };
        let handle = Dir::open_ambient_dir(dir, ambient_authority()).map_err(read_error)?;
        let contents = handle.read_to_string(file_name).map_err(read_error)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the batch cap or webhook timeout
    /// is zero.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.assignment.batch_cap == 0 {
            return Err(ConfigError::Invalid("assignment.batch_cap must be at least 1"));
        }
        if self.webhook.timeout_secs == 0 {
            return Err(ConfigError::Invalid("webhook.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}
