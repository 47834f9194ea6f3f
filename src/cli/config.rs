//! Proctor configuration file handling
//!
//! Provides default configuration generation and loading for the bot.
//! Configuration files are TOML format. Secrets (the chat token and the
//! email API key) are deliberately NOT part of this file - they're loaded
//! separately via `cli::secrets` so the config can live in version control.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Proctor bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProctorConfig {
    /// Chat platform configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Email delivery configuration
    #[serde(default)]
    pub email: EmailConfig,

    /// Verification domain configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Exact name of the channels that receive the welcome announcement
    #[serde(default = "default_welcome_channel")]
    pub welcome_channel: String,

    /// Role granted on every server once a user verifies
    #[serde(default = "default_verified_role")]
    pub verified_role: String,
}

/// Email delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Fixed sender address for verification emails
    #[serde(default = "default_sender")]
    pub sender: String,
}

/// Verification domain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Domain appended to bare usernames
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Suffix a typed-out address must end with (broader than `domain`
    /// so staff addresses verify too)
    #[serde(default = "default_accepted_suffix")]
    pub accepted_suffix: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_welcome_channel() -> String {
    "welcome".to_string()
}

fn default_verified_role() -> String {
    "Verified".to_string()
}

fn default_sender() -> String {
    "no-reply@unimelb.edu.au".to_string()
}

fn default_domain() -> String {
    "student.unimelb.edu.au".to_string()
}

fn default_accepted_suffix() -> String {
    "unimelb.edu.au".to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_channel: default_welcome_channel(),
            verified_role: default_verified_role(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            sender: default_sender(),
        }
    }
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            domain: default_domain(),
            accepted_suffix: default_accepted_suffix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl Default for ProctorConfig {
    fn default() -> Self {
        Self {
            chat: ChatConfig::default(),
            email: EmailConfig::default(),
            verification: VerificationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ProctorConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: ProctorConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(path, contents)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        Ok(())
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        r#"# Proctor Bot Configuration
#
# Secrets (chat platform token, email API key) are NOT stored here.
# Provide them via --chat-token-file / --email-key-file, the
# PROCTOR_CHAT_TOKEN / PROCTOR_EMAIL_KEY environment variables, or the
# interactive prompt at startup.

[chat]
# Channels with this exact name get the welcome announcement
welcome_channel = "welcome"

# Role granted on every server once a user verifies
verified_role = "Verified"

[email]
# Fixed sender address for verification emails
sender = "no-reply@unimelb.edu.au"

[verification]
# Domain appended to bare usernames ("jsmith" -> "jsmith@student.unimelb.edu.au")
domain = "student.unimelb.edu.au"

# Typed-out addresses are accepted if they end with this suffix
accepted_suffix = "unimelb.edu.au"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/proctor/proctor.log"
"#
        .to_string()
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let contents = Self::generate_default_toml();

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        fs::write(config_path, contents).map_err(|e| {
            format!(
                "Failed to write config file '{}': {}",
                config_path.display(),
                e
            )
        })?;

        Ok(())
    }
}

/// Get the default config file path (~/.local/share/proctor/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("proctor")
        .join("config.toml")
}
