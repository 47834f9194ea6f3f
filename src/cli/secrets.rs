//! Secret loading for the chat token and email API key
//!
//! Secrets never live in the config file. Each one is read at startup from,
//! in order of precedence: a file passed on the command line
//! (container-native), an environment variable (warned as insecure), or an
//! interactive masked prompt. Values are held in `Zeroizing` wrappers so
//! they're wiped from memory on drop.

use std::fs;
use std::path::Path;
use zeroize::Zeroizing;

/// Modes for secret delivery, checked in order
#[derive(Debug)]
pub enum SecretSource {
    /// From a --*-file path (container-native)
    File(String),
    /// From an environment variable (fallback, warned as insecure)
    EnvVar(&'static str),
    /// From stdin prompt (interactive, masked input)
    Stdin,
}

/// Determine the source for one secret from CLI arguments
///
/// 1. If a file path was given, use File
/// 2. If the named env var is set, use EnvVar
/// 3. Otherwise, use Stdin
pub fn determine_source(file: Option<String>, env_var: &'static str) -> SecretSource {
    if let Some(file) = file {
        SecretSource::File(file)
    } else if std::env::var(env_var).is_ok() {
        SecretSource::EnvVar(env_var)
    } else {
        SecretSource::Stdin
    }
}

/// Read one secret from the given source
pub fn read_secret(
    source: SecretSource,
    prompt: &str,
) -> Result<Zeroizing<String>, Box<dyn std::error::Error>> {
    match source {
        SecretSource::File(path) => {
            if !Path::new(&path).exists() {
                return Err(format!("Secret file not found: {}", path).into());
            }

            let secret = fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read secret file '{}': {}", path, e))?
                .trim()
                .to_string();

            if secret.is_empty() {
                return Err(format!("Secret file is empty: {}", path).into());
            }

            Ok(Zeroizing::new(secret))
        }
        SecretSource::EnvVar(name) => {
            eprintln!("⚠️  WARNING: Reading {} from the environment is insecure", name);
            eprintln!("   Environment variables leak into child processes and diagnostics");
            eprintln!("   Consider using the file-based flag instead");
            eprintln!();

            let secret = std::env::var(name).map_err(|_| format!("{} env var not set", name))?;
            if secret.is_empty() {
                return Err(format!("{} env var is empty", name).into());
            }

            Ok(Zeroizing::new(secret))
        }
        SecretSource::Stdin => {
            let secret = rpassword::prompt_password(prompt)
                .map_err(|e| format!("Failed to read secret from stdin: {}", e))?;

            if secret.is_empty() {
                return Err("Secret cannot be empty".into());
            }

            Ok(Zeroizing::new(secret))
        }
    }
}
