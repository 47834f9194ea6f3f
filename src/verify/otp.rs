//! One-Time Password Generation
//!
//! Codes are drawn from the system CSPRNG and rendered as fixed-width
//! uppercase hex: long enough that guessing within the expiry window is
//! infeasible for casual abuse, short enough to transcribe from an email.

use ring::rand::{SecureRandom, SystemRandom};
use std::time::{Duration, SystemTime};

/// Random bytes per code (8 hex characters once rendered).
pub const OTP_BYTES: usize = 4;

/// How long an issued code is accepted.
pub const OTP_VALIDITY: Duration = Duration::from_secs(60 * 60);

/// A freshly minted code and the instant it stops being accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    pub code: String,
    pub expires_at: SystemTime,
}

/// OTP generation errors
#[derive(Debug, thiserror::Error)]
pub enum OtpError {
    /// The system randomness source failed. There is no acceptable fallback:
    /// issuing a predictable code is worse than refusing to issue one, so
    /// this is treated as fatal by the event loop.
    #[error("system randomness source unavailable")]
    RandomnessUnavailable,
}

/// Generates verification codes from `ring`'s `SystemRandom`.
pub struct OtpGenerator {
    rng: SystemRandom,
}

impl OtpGenerator {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    /// Mint a new code expiring `OTP_VALIDITY` after `now`.
    ///
    /// Pure with respect to the clock: callers supply `now` so expiry can be
    /// tested without waiting an hour.
    pub fn generate(&self, now: SystemTime) -> Result<IssuedOtp, OtpError> {
        let mut bytes = [0u8; OTP_BYTES];
        self.rng
            .fill(&mut bytes)
            .map_err(|_| OtpError::RandomnessUnavailable)?;

        Ok(IssuedOtp {
            code: hex::encode(bytes).to_uppercase(),
            expires_at: now + OTP_VALIDITY,
        })
    }
}

impl Default for OtpGenerator {
    fn default() -> Self {
        Self::new()
    }
}
