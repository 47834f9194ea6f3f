//! Verification Session Registry
//!
//! In-memory, process-lifetime store of per-user verification progress.
//! Sessions are never persisted and never destroyed; a restart forgets
//! everyone who hadn't finished.
//!
//! The registry exclusively owns all session records. Only the
//! `ConversationRouter` drives transitions, and every transition moves
//! forward: AwaitingUsername -> AwaitingOtp -> Verified, with the single
//! loop-back AwaitingOtp -> AwaitingUsername when a code expires.

use crate::chat::traits::UserId;
use std::collections::HashMap;
use std::time::SystemTime;

/// Per-user verification progress.
///
/// A sum type rather than a bag of optionals: the OTP and its expiry exist
/// exactly while a code is outstanding, and a verified session cannot carry
/// a stale code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Enrolled; waiting for the user to reply with a username.
    AwaitingUsername,

    /// Code issued; waiting for the user to echo it back.
    AwaitingOtp {
        /// Raw reply the user supplied (bare username or full address).
        claimed: String,
        /// Normalized address the code was mailed to.
        email: String,
        /// The outstanding code, uppercase hex.
        otp: String,
        /// Instant after which the code is no longer accepted.
        expires_at: SystemTime,
    },

    /// Terminal. No transition leaves this state.
    Verified {
        /// Address that was proven.
        email: String,
    },
}

/// Registry operation errors.
///
/// These indicate router bugs, not user mistakes: the router only calls
/// transition operations on sessions it has just observed in the right state.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no verification session for {0}")]
    SessionNotFound(String),

    #[error("invalid transition for {identity}: {operation} from {state}")]
    InvalidTransition {
        identity: String,
        operation: &'static str,
        state: &'static str,
    },
}

/// Authoritative mapping from user identity to verification session.
pub struct VerificationRegistry {
    sessions: HashMap<UserId, SessionState>,
}

impl VerificationRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Enroll an identity. Idempotent: an existing session (including an
    /// in-progress OTP) is left untouched, so a duplicate acknowledgement
    /// gesture cannot reset anyone's progress.
    pub fn enroll(&mut self, user: &UserId) {
        self.sessions
            .entry(user.clone())
            .or_insert(SessionState::AwaitingUsername);
    }

    /// Look up a session. Absence is a valid outcome meaning "unknown user",
    /// which the router treats as a fresh enrollment.
    pub fn get(&self, user: &UserId) -> Option<&SessionState> {
        self.sessions.get(user)
    }

    /// Record a claimed username and the code mailed for it:
    /// AwaitingUsername -> AwaitingOtp. Overwrites any prior claim or code,
    /// so at most one code is ever live per session.
    pub fn record_username(
        &mut self,
        user: &UserId,
        claimed: String,
        email: String,
        otp: String,
        expires_at: SystemTime,
    ) -> Result<(), RegistryError> {
        let state = self
            .sessions
            .get_mut(user)
            .ok_or_else(|| RegistryError::SessionNotFound(user.to_string()))?;

        match state {
            SessionState::Verified { .. } => Err(RegistryError::InvalidTransition {
                identity: user.to_string(),
                operation: "record_username",
                state: "Verified",
            }),
            _ => {
                *state = SessionState::AwaitingOtp {
                    claimed,
                    email,
                    otp,
                    expires_at,
                };
                Ok(())
            }
        }
    }

    /// AwaitingOtp -> Verified. Idempotent on already-verified sessions.
    pub fn mark_verified(&mut self, user: &UserId) -> Result<(), RegistryError> {
        let state = self
            .sessions
            .get_mut(user)
            .ok_or_else(|| RegistryError::SessionNotFound(user.to_string()))?;

        match state {
            SessionState::AwaitingOtp { email, .. } => {
                let email = std::mem::take(email);
                *state = SessionState::Verified { email };
                Ok(())
            }
            SessionState::Verified { .. } => Ok(()),
            SessionState::AwaitingUsername => Err(RegistryError::InvalidTransition {
                identity: user.to_string(),
                operation: "mark_verified",
                state: "AwaitingUsername",
            }),
        }
    }

    /// Drop an expired code: AwaitingOtp -> AwaitingUsername. Returns the
    /// previously claimed text so the caller can immediately re-run the
    /// username flow without asking the user to retype it.
    pub fn reset_for_new_otp(&mut self, user: &UserId) -> Result<String, RegistryError> {
        let state = self
            .sessions
            .get_mut(user)
            .ok_or_else(|| RegistryError::SessionNotFound(user.to_string()))?;

        match state {
            SessionState::AwaitingOtp { claimed, .. } => {
                let claimed = std::mem::take(claimed);
                *state = SessionState::AwaitingUsername;
                Ok(claimed)
            }
            SessionState::AwaitingUsername => Err(RegistryError::InvalidTransition {
                identity: user.to_string(),
                operation: "reset_for_new_otp",
                state: "AwaitingUsername",
            }),
            SessionState::Verified { .. } => Err(RegistryError::InvalidTransition {
                identity: user.to_string(),
                operation: "reset_for_new_otp",
                state: "Verified",
            }),
        }
    }

    /// Number of known sessions, verified or not.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Default for VerificationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
