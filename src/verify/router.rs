//! Conversation Router
//!
//! Interprets inbound DM text against the registry and applies the state
//! machine. The router performs no I/O: every outward action is returned as
//! an [`Effect`] for the event loop to dispatch. State transitions happen
//! synchronously before any effect is executed, so a handler can never
//! observe a session mid-transition.

use super::identity::IdentityValidator;
use super::messages;
use super::otp::{OtpError, OtpGenerator};
use super::registry::{RegistryError, SessionState, VerificationRegistry};
use crate::chat::traits::UserId;
use std::time::SystemTime;
use tracing::info;

/// A side-effect request emitted by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a direct message to a user.
    SendDm { to: UserId, text: String },
    /// Email a verification code to an address.
    SendEmail { to: String, otp: String },
    /// Grant the verified role to a user on every enrolled server.
    GrantRole { user: UserId },
}

/// Router errors. Only randomness failure is expected to occur; registry
/// errors indicate a bug in the transition logic itself.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error(transparent)]
    Otp(#[from] OtpError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// The per-user verification state machine.
pub struct ConversationRouter {
    validator: IdentityValidator,
    generator: OtpGenerator,
}

impl ConversationRouter {
    pub fn new(validator: IdentityValidator, generator: OtpGenerator) -> Self {
        Self {
            validator,
            generator,
        }
    }

    /// Enrollment entry point, driven by the acknowledgement gesture.
    ///
    /// Idempotent: an unknown identity gets a session and the prompt; an
    /// enrolled-but-unverified identity just gets the prompt again (an
    /// in-progress OTP is untouched); a verified identity gets nothing.
    pub fn enroll(&self, registry: &mut VerificationRegistry, user: &UserId) -> Vec<Effect> {
        match registry.get(user) {
            Some(SessionState::Verified { .. }) => vec![],
            Some(_) => vec![Effect::SendDm {
                to: user.clone(),
                text: messages::msg_username_prompt(),
            }],
            None => {
                registry.enroll(user);
                info!(user = %user, "enrolled for verification");
                vec![Effect::SendDm {
                    to: user.clone(),
                    text: messages::msg_username_prompt(),
                }]
            }
        }
    }

    /// Apply one inbound DM to the state machine.
    ///
    /// `now` is supplied by the caller so expiry is testable; the event loop
    /// passes the wall clock.
    pub fn on_direct_message(
        &self,
        registry: &mut VerificationRegistry,
        user: &UserId,
        text: &str,
        now: SystemTime,
    ) -> Result<Vec<Effect>, RouterError> {
        let state = match registry.get(user) {
            Some(state) => state.clone(),
            // First DM from an unknown identity is an implicit enrollment;
            // the text itself is not consumed as a username.
            None => return Ok(self.enroll(registry, user)),
        };

        match state {
            SessionState::AwaitingUsername => self.submit_username(registry, user, text, now),

            SessionState::AwaitingOtp {
                email,
                otp,
                expires_at,
                ..
            } => {
                if now >= expires_at {
                    // No grace period. Drop the stale code and immediately
                    // re-run the username flow with the stored claim, so the
                    // user only has to echo the fresh code.
                    let mut effects = vec![Effect::SendDm {
                        to: user.clone(),
                        text: messages::msg_code_expired(&email),
                    }];
                    let claimed = registry.reset_for_new_otp(user)?;
                    effects.extend(self.submit_username(registry, user, &claimed, now)?);
                    Ok(effects)
                } else if text.trim().to_uppercase() == otp {
                    registry.mark_verified(user)?;
                    info!(user = %user, email = %email, "verified");
                    Ok(vec![
                        Effect::SendDm {
                            to: user.clone(),
                            text: messages::msg_verified(),
                        },
                        Effect::GrantRole { user: user.clone() },
                    ])
                } else {
                    Ok(vec![Effect::SendDm {
                        to: user.clone(),
                        text: messages::msg_code_incorrect(&email),
                    }])
                }
            }

            // Terminal: verified users can DM the bot freely; it stays quiet.
            SessionState::Verified { .. } => Ok(vec![]),
        }
    }

    /// AwaitingUsername logic: validate the reply, mint and record a code,
    /// and request the email plus the "check your email" confirmation.
    fn submit_username(
        &self,
        registry: &mut VerificationRegistry,
        user: &UserId,
        raw: &str,
        now: SystemTime,
    ) -> Result<Vec<Effect>, RouterError> {
        let email = match self.validator.normalize(raw) {
            Ok(email) => email,
            Err(_) => {
                return Ok(vec![Effect::SendDm {
                    to: user.clone(),
                    text: messages::msg_not_institutional(self.validator.accepted_suffix()),
                }])
            }
        };

        let issued = self.generator.generate(now)?;
        registry.record_username(
            user,
            raw.to_string(),
            email.clone(),
            issued.code.clone(),
            issued.expires_at,
        )?;
        info!(user = %user, email = %email, expires_at = ?issued.expires_at, "issued verification code");

        Ok(vec![
            Effect::SendEmail {
                to: email.clone(),
                otp: issued.code,
            },
            Effect::SendDm {
                to: user.clone(),
                text: messages::msg_otp_sent(&email),
            },
        ])
    }
}
