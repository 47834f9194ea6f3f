//! Proctor Bot
//!
//! Event loop tying the transports to the verification core:
//! - drains inbound events on a polling interval
//! - routes DMs and gestures through the `ConversationRouter`
//! - dispatches the router's effects (DMs, emails, role grants)
//!
//! Handler failures are logged and never crash the loop; the one exception
//! is randomness-source failure, which aborts rather than risk issuing a
//! predictable code. Events are handled sequentially to completion, so two
//! messages from the same identity can never interleave mid-transition.

use super::traits::*;
use super::welcome;
use crate::email::{self, Mailer};
use crate::verify::{
    ConversationRouter, Effect, IdentityValidator, OtpGenerator, RouterError,
    VerificationRegistry,
};
use std::time::SystemTime;
use tracing::warn;

/// Proctor bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Exact name of the channels that get the welcome announcement.
    pub welcome_channel: String,
    /// Role granted on every server once a user verifies.
    pub verified_role: String,
    /// Domain appended to bare usernames.
    pub domain: String,
    /// Suffix accepted on typed-out addresses.
    pub accepted_suffix: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            welcome_channel: "welcome".to_string(),
            verified_role: "Verified".to_string(),
            domain: "student.unimelb.edu.au".to_string(),
            accepted_suffix: "unimelb.edu.au".to_string(),
        }
    }
}

/// The bot: transports plus the verification core.
pub struct ProctorBot<C: ChatClient, M: Mailer> {
    client: C,
    mailer: M,
    config: BotConfig,
    registry: VerificationRegistry,
    router: ConversationRouter,
}

impl<C: ChatClient, M: Mailer> ProctorBot<C, M> {
    pub fn new(client: C, mailer: M, config: BotConfig) -> Self {
        let router = ConversationRouter::new(
            IdentityValidator::new(&config.domain, &config.accepted_suffix),
            OtpGenerator::new(),
        );

        Self {
            client,
            mailer,
            config,
            registry: VerificationRegistry::new(),
            router,
        }
    }

    /// The session registry, for inspection in tests and status reporting.
    pub fn registry(&self) -> &VerificationRegistry {
        &self.registry
    }

    /// Run the bot event loop until a fatal error.
    pub async fn run(&mut self) -> Result<(), RouterError> {
        let mut poll = tokio::time::interval(tokio::time::Duration::from_millis(100));

        loop {
            poll.tick().await;
            self.poll_once().await?;
        }
    }

    /// Drain and handle pending events once. Split out of `run` so tests can
    /// step the loop deterministically.
    pub async fn poll_once(&mut self) -> Result<(), RouterError> {
        let events = match self.client.receive_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!("error receiving events, will retry: {}", e);
                return Ok(());
            }
        };

        for event in events {
            match self.handle_event(event).await {
                Ok(()) => {}
                // A daemon must survive individual handler failures, but a
                // dead randomness source means no code it issues can be
                // trusted: abort instead.
                Err(e @ RouterError::Otp(_)) => return Err(e),
                Err(e) => warn!("error handling event: {}", e),
            }
        }

        Ok(())
    }

    /// Handle one inbound event.
    pub async fn handle_event(&mut self, event: InboundEvent) -> Result<(), RouterError> {
        match event {
            InboundEvent::Ready => {
                if let Err(e) = welcome::broadcast(&self.client, &self.config.welcome_channel).await
                {
                    warn!("welcome broadcast failed: {}", e);
                }
                Ok(())
            }

            InboundEvent::Acknowledgement { user } => {
                // Stable-id comparison: the bot reacts to its own prompt to
                // seed the gesture, and must not enroll itself.
                if user == *self.client.user_id() {
                    return Ok(());
                }
                let effects = self.router.enroll(&mut self.registry, &user);
                self.dispatch(effects).await;
                Ok(())
            }

            InboundEvent::DirectMessage { sender, text } => {
                let effects = self.router.on_direct_message(
                    &mut self.registry,
                    &sender,
                    &text,
                    SystemTime::now(),
                )?;
                self.dispatch(effects).await;
                Ok(())
            }
        }
    }

    /// Execute effects in order. Each failure is logged and skipped: a
    /// failed email must not suppress the "check your email" DM that
    /// follows it, and a failed role grant on one server must not block
    /// the rest.
    async fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SendDm { to, text } => {
                    if let Err(e) = self.client.send_direct_message(&to, &text).await {
                        warn!(user = %to, "failed to send DM: {}", e);
                    }
                }

                Effect::SendEmail { to, otp } => {
                    let subject = email::otp_subject();
                    let body = email::otp_body(&otp);
                    if let Err(e) = self.mailer.send(&to, &subject, &body).await {
                        warn!(to = %to, "failed to send verification email: {}", e);
                    }
                }

                Effect::GrantRole { user } => self.grant_role_everywhere(&user).await,
            }
        }
    }

    async fn grant_role_everywhere(&self, user: &UserId) {
        let servers = match self.client.servers().await {
            Ok(servers) => servers,
            Err(e) => {
                warn!(user = %user, "failed to list servers for role grant: {}", e);
                return;
            }
        };

        for server in servers {
            if let Err(e) = self
                .client
                .grant_role(&server, user, &self.config.verified_role)
                .await
            {
                warn!(server = %server, user = %user, "failed to grant role: {}", e);
            }
        }
    }
}
