//! Chat Client Trait Abstractions
//!
//! These traits let the bot run unchanged against a live platform connection
//! or `MockChatClient` in tests. Identifiers are the platform's stable
//! assigned ids, never display names: display names can collide, and the
//! self-gesture filter in particular must compare stable ids.

use async_trait::async_trait;
use std::fmt;

/// Stable platform-assigned user identity. Used as the registry key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Server (guild) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServerId(pub String);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle to a posted channel message, used to attach the gesture prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageHandle(pub u64);

/// Inbound transport events, drained by the bot's polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// Connection established; servers and channels are queryable.
    Ready,
    /// A direct message arrived.
    DirectMessage { sender: UserId, text: String },
    /// A user performed the acknowledgement gesture on a welcome prompt.
    Acknowledgement { user: UserId },
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

/// Chat client errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("network error: {0}")]
    Network(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("role not found on server {server}: {role}")]
    RoleNotFound { server: String, role: String },
}

/// Chat platform abstraction.
///
/// Implementations are cheap to clone (shared connection state behind an
/// `Arc`), matching how the bot hands the client to its helpers.
#[async_trait]
pub trait ChatClient: Clone {
    /// Send a direct message to a user.
    async fn send_direct_message(&self, user: &UserId, text: &str) -> ChatResult<()>;

    /// Post a message to a channel, returning a handle for follow-up calls.
    async fn post_channel_message(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> ChatResult<MessageHandle>;

    /// Attach the acknowledgement-gesture prompt to a posted message, so
    /// gestures on it surface as [`InboundEvent::Acknowledgement`].
    async fn attach_acknowledgement_prompt(
        &self,
        channel: &ChannelId,
        message: MessageHandle,
    ) -> ChatResult<()>;

    /// Grant a named role to a user on a server.
    async fn grant_role(&self, server: &ServerId, user: &UserId, role: &str) -> ChatResult<()>;

    /// Every server the bot is a member of.
    async fn servers(&self) -> ChatResult<Vec<ServerId>>;

    /// Channels whose name matches `name` exactly, across all servers.
    async fn channels_named(&self, name: &str) -> ChatResult<Vec<ChannelId>>;

    /// Drain pending inbound events (empty when nothing happened).
    async fn receive_events(&self) -> ChatResult<Vec<InboundEvent>>;

    /// The bot's own stable user id, for self-gesture filtering.
    fn user_id(&self) -> &UserId;
}
