//! Chat Platform Integration
//!
//! Transport seam for the chat platform. The bot core is generic over
//! [`traits::ChatClient`], which delivers inbound events (DMs, gestures,
//! ready) and carries outbound calls (DMs, channel posts, role grants).
//! `MockChatClient` stands in for a live connection in tests.

pub mod bot;
pub mod mock;
pub mod traits;
pub mod welcome;

pub use bot::{BotConfig, ProctorBot};
pub use mock::MockChatClient;
pub use traits::{ChatClient, ChatError, ChatResult, InboundEvent, UserId};
