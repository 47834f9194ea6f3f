//! Mailer Trait Abstraction
//!
//! The email API is an external collaborator with exactly one capability:
//! send a message to an address. The sender identity is an implementation
//! detail of the concrete mailer (fixed at construction), not a per-call
//! argument.

use async_trait::async_trait;

/// Result type for mail operations
pub type MailResult<T> = Result<T, MailError>;

/// Mail delivery errors
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("rejected recipient address: {0}")]
    InvalidRecipient(String),
}

/// Email delivery abstraction.
#[async_trait]
pub trait Mailer: Clone {
    /// Send a message. The returned ack means the API accepted it, not that
    /// the mailbox received it; there is no retry.
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()>;
}
