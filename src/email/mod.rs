//! Email Delivery Integration
//!
//! Fire-and-forget seam for the email API. The bot only ever sends one kind
//! of email (the verification code), composed here; delivery failures are
//! logged by the dispatcher and never surfaced to the user.

pub mod mock;
pub mod traits;

pub use mock::MockMailer;
pub use traits::{MailError, MailResult, Mailer};

/// Subject line for verification-code emails.
pub fn otp_subject() -> String {
    "Your one-time password".to_string()
}

/// Body for verification-code emails.
pub fn otp_body(code: &str) -> String {
    format!(
        "Your one-time password is: {}\n\nPlease reply to the bot with this code.",
        code
    )
}
