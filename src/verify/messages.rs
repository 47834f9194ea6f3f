//! User-Facing Message Templates
//!
//! Every DM the bot sends during verification. Kept as free functions so the
//! router can render them without touching the transport, and so tests can
//! assert on the exact wording users see.

/// Initial prompt, sent on enrollment (gesture or first DM).
pub fn msg_username_prompt() -> String {
    "Hi there! Please reply with your student username.".to_string()
}

/// Rejection for a typed-out address outside the institutional domain.
pub fn msg_not_institutional(accepted_suffix: &str) -> String {
    format!(
        "You can only verify with a `{}` email address. Please try again.",
        accepted_suffix
    )
}

/// Confirmation that a code is on its way.
pub fn msg_otp_sent(email: &str) -> String {
    format!(
        "You will receive a one-time password at your address `{}` soon. \
         Please reply here with the password.",
        email
    )
}

/// Wrong code, same address reminder so a typo'd username is noticeable.
pub fn msg_code_incorrect(email: &str) -> String {
    format!(
        "Code incorrect. Please try again; it was sent to `{}`. \
         If that address is wrong, reply with your username to start over once the code expires.",
        email
    )
}

/// Stale code; a replacement is being issued automatically.
pub fn msg_code_expired(email: &str) -> String {
    format!("Your code has expired. Sending a new code to `{}`.", email)
}

/// Terminal success message.
pub fn msg_verified() -> String {
    "Thanks! You've been verified and can now participate.".to_string()
}
