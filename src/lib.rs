//! Proctor - Institutional Email Verification Bot
//!
//! A chat-platform bot that verifies a user controls an institutional email
//! address: the user replies to a DM with their student username, receives a
//! one-time password at the derived address, and echoes it back to earn the
//! verified role.
//!
//! Key principles:
//! - NO persistence (verification state is process-lifetime only)
//! - Transport-generic (the chat platform and the email API are trait seams)
//! - The state machine is synchronous and pure; side effects are emitted as
//!   data and dispatched by the event loop

pub mod chat;
pub mod email;
pub mod verify;
