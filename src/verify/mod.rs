//! Verification Core
//!
//! The per-user verification state machine and its leaves. Everything here is
//! synchronous and transport-free: the router consumes inbound DM text and
//! emits side-effect requests (send DM, send email, grant role) as data,
//! which `chat::bot` dispatches against the live transports.

pub mod identity;
pub mod messages;
pub mod otp;
pub mod registry;
pub mod router;

pub use identity::{IdentityError, IdentityValidator};
pub use otp::{IssuedOtp, OtpError, OtpGenerator};
pub use registry::{RegistryError, SessionState, VerificationRegistry};
pub use router::{ConversationRouter, Effect, RouterError};
