//! Reply Normalization
//!
//! Turns a free-text DM reply into the institutional email address a code
//! will be sent to. Two forms are recognized, deliberately asymmetric:
//!
//! - Bare text (no `@`) is treated as a username and ALWAYS accepted with
//!   the institutional domain appended. Nothing else is checked — any string
//!   becomes "the username". This is a documented trust boundary: possession
//!   of the mailbox is what proves identity, not the shape of the reply.
//! - Text containing `@` is a full address the user typed themselves, and
//!   those get validated: must end with the accepted institutional suffix
//!   and contain no whitespace.

/// Rejection reasons for `@`-form replies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("address does not belong to the institutional domain")]
    NotInstitutionalDomain,
}

/// Normalizes replies against a fixed institutional domain.
#[derive(Debug, Clone)]
pub struct IdentityValidator {
    /// Domain appended to bare usernames (e.g. `student.unimelb.edu.au`).
    domain: String,
    /// Suffix a typed-out address must end with (e.g. `unimelb.edu.au`).
    /// Broader than `domain` so staff addresses verify too.
    accepted_suffix: String,
}

impl IdentityValidator {
    pub fn new(domain: impl Into<String>, accepted_suffix: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            accepted_suffix: accepted_suffix.into(),
        }
    }

    /// Domain appended to bare usernames.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Suffix accepted on typed-out addresses.
    pub fn accepted_suffix(&self) -> &str {
        &self.accepted_suffix
    }

    /// Normalize a reply into an email address, or reject it.
    ///
    /// Bare replies cannot fail; only `@`-form replies are validated.
    pub fn normalize(&self, raw: &str) -> Result<String, IdentityError> {
        if !raw.contains('@') {
            return Ok(format!("{}@{}", raw, self.domain));
        }

        if raw.ends_with(&self.accepted_suffix) && !raw.contains(char::is_whitespace) {
            Ok(raw.to_string())
        } else {
            Err(IdentityError::NotInstitutionalDomain)
        }
    }
}
