//! Mock Mailer for Testing

use super::traits::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// A sent email captured by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mock mailer recording outbound mail, with a switch to simulate delivery
/// failure (the flow must proceed regardless).
#[derive(Clone)]
pub struct MockMailer {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    sent: Vec<SentEmail>,
    fail_next: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Make every subsequent send fail until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().fail_next = failing;
    }

    /// Get sent emails for assertions
    pub fn sent(&self) -> Vec<SentEmail> {
        self.state.lock().unwrap().sent.clone()
    }
}

impl Default for MockMailer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailResult<()> {
        let mut state = self.state.lock().unwrap();

        if state.fail_next {
            return Err(MailError::Delivery(format!("simulated failure to {}", to)));
        }

        state.sent.push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}
