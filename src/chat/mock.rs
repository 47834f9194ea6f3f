//! Mock Chat Client for Testing
//!
//! Records outbound traffic and feeds queued inbound events, so the full
//! verification flow is testable without a platform connection.

use super::traits::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock chat client for testing
#[derive(Clone)]
pub struct MockChatClient {
    state: Arc<Mutex<MockState>>,
    user_id: UserId,
}

#[derive(Default)]
struct MockState {
    sent_dms: Vec<(UserId, String)>,
    channel_posts: Vec<(ChannelId, String)>,
    gesture_prompts: Vec<(ChannelId, MessageHandle)>,
    role_grants: Vec<(ServerId, UserId, String)>,
    servers: Vec<ServerId>,
    channels: HashMap<ServerId, Vec<(ChannelId, String)>>,
    incoming_events: Vec<InboundEvent>,
    next_handle: u64,
}

impl MockChatClient {
    /// Create new mock client
    pub fn new(user_id: UserId) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            user_id,
        }
    }

    /// Register a server the bot is a member of.
    pub fn add_server(&self, server: ServerId) {
        self.state.lock().unwrap().servers.push(server);
    }

    /// Register a named channel on a server.
    pub fn add_channel(&self, server: &ServerId, channel: ChannelId, name: &str) {
        self.state
            .lock()
            .unwrap()
            .channels
            .entry(server.clone())
            .or_default()
            .push((channel, name.to_string()));
    }

    /// Queue an inbound event for the next `receive_events` drain.
    pub fn add_incoming_event(&self, event: InboundEvent) {
        self.state.lock().unwrap().incoming_events.push(event);
    }

    /// Get sent DMs for assertions
    pub fn sent_dms(&self) -> Vec<(UserId, String)> {
        self.state.lock().unwrap().sent_dms.clone()
    }

    /// DMs sent to a specific user, text only.
    pub fn dms_to(&self, user: &UserId) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .sent_dms
            .iter()
            .filter(|(to, _)| to == user)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Get channel posts for assertions
    pub fn channel_posts(&self) -> Vec<(ChannelId, String)> {
        self.state.lock().unwrap().channel_posts.clone()
    }

    /// Messages that had the gesture prompt attached.
    pub fn gesture_prompts(&self) -> Vec<(ChannelId, MessageHandle)> {
        self.state.lock().unwrap().gesture_prompts.clone()
    }

    /// Get role grants for assertions
    pub fn role_grants(&self) -> Vec<(ServerId, UserId, String)> {
        self.state.lock().unwrap().role_grants.clone()
    }

    /// Clear all recorded traffic and registered topology.
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap();
        *state = MockState::default();
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn send_direct_message(&self, user: &UserId, text: &str) -> ChatResult<()> {
        let mut state = self.state.lock().unwrap();
        state.sent_dms.push((user.clone(), text.to_string()));
        Ok(())
    }

    async fn post_channel_message(
        &self,
        channel: &ChannelId,
        text: &str,
    ) -> ChatResult<MessageHandle> {
        let mut state = self.state.lock().unwrap();

        let known = state
            .channels
            .values()
            .flatten()
            .any(|(id, _)| id == channel);
        if !known {
            return Err(ChatError::ChannelNotFound(channel.to_string()));
        }

        let handle = MessageHandle(state.next_handle);
        state.next_handle += 1;
        state.channel_posts.push((channel.clone(), text.to_string()));
        Ok(handle)
    }

    async fn attach_acknowledgement_prompt(
        &self,
        channel: &ChannelId,
        message: MessageHandle,
    ) -> ChatResult<()> {
        let mut state = self.state.lock().unwrap();
        state.gesture_prompts.push((channel.clone(), message));
        Ok(())
    }

    async fn grant_role(&self, server: &ServerId, user: &UserId, role: &str) -> ChatResult<()> {
        let mut state = self.state.lock().unwrap();

        if !state.servers.contains(server) {
            return Err(ChatError::RoleNotFound {
                server: server.to_string(),
                role: role.to_string(),
            });
        }

        state
            .role_grants
            .push((server.clone(), user.clone(), role.to_string()));
        Ok(())
    }

    async fn servers(&self) -> ChatResult<Vec<ServerId>> {
        Ok(self.state.lock().unwrap().servers.clone())
    }

    async fn channels_named(&self, name: &str) -> ChatResult<Vec<ChannelId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .channels
            .values()
            .flatten()
            .filter(|(_, channel_name)| channel_name == name)
            .map(|(id, _)| id.clone())
            .collect())
    }

    async fn receive_events(&self) -> ChatResult<Vec<InboundEvent>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.incoming_events.drain(..).collect())
    }

    fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
