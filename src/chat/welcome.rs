//! Welcome Broadcaster
//!
//! Posts the verification announcement to every channel with the configured
//! name at startup and attaches the acknowledgement-gesture prompt to each.
//! Gestures on those prompts come back through the event stream and drive
//! enrollment.

use super::traits::{ChatClient, ChatResult};
use tracing::{info, warn};

/// Announcement posted to each welcome channel.
pub fn announcement_text() -> String {
    "Welcome! You'll need to verify your university account before \
     participating. React to this message with :+1: and I'll send you a \
     direct message. Reply there with your student username to get a \
     verification code. If you need the DM re-sent, react again."
        .to_string()
}

/// Post the announcement to every channel named `channel_name`.
///
/// A failure on one channel is logged and does not stop the others; the
/// return value is the number of channels that got the prompt attached.
pub async fn broadcast<C: ChatClient>(client: &C, channel_name: &str) -> ChatResult<usize> {
    let channels = client.channels_named(channel_name).await?;
    if channels.is_empty() {
        warn!(channel = channel_name, "no welcome channels found");
        return Ok(0);
    }

    let text = announcement_text();
    let mut posted = 0;

    for channel in channels {
        let handle = match client.post_channel_message(&channel, &text).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(channel = %channel, "failed to post announcement: {}", e);
                continue;
            }
        };

        match client.attach_acknowledgement_prompt(&channel, handle).await {
            Ok(()) => posted += 1,
            Err(e) => {
                warn!(channel = %channel, "failed to attach gesture prompt: {}", e);
            }
        }
    }

    info!(count = posted, "welcome announcement posted");
    Ok(posted)
}
