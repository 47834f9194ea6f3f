//! End-to-End Verification Flow Scenarios
//!
//! Drives the full bot (event loop handlers + effect dispatch) over the mock
//! chat client and mock mailer:
//! 1. Startup announcement
//! 2. Gesture enrollment and self-filtering
//! 3. Username submission and email dispatch
//! 4. Code echo, role grant, terminal state
//! 5. Failure paths: wrong code, foreign domain, email outage

use proctor::chat::bot::{BotConfig, ProctorBot};
use proctor::chat::mock::MockChatClient;
use proctor::chat::traits::{ChannelId, InboundEvent, ServerId, UserId};
use proctor::email::mock::MockMailer;
use proctor::verify::SessionState;

fn user(name: &str) -> UserId {
    UserId(name.to_string())
}

fn server(name: &str) -> ServerId {
    ServerId(name.to_string())
}

/// A bot wired to mocks with one server and one welcome channel.
fn test_rig() -> (ProctorBot<MockChatClient, MockMailer>, MockChatClient, MockMailer) {
    let client = MockChatClient::new(user("bot-self"));
    let s1 = server("s1");
    client.add_server(s1.clone());
    client.add_channel(&s1, ChannelId("c-welcome".to_string()), "welcome");
    client.add_channel(&s1, ChannelId("c-general".to_string()), "general");

    let mailer = MockMailer::new();
    let bot = ProctorBot::new(client.clone(), mailer.clone(), BotConfig::default());
    (bot, client, mailer)
}

/// Pull the code out of the last verification email.
fn emailed_code(mailer: &MockMailer) -> String {
    let sent = mailer.sent();
    let body = &sent.last().expect("no email sent").body;
    body.lines()
        .find_map(|line| line.strip_prefix("Your one-time password is: "))
        .expect("email body missing code line")
        .to_string()
}

async fn gesture(bot: &mut ProctorBot<MockChatClient, MockMailer>, who: &UserId) {
    bot.handle_event(InboundEvent::Acknowledgement { user: who.clone() })
        .await
        .unwrap();
}

async fn dm(bot: &mut ProctorBot<MockChatClient, MockMailer>, who: &UserId, text: &str) {
    bot.handle_event(InboundEvent::DirectMessage {
        sender: who.clone(),
        text: text.to_string(),
    })
    .await
    .unwrap();
}

/// Scenario 1: Startup
///
/// Ready event posts the announcement to every channel named "welcome"
/// (and only those) and attaches the gesture prompt.
#[tokio::test]
async fn test_scenario_startup_announcement() {
    let (mut bot, client, _mailer) = test_rig();

    bot.handle_event(InboundEvent::Ready).await.unwrap();

    let posts = client.channel_posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, ChannelId("c-welcome".to_string()));
    assert_eq!(client.gesture_prompts().len(), 1);
}

/// Scenario 2: Enrollment via gesture
///
/// A user's gesture creates a session and sends the username prompt; the
/// bot's own gesture (seeding the reaction) is filtered by stable id.
#[tokio::test]
async fn test_scenario_gesture_enrollment() {
    let (mut bot, client, _mailer) = test_rig();
    let alice = user("alice");

    gesture(&mut bot, &user("bot-self")).await;
    gesture(&mut bot, &alice).await;

    assert_eq!(bot.registry().session_count(), 1);
    assert_eq!(
        bot.registry().get(&alice),
        Some(&SessionState::AwaitingUsername)
    );
    let dms = client.dms_to(&alice);
    assert_eq!(dms.len(), 1);
    assert!(dms[0].contains("student username"));
}

/// Scenario 3: Full happy path
///
/// Gesture -> username -> exactly one email to the derived address ->
/// code echo (lowercased, padded) -> verified, role granted once per server.
#[tokio::test]
async fn test_scenario_full_happy_path() {
    let (mut bot, client, mailer) = test_rig();
    let s2 = server("s2");
    client.add_server(s2.clone());
    let alice = user("alice");

    gesture(&mut bot, &alice).await;
    dm(&mut bot, &alice, "jsmith").await;

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jsmith@student.unimelb.edu.au");
    assert!(client.dms_to(&alice)[1].contains("jsmith@student.unimelb.edu.au"));

    let code = emailed_code(&mailer);
    dm(&mut bot, &alice, &format!("  {}  ", code.to_lowercase())).await;

    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::Verified { .. })
    ));

    let grants = client.role_grants();
    assert_eq!(grants.len(), 2, "one grant per server");
    assert!(grants
        .iter()
        .all(|(_, who, role)| who == &alice && role == "Verified"));
    let granted_servers: Vec<_> = grants.iter().map(|(s, _, _)| s.clone()).collect();
    assert!(granted_servers.contains(&server("s1")));
    assert!(granted_servers.contains(&s2));
}

/// Scenario 4: Implicit enrollment
///
/// A DM from an unknown identity (gesture step missed) enrolls them and
/// prompts; the text of that first DM is not consumed as a username.
#[tokio::test]
async fn test_scenario_implicit_enrollment() {
    let (mut bot, client, mailer) = test_rig();
    let bob = user("bob");

    dm(&mut bot, &bob, "bjones").await;

    assert_eq!(
        bot.registry().get(&bob),
        Some(&SessionState::AwaitingUsername)
    );
    assert!(mailer.sent().is_empty(), "first DM must not mint a code");
    assert_eq!(client.dms_to(&bob).len(), 1);

    // The next DM is the username
    dm(&mut bot, &bob, "bjones").await;
    assert_eq!(mailer.sent()[0].to, "bjones@student.unimelb.edu.au");
}

/// Scenario 5: Foreign address rejected, then corrected
#[tokio::test]
async fn test_scenario_foreign_address_rejected() {
    let (mut bot, client, mailer) = test_rig();
    let alice = user("alice");

    gesture(&mut bot, &alice).await;
    dm(&mut bot, &alice, "jsmith@gmail.com").await;

    assert!(mailer.sent().is_empty());
    assert!(client.dms_to(&alice)[1].contains("unimelb.edu.au"));
    assert_eq!(
        bot.registry().get(&alice),
        Some(&SessionState::AwaitingUsername)
    );

    // Typed-out institutional address accepted verbatim
    dm(&mut bot, &alice, "jsmith@student.unimelb.edu.au").await;
    assert_eq!(mailer.sent()[0].to, "jsmith@student.unimelb.edu.au");
}

/// Scenario 6: Wrong code does not lose progress
#[tokio::test]
async fn test_scenario_wrong_code_recoverable() {
    let (mut bot, client, mailer) = test_rig();
    let alice = user("alice");

    gesture(&mut bot, &alice).await;
    dm(&mut bot, &alice, "jsmith").await;
    let code = emailed_code(&mailer);

    dm(&mut bot, &alice, "ZZZZZZZZ").await;

    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::AwaitingOtp { .. })
    ));
    let dms = client.dms_to(&alice);
    assert!(dms.last().unwrap().contains("Code incorrect"));
    assert_eq!(mailer.sent().len(), 1, "mismatch must not re-mail");

    dm(&mut bot, &alice, &code).await;
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::Verified { .. })
    ));
}

/// Scenario 7: Duplicate gesture mid-flow re-prompts without resetting
#[tokio::test]
async fn test_scenario_duplicate_gesture_preserves_code() {
    let (mut bot, _client, mailer) = test_rig();
    let alice = user("alice");

    gesture(&mut bot, &alice).await;
    dm(&mut bot, &alice, "jsmith").await;
    let code = emailed_code(&mailer);

    gesture(&mut bot, &alice).await;

    assert_eq!(mailer.sent().len(), 1, "re-gesture must not re-mail");
    dm(&mut bot, &alice, &code).await;
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::Verified { .. })
    ));
}

/// Scenario 8: Email outage does not stall the conversation
///
/// The delivery failure is logged, the "check your email" DM still goes
/// out, and the session advances to AwaitingOtp as if the email had landed.
#[tokio::test]
async fn test_scenario_email_outage() {
    let (mut bot, client, mailer) = test_rig();
    let alice = user("alice");
    mailer.set_failing(true);

    gesture(&mut bot, &alice).await;
    dm(&mut bot, &alice, "jsmith").await;

    assert!(mailer.sent().is_empty());
    let dms = client.dms_to(&alice);
    assert_eq!(dms.len(), 2);
    assert!(dms[1].contains("one-time password"));
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::AwaitingOtp { .. })
    ));
}

/// Scenario 9: Verified users are left alone
#[tokio::test]
async fn test_scenario_verified_terminal() {
    let (mut bot, client, mailer) = test_rig();
    let alice = user("alice");

    gesture(&mut bot, &alice).await;
    dm(&mut bot, &alice, "jsmith").await;
    let code = emailed_code(&mailer);
    dm(&mut bot, &alice, &code).await;

    let dm_count = client.dms_to(&alice).len();
    let grant_count = client.role_grants().len();

    // Further DMs and gestures are silent no-ops
    dm(&mut bot, &alice, "hello?").await;
    dm(&mut bot, &alice, &code).await;
    gesture(&mut bot, &alice).await;

    assert_eq!(client.dms_to(&alice).len(), dm_count);
    assert_eq!(client.role_grants().len(), grant_count);
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::Verified { .. })
    ));
}

/// Scenario 10: Independent identities verify independently
#[tokio::test]
async fn test_scenario_two_users_interleaved() {
    let (mut bot, _client, mailer) = test_rig();
    let alice = user("alice");
    let bob = user("bob");

    gesture(&mut bot, &alice).await;
    gesture(&mut bot, &bob).await;
    dm(&mut bot, &alice, "asmith").await;
    let alice_code = emailed_code(&mailer);
    dm(&mut bot, &bob, "bjones").await;
    let bob_code = emailed_code(&mailer);

    // Bob verifying does nothing to Alice's session
    dm(&mut bot, &bob, &bob_code).await;
    assert!(matches!(
        bot.registry().get(&bob),
        Some(SessionState::Verified { .. })
    ));
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::AwaitingOtp { .. })
    ));

    dm(&mut bot, &alice, &alice_code).await;
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::Verified { .. })
    ));
}

/// Scenario 11: The polling loop drains queued events in order
#[tokio::test]
async fn test_scenario_poll_once_drains_in_order() {
    let (mut bot, client, mailer) = test_rig();
    let alice = user("alice");

    client.add_incoming_event(InboundEvent::Ready);
    client.add_incoming_event(InboundEvent::Acknowledgement { user: alice.clone() });
    client.add_incoming_event(InboundEvent::DirectMessage {
        sender: alice.clone(),
        text: "jsmith".to_string(),
    });

    bot.poll_once().await.unwrap();

    assert_eq!(client.channel_posts().len(), 1);
    assert_eq!(mailer.sent().len(), 1);
    assert!(matches!(
        bot.registry().get(&alice),
        Some(SessionState::AwaitingOtp { .. })
    ));
}
