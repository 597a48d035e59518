//! Chat session behavior: single-flight sends, transcript invariants,
//! failure notices, and stale-reply suppression after a clear.

use tokio::sync::mpsc;

use gitguru::chat::{
    ChatSession, Role, SendFailure, SendOutcome, SessionText, DEFAULT_ERROR_NOTICE,
    DEFAULT_GREETING,
};
use gitguru::llm::providers::dummy::DummyProvider;
use gitguru::llm::providers::scripted::ScriptedProvider;
use gitguru::llm::{CompletionError, LlmProvider};

fn dummy_session() -> ChatSession {
    ChatSession::new(
        LlmProvider::Dummy(DummyProvider),
        SessionText::default(),
        None,
    )
}

fn scripted_session() -> (
    ChatSession,
    ScriptedProvider,
    mpsc::UnboundedSender<Result<String, CompletionError>>,
    mpsc::UnboundedReceiver<SendFailure>,
) {
    let (provider, script_tx) = ScriptedProvider::channel();
    let (failure_tx, failure_rx) = mpsc::unbounded_channel();
    let session = ChatSession::new(
        LlmProvider::Scripted(provider.clone()),
        SessionText::default(),
        Some(failure_tx),
    );
    (session, provider, script_tx, failure_rx)
}

/// Park the test until the spawned send has actually reached the provider.
async fn wait_until_busy(session: &ChatSession) {
    while !session.is_busy().await {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn new_session_holds_only_the_greeting() {
    let session = dummy_session();
    let messages = session.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::Assistant);
    assert_eq!(messages[0].content, DEFAULT_GREETING);
    assert!(!session.is_busy().await);
}

#[tokio::test]
async fn greeting_and_error_notice_are_injectable() {
    let session = ChatSession::new(
        LlmProvider::Dummy(DummyProvider),
        SessionText {
            greeting: "hello there".into(),
            error_notice: "oops".into(),
        },
        None,
    );
    assert_eq!(session.messages().await[0].content, "hello there");
}

#[tokio::test]
async fn send_appends_trimmed_user_message() {
    let session = dummy_session();
    session.send("  git status  ").await;
    let messages = session.messages().await;
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "git status");
}

#[tokio::test]
async fn empty_and_whitespace_inputs_are_noops() {
    let session = dummy_session();
    assert_eq!(session.send("").await, SendOutcome::Ignored);
    assert_eq!(session.send("   ").await, SendOutcome::Ignored);
    assert_eq!(session.messages().await.len(), 1);
    assert!(!session.is_busy().await);
}

#[tokio::test]
async fn successful_send_grows_transcript_by_two() {
    let (session, _provider, script_tx, _failures) = scripted_session();
    script_tx
        .send(Ok("git init initializes a repository.".into()))
        .unwrap();

    let outcome = session.send("git init").await;

    assert_eq!(outcome, SendOutcome::Replied);
    let messages = session.messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, DEFAULT_GREETING);
    assert_eq!((messages[1].role, messages[1].content.as_str()), (Role::User, "git init"));
    assert_eq!(
        (messages[2].role, messages[2].content.as_str()),
        (Role::Assistant, "git init initializes a repository.")
    );
    assert!(!session.is_busy().await);
}

#[tokio::test]
async fn failed_send_appends_notice_and_fires_one_warning() {
    let (session, _provider, script_tx, mut failures) = scripted_session();
    script_tx
        .send(Err(CompletionError::Network("timeout".into())))
        .unwrap();

    let outcome = session.send("git push").await;

    assert_eq!(outcome, SendOutcome::Failed);
    let messages = session.messages().await;
    // The user's own turn is retained even though the reply failed.
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].content, "git push");
    assert_eq!(messages[2].content, DEFAULT_ERROR_NOTICE);
    assert!(!session.is_busy().await);

    let warning = failures.try_recv().expect("one warning expected");
    assert!(warning.detail.contains("timeout"));
    assert!(failures.try_recv().is_err(), "warning must fire exactly once");
}

#[tokio::test]
async fn send_while_busy_is_rejected() {
    let (session, _provider, script_tx, _failures) = scripted_session();

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.send("first question").await })
    };
    wait_until_busy(&session).await;

    assert_eq!(session.send("second question").await, SendOutcome::Ignored);
    // Only the first user turn made it into the transcript.
    assert_eq!(session.messages().await.len(), 2);

    script_tx.send(Ok("first answer".into())).unwrap();
    assert_eq!(in_flight.await.unwrap(), SendOutcome::Replied);

    let messages = session.messages().await;
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[2].content, "first answer");
}

#[tokio::test]
async fn clear_resets_to_single_greeting() {
    let session = dummy_session();
    session.send("git log").await;
    assert_eq!(session.messages().await.len(), 3);

    session.clear().await;

    let messages = session.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, DEFAULT_GREETING);
    assert!(!session.is_busy().await);
}

#[tokio::test]
async fn reply_arriving_after_clear_is_dropped() {
    let (session, _provider, script_tx, _failures) = scripted_session();

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.send("git rebase").await })
    };
    wait_until_busy(&session).await;

    session.clear().await;
    assert!(!session.is_busy().await);

    script_tx.send(Ok("late reply".into())).unwrap();
    assert_eq!(in_flight.await.unwrap(), SendOutcome::Discarded);

    let messages = session.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, DEFAULT_GREETING);
    assert!(!session.is_busy().await);
}

#[tokio::test]
async fn failure_after_clear_is_also_silent() {
    let (session, _provider, script_tx, mut failures) = scripted_session();

    let in_flight = {
        let session = session.clone();
        tokio::spawn(async move { session.send("git bisect").await })
    };
    wait_until_busy(&session).await;

    session.clear().await;
    script_tx
        .send(Err(CompletionError::Network("down".into())))
        .unwrap();

    assert_eq!(in_flight.await.unwrap(), SendOutcome::Discarded);
    assert_eq!(session.messages().await.len(), 1);
    assert!(failures.try_recv().is_err(), "stale failure must not warn");
}

#[tokio::test]
async fn provider_sees_history_without_the_greeting() {
    let (session, provider, script_tx, _failures) = scripted_session();
    script_tx.send(Ok("a branch is a pointer".into())).unwrap();
    script_tx.send(Ok("a tag is a fixed pointer".into())).unwrap();

    session.send("what is a branch?").await;
    session.send("and a tag?").await;

    let calls = provider.calls();
    assert_eq!(calls.len(), 2);

    // First call: fresh conversation, empty history.
    assert!(calls[0].history.is_empty());
    assert_eq!(calls[0].new_text, "what is a branch?");

    // Second call: prior exchange present, greeting still excluded.
    let history: Vec<(Role, &str)> = calls[1]
        .history
        .iter()
        .map(|t| (t.role, t.content.as_str()))
        .collect();
    assert_eq!(
        history,
        vec![
            (Role::User, "what is a branch?"),
            (Role::Assistant, "a branch is a pointer"),
        ]
    );
    assert_eq!(calls[1].new_text, "and a tag?");
}
