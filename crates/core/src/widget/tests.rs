use std::time::Duration;

use robodream_model::{ErrorKind, ModelRequest};
use robodream_test_model::{
    PresetEvent, PresetFailure, PresetResponse, TestModelProvider,
};

use crate::conversation::{Message, Role};
use crate::{
    ChatWidget, ChatWidgetBuilder, EMPTY_REPLY_FALLBACK, Preamble,
    UNAVAILABLE_FALLBACK,
};

fn widget_with(provider: &TestModelProvider) -> ChatWidget {
    ChatWidgetBuilder::with_model_provider(provider.clone())
        .with_preamble(Preamble::new("You answer questions about a robot."))
        .build()
}

#[tokio::test]
async fn test_blank_submission_is_ignored() {
    let provider = TestModelProvider::default();
    let mut widget = widget_with(&provider);

    assert!(widget.submit("").is_none());
    assert!(widget.submit(" \t\n ").is_none());

    widget.set_input("   ");
    assert!(widget.submit_input().is_none());
    assert_eq!(widget.input(), "   ");

    assert!(widget.transcript().is_empty());
    assert!(!widget.is_pending());
    assert_eq!(provider.request_count(), 0);
}

#[tokio::test]
async fn test_submission_while_pending_is_ignored() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_text("First"));
    provider.add_response(PresetResponse::with_text("Second"));
    let mut widget = widget_with(&provider);

    let pending = widget.submit("One").unwrap();
    assert!(widget.is_pending());

    assert!(widget.submit("Two").is_none());
    widget.set_input("Two");
    assert!(widget.submit_input().is_none());
    assert_eq!(widget.input(), "Two");
    assert_eq!(widget.transcript().as_slice(), &[Message::user("One")]);
    assert_eq!(provider.request_count(), 1);

    assert!(widget.resolve(pending.await));
    assert!(!widget.is_pending());
    assert_eq!(
        widget.transcript().as_slice(),
        &[Message::user("One"), Message::assistant("First")]
    );
}

#[tokio::test]
async fn test_successful_reply() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_text("Hello"));
    let mut widget = widget_with(&provider);
    widget.set_input("Hello?");

    let pending = widget.submit_input().unwrap();
    assert_eq!(widget.input(), "");
    let reply = pending.await;
    assert!(reply.is_success());
    assert!(widget.resolve(reply));

    assert_eq!(
        widget.transcript().as_slice(),
        &[Message::user("Hello?"), Message::assistant("Hello")]
    );
    assert_eq!(
        provider.requests(),
        vec![ModelRequest::with_prompt(
            "You answer questions about a robot.\nQuestion: Hello?"
        )]
    );
}

#[tokio::test]
async fn test_streamed_deltas_form_one_message() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_events([
        PresetEvent::MessageDelta("Anup Ale ".to_owned()),
        PresetEvent::MessageDelta("builds the ".to_owned()),
        PresetEvent::MessageDelta("hardware.".to_owned()),
    ]));
    let mut widget = widget_with(&provider);

    let msg = widget.ask("Who does hardware?").await.cloned().unwrap();
    assert_eq!(msg.role(), Role::Assistant);
    assert_eq!(msg.text(), "Anup Ale builds the hardware.");
    assert_eq!(widget.transcript().len(), 2);
}

#[tokio::test]
async fn test_empty_reply_uses_fallback() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::empty());
    let mut widget = widget_with(&provider);

    let msg = widget.ask("Anything?").await.cloned();
    assert_eq!(msg, Some(Message::assistant(EMPTY_REPLY_FALLBACK)));
    assert!(!widget.is_pending());
}

#[tokio::test]
async fn test_failure_uses_fallback_and_allows_next_submission() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::failing(PresetFailure::Network));
    provider.add_response(PresetResponse::with_text("Back online."));
    let mut widget = widget_with(&provider);

    let reply = widget.submit("Are you there?").unwrap().await;
    assert_eq!(reply.error().map(|err| err.kind()), Some(ErrorKind::Other));
    assert!(widget.resolve(reply));
    assert!(!widget.is_pending());
    assert_eq!(
        widget.transcript().last(),
        Some(&Message::assistant(UNAVAILABLE_FALLBACK))
    );

    let msg = widget.ask("Are you there now?").await.cloned();
    assert_eq!(msg, Some(Message::assistant("Back online.")));
    assert_eq!(widget.transcript().len(), 4);
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_every_failure_kind_looks_the_same() {
    let failures = [
        PresetFailure::Unauthorized,
        PresetFailure::RateLimited,
        PresetFailure::Moderated,
    ];
    let mut provider = TestModelProvider::default();
    for failure in failures {
        provider.add_response(PresetResponse::failing(failure));
    }
    let mut widget = widget_with(&provider);

    for question in ["One?", "Two?", "Three?"] {
        let msg = widget.ask(question).await.cloned();
        assert_eq!(msg, Some(Message::assistant(UNAVAILABLE_FALLBACK)));
    }
}

#[tokio::test(start_paused = true)]
async fn test_timeout_uses_fallback() {
    let mut provider = TestModelProvider::default();
    provider.set_delay(Duration::from_secs(60));
    provider.add_response(PresetResponse::with_text("Too late"));
    let mut widget = ChatWidgetBuilder::with_model_provider(provider)
        .with_timeout(Duration::from_secs(10))
        .build();

    let reply = widget.submit("Still there?").unwrap().await;
    assert_eq!(reply.error().map(|err| err.kind()), Some(ErrorKind::Timeout));
    widget.resolve(reply);
    assert_eq!(
        widget.transcript().last(),
        Some(&Message::assistant(UNAVAILABLE_FALLBACK))
    );
    assert!(!widget.is_pending());
}

#[tokio::test]
async fn test_toggle_twice_restores_visibility() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_text("Hi!"));
    let mut widget = widget_with(&provider);
    widget.ask("Hi").await;
    let transcript = widget.transcript().clone();

    assert!(!widget.is_open());
    widget.toggle_open();
    assert!(widget.is_open());
    widget.toggle_open();
    assert!(!widget.is_open());
    assert_eq!(widget.transcript(), &transcript);
}

#[tokio::test]
async fn test_default_preamble_is_sent() {
    let mut provider = TestModelProvider::default();
    provider.add_response(PresetResponse::with_text("Srijana."));
    let mut widget =
        ChatWidgetBuilder::with_model_provider(provider.clone()).build();
    widget.ask("  Which school?  ").await;

    let requests = provider.requests();
    let prompt = match requests[0].messages.as_slice() {
        [robodream_model::ModelMessage::User(prompt)] => prompt.clone(),
        other => panic!("unexpected messages: {other:?}"),
    };
    assert!(prompt.starts_with("You are the AI assistant for RoboDream"));
    assert!(prompt.ends_with("\nQuestion:   Which school?  "));
    assert_eq!(widget.transcript().get(0).unwrap().text(), "  Which school?  ");
}

#[tokio::test]
async fn test_reply_from_another_widget_is_discarded() {
    let mut provider_a = TestModelProvider::default();
    provider_a.add_response(PresetResponse::with_text("From A"));
    let mut provider_b = TestModelProvider::default();
    provider_b.add_response(PresetResponse::with_text("From B"));
    let mut widget_a = widget_with(&provider_a);
    let mut widget_b = widget_with(&provider_b);

    let pending_a = widget_a.submit("question for A").unwrap();
    let pending_b = widget_b.submit("question for B").unwrap();

    let reply_a = pending_a.await;
    assert!(!widget_b.resolve(reply_a));
    assert!(widget_b.is_pending());
    assert_eq!(
        widget_b.transcript().as_slice(),
        &[Message::user("question for B")]
    );
    assert!(widget_a.is_pending());

    assert!(widget_b.resolve(pending_b.await));
    assert!(!widget_b.is_pending());
    assert_eq!(
        widget_b.transcript().as_slice(),
        &[Message::user("question for B"), Message::assistant("From B")]
    );
}
