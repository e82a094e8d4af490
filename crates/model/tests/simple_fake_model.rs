use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::{poll_fn, ready};
use std::pin::Pin;
use std::task::{self, Poll, ready};
use std::time::Duration;

use robodream_model::{
    ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

#[derive(Debug)]
struct EchoProviderError(ErrorKind);

impl Display for EchoProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for EchoProviderError {}

impl ModelProviderError for EchoProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the prompt back word by word, then completes.
#[derive(Debug)]
struct EchoResponse {
    words: VecDeque<String>,
    completed: bool,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl EchoResponse {
    fn new(input: &str) -> Self {
        let words = format!("You asked: {input}")
            .split(' ')
            .map(ToString::to_string)
            .collect();
        Self {
            words,
            completed: false,
            sleep: None,
        }
    }
}

impl ModelResponse for EchoResponse {
    type Error = EchoProviderError;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        let sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(sleep(Duration::from_millis(1))));
        ready!(sleep.as_mut().poll(cx));
        this.sleep = None;

        if let Some(mut word) = this.words.pop_front() {
            if !this.words.is_empty() {
                word.push(' ');
            }
            return Poll::Ready(Ok(Some(ModelResponseEvent::MessageDelta(
                word,
            ))));
        }
        if !this.completed {
            this.completed = true;
            return Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                ModelFinishReason::Stop,
            ))));
        }
        Poll::Ready(Ok(None))
    }
}

struct EchoProvider;

impl ModelProvider for EchoProvider {
    type Error = EchoProviderError;
    type Response = EchoResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let result = match req.messages.first() {
            Some(ModelMessage::User(text)) => Ok(EchoResponse::new(text)),
            Some(_) => Err(EchoProviderError(ErrorKind::Moderated)),
            None => Err(EchoProviderError(ErrorKind::Other)),
        };
        ready(result)
    }
}

async fn collect(mut resp: EchoResponse) -> (String, Option<ModelFinishReason>) {
    let mut text = String::new();
    let mut finish_reason = None;
    while let Some(event) = poll_fn(|cx| Pin::new(&mut resp).poll_next_event(cx))
        .await
        .unwrap()
    {
        match event {
            ModelResponseEvent::MessageDelta(delta) => text.push_str(&delta),
            ModelResponseEvent::Completed(reason) => finish_reason = Some(reason),
        }
    }
    (text, finish_reason)
}

#[tokio::test]
async fn test_completion() {
    let req = ModelRequest::with_prompt("Who leads RoboDream?");
    let resp = EchoProvider.send_request(&req).await.unwrap();

    let (text, finish_reason) = collect(resp).await;
    assert_eq!(text, "You asked: Who leads RoboDream?");
    assert_eq!(finish_reason, Some(ModelFinishReason::Stop));
}

#[tokio::test]
async fn test_error() {
    let req = ModelRequest::default();
    let err = EchoProvider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Other);

    let req = ModelRequest {
        messages: vec![ModelMessage::System("Be brief.".to_owned())],
    };
    let err = EchoProvider.send_request(&req).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Moderated);
}
