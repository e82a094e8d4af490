//! A local fake model for testing purpose.

mod preset;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use robodream_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

const DEFAULT_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Error {
    #[inline]
    pub fn message(&self) -> &str {
        self.message
    }
}

impl From<PresetFailure> for Error {
    fn from(failure: PresetFailure) -> Self {
        let (message, kind) = match failure {
            PresetFailure::Network => ("connection reset", ErrorKind::Other),
            PresetFailure::Unauthorized => {
                ("API key not valid", ErrorKind::Unauthorized)
            }
            PresetFailure::RateLimited => {
                ("resource exhausted", ErrorKind::RateLimitExceeded)
            }
            PresetFailure::Moderated => ("prompt blocked", ErrorKind::Moderated),
        };
        Self { message, kind }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: Vec<PresetEvent>,
    event_idx: usize,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        let delay = this.delay;
        let pending_sleep = this
            .sleep
            .get_or_insert_with(|| Box::pin(sleep(delay)));
        ready!(pending_sleep.as_mut().poll(cx));
        this.sleep = None;

        if this.event_idx < this.events.len() {
            let event = match &this.events[this.event_idx] {
                PresetEvent::MessageDelta(msg) => {
                    ModelResponseEvent::MessageDelta(msg.clone())
                }
            };
            this.event_idx += 1;
            Poll::Ready(Ok(Some(event)))
        } else if this.event_idx == this.events.len() {
            this.event_idx += 1;
            Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                ModelFinishReason::Stop,
            ))))
        } else {
            // In case this method is called after completion.
            Poll::Ready(Ok(None))
        }
    }
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how the
/// model should respond to each request. The n-th request receives the
/// n-th preset response. If there are no enough responses in the script,
/// an error will be returned.
///
/// Every request is recorded, and clones of a provider share the same
/// record, so a test can hand a clone to the widget and inspect the
/// outbound traffic afterwards.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    script: Vec<PresetResponse>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.script.push(preset);
    }

    /// Sets the delay applied before a response and between its events.
    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[inline]
    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let step_idx = {
            let mut requests =
                self.requests.lock().unwrap_or_else(PoisonError::into_inner);
            requests.push(req.clone());
            requests.len() - 1
        };
        let preset = self.script.get(step_idx).cloned();
        let delay = self.delay.unwrap_or(DEFAULT_DELAY);

        async move {
            let Some(preset) = preset else {
                return Err(Error {
                    message: "no enough steps",
                    kind: ErrorKind::Other,
                });
            };
            if let Some(failure) = preset.failure {
                sleep(delay).await;
                return Err(failure.into());
            }
            Ok(TestModelResponse {
                events: preset.events,
                event_idx: 0,
                delay,
                sleep: None,
            })
        }
    }
}
