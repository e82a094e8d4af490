use std::future::poll_fn;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::time::Duration;

use robodream_model::{
    ModelFinishReason, ModelProvider, ModelRequest, ModelResponse,
    ModelResponseEvent,
};
use tokio::time::timeout;
use tracing::Instrument;

use crate::error::Error;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) type SendRequestResult = Result<ModelClientResponse, Error>;
pub(crate) type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn =
    Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased
/// interface for the other modules, and bounds every request by a
/// timeout.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
    timeout: Duration,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            trace!("got a request: {:?}", req);
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    let resp_or_err = fut.await;
                    handle_response::<P>(resp_or_err).await
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self {
            handler_fn,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[inline]
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Sends a request and returns a future of the complete response.
    ///
    /// The provider is called before this method returns; the returned
    /// future drives the request to completion. The future does not
    /// borrow the client.
    pub fn send_request(&self, req: ModelRequest) -> BoxedSendRequestFuture {
        let fut = (self.handler_fn)(req);
        let limit = self.timeout;
        Box::pin(async move {
            match timeout(limit, fut).await {
                Ok(resp_or_err) => resp_or_err,
                Err(_) => {
                    debug!("request exceeded {limit:?}");
                    Err(Error::timed_out(limit))
                }
            }
        })
    }
}

/// A completely received response from the model client.
#[derive(Clone, Debug)]
pub struct ModelClientResponse {
    pub text: String,
    /// The reason the model finished generating, if it said so.
    pub finish_reason: Option<ModelFinishReason>,
}

async fn handle_response<P: ModelProvider + 'static>(
    resp_or_err: Result<P::Response, P::Error>,
) -> SendRequestResult {
    let resp = match resp_or_err {
        Ok(resp) => resp,
        Err(err) => {
            debug!("got an error: {err:?}");
            return Err(Error::provider(err));
        }
    };

    let mut text = String::new();
    let mut finish_reason = None;

    trace!("start receiving events");

    let mut pinned_resp = pin!(resp);
    loop {
        let event_or_err =
            poll_fn(|cx| pinned_resp.as_mut().poll_next_event(cx)).await;
        let event = match event_or_err {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(err) => {
                debug!("got an error: {err:?}");
                return Err(Error::provider(err));
            }
        };
        trace!("got an event: {event:?}");

        match event {
            ModelResponseEvent::MessageDelta(delta) => {
                text.push_str(&delta);
            }
            ModelResponseEvent::Completed(reason) => {
                finish_reason = Some(reason);
            }
        }
    }

    trace!("finished a request");

    Ok(ModelClientResponse {
        text,
        finish_reason,
    })
}
