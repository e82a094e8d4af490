mod builder;
#[cfg(test)]
mod tests;

use std::fmt::{self, Debug};
use std::mem;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll, ready};

use robodream_model::ModelRequest;

use crate::conversation::{Message, Transcript};
use crate::error::Error;
use crate::model_client::{
    BoxedSendRequestFuture, ModelClient, ModelClientResponse,
};
use crate::prompt::Preamble;
pub use builder::ChatWidgetBuilder;

/// Shown above the transcript when the widget opens. It is not part of
/// the transcript and is never sent to the model.
pub const GREETING: &str = "Hello! I'm the RoboDream virtual assistant. \
    How can I help you today regarding our humanoid project?";

/// The assistant reply used when the endpoint answers with no text.
pub const EMPTY_REPLY_FALLBACK: &str = "I'm sorry, I couldn't process that.";

/// The assistant reply used when the completion request fails.
pub const UNAVAILABLE_FALLBACK: &str =
    "Service temporarily unavailable. Please try again later.";

/// Tickets are unique across widgets, so a reply is only ever accepted
/// by the widget that submitted it.
static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

/// A floating chat widget.
///
/// The widget owns a visibility flag, the input draft, the transcript and
/// a pending flag. A submission appends the user message and hands back a
/// [`PendingReply`]; the host awaits it wherever its event loop wants,
/// then passes the [`Reply`] to [`ChatWidget::resolve`]. While a reply is
/// pending further submissions are ignored, so there is never more than
/// one request in flight.
pub struct ChatWidget {
    model_client: ModelClient,
    preamble: Preamble,
    is_open: bool,
    input: String,
    transcript: Transcript,
    pending_ticket: Option<u64>,
}

impl ChatWidget {
    fn from_builder(builder: ChatWidgetBuilder) -> Self {
        let ChatWidgetBuilder {
            model_client,
            preamble,
        } = builder;

        Self {
            model_client,
            preamble,
            is_open: false,
            input: String::new(),
            transcript: Default::default(),
            pending_ticket: None,
        }
    }

    /// Opens the widget if it's closed, closes it otherwise.
    #[inline]
    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
        debug!("widget is now {}", if self.is_open { "open" } else { "closed" });
    }

    /// Returns `true` if the widget is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Returns `true` while a submitted question waits for its reply.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending_ticket.is_some()
    }

    /// Returns the messages exchanged so far.
    #[inline]
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Returns the current content of the input field.
    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the content of the input field.
    #[inline]
    pub fn set_input<S: Into<String>>(&mut self, input: S) {
        self.input = input.into();
    }

    /// Submits `text` as a question.
    ///
    /// Nothing happens and `None` is returned if `text` is blank or a
    /// reply is still pending. Otherwise the user message is appended,
    /// the input field is cleared, and the request to the completion
    /// endpoint is issued. The returned future resolves once the request
    /// finishes, successfully or not.
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        if text.trim().is_empty() {
            trace!("ignored a blank submission");
            return None;
        }
        if let Some(ticket) = self.pending_ticket {
            debug!("ignored a submission, #{ticket} is still pending");
            return None;
        }

        let ticket = NEXT_TICKET.fetch_add(1, Ordering::Relaxed);

        self.transcript.push(Message::user(text));
        self.input.clear();
        self.pending_ticket = Some(ticket);
        debug!("submitted question #{ticket}");

        let request = ModelRequest::with_prompt(self.preamble.compose(text));
        let fut = self.model_client.send_request(request);
        Some(PendingReply { ticket, fut })
    }

    /// Submits the content of the input field, see [`ChatWidget::submit`].
    ///
    /// The input is kept if the submission is ignored.
    pub fn submit_input(&mut self) -> Option<PendingReply> {
        let input = mem::take(&mut self.input);
        let pending = self.submit(&input);
        if pending.is_none() {
            self.input = input;
        }
        pending
    }

    /// Appends the assistant message for `reply` and clears the pending
    /// flag.
    ///
    /// Failures are logged and replaced by [`UNAVAILABLE_FALLBACK`], an
    /// empty answer by [`EMPTY_REPLY_FALLBACK`]. Returns `false` and does
    /// nothing if `reply` doesn't belong to the pending submission.
    pub fn resolve(&mut self, reply: Reply) -> bool {
        if self.pending_ticket != Some(reply.ticket) {
            warn!("discarded reply #{}, it is not pending", reply.ticket);
            return false;
        }
        self.pending_ticket = None;

        let text = match reply.outcome {
            Ok(resp) if resp.text.is_empty() => {
                debug!(
                    "reply #{} has no text (finish reason: {:?})",
                    reply.ticket, resp.finish_reason
                );
                EMPTY_REPLY_FALLBACK.to_owned()
            }
            Ok(resp) => resp.text,
            Err(err) => {
                warn!("reply #{} failed ({}): {err}", reply.ticket, err.kind());
                UNAVAILABLE_FALLBACK.to_owned()
            }
        };
        self.transcript.push(Message::assistant(text));
        true
    }

    /// Submits `text`, waits for the reply and resolves it.
    ///
    /// Returns the assistant message, or `None` if the submission was
    /// ignored.
    pub async fn ask(&mut self, text: &str) -> Option<&Message> {
        let pending = self.submit(text)?;
        let reply = pending.await;
        self.resolve(reply);
        self.transcript.last()
    }
}

impl Debug for ChatWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatWidget")
            .field("is_open", &self.is_open)
            .field("input", &self.input)
            .field("transcript", &self.transcript)
            .field("pending_ticket", &self.pending_ticket)
            .finish_non_exhaustive()
    }
}

/// The in-flight request of a submission.
///
/// It doesn't borrow the widget, so the host can keep handling events
/// while awaiting it. Dropping it discards the reply, and the widget stays
/// pending.
#[must_use = "the widget stays pending until the reply is resolved"]
pub struct PendingReply {
    ticket: u64,
    fut: BoxedSendRequestFuture,
}

impl Future for PendingReply {
    type Output = Reply;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Reply> {
        let outcome = ready!(self.fut.as_mut().poll(cx));
        Poll::Ready(Reply {
            ticket: self.ticket,
            outcome,
        })
    }
}

impl Debug for PendingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReply")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// The result of a completion request, to be passed to
/// [`ChatWidget::resolve`].
#[derive(Debug)]
pub struct Reply {
    ticket: u64,
    outcome: Result<ModelClientResponse, Error>,
}

impl Reply {
    /// Returns `true` if the endpoint answered.
    #[inline]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the error if the request failed.
    #[inline]
    pub fn error(&self) -> Option<&Error> {
        self.outcome.as_ref().err()
    }
}
