//! Core logic of the RoboDream chat widget: the transcript, the
//! pending-request guard, and the completion round trip behind them.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

pub mod conversation;
mod error;
mod model_client;
mod prompt;
mod widget;

pub use error::Error;
pub use prompt::Preamble;
pub use widget::{
    ChatWidget, ChatWidgetBuilder, EMPTY_REPLY_FALLBACK, GREETING,
    PendingReply, Reply, UNAVAILABLE_FALLBACK,
};
