//! The RoboDream chat assistant, assembled from the Gemini provider and
//! the widget core.
//!
//! The crate includes a CLI tool for using the widget in the terminal. You
//! can also use it as a library to bring the widget into your own host app.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod config;
mod session;

pub use config::{Config, ConfigError};
pub use session::build_widget;

/// Re-exports of [`robodream_core`] crate.
pub mod core {
    pub use robodream_core::*;
}
