//! An abstraction layer over hosted completion endpoints.
//!
//! This crate establishes a unified protocol for the chat widget to talk
//! to a language model, so that the widget can switch between providers
//! (or a fake one in tests) without modifying the core codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod provider;
mod request;
mod response;

pub use error::*;
pub use provider::*;
pub use request::*;
pub use response::*;
