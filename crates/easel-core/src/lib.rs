//! Shared building blocks for the Easel feature crates
//!
//! Holds the upstream client handle that both the image gateway and the chat
//! pass-through reuse, plus the error contract every feature error follows.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod upstream;

pub use error::{ErrorEnvelope, HttpError};
pub use upstream::{UpstreamClient, UpstreamError};
