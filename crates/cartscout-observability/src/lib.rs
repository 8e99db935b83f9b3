//! Observability for cartscout.
//!
//! This crate provides:
//! - `SessionId` - Identifier correlating every log line of one run
//! - `StructuredLogger` - Structured logging with session context

mod logging;
mod session;

pub use logging::*;
pub use session::SessionId;
