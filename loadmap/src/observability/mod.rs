//! Observability module
//!
//! Structured logging for `loadmap` operations.

pub mod logging;

pub use logging::{LogFormat, init_logging};
