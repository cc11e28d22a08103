//! Structured logging for Idlewatch: subscriber setup and token redaction.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
