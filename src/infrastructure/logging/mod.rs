//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Pretty or JSON output on stderr
//! - Optional daily-rotated JSON log file
//! - Secret scrubbing for text that leaves the process

pub mod logger;
pub mod secret_scrubbing;

pub use logger::{LogFormat, LoggerImpl};
pub use secret_scrubbing::{scrub, SecretScrubber};
