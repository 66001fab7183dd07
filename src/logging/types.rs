//! The [`Log`] trait shared by the sync core and its logging backends.

/// Abstraction over logging backends.
///
/// The sync core only ever logs through this trait, so tests can capture
/// messages in memory while the binary writes to the console and log file
/// through [`Logger`](super::logger::Logger).
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Show a transient progress line.
    ///
    /// Advisory only: backends may drop it, and it is never written to the
    /// log file.
    fn progress(&self, msg: &str);
}
