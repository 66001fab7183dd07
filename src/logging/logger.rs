//! Console/file logger with a transient progress line.
use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::subscriber::STAGE_TARGET;
use super::types::Log;
use super::utils::{log_file_path, terminal_columns, truncate_to_width};

/// Minimum time between two progress redraws.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Production logger.
///
/// Messages go through [`tracing`], so they reach both the console and the
/// persistent log file at `$XDG_CACHE_HOME/prettylibs/<command>.log`
/// installed by [`init_subscriber`](super::subscriber::init_subscriber).
/// Progress lines are drawn directly on stdout and erased before the next
/// regular message.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
    /// Serializes console output from parallel workers.
    flush_lock: Mutex<()>,
    /// Whether a progress line is currently displayed.
    progress_shown: Mutex<bool>,
    /// When the progress line was last drawn.
    last_progress: Mutex<Option<Instant>>,
}

impl Logger {
    /// Create a new logger for `command`.
    ///
    /// Stores the log file path for display at the end of the run; the file
    /// itself is created by the subscriber.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
            flush_lock: Mutex::new(()),
            progress_shown: Mutex::new(false),
            last_progress: Mutex::new(None),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        self.with_console(|| tracing::error!("{msg}"));
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        self.with_console(|| tracing::warn!("{msg}"));
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        self.with_console(|| tracing::info!(target: STAGE_TARGET, "{msg}"));
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        self.with_console(|| tracing::info!("{msg}"));
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        self.with_console(|| tracing::debug!("{msg}"));
    }

    /// Replace the progress line with `msg`, truncated to one terminal row.
    ///
    /// Redraws closer together than 100ms are dropped.
    #[allow(clippy::print_stdout)]
    pub fn progress(&self, msg: &str) {
        let _guard = self
            .flush_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        {
            let mut last = self
                .last_progress
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = Instant::now();
            if last.is_some_and(|t| now.duration_since(t) < PROGRESS_INTERVAL) {
                return;
            }
            *last = Some(now);
        }
        let line = truncate_to_width(msg, terminal_columns(), 4);
        print!("\r\x1b[K  \x1b[2m▹ {line}\x1b[0m");
        std::io::stdout().flush().ok();
        *self
            .progress_shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = true;
    }

    /// Whether a progress line is currently on screen.
    #[must_use]
    pub fn progress_visible(&self) -> bool {
        *self
            .progress_shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Erase any progress line, then emit a regular message.
    fn with_console(&self, emit: impl FnOnce()) {
        let _guard = self
            .flush_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        self.clear_progress();
        emit();
    }

    /// Erase the progress line from the console. Must hold `flush_lock`.
    #[allow(clippy::print_stdout)]
    fn clear_progress(&self) {
        let mut shown = self
            .progress_shown
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if *shown {
            print!("\r\x1b[K");
            std::io::stdout().flush().ok();
            *shown = false;
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, progress);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    #[test]
    fn debug_always_written_to_file() {
        let (log, path, _tmp, _guard) = isolated_logger();
        let marker = format!("debug-marker-{}", std::process::id());
        log.debug(&marker);
        let contents = fs::read_to_string(path).unwrap();
        assert!(
            contents.contains(&marker),
            "debug messages should always appear in the log file"
        );
    }

    #[test]
    fn warn_written_to_file_with_tag() {
        let (log, path, _tmp, _guard) = isolated_logger();
        log.warn("Audio_Module.pretty failed");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[warn] Audio_Module.pretty failed"));
    }

    #[test]
    fn stage_written_to_file_with_arrow() {
        let (log, path, _tmp, _guard) = isolated_logger();
        log.stage("Downloading library table");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("==> Downloading library table"));
    }

    #[test]
    fn progress_never_reaches_file() {
        let (log, path, _tmp, _guard) = isolated_logger();
        log.progress("Downloaded: 4096 bytes");
        let contents = fs::read_to_string(path).unwrap();
        assert!(!contents.contains("Downloaded: 4096 bytes"));
    }

    #[test]
    fn regular_message_clears_progress() {
        let (log, _path, _tmp, _guard) = isolated_logger();
        log.progress("Downloaded: 1 bytes");
        assert!(log.progress_visible());
        log.info("done");
        assert!(!log.progress_visible());
    }

    #[test]
    fn rapid_progress_redraws_are_dropped() {
        let (log, _path, _tmp, _guard) = isolated_logger();
        log.progress("Downloaded: 1 bytes");
        log.info("between");
        log.progress("Downloaded: 2 bytes");
        assert!(!log.progress_visible());
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let (log, path, _tmp, _guard) = isolated_logger();
        let log_ref: &dyn Log = &log;
        log_ref.error("via-trait");
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.contains("[error] via-trait"));
    }
}
