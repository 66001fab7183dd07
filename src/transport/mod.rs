//! Narrow capability interfaces for everything that leaves the process:
//! version control, HTTP, and archive extraction.
//!
//! The sync core only sees the traits; production implementations shell out
//! to `git`, use [`ureq`] for HTTP, and [`zip`] for archives.
pub mod archive;
pub mod http;
pub mod vcs;

pub use archive::{Extractor, ZipExtractor};
pub use http::{Downloader, HttpClient};
pub use vcs::{GitCli, Vcs};

use std::path::Path;

use crate::error::SyncError;

/// Retrieve the raw manifest from an `http(s)://` URL or a local file.
///
/// # Errors
///
/// Returns [`SyncError::ManifestUnreadable`] if the manifest cannot be
/// retrieved. This is the only failure that aborts a run.
pub fn fetch_manifest(location: &str, downloader: &dyn Downloader) -> Result<Vec<u8>, SyncError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        downloader
            .fetch(location)
            .map_err(|e| SyncError::ManifestUnreadable(e.to_string()))
    } else {
        std::fs::read(Path::new(location))
            .map_err(|e| SyncError::ManifestUnreadable(format!("{location}: {e}")))
    }
}

/// Shared test helpers for capability unit tests.
#[cfg(test)]
pub mod test_helpers {
    use crate::exec::{ExecResult, Executor};
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex;

    /// A scripted executor that records every invocation.
    ///
    /// Maintains a queue of `(success, output)` responses consumed in FIFO
    /// order.  When the queue is empty any call fails with
    /// `"unexpected call"`.
    #[derive(Debug)]
    pub struct MockExecutor {
        responses: Mutex<VecDeque<(bool, String)>>,
        calls: Mutex<Vec<String>>,
        which_result: bool,
    }

    impl MockExecutor {
        /// Create a mock from an ordered list of `(success, output)` pairs.
        #[must_use]
        pub fn with_responses(responses: Vec<(bool, String)>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
                which_result: true,
            }
        }

        /// Create a mock with a single successful response.
        #[must_use]
        pub fn ok(output: &str) -> Self {
            Self::with_responses(vec![(true, output.to_string())])
        }

        /// Create a mock with a single failed response.
        #[must_use]
        pub fn fail(output: &str) -> Self {
            Self::with_responses(vec![(false, output.to_string())])
        }

        /// Every call so far, formatted as `[dir$ ]program arg...`.
        pub fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }

        fn next(&self, call: String) -> anyhow::Result<ExecResult> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(call);
            let (success, output) = self
                .responses
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .pop_front()
                .unwrap_or_else(|| (false, "unexpected call".to_string()));
            if success {
                Ok(ExecResult {
                    stdout: String::new(),
                    stderr: output,
                    success: true,
                    code: Some(0),
                })
            } else {
                anyhow::bail!("mock command failed: {output}")
            }
        }
    }

    impl Executor for MockExecutor {
        fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            self.next(format!("{program} {}", args.join(" ")))
        }

        fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            self.next(format!("{}$ {program} {}", dir.display(), args.join(" ")))
        }

        fn which(&self, _: &str) -> bool {
            self.which_result
        }
    }
}
