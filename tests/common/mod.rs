// Shared helpers for integration tests.
//
// Recording stand-ins for the transport capabilities, an in-memory log, and
// a temporary base directory, so each scenario can run the full pipeline
// without touching the network.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use prettylibs_cli::config::RunConfig;
use prettylibs_cli::error::SyncError;
use prettylibs_cli::filter::FilterSpec;
use prettylibs_cli::logging::Log;
use prettylibs_cli::operations::SystemFileSystemOps;
use prettylibs_cli::planner::SyncMode;
use prettylibs_cli::sync::Capabilities;
use prettylibs_cli::transport::{Downloader, Vcs, ZipExtractor};

/// Library table with one current and one deprecated entry. The first is a
/// bare `lib` line; the second shares its line with the table's close.
pub const TABLE: &str = r#"(fp_lib_table
lib (name A)(type Github)(uri ${KIGITHUB}/repoA)(options "")(descr "desc")
  (lib (name Legacy)(type Github)(uri ${KIGITHUB}/repoLegacy)(options "")(descr "deprecated lib")))
"#;

/// Where the stub downloader serves [`TABLE`] from.
pub const TABLE_URL: &str = "https://example.test/fp-lib-table";

/// Every call made to any stub capability, in order.
#[derive(Debug, Default)]
pub struct CallLog(Mutex<Vec<String>>);

impl CallLog {
    pub fn push(&self, call: String) {
        self.0.lock().expect("call log").push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().expect("call log").clone()
    }
}

/// [`Vcs`] that records calls and creates the clone target directory.
#[derive(Debug)]
pub struct StubGit {
    pub calls: Arc<CallLog>,
}

impl Vcs for StubGit {
    fn clone_repo(&self, url: &str, dest: &Path, _: &dyn Log) -> Result<(), SyncError> {
        self.calls.push(format!("clone {url}"));
        std::fs::create_dir_all(dest).map_err(|e| SyncError::Transport(e.to_string()))
    }

    fn pull(&self, path: &Path, _: &dyn Log) -> Result<(), SyncError> {
        self.calls.push(format!("pull {}", path.display()));
        Ok(())
    }
}

/// [`Downloader`] that serves the table at [`TABLE_URL`] and fixed archive
/// bytes for everything else.
#[derive(Debug)]
pub struct StubHttp {
    pub calls: Arc<CallLog>,
    pub table: Option<String>,
    pub archive: Option<Vec<u8>>,
}

impl Downloader for StubHttp {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, SyncError> {
        if url == TABLE_URL {
            return self
                .table
                .clone()
                .map(String::into_bytes)
                .ok_or_else(|| SyncError::Download(format!("{url}: 404")));
        }
        self.calls.push(format!("fetch {url}"));
        Err(SyncError::Download(format!("{url}: unexpected")))
    }

    fn download(&self, url: &str, dest: &Path, progress: &dyn Fn(u64)) -> Result<u64, SyncError> {
        self.calls.push(format!("download {url}"));
        let bytes = self
            .archive
            .clone()
            .ok_or_else(|| SyncError::Download(format!("{url}: 404")))?;
        std::fs::write(dest, &bytes).map_err(|e| SyncError::Download(e.to_string()))?;
        let len = bytes.len() as u64;
        progress(len);
        Ok(len)
    }
}

/// [`Log`] collecting `level: message` lines.
#[derive(Debug, Default)]
pub struct CapturedLog(Mutex<Vec<String>>);

impl CapturedLog {
    pub fn contains(&self, needle: &str) -> bool {
        self.0
            .lock()
            .expect("log")
            .iter()
            .any(|line| line.contains(needle))
    }

    fn push(&self, level: &str, msg: &str) {
        self.0.lock().expect("log").push(format!("{level}: {msg}"));
    }
}

impl Log for CapturedLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn progress(&self, _: &str) {}
}

/// A temporary base directory plus the stubs wired to it.
#[derive(Debug)]
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub calls: Arc<CallLog>,
    pub table: Option<String>,
    pub archive: Option<Vec<u8>>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("temp dir"),
            calls: Arc::new(CallLog::default()),
            table: Some(TABLE.to_string()),
            archive: None,
        }
    }

    pub fn base(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Create `<base>/<rel>` as an existing library directory.
    pub fn with_library(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.path(rel)).expect("create library dir");
        self
    }

    pub fn with_archive(mut self, files: &[(&str, &str)]) -> Self {
        self.archive = Some(zip_bytes(files));
        self
    }

    pub fn without_table(mut self) -> Self {
        self.table = None;
        self
    }

    pub fn config(&self, mode: SyncMode, allow_deprecated: bool) -> RunConfig {
        RunConfig {
            base_dir: self.base().to_path_buf(),
            filter: FilterSpec::new(None, None, allow_deprecated).expect("filter"),
            mode,
            jobs: 1,
            remote_base: "https://github.com/KiCad".to_string(),
            manifest: TABLE_URL.to_string(),
            timeout: None,
            http_timeout: Duration::from_secs(5),
            report_path: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            vcs: Arc::new(StubGit {
                calls: Arc::clone(&self.calls),
            }),
            downloader: Arc::new(StubHttp {
                calls: Arc::clone(&self.calls),
                table: self.table.clone(),
                archive: self.archive.clone(),
            }),
            extractor: Arc::new(ZipExtractor),
            fs: Arc::new(SystemFileSystemOps),
        }
    }
}

/// Build an in-memory zip containing `files` as `(name, contents)`.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write as _;
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in files {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(contents.as_bytes()).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
