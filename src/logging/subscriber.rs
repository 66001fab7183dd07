//! Tracing subscriber setup: one [`Record`] per event, rendered in colour on
//! the console and as plain timestamped text in the run log.
use std::fs;
use std::io::Write as _;
use std::path::Path;
use std::sync::Mutex;

use tracing::field::{Field, Visit};

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// Tracing target used for stage headers.
pub(super) const STAGE_TARGET: &str = "prettylibs::stage";

/// How a line is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Error,
    Warn,
    Info,
    Detail,
}

impl Kind {
    fn of(metadata: &tracing::Metadata<'_>) -> Self {
        match *metadata.level() {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO if metadata.target() == STAGE_TARGET => Self::Stage,
            tracing::Level::INFO => Self::Info,
            _ => Self::Detail,
        }
    }

    /// Marker written before the message in the run log.
    const fn tag(self) -> &'static str {
        match self {
            Self::Stage => "==>",
            Self::Error => "    [error]",
            Self::Warn => "    [warn]",
            Self::Info => "   ",
            Self::Detail => "    [debug]",
        }
    }
}

/// The parts of an event the tool prints.
#[derive(Debug)]
struct Record {
    kind: Kind,
    message: String,
}

impl Record {
    fn from_event(event: &tracing::Event<'_>) -> Self {
        let mut record = Self {
            kind: Kind::of(event.metadata()),
            message: String::new(),
        };
        event.record(&mut record);
        record
    }

    fn plain(&self, timestamp: &str) -> String {
        format!("[{timestamp}] {} {}", self.kind.tag(), strip_ansi(&self.message))
    }

    fn styled(&self) -> String {
        let msg = &self.message;
        match self.kind {
            Kind::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Kind::Error => format!("\x1b[31merror:\x1b[0m {msg}"),
            Kind::Warn => format!("\x1b[33mwarning:\x1b[0m {msg}"),
            Kind::Info => format!("  {msg}"),
            Kind::Detail => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

impl Visit for Record {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }
}

/// Appends every event to the run log.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Open the run log for `command` in the cache directory.
    pub(super) fn new(command: &str) -> Option<Self> {
        Self::at(&log_file_path(command)?)
    }

    /// Start a fresh run log at `path`.
    pub(super) fn at(path: &Path) -> Option<Self> {
        let header = format!(
            "# prettylibs {} run started {}\n",
            crate::VERSION,
            format_utc_datetime()
        );
        fs::write(path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _: tracing_subscriber::layer::Context<'_, S>) {
        let line = Record::from_event(event).plain(&format_utc_time());
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

/// Console rendering of a [`Record`].
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", Record::from_event(event).styled())
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; `debug`
/// reaches the console only when `verbose` is set but is always written to
/// `$XDG_CACHE_HOME/prettylibs/<command>.log`. Call once, before logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(
            std::io::stderr
                .with_max_level(tracing::Level::WARN)
                .and(std::io::stdout.with_min_level(tracing::Level::INFO)),
        )
        .with_filter(console_level);
    let file = FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
}
