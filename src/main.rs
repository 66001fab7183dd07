//! `prettylibs` binary entry point.
use clap::Parser;

use prettylibs_cli::cli::Cli;
use prettylibs_cli::commands;
use prettylibs_cli::logging::{Logger, init_subscriber};
use prettylibs_cli::sync::CancelToken;

fn main() {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    init_subscriber(args.verbose, "sync");
    let log = Logger::new("sync");

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        log.warn(&format!("cannot install Ctrl-C handler: {e}"));
    }

    if let Err(e) = commands::sync::run(&args, &log, cancel) {
        log.error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
