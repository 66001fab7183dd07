//! KiCad footprint library synchronizer.
//!
//! Reads the footprint library table, selects libraries by name pattern and
//! deprecation, and for each one clones it, downloads a static snapshot, or
//! pulls an existing clone. One library's failure never stops the others.
//!
//! The pipeline, leaves first:
//!
//! - **[`manifest`]** — parse the library table into descriptors
//! - **[`filter`]** — include/exclude/deprecation rules
//! - **[`planner`]** — choose an action per library
//! - **[`actions`]** — carry out actions through the [`transport`] capabilities
//! - **[`sync`]** — drive the run and collect the report
//!
//! [`commands`] wires it to the command line defined in [`cli`].
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod actions;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod filter;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod planner;
pub mod sync;
pub mod transport;

/// Version string, stamped by the build script when available.
pub const VERSION: &str = match option_env!("PRETTYLIBS_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};
