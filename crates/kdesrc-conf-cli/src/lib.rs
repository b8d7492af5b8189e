//! kdesrc-conf CLI - Command-line interface library
//!
//! This library provides the CLI functionality for kdesrc-conf, including:
//! - Check: Validate kdesrc-build configuration files
//! - Options: List known options, optionally per block kind
//! - Describe: Show the documentation of an option
//! - Modules: List the modules kdesrc-build would build
//! - Lsp: Run the language server
//!
//! # Library Usage
//!
//! ```ignore
//! use kdesrc_conf_cli::{run_cli, check_command, OutputFormat};
//!
//! // Run the full CLI
//! run_cli();
//!
//! // Or use individual commands programmatically
//! check_command(&files, OutputFormat::Json, registry, &settings)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Check a configuration and its includes
//! kdesrc-conf check ~/.config/kdesrc-buildrc '~/kde/*.ksb'
//!
//! # Options allowed in module-set blocks
//! kdesrc-conf options --block module-set
//!
//! # Documentation of an option
//! kdesrc-conf describe cmake-generator
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{
    check_command, check_file, describe_command, expand_inputs, format_report, load_registry,
    lsp_command, modules_command, options_command, summarize,
};
pub use app::{run_cli, BlockArg, CheckSummary, FileReport, OutputFormat};
