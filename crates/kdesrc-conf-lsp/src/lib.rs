//! kdesrc-build configuration Language Server Protocol implementation
//!
//! This library provides LSP support for kdesrc-build configuration files
//! (`kdesrc-buildrc`, `*.ksb`), including:
//! - Completion for option names, option values, include paths and blocks
//! - Hover documentation for option keys
//! - Diagnostics for unknown, misplaced and deprecated options and for the
//!   block structure
//! - Go-to-definition and document links for include files and path options
//! - Folding ranges and document symbols for blocks
//! - A code action closing the enclosing block
//!
//! # Library Usage
//!
//! ```ignore
//! use kdesrc_conf_lsp::{run_server, ConfEngine};
//!
//! // Run the LSP server
//! run_server().await;
//!
//! // Or use the domain engine directly
//! let engine = ConfEngine::new();
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Start the language server (typically called by an editor)
//! kdesrc-conf-lsp
//!
//! # With debug logging
//! RUST_LOG=debug kdesrc-conf-lsp
//! ```

pub mod config;
pub mod domain;
pub mod navigation;
pub mod position;
pub mod server;
pub mod structural;

// Re-export main entry point
pub use server::run_server;

// Re-export commonly used types
pub use config::Settings;
pub use domain::ConfEngine;
pub use navigation::PathNavigator;
