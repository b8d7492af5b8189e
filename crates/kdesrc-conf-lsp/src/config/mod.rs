//! Configuration Engine
//!
//! Provides user-configurable settings for kdesrc-conf-lsp.
//!
//! # Configuration File
//!
//! Settings are loaded from `kdesrc-conf.toml` (or `.kdesrc-conf.toml`) in the
//! workspace root, or taken from the client's `initializationOptions`:
//!
//! ```toml
//! [catalog]
//! path = "conf_options.json"
//!
//! [modules]
//! fetch = true
//! command = ["kdesrc-build", "--list-build", "--no-src"]
//!
//! [diagnostics]
//! unknown_option = "hint"
//! wrong_scope = "warning"
//! deprecated = "hint"
//! unterminated_block = "error"
//! mismatched_end = "error"
//! outside_block = "warning"
//! ```

mod settings;


pub use settings::{
    CatalogSettings, DiagnosticSettings, ModuleSettings, RuleSeverity, Settings,
    CONFIG_FILE_NAMES,
};
