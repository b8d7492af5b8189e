//! kdesrc-conf-core - understanding kdesrc-build configuration files
//!
//! Core library providing:
//! - A tolerant line scanner and block model for `kdesrc-buildrc` files
//! - The option registry: types, scopes, choices, defaults and docs
//! - The docs catalog format merged into the registry
//! - Module listing and path resolution helpers
//!
//! # Example
//!
//! ```
//! use kdesrc_conf_core::{BlockKind, ConfDocument, OptionRegistry};
//!
//! let doc = ConfDocument::parse("module-set kde\n    use-modules kcalc\nend module-set\n");
//! assert_eq!(doc.scope_at(1), Some(BlockKind::ModuleSet));
//!
//! let registry = OptionRegistry::builtin();
//! let names: Vec<&str> = registry
//!     .candidates(BlockKind::ModuleSet, "use-m")
//!     .iter()
//!     .map(|o| o.name)
//!     .collect();
//! assert_eq!(names, vec!["use-modules"]);
//! ```

pub mod catalog;
pub mod document;
pub mod error;
pub mod modules;
pub mod options;
pub mod paths;
pub mod scanner;
pub mod scope;

// Re-export main types
pub use catalog::{CatalogEntry, DocsCatalog};
pub use document::{Block, ConfDocument, Include, OptionLine, StructureProblem};
pub use error::{ConfError, Result};
pub use modules::{ModuleList, DEFAULT_LIST_COMMAND};
pub use options::{OptionDescriptor, OptionRegistry, OptionType, Value};
pub use scanner::{LineKind, Span, Token};
pub use scope::{BlockKind, ScopeRestriction};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
