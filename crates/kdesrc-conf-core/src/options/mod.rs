//! Option registry
//!
//! - `descriptor`: what is known about a single option
//! - `builtin`: the option table kdesrc-build understands
//! - `registry`: lookup, merged with the docs catalog
//! - `render`: Markdown documentation

pub mod builtin;
pub mod descriptor;
pub mod registry;
pub mod render;

pub use builtin::{builtin_descriptors, default_git_user, CMAKE_GENERATORS, KDE_LANGUAGES};
pub use descriptor::{Choices, DefaultValue, OptionDescriptor, OptionType, Value, DOC_BASE_URL};
pub use registry::{MergeReport, OptionRegistry, FALLBACK_OPTION_NAME};
pub use render::html_to_markdown;
