//! Configuration Settings
//!
//! Defines the configuration structures for the language server and the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use kdesrc_conf_core::DEFAULT_LIST_COMMAND;
use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::DiagnosticSeverity;
use tracing::{debug, warn};

/// File names searched for in the workspace root, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["kdesrc-conf.toml", ".kdesrc-conf.toml"];

/// Severity levels for diagnostic rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Rule violations are errors
    Error,
    /// Rule violations are warnings (default for most)
    #[default]
    Warning,
    /// Rule violations are informational
    Info,
    /// Rule violations are hints (usually rendered faded)
    Hint,
    /// Rule is disabled
    Ignore,
}

impl RuleSeverity {
    /// Convert to an LSP severity, returns None if Ignore
    pub fn to_diagnostic_severity(self) -> Option<DiagnosticSeverity> {
        match self {
            RuleSeverity::Error => Some(DiagnosticSeverity::ERROR),
            RuleSeverity::Warning => Some(DiagnosticSeverity::WARNING),
            RuleSeverity::Info => Some(DiagnosticSeverity::INFORMATION),
            RuleSeverity::Hint => Some(DiagnosticSeverity::HINT),
            RuleSeverity::Ignore => None,
        }
    }

    /// Check if this severity means the rule is enabled
    pub fn is_enabled(self) -> bool {
        self != RuleSeverity::Ignore
    }
}

/// Top-level settings structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Documentation catalog settings
    pub catalog: CatalogSettings,
    /// Module list settings
    pub modules: ModuleSettings,
    /// Diagnostic rule settings
    pub diagnostics: DiagnosticSettings,
}

impl Settings {
    /// Parse settings from a TOML string
    pub fn from_toml_str(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Parse settings from LSP `initializationOptions`
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Load the first settings file found in `root`.
    ///
    /// Files that cannot be read or parsed are skipped with a warning.
    pub fn load_from_dir(root: &Path) -> Option<Self> {
        for name in CONFIG_FILE_NAMES {
            let path = root.join(name);
            if !path.is_file() {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => match Self::from_toml_str(&content) {
                    Ok(settings) => {
                        debug!("Loaded settings from {}", path.display());
                        return Some(settings);
                    }
                    Err(e) => warn!("Ignoring invalid settings {}: {}", path.display(), e),
                },
                Err(e) => warn!("Cannot read settings {}: {}", path.display(), e),
            }
        }
        None
    }

    /// External catalog path, resolved against `root` when relative
    pub fn catalog_path(&self, root: Option<&Path>) -> Option<PathBuf> {
        let path = self.catalog.path.as_ref()?;
        match root {
            Some(root) if path.is_relative() => Some(root.join(path)),
            _ => Some(path.clone()),
        }
    }
}

/// Documentation catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CatalogSettings {
    /// Catalog JSON used instead of the bundled one
    pub path: Option<PathBuf>,
}

/// Module list configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
    /// Fetch the module list in the background after startup
    pub fetch: bool,
    /// Command printing the modules kdesrc-build would build
    pub command: Vec<String>,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        Self {
            fetch: true,
            command: DEFAULT_LIST_COMMAND.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Severity of each diagnostic rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticSettings {
    /// Option name not in the registry (KSB001)
    pub unknown_option: RuleSeverity,
    /// Option not permitted in the enclosing block (KSB002)
    pub wrong_scope: RuleSeverity,
    /// Deprecated option (KSB003)
    pub deprecated: RuleSeverity,
    /// Block without `end` (KSB004)
    pub unterminated_block: RuleSeverity,
    /// `end` of the wrong kind or without an open block (KSB005)
    pub mismatched_end: RuleSeverity,
    /// Option set outside any block (KSB006)
    pub outside_block: RuleSeverity,
}

impl Default for DiagnosticSettings {
    fn default() -> Self {
        Self {
            unknown_option: RuleSeverity::Hint,
            wrong_scope: RuleSeverity::Warning,
            deprecated: RuleSeverity::Hint,
            unterminated_block: RuleSeverity::Error,
            mismatched_end: RuleSeverity::Error,
            outside_block: RuleSeverity::Warning,
        }
    }
}
