//! Module names known to kdesrc-build
//!
//! The list is obtained by running `kdesrc-build --list-build --no-src`,
//! whose output looks like:
//!
//! ```text
//!  ── gammaray : master
//!  ── knotes
//! No modules to build, exiting.
//! ```

use std::collections::BTreeSet;
use std::process::Command;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::error::{ConfError, Result};

/// Command that lists the modules kdesrc-build would build
pub const DEFAULT_LIST_COMMAND: &[&str] = &["kdesrc-build", "--list-build", "--no-src"];

/// Extract module names from `--list-build` output.
///
/// The trailing status line is dropped; of every other line the second
/// whitespace-separated word is the module name.
pub fn parse_module_list(stdout: &str) -> Vec<String> {
    let lines: Vec<&str> = stdout.lines().collect();
    let body = &lines[..lines.len().saturating_sub(1)];

    body.iter()
        .filter_map(|line| line.split_whitespace().nth(1))
        .map(str::to_string)
        .collect()
}

/// Run the listing command and parse its output
pub fn fetch_module_list(command: &[String]) -> Result<Vec<String>> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| ConfError::ModuleListing("empty command".to_string()))?;

    debug!("Running {} {:?}", program, args);
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ConfError::ModuleListing(format!("{program}: {e}")))?;

    if !output.status.success() {
        return Err(ConfError::ModuleListing(format!(
            "{program} exited with {}",
            output.status
        )));
    }

    Ok(parse_module_list(&String::from_utf8_lossy(&output.stdout)))
}

/// Shared set of module names.
///
/// Clones share the same storage; the set starts empty and is filled by a
/// single background fetch.
#[derive(Debug, Clone, Default)]
pub struct ModuleList {
    inner: Arc<RwLock<BTreeSet<String>>>,
}

impl ModuleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted copy of the current names
    pub fn snapshot(&self) -> Vec<String> {
        match self.inner.read() {
            Ok(set) => set.iter().cloned().collect(),
            Err(poisoned) => poisoned.into_inner().iter().cloned().collect(),
        }
    }

    /// Replace the stored names
    pub fn replace(&self, names: impl IntoIterator<Item = String>) {
        let mut set = match self.inner.write() {
            Ok(set) => set,
            Err(poisoned) => poisoned.into_inner(),
        };
        set.clear();
        set.extend(names);
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(set) => set.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        match self.inner.read() {
            Ok(set) => set.contains(name),
            Err(poisoned) => poisoned.into_inner().contains(name),
        }
    }

    /// Fill the list by running `command`, unless it is already populated.
    ///
    /// Returns the number of known modules.
    pub fn populate(&self, command: &[String]) -> Result<usize> {
        if !self.is_empty() {
            return Ok(self.len());
        }
        let names = fetch_module_list(command)?;
        self.replace(names);
        info!("Loaded {} kdesrc-build modules", self.len());
        Ok(self.len())
    }
}
