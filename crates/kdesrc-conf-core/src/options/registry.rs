//! Option registry
//!
//! Merges the built-in option table with the docs catalog and answers
//! lookups by name and by enclosing block.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::{debug, warn};

use super::builtin::builtin_descriptors;
use super::descriptor::{OptionDescriptor, OptionType};
use crate::catalog::{CatalogEntry, DocsCatalog};
use crate::error::Result;
use crate::scope::BlockKind;

/// Name of the descriptor returned for unknown options
pub const FALLBACK_OPTION_NAME: &str = "Unknown option";

/// Inconsistencies found while merging the table with the catalog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Options declared more than once in the table
    pub duplicates: Vec<String>,
    /// Options of the table that the catalog does not document
    pub undocumented: Vec<String>,
    /// Catalog entries without an option in the table
    pub missing: Vec<String>,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.undocumented.is_empty() && self.missing.is_empty()
    }
}

/// All known options, keyed by name
#[derive(Debug, Clone)]
pub struct OptionRegistry {
    options: BTreeMap<&'static str, OptionDescriptor>,
    fallback: OptionDescriptor,
    report: MergeReport,
}

impl OptionRegistry {
    /// Built-in options documented by the bundled catalog
    pub fn builtin() -> Self {
        let catalog = DocsCatalog::bundled().unwrap_or_else(|e| {
            warn!("Bundled option catalog is unusable: {}", e);
            DocsCatalog::default()
        });
        Self::from_parts(builtin_descriptors(), &catalog)
    }

    /// Built-in options documented by an external catalog file
    pub fn with_catalog_file(path: &Path) -> Result<Self> {
        let catalog = DocsCatalog::from_path(path)?;
        debug!(
            "Loaded {} catalog entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(Self::from_parts(builtin_descriptors(), &catalog))
    }

    /// Merge descriptors with catalog documentation.
    ///
    /// Notes only fill an empty `doc`; scope restriction and anchor always
    /// come from the catalog.
    pub fn from_parts(descriptors: Vec<OptionDescriptor>, catalog: &DocsCatalog) -> Self {
        let mut docs: HashMap<&str, &CatalogEntry> = catalog
            .entries()
            .iter()
            .map(|entry| (entry.name.as_str(), entry))
            .collect();

        let mut report = MergeReport::default();
        let mut options = BTreeMap::new();

        for mut descriptor in descriptors {
            if options.contains_key(descriptor.name) {
                warn!("Duplicated option {}", descriptor.name);
                report.duplicates.push(descriptor.name.to_string());
            }

            match docs.remove(descriptor.name) {
                Some(entry) => {
                    if descriptor.doc.is_empty() {
                        descriptor.doc = entry.notes.clone();
                    }
                    descriptor.restriction = entry.region;
                    descriptor.anchor = entry.anchor.clone();
                }
                None => {
                    warn!("Undocumented option {}", descriptor.name);
                    report.undocumented.push(descriptor.name.to_string());
                }
            }

            options.insert(descriptor.name, descriptor);
        }

        if !docs.is_empty() {
            let mut missing: Vec<String> = docs.keys().map(|name| name.to_string()).collect();
            missing.sort();
            warn!("Missing options {:?}", missing);
            report.missing = missing;
        }

        Self {
            options,
            fallback: OptionDescriptor::new(FALLBACK_OPTION_NAME, OptionType::Str),
            report,
        }
    }

    pub fn get(&self, name: &str) -> Option<&OptionDescriptor> {
        self.options.get(name)
    }

    /// Descriptor for `name`, or the "Unknown option" fallback
    pub fn get_or_fallback(&self, name: &str) -> &OptionDescriptor {
        self.options.get(name).unwrap_or(&self.fallback)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    /// All descriptors sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.options.values()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Options that may be set in `block` and start with `prefix`, sorted by
    /// name. An empty prefix matches every option.
    pub fn candidates(&self, block: BlockKind, prefix: &str) -> Vec<&OptionDescriptor> {
        self.iter()
            .filter(|opt| prefix.is_empty() || opt.name.starts_with(prefix))
            .filter(|opt| block.may_contain(opt.restriction))
            .collect()
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
