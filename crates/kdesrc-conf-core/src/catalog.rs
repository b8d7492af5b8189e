//! Documentation catalog
//!
//! The catalog is generated from kdesrc-build's documentation and lists, for
//! every documented option, its anchor in the online option table, the
//! blocks it may be used in and its notes (HTML):
//!
//! ```json
//! [
//!   { "name": "async", "anchor": "conf-async", "region": 1, "notes": "<p>...</p>" }
//! ]
//! ```
//!
//! `region` is the bit set of [`ScopeRestriction`]: 0 = any block,
//! 1 = global only, 2 = module-set only, 3 = global or module-set.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfError, Result};
use crate::scope::ScopeRestriction;

/// Catalog shipped with the crate
const BUNDLED_CATALOG: &str = include_str!("../data/conf_options.json");

/// One documented option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub anchor: String,
    pub region: ScopeRestriction,
    pub notes: String,
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    anchor: String,
    region: u8,
    notes: String,
}

/// Parsed documentation catalog
#[derive(Debug, Clone, Default)]
pub struct DocsCatalog {
    entries: Vec<CatalogEntry>,
}

impl DocsCatalog {
    /// The catalog embedded at compile time
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load an external catalog file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .map(|entry| {
                let region = ScopeRestriction::from_bits(entry.region).ok_or_else(|| {
                    ConfError::InvalidRegion {
                        option: entry.name.clone(),
                        region: entry.region,
                    }
                })?;
                Ok(CatalogEntry {
                    name: entry.name,
                    anchor: entry.anchor,
                    region,
                    notes: entry.notes,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = DocsCatalog::bundled().unwrap();
        assert!(catalog.len() >= 60);
        let ignore = catalog
            .entries()
            .iter()
            .find(|e| e.name == "ignore-modules")
            .unwrap();
        assert_eq!(
            ignore.region,
            ScopeRestriction::GLOBAL | ScopeRestriction::MODULE_SET
        );
    }

    #[test]
    fn test_invalid_region_is_rejected() {
        let json = r#"[{"name": "x", "anchor": "conf-x", "region": 9, "notes": ""}]"#;
        match DocsCatalog::from_json(json) {
            Err(ConfError::InvalidRegion { option, region }) => {
                assert_eq!(option, "x");
                assert_eq!(region, 9);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            DocsCatalog::from_json("{ not json"),
            Err(ConfError::Catalog(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf_options.json");
        fs::write(
            &path,
            r#"[{"name": "tag", "anchor": "conf-tag", "region": 0, "notes": "<p>Tag</p>"}]"#,
        )
        .unwrap();
        let catalog = DocsCatalog::from_path(&path).unwrap();
        assert_eq!(catalog.entries()[0].anchor, "conf-tag");
    }
}
