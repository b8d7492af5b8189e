//! Block kinds and the scope restrictions options carry.
//!
//! A configuration file is a sequence of blocks (`global`, `module-set`,
//! `module`, `options`). Each option is documented with the blocks it may
//! appear in; the docs catalog encodes this as a small bit set.

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Kind of a configuration block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    /// `global ... end global`
    Global,
    /// `module-set NAME ... end module-set`
    ModuleSet,
    /// `module NAME ... end module`
    Module,
    /// `options NAME ... end options`
    Options,
}

impl BlockKind {
    /// All block kinds in declaration order
    pub const ALL: [BlockKind; 4] = [
        BlockKind::Global,
        BlockKind::ModuleSet,
        BlockKind::Module,
        BlockKind::Options,
    ];

    /// The keyword that opens (and, after `end`, closes) the block
    pub fn keyword(self) -> &'static str {
        match self {
            BlockKind::Global => "global",
            BlockKind::ModuleSet => "module-set",
            BlockKind::Module => "module",
            BlockKind::Options => "options",
        }
    }

    /// Parse a block keyword
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "global" => Some(BlockKind::Global),
            "module-set" => Some(BlockKind::ModuleSet),
            "module" => Some(BlockKind::Module),
            "options" => Some(BlockKind::Options),
            _ => None,
        }
    }

    /// Whether the block header carries a name (`module kcalc`)
    pub fn takes_name(self) -> bool {
        !matches!(self, BlockKind::Global)
    }

    /// Whether an option with the given restriction may be set in this block.
    ///
    /// The combined `GLOBAL | MODULE_SET` restriction marks options that
    /// describe a set of modules; they belong in `module-set` and `options`
    /// blocks, not in `global`.
    pub fn may_contain(self, restriction: ScopeRestriction) -> bool {
        match restriction {
            ScopeRestriction::ANY => true,
            ScopeRestriction::GLOBAL_OR_MODULE_SET => {
                matches!(self, BlockKind::ModuleSet | BlockKind::Options)
            }
            ScopeRestriction::GLOBAL => self == BlockKind::Global,
            ScopeRestriction::MODULE_SET => self == BlockKind::ModuleSet,
            _ => true,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Set of blocks an option is restricted to.
///
/// `ANY` (no bits) means the option may appear everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ScopeRestriction(u8);

impl ScopeRestriction {
    /// Usable in any block
    pub const ANY: ScopeRestriction = ScopeRestriction(0);
    /// Only in the global block ("Cannot be overridden")
    pub const GLOBAL: ScopeRestriction = ScopeRestriction(1);
    /// Only in module-set blocks ("Can only use in module-set")
    pub const MODULE_SET: ScopeRestriction = ScopeRestriction(2);
    /// Module-set and options blocks (module set selection options)
    pub const GLOBAL_OR_MODULE_SET: ScopeRestriction = ScopeRestriction(3);

    const MASK: u8 = 0b11;

    /// Raw bit value, as stored in the docs catalog
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits, rejecting unknown flags
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::MASK == 0 {
            Some(ScopeRestriction(bits))
        } else {
            None
        }
    }

    pub fn is_any(self) -> bool {
        self.0 == 0
    }

    /// Human-readable list of the blocks this restriction admits
    pub fn describe(self) -> String {
        let allowed: Vec<&str> = BlockKind::ALL
            .iter()
            .filter(|kind| kind.may_contain(self))
            .map(|kind| kind.keyword())
            .collect();
        allowed.join(", ")
    }
}

impl BitOr for ScopeRestriction {
    type Output = ScopeRestriction;

    fn bitor(self, rhs: Self) -> Self::Output {
        ScopeRestriction(self.0 | rhs.0)
    }
}

impl TryFrom<u8> for ScopeRestriction {
    type Error = String;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        ScopeRestriction::from_bits(bits).ok_or_else(|| format!("unknown region flags {bits}"))
    }
}

impl From<ScopeRestriction> for u8 {
    fn from(restriction: ScopeRestriction) -> u8 {
        restriction.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_is_allowed_everywhere() {
        for kind in BlockKind::ALL {
            assert!(kind.may_contain(ScopeRestriction::ANY), "{kind}");
        }
    }

    #[test]
    fn test_global_only() {
        let r = ScopeRestriction::GLOBAL;
        assert!(BlockKind::Global.may_contain(r));
        assert!(!BlockKind::ModuleSet.may_contain(r));
        assert!(!BlockKind::Module.may_contain(r));
        assert!(!BlockKind::Options.may_contain(r));
    }

    #[test]
    fn test_module_set_only() {
        let r = ScopeRestriction::MODULE_SET;
        assert!(!BlockKind::Global.may_contain(r));
        assert!(BlockKind::ModuleSet.may_contain(r));
        assert!(!BlockKind::Module.may_contain(r));
        assert!(!BlockKind::Options.may_contain(r));
    }

    #[test]
    fn test_global_or_module_set() {
        let r = ScopeRestriction::GLOBAL | ScopeRestriction::MODULE_SET;
        assert_eq!(r, ScopeRestriction::GLOBAL_OR_MODULE_SET);
        assert_eq!(r.bits(), 3);
        assert!(!BlockKind::Global.may_contain(r));
        assert!(BlockKind::ModuleSet.may_contain(r));
        assert!(BlockKind::Options.may_contain(r));
        assert!(!BlockKind::Module.may_contain(r));
    }

    #[test]
    fn test_bits_validation() {
        assert_eq!(ScopeRestriction::from_bits(2), Some(ScopeRestriction::MODULE_SET));
        assert!(ScopeRestriction::from_bits(4).is_none());
        let parsed: Result<ScopeRestriction, _> = serde_json::from_str("7");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_keywords_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(BlockKind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(BlockKind::from_keyword("end"), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(ScopeRestriction::GLOBAL.describe(), "global");
        assert_eq!(ScopeRestriction::MODULE_SET.describe(), "module-set");
        assert_eq!(
            ScopeRestriction::GLOBAL_OR_MODULE_SET.describe(),
            "module-set, options"
        );
        assert_eq!(ScopeRestriction::ANY.describe(), "global, module-set, module, options");
    }
}
