//! Option descriptors: type, scope, choices, default and documentation of a
//! single configuration option.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::modules::ModuleList;
use crate::scope::ScopeRestriction;

/// Base URL of the kdesrc-build configuration option table
pub const DOC_BASE_URL: &str =
    "https://docs.kde.org/trunk5/en/kdesrc-build/kdesrc-build/conf-options-table.html";

/// Value type an option expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Bool,
    Int,
    Str,
    Path,
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionType::Bool => "boolean",
            OptionType::Int => "integer",
            OptionType::Str => "string",
            OptionType::Path => "path",
        };
        f.write_str(name)
    }
}

/// A concrete option value.
///
/// Ordering compares integers numerically and strings lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

/// Default of an option, either fixed or computed on demand
#[derive(Debug, Clone)]
pub enum DefaultValue {
    Static(Value),
    Computed(fn() -> Value),
}

impl DefaultValue {
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Static(value) => value.clone(),
            DefaultValue::Computed(f) => f(),
        }
    }
}

/// Set of values offered for an option
#[derive(Debug, Clone, Default)]
pub enum Choices {
    #[default]
    None,
    /// A fixed list of strings
    Fixed(&'static [&'static str]),
    /// Inclusive integer range
    IntRange(i64, i64),
    /// 1 to the number of available CPUs
    CpuCount,
    /// Module names reported by kdesrc-build
    Modules,
}

impl Choices {
    fn values(&self, modules: &ModuleList) -> Vec<Value> {
        match self {
            Choices::None => Vec::new(),
            Choices::Fixed(items) => items.iter().map(|s| Value::from(*s)).collect(),
            Choices::IntRange(lo, hi) => (*lo..=*hi).map(Value::Int).collect(),
            Choices::CpuCount => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get() as i64)
                    .unwrap_or(1);
                (1..=cpus).map(Value::Int).collect()
            }
            Choices::Modules => modules.snapshot().into_iter().map(Value::Str).collect(),
        }
    }
}

/// Everything known about one configuration option
#[derive(Debug, Clone)]
pub struct OptionDescriptor {
    pub name: &'static str,
    pub ty: OptionType,
    pub restriction: ScopeRestriction,
    pub choices: Choices,
    pub default: Option<DefaultValue>,
    /// Documentation notes (HTML, from the docs catalog)
    pub doc: String,
    /// Anchor in the online option table
    pub anchor: String,
    /// kdesrc-build version that introduced the option
    pub since: Option<&'static str>,
    pub deprecated: bool,
}

impl OptionDescriptor {
    /// Create a descriptor usable in any block, without choices or default
    pub fn new(name: &'static str, ty: OptionType) -> Self {
        Self {
            name,
            ty,
            restriction: ScopeRestriction::ANY,
            choices: Choices::None,
            default: None,
            doc: String::new(),
            anchor: String::new(),
            since: None,
            deprecated: false,
        }
    }

    pub fn with_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::Static(value.into()));
        self
    }

    pub fn with_computed_default(mut self, f: fn() -> Value) -> Self {
        self.default = Some(DefaultValue::Computed(f));
        self
    }

    pub fn with_choices(mut self, choices: Choices) -> Self {
        self.choices = choices;
        self
    }

    pub fn with_since(mut self, version: &'static str) -> Self {
        self.since = Some(version);
        self
    }

    pub fn with_restriction(mut self, restriction: ScopeRestriction) -> Self {
        self.restriction = restriction;
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Resolve the default, running the computation for computed defaults
    pub fn get_default(&self) -> Option<Value> {
        self.default.as_ref().map(DefaultValue::resolve)
    }

    /// Values to offer after the option key: choices plus the default,
    /// de-duplicated and sorted.
    pub fn candidate_values(&self, modules: &ModuleList) -> Vec<Value> {
        let mut values: BTreeSet<Value> = self.choices.values(modules).into_iter().collect();
        if let Some(default) = self.get_default() {
            values.insert(default);
        }
        values.into_iter().collect()
    }

    /// Annotation shown next to a completion whose text is `label`.
    pub fn annotation_for(&self, label: &str) -> Option<&'static str> {
        if self.deprecated {
            return Some("Deprecated");
        }
        match self.get_default() {
            Some(default) if default.to_string() == label => Some("Default value"),
            _ => None,
        }
    }

    /// Link into the online documentation, when the option has an anchor
    pub fn doc_url(&self) -> Option<String> {
        if self.anchor.is_empty() {
            None
        } else {
            Some(format!("{}#{}", DOC_BASE_URL, self.anchor))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ordering() {
        let mut values = vec![Value::Int(10), Value::Int(2), Value::Int(1)];
        values.sort();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(10)]);

        let mut strings = vec![Value::from("ninja"), Value::from("Unix Makefiles")];
        strings.sort();
        assert_eq!(strings[0], Value::from("Unix Makefiles"));
    }

    #[test]
    fn test_candidate_values_include_default_once() {
        let opt = OptionDescriptor::new("remove-after-install", OptionType::Str)
            .with_default("none")
            .with_choices(Choices::Fixed(&["none", "builddir", "all"]));
        let values = opt.candidate_values(&ModuleList::new());
        let labels: Vec<String> = values.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["all", "builddir", "none"]);
    }

    #[test]
    fn test_default_outside_choices_is_added() {
        let opt = OptionDescriptor::new("source-dir", OptionType::Path)
            .with_default("~/kdesrc")
            .with_choices(Choices::Fixed(&["~/kde/src"]));
        let labels: Vec<String> = opt
            .candidate_values(&ModuleList::new())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["~/kde/src", "~/kdesrc"]);
    }

    #[test]
    fn test_int_range_sorted_numerically() {
        let opt = OptionDescriptor::new("niceness", OptionType::Int)
            .with_default(10)
            .with_choices(Choices::IntRange(0, 20));
        let values = opt.candidate_values(&ModuleList::new());
        assert_eq!(values.len(), 21);
        assert_eq!(values[0], Value::Int(0));
        assert_eq!(values[20], Value::Int(20));
    }

    #[test]
    fn test_module_choices_follow_module_list() {
        let modules = ModuleList::new();
        let opt = OptionDescriptor::new("ignore-modules", OptionType::Str)
            .with_choices(Choices::Modules);
        assert!(opt.candidate_values(&modules).is_empty());

        modules.replace(vec!["kcalc".to_string(), "dolphin".to_string()]);
        let values = opt.candidate_values(&modules);
        assert_eq!(values, vec![Value::from("dolphin"), Value::from("kcalc")]);
    }

    #[test]
    fn test_annotations() {
        let opt = OptionDescriptor::new("async", OptionType::Bool).with_default(true);
        assert_eq!(opt.annotation_for("true"), Some("Default value"));
        assert_eq!(opt.annotation_for("false"), None);

        let num = OptionDescriptor::new("num-cores", OptionType::Int).with_default(4);
        assert_eq!(num.annotation_for("4"), Some("Default value"));

        let old = OptionDescriptor::new("ignore-kde-structure", OptionType::Bool).deprecated();
        assert_eq!(old.annotation_for("true"), Some("Deprecated"));
    }

    #[test]
    fn test_computed_default() {
        fn answer() -> Value {
            Value::Int(42)
        }
        let opt = OptionDescriptor::new("x", OptionType::Int).with_computed_default(answer);
        assert!(opt.has_default());
        assert_eq!(opt.get_default(), Some(Value::Int(42)));
    }

    #[test]
    fn test_doc_url() {
        let mut opt = OptionDescriptor::new("async", OptionType::Bool);
        assert_eq!(opt.doc_url(), None);
        opt.anchor = "conf-async".to_string();
        assert_eq!(
            opt.doc_url().unwrap(),
            format!("{DOC_BASE_URL}#conf-async")
        );
    }
}
