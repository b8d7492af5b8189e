//! Path resolution for include directives and path-valued options

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::document::ConfDocument;

/// Expand `${name}` and `$NAME` references.
///
/// `${name}` first looks at `vars` (options set in the global block, e.g.
/// `${source-dir}`), then at the environment. Unknown references are left
/// untouched.
pub fn expand_vars(raw: &str, vars: &HashMap<String, String>) -> String {
    static VAR_RE: OnceLock<Regex> = OnceLock::new();
    let re = VAR_RE.get_or_init(|| {
        Regex::new(r"\$\{([^}\s]+)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
    });

    re.replace_all(raw, |caps: &Captures<'_>| {
        if let Some(name) = caps.get(1) {
            if let Some(value) = vars.get(name.as_str()) {
                return value.clone();
            }
            if let Ok(value) = std::env::var(name.as_str()) {
                return value;
            }
        } else if let Some(name) = caps.get(2) {
            if let Ok(value) = std::env::var(name.as_str()) {
                return value;
            }
        }
        caps[0].to_string()
    })
    .into_owned()
}

/// Replace a leading `~` with the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve a path as kdesrc-build would: variables, then `~`, then relative
/// to the directory of the configuration file.
pub fn resolve_path(
    raw: &str,
    document_path: Option<&Path>,
    vars: &HashMap<String, String>,
) -> PathBuf {
    // Option values may themselves reference other options.
    let expanded = expand_vars(expand_vars(raw.trim(), vars).as_str(), vars);
    let path = expand_home(&expanded);

    if path.is_absolute() {
        return path;
    }
    match document_path.and_then(Path::parent) {
        Some(base) => base.join(path),
        None => path,
    }
}

/// Include paths relevant to completing the include on `skip_line`.
///
/// Returns the path typed on that line (if any) and the non-empty parent
/// directories of every other include.
pub fn include_dirs(document: &ConfDocument, skip_line: usize) -> (Option<String>, Vec<String>) {
    let mut mine = None;
    let mut others = Vec::new();

    for include in document.includes() {
        let Some(path) = include.path else {
            continue;
        };
        if include.line == skip_line {
            mine = Some(path.text);
        } else if let Some(parent) = Path::new(&path.text).parent() {
            let parent = parent.to_string_lossy().to_string();
            if !parent.is_empty() {
                others.push(parent);
            }
        }
    }

    (mine, others)
}

/// Kind of a directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// A directory entry offered for completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: EntryKind,
}

/// Entries of `folder`: directories, then files, then anything else, each
/// group sorted by name. Unreadable folders yield nothing.
pub fn list_dir(folder: &Path) -> Vec<DirEntry> {
    let Ok(read_dir) = fs::read_dir(folder) else {
        return Vec::new();
    };

    let mut entries: Vec<DirEntry> = read_dir
        .filter_map(|entry| entry.ok())
        .map(|entry| {
            let path = entry.path();
            let kind = if path.is_dir() {
                EntryKind::Directory
            } else if path.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            DirEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                kind,
            }
        })
        .collect();

    entries.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_option_reference() {
        let mut vars = HashMap::new();
        vars.insert("source-dir".to_string(), "/opt/kde/src".to_string());
        assert_eq!(
            expand_vars("${source-dir}/kdesrc-build/kf6-qt6-build-include", &vars),
            "/opt/kde/src/kdesrc-build/kf6-qt6-build-include"
        );
    }

    #[test]
    fn test_unknown_references_stay() {
        let vars = HashMap::new();
        assert_eq!(
            expand_vars("${no-such-option}/$KSB_NO_SUCH_VAR_123", &vars),
            "${no-such-option}/$KSB_NO_SUCH_VAR_123"
        );
    }

    #[test]
    fn test_environment_reference() {
        let vars = HashMap::new();
        let path = std::env::var("PATH").unwrap_or_default();
        assert_eq!(expand_vars("$PATH", &vars), path);
    }

    #[test]
    fn test_relative_to_document() {
        let vars = HashMap::new();
        let resolved = resolve_path(
            "includes/extra.ksb",
            Some(Path::new("/home/u/.config/kdesrc-buildrc")),
            &vars,
        );
        assert_eq!(resolved, PathBuf::from("/home/u/.config/includes/extra.ksb"));
    }

    #[test]
    fn test_absolute_is_kept() {
        let vars = HashMap::new();
        let resolved = resolve_path("/etc/kde.ksb", Some(Path::new("/x/y.rc")), &vars);
        assert_eq!(resolved, PathBuf::from("/etc/kde.ksb"));
    }

    #[test]
    fn test_home_expansion() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/kde"), home.join("kde"));
            assert_eq!(expand_home("~"), home);
        }
        assert_eq!(expand_home("a/~b"), PathBuf::from("a/~b"));
    }

    #[test]
    fn test_option_value_with_home() {
        let mut vars = HashMap::new();
        vars.insert("source-dir".to_string(), "~/kde/src".to_string());
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                resolve_path("${source-dir}/x", None, &vars),
                home.join("kde/src/x")
            );
        }
    }

    #[test]
    fn test_include_dirs() {
        let doc = ConfDocument::parse(
            "include /a/b/one.ksb\ninclude /a/c/two.ksb\ninclude \ninclude plain.ksb\n",
        );
        let (mine, others) = include_dirs(&doc, 2);
        assert_eq!(mine, None);
        assert_eq!(others, vec!["/a/b", "/a/c"]);

        let (mine, _) = include_dirs(&doc, 0);
        assert_eq!(mine.as_deref(), Some("/a/b/one.ksb"));
    }

    #[test]
    fn test_list_dir_groups_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("b.ksb"), "").unwrap();
        fs::write(dir.path().join("a.ksb"), "").unwrap();

        let entries = list_dir(dir.path());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta", "a.ksb", "b.ksb"]);
        assert_eq!(entries[0].kind, EntryKind::Directory);
        assert_eq!(entries[2].kind, EntryKind::File);
    }

    #[test]
    fn test_list_missing_dir() {
        assert!(list_dir(Path::new("/definitely/not/here")).is_empty());
    }
}
