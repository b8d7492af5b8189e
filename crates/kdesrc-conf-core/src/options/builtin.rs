//! Built-in option table
//!
//! Types, defaults, choices and versions of the options kdesrc-build
//! understands. Scope restrictions, anchors and notes come from the docs
//! catalog and are merged in by [`super::OptionRegistry`].
//!
//! Removed options (apidox, apply-qt-patches, ...) are deliberately absent.

use std::process::Command;
use std::sync::OnceLock;

use tracing::debug;

use super::descriptor::{Choices, OptionDescriptor, OptionType, Value};

/// Generators accepted by `cmake -G`
pub const CMAKE_GENERATORS: &[&str] = &[
    "Unix Makefiles",
    "Ninja",
    "Ninja Multi-Config",
    "CodeBlocks - Ninja",
    "CodeBlocks - Unix Makefiles",
    "CodeLite - Ninja",
    "CodeLite - Unix Makefiles",
    "Eclipse CDT4 - Ninja",
    "Eclipse CDT4 - Unix Makefiles",
    "Kate - Ninja",
    "Kate - Unix Makefiles",
    "Sublime Text 2 - Ninja",
    "Sublime Text 2 - Unix Makefiles",
];

/// KDE translation teams
pub const KDE_LANGUAGES: &[&str] = &[
    "af", "ar", "ast", "az", "be", "be@latin", "bg", "bn", "bn_IN", "br", "bs", "ca",
    "ca@valencia", "crh", "cs", "csb", "cy", "da", "de", "el", "en_GB", "eo", "es", "et", "eu",
    "fa", "fi", "fr", "fy", "ga", "gd", "gl", "gu", "ha", "he", "hi", "hne", "hr", "hsb", "hu",
    "hy", "ia", "id", "is", "it", "ja", "ka", "kk", "km", "kn", "ko", "ku", "lb", "lt", "lv",
    "mai", "mk", "ml", "mr", "ms", "mt", "nb", "nds", "ne", "nl", "nn", "nso", "oc", "or", "pa",
    "pl", "ps", "pt", "pt_BR", "ro", "ru", "rw", "se", "si", "sk", "sl", "sq", "sr",
    "sr@ijekavian", "sr@ijekavianlatin", "sr@latin", "sv", "ta", "te", "tg", "th", "tn", "tr",
    "tt", "ug", "uk", "uz", "uz@cyrillic", "vi", "wa", "xh", "zh_CN", "zh_HK", "zh_TW",
];

/// Fallback for `git-user` when git has no identity configured
pub const FALLBACK_GIT_USER: &str = "User Name <email@example.com>";

fn git_config(key: &str) -> Option<String> {
    let output = Command::new("git").args(["config", key]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let value = String::from_utf8(output.stdout).ok()?.trim().to_string();
    (!value.is_empty()).then_some(value)
}

/// `Name <email>` from the user's git configuration.
///
/// Computed once per process.
pub fn default_git_user() -> Value {
    static USER: OnceLock<String> = OnceLock::new();
    let user = USER.get_or_init(|| match (git_config("user.name"), git_config("user.email")) {
        (Some(name), Some(email)) => format!("{name} <{email}>"),
        _ => {
            debug!("git identity not configured, using placeholder git-user");
            FALLBACK_GIT_USER.to_string()
        }
    });
    Value::Str(user.clone())
}

/// The option table, in no particular order
pub fn builtin_descriptors() -> Vec<OptionDescriptor> {
    use OptionType::{Bool, Int, Path, Str};

    let opt = OptionDescriptor::new;

    vec![
        opt("async", Bool).with_default(true).with_since("1.6"),
        opt("binpath", Path),
        opt("branch", Str),
        opt("branch-group", Str)
            .with_default("kf5-qt5")
            .with_choices(Choices::Fixed(&["kf5-qt5"]))
            .with_since("1.16-pre2"),
        opt("build-dir", Path).with_default("build"),
        opt("build-when-unchanged", Bool),
        opt("checkout-only", Bool),
        opt("cmake-generator", Str)
            .with_default("Unix Makefiles")
            .with_choices(Choices::Fixed(CMAKE_GENERATORS)),
        opt("cmake-toolchain", Str),
        opt("cmake-options", Str),
        opt("colorful-output", Bool).with_default(true),
        opt("compile-commands-export", Bool).with_default(true),
        opt("compile-commands-linking", Bool).with_default(false),
        opt("configure-flags", Str),
        opt("custom-build-command", Str),
        opt("cxxflags", Str),
        opt("dest-dir", Str),
        opt("disable-agent-check", Bool).with_default(false),
        opt("do-not-compile", Str),
        opt("git-desired-protocol", Str)
            .with_default("git")
            .with_choices(Choices::Fixed(&["git", "https"]))
            .with_since("1.16"),
        opt("git-repository-base", Str).with_since("1.12.1"),
        opt("git-user", Str)
            .with_computed_default(default_git_user)
            .with_since("15.09"),
        opt("http-proxy", Str).with_since("1.16"),
        opt("ignore-kde-structure", Bool).deprecated(),
        // "flat" is documented as the default but "metadata" is what kdesrc-build uses.
        opt("directory-layout", Str)
            .with_default("metadata")
            .with_choices(Choices::Fixed(&["flat", "invent", "metadata"])),
        opt("ignore-modules", Str)
            .with_choices(Choices::Modules)
            .with_since("1.16"),
        opt("include-dependencies", Bool).with_default(true),
        opt("install-after-build", Bool).with_default(true),
        opt("install-environment-driver", Bool)
            .with_default(true)
            .with_since("17.08"),
        opt("install-session-driver", Bool)
            .with_default(true)
            .with_since("1.16"),
        opt("kdedir", Path)
            .with_default("~/kde")
            .with_choices(Choices::Fixed(&["/usr/local/kde"])),
        opt("kde-languages", Str).with_choices(Choices::Fixed(KDE_LANGUAGES)),
        opt("libpath", Path),
        opt("log-dir", Path),
        opt("make-install-prefix", Path),
        opt("make-options", Str),
        opt("manual-build", Bool).with_default(false),
        opt("manual-update", Bool).with_default(false),
        opt("module-base-path", Str)
            .with_choices(Choices::Fixed(&["trunk/$module", "trunk/KDE/$module"])),
        opt("niceness", Int)
            .with_default(10)
            .with_choices(Choices::IntRange(0, 20)),
        opt("ninja-options", Str),
        opt("no-svn", Bool).with_default(false),
        opt("num-cores", Int)
            .with_default(4)
            .with_choices(Choices::CpuCount)
            .with_since("20.07"),
        opt("num-cores-low-mem", Int)
            .with_default(2)
            .with_choices(Choices::CpuCount)
            .with_since("20.07"),
        opt("override-build-system", Str)
            .with_choices(Choices::Fixed(&[
                "KDE",
                "Qt",
                "qmake",
                "generic",
                "autotools",
                "meson",
            ]))
            .with_since("1.16"),
        opt("override-url", Str),
        opt("persistent-data-file", Path)
            .with_default("~/.local/state/kdesrc-build-data")
            .with_choices(Choices::Fixed(&[
                "~/.config/kdesrc-build-data",
                "~/.local/state/kdesrc-build-data",
            ]))
            .with_since("1.15"),
        opt("prefix", Path),
        opt("purge-old-logs", Bool).with_default(true),
        opt("qmake-options", Str).with_since("1.16"),
        opt("qtdir", Path),
        opt("remove-after-install", Str)
            .with_default("none")
            .with_choices(Choices::Fixed(&["none", "builddir", "all"])),
        opt("repository", Str).with_since("1.10"),
        opt("revision", Str),
        opt("run-tests", Bool).with_default(false),
        opt("set-env", Str),
        opt("source-dir", Path)
            .with_default("~/kdesrc")
            .with_choices(Choices::Fixed(&["~/kde/src"])),
        opt("ssh-identity-file", Path),
        opt("stop-on-failure", Bool).with_default(false),
        opt("svn-server", Str),
        opt("tag", Str),
        opt("use-clean-install", Bool)
            .with_default(false)
            .with_since("1.12"),
        opt("use-idle-io-priority", Bool)
            .with_default(false)
            .with_since("1.12"),
        opt("use-inactive-modules", Bool)
            .with_default(false)
            .with_since("1.12"),
        opt("use-modules", Str).with_since("1.12.1"),
    ]
}
