//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use serde::Serialize;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};

use kdesrc_conf_core::modules::fetch_module_list;
use kdesrc_conf_core::{BlockKind, OptionRegistry};
use kdesrc_conf_lsp::{ConfEngine, Settings};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

/// Block kind accepted by `options --block`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockArg {
    Global,
    ModuleSet,
    Module,
    Options,
}

impl From<BlockArg> for BlockKind {
    fn from(arg: BlockArg) -> Self {
        match arg {
            BlockArg::Global => BlockKind::Global,
            BlockArg::ModuleSet => BlockKind::ModuleSet,
            BlockArg::Module => BlockKind::Module,
            BlockArg::Options => BlockKind::Options,
        }
    }
}

#[derive(Parser)]
#[command(name = "kdesrc-conf")]
#[command(author, version, about = "Check and explore kdesrc-build configuration files", long_about = None)]
struct Cli {
    /// Settings file (defaults to kdesrc-conf.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check configuration files for unknown, misplaced and deprecated options
    Check {
        /// Files or glob patterns to check
        #[arg(required = true)]
        files: Vec<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List known options
    Options {
        /// Only options that may be set in this kind of block
        #[arg(short, long, value_enum)]
        block: Option<BlockArg>,
    },

    /// Show the documentation of an option
    Describe {
        /// Option name
        option: String,
    },

    /// List the modules kdesrc-build would build
    Modules,

    /// Run the language server on stdin/stdout
    Lsp,
}

/// Diagnostics of one checked file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileReport {
    pub fn count(&self, severity: DiagnosticSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Some(severity))
            .count()
    }
}

/// Totals over all checked files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Lsp = cli.command {
        return lsp_command();
    }

    init_logging();
    let (settings, root) = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Check { files, format } => {
            let registry = load_registry(&settings, root.as_deref())?;
            let summary = check_command(&files, format, registry, &settings)?;
            // Exit with error code if there are errors
            if summary.errors > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Options { block } => {
            let registry = load_registry(&settings, root.as_deref())?;
            for line in options_command(&registry, block.map(BlockKind::from)) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Describe { option } => {
            let registry = load_registry(&settings, root.as_deref())?;
            println!("{}", describe_command(&registry, &option)?);
            Ok(())
        }
        Commands::Modules => {
            for name in modules_command(&settings)? {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Lsp => lsp_command(),
    }
}

/// Execute the check command
pub fn check_command(
    patterns: &[String],
    format: OutputFormat,
    registry: OptionRegistry,
    settings: &Settings,
) -> Result<CheckSummary> {
    let files = expand_inputs(patterns)?;
    let engine = ConfEngine::with_parts(registry.into(), Default::default());

    let reports = files
        .iter()
        .map(|file| check_file(&engine, file, settings))
        .collect::<Result<Vec<_>>>()?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("Failed to serialize diagnostics to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for report in &reports {
                if report.diagnostics.is_empty() {
                    println!("✓ No issues found in {}", report.file.display());
                } else {
                    for line in format_report(report) {
                        println!("{}", line);
                    }
                }
            }
        }
    }

    let summary = summarize(&reports);
    if format == OutputFormat::Text && summary.errors + summary.warnings > 0 {
        println!(
            "Found {} error(s) and {} warning(s) in {} file(s)",
            summary.errors, summary.warnings, summary.files
        );
    }
    Ok(summary)
}

/// Validate a single file
pub fn check_file(engine: &ConfEngine, file: &Path, settings: &Settings) -> Result<FileReport> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read input file: {}", file.display()))?;

    Ok(FileReport {
        file: file.to_path_buf(),
        diagnostics: engine.validate_document(&content, &settings.diagnostics),
    })
}

/// One `file:line:column: severity[code]: message` line per diagnostic
pub fn format_report(report: &FileReport) -> Vec<String> {
    report
        .diagnostics
        .iter()
        .map(|d| {
            let code = match &d.code {
                Some(NumberOrString::String(code)) => format!("[{code}]"),
                Some(NumberOrString::Number(code)) => format!("[{code}]"),
                None => String::new(),
            };
            format!(
                "{}:{}:{}: {}{}: {}",
                report.file.display(),
                d.range.start.line + 1,
                d.range.start.character + 1,
                severity_label(d.severity),
                code,
                d.message
            )
        })
        .collect()
}

pub fn summarize(reports: &[FileReport]) -> CheckSummary {
    CheckSummary {
        files: reports.len(),
        errors: reports
            .iter()
            .map(|r| r.count(DiagnosticSeverity::ERROR))
            .sum(),
        warnings: reports
            .iter()
            .map(|r| r.count(DiagnosticSeverity::WARNING))
            .sum(),
    }
}

fn severity_label(severity: Option<DiagnosticSeverity>) -> &'static str {
    match severity {
        Some(DiagnosticSeverity::ERROR) => "error",
        Some(DiagnosticSeverity::WARNING) => "warning",
        Some(DiagnosticSeverity::INFORMATION) => "info",
        _ => "hint",
    }
}

/// Expand glob patterns; plain paths must exist
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            let path = PathBuf::from(pattern);
            if !path.is_file() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            files.push(path);
            continue;
        }

        let before = files.len();
        for entry in glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => eprintln!("Warning: Could not read {}", e),
            }
        }
        if files.len() == before {
            anyhow::bail!("No files match {}", pattern);
        }
    }

    Ok(files)
}

/// Execute the options command: one line per option, sorted by name
pub fn options_command(registry: &OptionRegistry, block: Option<BlockKind>) -> Vec<String> {
    registry
        .iter()
        .filter(|option| block.map_or(true, |kind| kind.may_contain(option.restriction)))
        .map(|option| {
            let mut line = format!("{:<32} {:<8}", option.name, option.ty.to_string());
            if let Some(default) = option.get_default() {
                line.push_str(&format!(" default: {}", default));
            }
            if option.deprecated {
                line.push_str(" (deprecated)");
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Execute the describe command
pub fn describe_command(registry: &OptionRegistry, name: &str) -> Result<String> {
    match registry.get(name) {
        Some(option) => Ok(option.render_markdown()),
        None => {
            let similar: Vec<&str> = registry
                .iter()
                .map(|option| option.name)
                .filter(|candidate| candidate.contains(name))
                .collect();
            if similar.is_empty() {
                anyhow::bail!("Unknown option: {}", name);
            }
            anyhow::bail!("Unknown option: {} (similar: {})", name, similar.join(", "))
        }
    }
}

/// Execute the modules command
pub fn modules_command(settings: &Settings) -> Result<Vec<String>> {
    fetch_module_list(&settings.modules.command).with_context(|| {
        format!(
            "Failed to fetch list of modules with `{}`",
            settings.modules.command.join(" ")
        )
    })
}

/// Execute the lsp command
pub fn lsp_command() -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to start the async runtime")?;
    runtime.block_on(kdesrc_conf_lsp::run_server());
    Ok(())
}

/// Load settings from a config file or the current directory.
///
/// Also returns the directory relative catalog paths are resolved against.
fn load_settings(config_path: Option<&Path>) -> Result<(Settings, Option<PathBuf>)> {
    match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            let settings = Settings::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))?;
            Ok((settings, path.parent().map(Path::to_path_buf)))
        }
        None => {
            let cwd = std::env::current_dir().ok();
            let settings = cwd
                .as_deref()
                .and_then(Settings::load_from_dir)
                .unwrap_or_default();
            Ok((settings, cwd))
        }
    }
}

/// Option registry, documented by the configured catalog when there is one
pub fn load_registry(settings: &Settings, root: Option<&Path>) -> Result<OptionRegistry> {
    match settings.catalog_path(root) {
        Some(path) => OptionRegistry::with_catalog_file(&path)
            .with_context(|| format!("Failed to load option catalog: {}", path.display())),
        None => Ok(OptionRegistry::builtin()),
    }
}

/// Warnings and errors to stderr, `RUST_LOG` overrides
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
