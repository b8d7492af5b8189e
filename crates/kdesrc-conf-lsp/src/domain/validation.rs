//! Diagnostics for configuration documents
//!
//! | Code   | Rule                                        |
//! |--------|---------------------------------------------|
//! | KSB001 | unknown option                              |
//! | KSB002 | option not permitted in the enclosing block |
//! | KSB003 | deprecated option                           |
//! | KSB004 | block without `end`                         |
//! | KSB005 | `end` of the wrong kind, or without a block |
//! | KSB006 | option outside of any block                 |

use kdesrc_conf_core::{ConfDocument, OptionRegistry, Span, StructureProblem};
use tower_lsp::lsp_types::{Diagnostic, DiagnosticTag, NumberOrString};

use crate::config::{DiagnosticSettings, RuleSeverity};
use crate::position::span_to_range;

/// Source reported on every diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "kdesrc-conf";

pub const UNKNOWN_OPTION: &str = "KSB001";
pub const WRONG_SCOPE: &str = "KSB002";
pub const DEPRECATED_OPTION: &str = "KSB003";
pub const UNTERMINATED_BLOCK: &str = "KSB004";
pub const MISMATCHED_END: &str = "KSB005";
pub const OUTSIDE_BLOCK: &str = "KSB006";

/// Checks documents against the option registry
pub struct ConfValidator<'a> {
    registry: &'a OptionRegistry,
    settings: &'a DiagnosticSettings,
}

impl<'a> ConfValidator<'a> {
    pub fn new(registry: &'a OptionRegistry, settings: &'a DiagnosticSettings) -> Self {
        Self { registry, settings }
    }

    /// Validate a document, ordered by position
    pub fn validate(&self, document: &ConfDocument) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        self.check_structure(document, &mut diagnostics);
        self.check_options(document, &mut diagnostics);
        diagnostics.sort_by_key(|d| (d.range.start.line, d.range.start.character));
        diagnostics
    }

    fn check_structure(&self, document: &ConfDocument, out: &mut Vec<Diagnostic>) {
        for problem in document.problems() {
            match problem {
                StructureProblem::Unterminated { block } => {
                    let block = &document.blocks()[*block];
                    self.push(
                        out,
                        document,
                        block.keyword,
                        self.settings.unterminated_block,
                        UNTERMINATED_BLOCK,
                        format!(
                            "`{}` is not terminated, expected `end {}`",
                            block.title(),
                            block.kind
                        ),
                    );
                }
                StructureProblem::MismatchedEnd {
                    expected, found, ..
                } => {
                    self.push(
                        out,
                        document,
                        found.span,
                        self.settings.mismatched_end,
                        MISMATCHED_END,
                        format!("Expected `end {expected}`, found `end {}`", found.text),
                    );
                }
                StructureProblem::StrayEnd { keyword, .. } => {
                    self.push(
                        out,
                        document,
                        *keyword,
                        self.settings.mismatched_end,
                        MISMATCHED_END,
                        "`end` without an open block".to_string(),
                    );
                }
            }
        }
    }

    fn check_options(&self, document: &ConfDocument, out: &mut Vec<Diagnostic>) {
        for line in document.option_lines() {
            let key = &line.key;

            let Some(block) = line.block.map(|idx| &document.blocks()[idx]) else {
                self.push(
                    out,
                    document,
                    key.span,
                    self.settings.outside_block,
                    OUTSIDE_BLOCK,
                    format!("`{}` is set outside of any block", key.text),
                );
                continue;
            };

            let Some(option) = self.registry.get(&key.text) else {
                self.push(
                    out,
                    document,
                    key.span,
                    self.settings.unknown_option,
                    UNKNOWN_OPTION,
                    format!("Unknown option `{}`", key.text),
                );
                continue;
            };

            if option.deprecated {
                if let Some(diagnostic) = self.make(
                    document,
                    key.span,
                    self.settings.deprecated,
                    DEPRECATED_OPTION,
                    format!("`{}` is deprecated", option.name),
                ) {
                    out.push(Diagnostic {
                        tags: Some(vec![DiagnosticTag::DEPRECATED]),
                        ..diagnostic
                    });
                }
            }

            if !block.kind.may_contain(option.restriction) {
                self.push(
                    out,
                    document,
                    key.span,
                    self.settings.wrong_scope,
                    WRONG_SCOPE,
                    format!(
                        "`{}` cannot be used in a `{}` block (allowed in: {})",
                        option.name,
                        block.kind,
                        option.restriction.describe()
                    ),
                );
            }
        }
    }

    fn push(
        &self,
        out: &mut Vec<Diagnostic>,
        document: &ConfDocument,
        span: Span,
        severity: RuleSeverity,
        code: &str,
        message: String,
    ) {
        if let Some(diagnostic) = self.make(document, span, severity, code, message) {
            out.push(diagnostic);
        }
    }

    fn make(
        &self,
        document: &ConfDocument,
        span: Span,
        severity: RuleSeverity,
        code: &str,
        message: String,
    ) -> Option<Diagnostic> {
        let severity = severity.to_diagnostic_severity()?;
        Some(Diagnostic {
            range: span_to_range(document, span),
            severity: Some(severity),
            code: Some(NumberOrString::String(code.to_string())),
            source: Some(DIAGNOSTIC_SOURCE.to_string()),
            message,
            ..Default::default()
        })
    }
}
