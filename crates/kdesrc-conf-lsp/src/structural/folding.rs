//! Folding range generation for configuration documents
//!
//! Generates LSP folding ranges for:
//! - Blocks, from the header to the `end` line (or the last line of an
//!   unterminated block)
//! - Runs of consecutive comment lines

use kdesrc_conf_core::{ConfDocument, LineKind};
use tower_lsp::lsp_types::{FoldingRange, FoldingRangeKind};

/// Analyzer for generating folding ranges
pub struct FoldingAnalyzer;

impl FoldingAnalyzer {
    /// Generate folding ranges for the entire document
    pub fn generate_ranges(text: &str) -> Vec<FoldingRange> {
        let document = ConfDocument::parse(text);
        let mut ranges = Vec::new();

        for block in document.blocks() {
            if block.last_line > block.start_line {
                ranges.push(Self::fold(
                    block.start_line,
                    block.last_line,
                    FoldingRangeKind::Region,
                ));
            }
        }

        // ----- COMMENT RUNS -----
        let mut comment_start: Option<usize> = None;
        for line in 0..document.line_count() {
            let is_comment = matches!(document.line_kind(line), Some(LineKind::Comment));
            match (is_comment, comment_start) {
                (true, None) => comment_start = Some(line),
                (false, Some(start)) => {
                    // Only fold runs of at least 2 lines
                    if line - start >= 2 {
                        ranges.push(Self::fold(start, line - 1, FoldingRangeKind::Comment));
                    }
                    comment_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = comment_start {
            let last_line = document.line_count() - 1;
            if last_line > start {
                ranges.push(Self::fold(start, last_line, FoldingRangeKind::Comment));
            }
        }

        ranges.sort_by_key(|r| (r.start_line, r.end_line));
        ranges
    }

    fn fold(start_line: usize, end_line: usize, kind: FoldingRangeKind) -> FoldingRange {
        FoldingRange {
            start_line: start_line as u32,
            end_line: end_line as u32,
            kind: Some(kind),
            start_character: None,
            end_character: None,
            collapsed_text: None,
        }
    }
}
