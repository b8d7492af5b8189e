//! Block structure of a configuration document
//!
//! Builds on [`LineScanner`] to pair block headers with their `end` lines and
//! answer position queries: which block encloses a line, which option key a
//! line sets, where the includes are.

use std::collections::HashMap;

use crate::scanner::{LineKind, LineScanner, ScannedLine, Span, Token};
use crate::scope::BlockKind;

/// A `global` / `module-set` / `module` / `options` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Header keyword location
    pub keyword: Span,
    /// Name following the keyword (absent for `global`)
    pub name: Option<Token>,
    /// Line of the header
    pub start_line: usize,
    /// Line of the matching `end`, if the block is terminated
    pub end_line: Option<usize>,
    /// Last line belonging to the block (the `end` line when terminated)
    pub last_line: usize,
}

impl Block {
    /// True if the line lies between the header and the `end` line
    pub fn body_contains(&self, line: usize) -> bool {
        line > self.start_line && line <= self.last_line && Some(line) != self.end_line
    }

    /// Text shown for the block in outlines (`module-set kde-workspace`)
    pub fn title(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", self.kind, name.text),
            None => self.kind.to_string(),
        }
    }
}

/// Structural problem found while pairing blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureProblem {
    /// Block header without a matching `end`
    Unterminated { block: usize },
    /// `end X` while a block of a different kind is open
    MismatchedEnd {
        line: usize,
        expected: BlockKind,
        found: Token,
    },
    /// `end` with no open block
    StrayEnd { line: usize, keyword: Span },
}

/// An `include` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Include {
    pub line: usize,
    pub keyword: Span,
    pub path: Option<Token>,
}

/// A `KEY VALUE` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionLine {
    pub key: Token,
    pub value: Option<Token>,
    /// Index of the enclosing block, if any
    pub block: Option<usize>,
}

/// A parsed configuration document
#[derive(Debug, Clone)]
pub struct ConfDocument {
    lines: Vec<String>,
    scanned: Vec<ScannedLine>,
    /// Enclosing block index per line
    enclosing: Vec<Option<usize>>,
    blocks: Vec<Block>,
    problems: Vec<StructureProblem>,
}

impl ConfDocument {
    /// Parse document text.
    ///
    /// Blocks never nest: a header while a block is open terminates the open
    /// block. A bare keyword that needs a name inside an open block is an
    /// option key being typed (`module` on the way to `module-base-path`);
    /// `global` never takes a name and always starts a block.
    pub fn parse(text: &str) -> Self {
        let lines: Vec<String> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();

        let mut scanned = Vec::with_capacity(lines.len());
        let mut enclosing = Vec::with_capacity(lines.len());
        let mut blocks: Vec<Block> = Vec::new();
        let mut problems = Vec::new();
        let mut open: Option<usize> = None;

        for (line_no, line) in lines.iter().enumerate() {
            let mut line_info = LineScanner::scan(line_no, line);

            let demoted = match &line_info.kind {
                LineKind::BlockStart {
                    kind,
                    keyword,
                    name: None,
                } if open.is_some() && kind.takes_name() => Some(keyword.clone()),
                _ => None,
            };
            if let Some(key) = demoted {
                line_info.kind = LineKind::Option { key, value: None };
            }

            let mut inside = None;
            match &line_info.kind {
                LineKind::BlockStart {
                    kind,
                    keyword,
                    name,
                } => {
                    if let Some(idx) = open.take() {
                        blocks[idx].last_line = line_no.saturating_sub(1);
                        problems.push(StructureProblem::Unterminated { block: idx });
                    }
                    blocks.push(Block {
                        kind: *kind,
                        keyword: keyword.span,
                        name: name.clone(),
                        start_line: line_no,
                        end_line: None,
                        last_line: line_no,
                    });
                    open = Some(blocks.len() - 1);
                }
                LineKind::BlockEnd { keyword, target } => match open.take() {
                    Some(idx) => {
                        let block = &mut blocks[idx];
                        block.end_line = Some(line_no);
                        block.last_line = line_no;
                        if let Some(found) = target {
                            if BlockKind::from_keyword(&found.text) != Some(block.kind) {
                                problems.push(StructureProblem::MismatchedEnd {
                                    line: line_no,
                                    expected: block.kind,
                                    found: found.clone(),
                                });
                            }
                        }
                    }
                    None => problems.push(StructureProblem::StrayEnd {
                        line: line_no,
                        keyword: keyword.span,
                    }),
                },
                _ => {
                    if let Some(idx) = open {
                        blocks[idx].last_line = line_no;
                        inside = Some(idx);
                    }
                }
            }

            scanned.push(line_info);
            enclosing.push(inside);
        }

        if let Some(idx) = open {
            problems.push(StructureProblem::Unterminated { block: idx });
        }

        Self {
            lines,
            scanned,
            enclosing,
            blocks,
            problems,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Raw text of a line
    pub fn line(&self, line: usize) -> Option<&str> {
        self.lines.get(line).map(String::as_str)
    }

    /// Scanner classification of a line
    pub fn line_kind(&self, line: usize) -> Option<&LineKind> {
        self.scanned.get(line).map(|s| &s.kind)
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn problems(&self) -> &[StructureProblem] {
        &self.problems
    }

    /// Index of the block whose body contains the line
    pub fn block_index_at(&self, line: usize) -> Option<usize> {
        self.enclosing.get(line).copied().flatten()
    }

    /// The block whose body contains the line
    pub fn block_at(&self, line: usize) -> Option<&Block> {
        self.block_index_at(line).map(|idx| &self.blocks[idx])
    }

    /// Kind of the block enclosing the line, if any
    pub fn scope_at(&self, line: usize) -> Option<BlockKind> {
        self.block_at(line).map(|b| b.kind)
    }

    /// True if the byte column is inside a comment
    pub fn is_comment_at(&self, line: usize, column: usize) -> bool {
        match self.scanned.get(line) {
            Some(info) => match info.comment_start {
                Some(start) => column > start,
                None => false,
            },
            None => false,
        }
    }

    /// Option key set on the line, if the line is a `KEY VALUE` line
    pub fn option_key_at_line(&self, line: usize) -> Option<&Token> {
        match self.line_kind(line) {
            Some(LineKind::Option { key, .. }) => Some(key),
            _ => None,
        }
    }

    fn option_line(&self, line: usize) -> Option<OptionLine> {
        match &self.scanned.get(line)?.kind {
            LineKind::Option { key, value } => Some(OptionLine {
                key: key.clone(),
                value: value.clone(),
                block: self.block_index_at(line),
            }),
            _ => None,
        }
    }

    /// All option lines in document order
    pub fn option_lines(&self) -> Vec<OptionLine> {
        (0..self.scanned.len())
            .filter_map(|line| self.option_line(line))
            .collect()
    }

    /// Option lines inside the given block
    pub fn options_in_block(&self, block: usize) -> Vec<OptionLine> {
        let Some(found) = self.blocks.get(block) else {
            return Vec::new();
        };
        (found.start_line..=found.last_line)
            .filter_map(|line| self.option_line(line))
            .filter(|opt| opt.block == Some(block))
            .collect()
    }

    /// All include directives in document order
    pub fn includes(&self) -> Vec<Include> {
        self.scanned
            .iter()
            .enumerate()
            .filter_map(|(line_no, info)| match &info.kind {
                LineKind::Include { keyword, path } => Some(Include {
                    line: line_no,
                    keyword: keyword.span,
                    path: path.clone(),
                }),
                _ => None,
            })
            .collect()
    }

    /// Values set in the global block, used to expand `${option}` references
    pub fn global_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::new();
        for opt in self.option_lines() {
            let in_global = opt
                .block
                .map(|idx| self.blocks[idx].kind == BlockKind::Global)
                .unwrap_or(false);
            if let (true, Some(value)) = (in_global, opt.value) {
                values.insert(opt.key.text, value.text);
            }
        }
        values
    }
}
