//! Line-by-line scanner for kdesrc-build configuration files
//!
//! Classifies each physical line's role. The scanner is context free; the
//! block structure is recovered afterwards by [`crate::document::ConfDocument`].

use regex::Regex;
use std::sync::OnceLock;

use crate::scope::BlockKind;

/// A byte range on a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Zero-based line number
    pub line: usize,
    /// Start byte column (inclusive)
    pub start: usize,
    /// End byte column (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    /// True if the byte column lies within the span, end inclusive
    pub fn touches(&self, line: usize, column: usize) -> bool {
        self.line == line && self.start <= column && column <= self.end
    }
}

/// A piece of text together with its location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub span: Span,
}

impl Token {
    fn from_match(line: usize, m: regex::Match<'_>) -> Self {
        Self {
            text: m.as_str().to_string(),
            span: Span::new(line, m.start(), m.end()),
        }
    }
}

/// Structural role of a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// Empty or whitespace only
    Blank,
    /// Nothing but a comment
    Comment,
    /// `global`, `module-set NAME`, `module NAME`, `options NAME`
    BlockStart {
        kind: BlockKind,
        keyword: Token,
        name: Option<Token>,
    },
    /// `end`, optionally followed by a block keyword
    BlockEnd {
        keyword: Token,
        target: Option<Token>,
    },
    /// `include PATH`
    Include {
        keyword: Token,
        path: Option<Token>,
    },
    /// `KEY [VALUE]`
    Option { key: Token, value: Option<Token> },
}

/// Result of scanning one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    pub kind: LineKind,
    /// Byte column where a `#` comment begins, if any
    pub comment_start: Option<usize>,
}

impl LineKind {
    /// The block kind an `end` line names, if it names a known one
    pub fn end_target(&self) -> Option<BlockKind> {
        match self {
            LineKind::BlockEnd {
                target: Some(target),
                ..
            } => BlockKind::from_keyword(&target.text),
            _ => None,
        }
    }
}

/// Scanner for configuration lines
pub struct LineScanner;

impl LineScanner {
    /// Analyze a single line (without its terminator)
    pub fn scan(line_no: usize, line: &str) -> ScannedLine {
        static BLOCK_RE: OnceLock<Regex> = OnceLock::new();
        static END_RE: OnceLock<Regex> = OnceLock::new();
        static INCLUDE_RE: OnceLock<Regex> = OnceLock::new();
        static OPTION_RE: OnceLock<Regex> = OnceLock::new();

        let block_re = BLOCK_RE.get_or_init(|| {
            Regex::new(r"^\s*(global|module-set|module|options)(?:\s+(\S+))?\s*$").unwrap()
        });
        let end_re = END_RE.get_or_init(|| Regex::new(r"^\s*(end)(?:\s+(\S+))?\s*$").unwrap());
        let include_re =
            INCLUDE_RE.get_or_init(|| Regex::new(r"^\s*(include)(?:\s+(.*?))?\s*$").unwrap());
        let option_re =
            OPTION_RE.get_or_init(|| Regex::new(r"^\s*(\S+)(?:\s+(.*?))?\s*$").unwrap());

        let comment_start = Self::find_comment(line);
        let code = &line[..comment_start.unwrap_or(line.len())];

        if code.trim().is_empty() {
            let kind = if comment_start.is_some() {
                LineKind::Comment
            } else {
                LineKind::Blank
            };
            return ScannedLine {
                kind,
                comment_start,
            };
        }

        let non_empty = |m: Option<regex::Match<'_>>| {
            m.filter(|m| !m.as_str().is_empty())
                .map(|m| Token::from_match(line_no, m))
        };

        let kind = if let Some(caps) = block_re.captures(code) {
            let keyword = Token::from_match(line_no, caps.get(1).unwrap());
            // The alternation only matches known keywords.
            let kind = BlockKind::from_keyword(&keyword.text).unwrap_or(BlockKind::Module);
            LineKind::BlockStart {
                kind,
                keyword,
                name: non_empty(caps.get(2)),
            }
        } else if let Some(caps) = end_re.captures(code) {
            LineKind::BlockEnd {
                keyword: Token::from_match(line_no, caps.get(1).unwrap()),
                target: non_empty(caps.get(2)),
            }
        } else if let Some(caps) = include_re.captures(code) {
            LineKind::Include {
                keyword: Token::from_match(line_no, caps.get(1).unwrap()),
                path: non_empty(caps.get(2)),
            }
        } else if let Some(caps) = option_re.captures(code) {
            LineKind::Option {
                key: Token::from_match(line_no, caps.get(1).unwrap()),
                value: non_empty(caps.get(2)),
            }
        } else {
            LineKind::Blank
        };

        ScannedLine {
            kind,
            comment_start,
        }
    }

    /// A `#` starts a comment at line start or after whitespace.
    fn find_comment(line: &str) -> Option<usize> {
        let mut prev_is_space = true;
        for (idx, ch) in line.char_indices() {
            if ch == '#' && prev_is_space {
                return Some(idx);
            }
            prev_is_space = ch.is_whitespace();
        }
        None
    }
}
