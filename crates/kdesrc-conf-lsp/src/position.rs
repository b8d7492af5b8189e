//! Conversion between document byte columns and LSP positions
//!
//! The core crate reports spans as byte columns; LSP positions count UTF-16
//! code units.

use kdesrc_conf_core::{ConfDocument, Span};
use tower_lsp::lsp_types::{Position, Range};

/// Number of UTF-16 code units in `text`
pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

/// UTF-16 column of a byte column on `line`
pub fn byte_to_utf16(line: &str, byte: usize) -> u32 {
    let mut end = byte.min(line.len());
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    utf16_len(&line[..end])
}

/// Byte column of a UTF-16 column on `line`, clamped to the line length
pub fn utf16_to_byte(line: &str, character: u32) -> usize {
    let mut units = 0u32;
    for (idx, ch) in line.char_indices() {
        if units >= character {
            return idx;
        }
        units += ch.len_utf16() as u32;
    }
    line.len()
}

/// Line and byte column addressed by an LSP position
pub fn to_byte_position(document: &ConfDocument, position: Position) -> Option<(usize, usize)> {
    let line_no = position.line as usize;
    let line = document.line(line_no)?;
    Some((line_no, utf16_to_byte(line, position.character)))
}

/// LSP position of a byte column
pub fn to_position(document: &ConfDocument, line: usize, byte: usize) -> Position {
    let character = document
        .line(line)
        .map(|text| byte_to_utf16(text, byte))
        .unwrap_or(0);
    Position::new(line as u32, character)
}

/// LSP range covering a span
pub fn span_to_range(document: &ConfDocument, span: Span) -> Range {
    Range::new(
        to_position(document, span.line, span.start),
        to_position(document, span.line, span.end),
    )
}

/// LSP range covering a whole line, without its terminator
pub fn line_range(document: &ConfDocument, line: usize) -> Range {
    let end = document.line(line).map(utf16_len).unwrap_or(0);
    Range::new(Position::new(line as u32, 0), Position::new(line as u32, end))
}
