//! Structural intelligence for kdesrc-conf LSP
//!
//! This module provides document structure analysis for:
//! - Folding ranges (blocks, comment runs)
//! - Document symbols (outline view)

pub mod folding;
pub mod symbols;

pub use folding::FoldingAnalyzer;
pub use symbols::SymbolAnalyzer;

#[cfg(test)]
mod tests;
