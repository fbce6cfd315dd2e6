//! Markup text to document tree.
//!
//! Source text is split into lines over an `xi_rope::Rope`, blocks are built
//! from classified lines, then each text block's content is parsed inline.

pub mod blocks;
pub mod inline;
pub mod rope;
pub mod scanner;

use xi_rope::Rope;

use crate::model::{Block, Document};
use blocks::{BlockBuilder, ContentLine};
use rope::lines_with_spans;

/// Which template constructs may open at the current nesting.
///
/// Narrowed as the parser descends: nothing inside a conditional block (or
/// inside inline conditional content) may be conditional again, and language
/// blocks do not nest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseContext {
    pub allow_conditional: bool,
    pub allow_language_block: bool,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self {
            allow_conditional: true,
            allow_language_block: true,
        }
    }
}

impl ParseContext {
    #[must_use]
    pub fn inside_conditional(self) -> Self {
        Self {
            allow_conditional: false,
            ..self
        }
    }

    #[must_use]
    pub fn inside_language_block(self) -> Self {
        Self {
            allow_language_block: false,
            ..self
        }
    }
}

/// Parses stored markup into a document.
pub fn parse_markup(text: &str) -> Document {
    parse_rope(&Rope::from(text))
}

pub fn parse_rope(rope: &Rope) -> Document {
    Document::new(parse_lines(rope, ParseContext::default()))
}

/// Parses markup into blocks under an explicit context, as used for pasting
/// into an existing container.
pub fn parse_blocks(text: &str, ctx: ParseContext) -> Vec<Block> {
    parse_lines(&Rope::from(text), ctx)
}

fn parse_lines(rope: &Rope, ctx: ParseContext) -> Vec<Block> {
    let lines: Vec<ContentLine> = lines_with_spans(rope)
        .map(|lr| ContentLine::from_line_ref(&lr))
        .collect();
    BlockBuilder::new(ctx).build(&lines)
}
