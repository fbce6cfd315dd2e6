//! Document tree back to canonical markup.
//!
//! Sibling blocks are separated by one blank line. Container bodies are
//! normalized (no leading newlines, no trailing whitespace) so that
//! parse and serialize reach a fixed point after one pass.

pub mod blocks;
pub mod inline;
pub mod quote;

use crate::model::{Block, Document};
use crate::options::MarkupOptions;

pub use blocks::BlockSerializer;
pub use inline::serialize_inline;
pub use quote::{to_display_form, to_storage_form};

/// Serializes with default options.
pub fn serialize(doc: &Document) -> String {
    serialize_with(doc, &MarkupOptions::default())
}

pub fn serialize_with(doc: &Document, options: &MarkupOptions) -> String {
    serialize_blocks(&doc.content, options)
}

pub fn serialize_blocks(blocks: &[Block], options: &MarkupOptions) -> String {
    BlockSerializer { options }.blocks(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Language, TextRun};
    use crate::parsing::parse_markup;
    use insta::assert_snapshot;

    fn para(text: &str) -> Block {
        Block::paragraph(vec![TextRun::plain(text)])
    }

    #[test]
    fn conditional_block_layout() {
        let doc = Document::new(vec![Block::conditional(
            "is vip",
            vec![para("Hello"), para("World")],
        )]);
        assert_snapshot!(serialize(&doc), @r"
        ((is vip??
        Hello

        World
        ))
        ");
    }

    #[test]
    fn empty_conditional_block_is_stable() {
        let doc = Document::new(vec![Block::conditional("a", vec![Block::empty_paragraph()])]);
        let text = serialize(&doc);
        assert_eq!(text, "((a??\n\n))");
        assert_eq!(parse_markup(&text), doc);
    }

    #[test]
    fn language_block_layout() {
        let doc = Document::new(vec![Block::language(Language::Fr, vec![para("Bonjour")])]);
        assert_eq!(serialize(&doc), "[[fr]]\nBonjour\n[[/fr]]");
    }

    #[test]
    fn lists_and_quotes() {
        let text = "- a\n- b\n  still b\n\n^ quoted\n^\n^ more\n\n2. x\n3. y";
        assert_eq!(serialize(&parse_markup(text)), text);
    }

    #[test]
    fn quote_marker_follows_options() {
        let doc = parse_markup("> hi");
        let options = MarkupOptions {
            quote_marker: '>',
            ..MarkupOptions::default()
        };
        assert_eq!(serialize_with(&doc, &options), "> hi");
        assert_eq!(serialize(&doc), "^ hi");
    }
}
