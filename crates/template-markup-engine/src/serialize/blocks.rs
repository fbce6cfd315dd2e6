use crate::model::Block;
use crate::options::MarkupOptions;
use crate::parsing::blocks::kinds::{ConditionalBlock, LanguageBlock, ListMarker, ThematicBreak};

use super::inline::serialize_inline;

/// Separator between sibling blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

fn is_empty_paragraph(block: &Block) -> bool {
    matches!(block, Block::Paragraph { content } if content.iter().all(|run| run.text.is_empty()))
}

pub struct BlockSerializer<'a> {
    pub options: &'a MarkupOptions,
}

impl BlockSerializer<'_> {
    /// Serializes siblings. Empty paragraphs have no markup of their own and
    /// are skipped; the parser gives an empty container its paragraph back.
    pub fn blocks(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .filter(|b| !is_empty_paragraph(b))
            .map(|b| self.block(b))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    pub fn block(&self, block: &Block) -> String {
        match block {
            Block::Paragraph { content } => serialize_inline(content, self.options),
            Block::Heading { level, content } => format!(
                "{} {}",
                "#".repeat(usize::from(*level)),
                serialize_inline(content, self.options)
            ),
            Block::BulletList { content } => self.list(content, None),
            Block::OrderedList { start, content } => self.list(content, Some(*start)),
            Block::ListItem { content } => self.blocks(content),
            Block::Blockquote { content } => self.quote(content),
            Block::HorizontalRule => ThematicBreak::CANONICAL.to_string(),
            Block::ConditionalBlock { condition, content } => format!(
                "(({}??\n{}\n{}",
                self.options.condition_or_default(condition),
                normalize_body(&self.blocks(content)),
                ConditionalBlock::CLOSE
            ),
            Block::LanguageBlock { language, content } => format!(
                "{}\n{}\n{}",
                LanguageBlock::open_marker(*language),
                normalize_body(&self.blocks(content)),
                LanguageBlock::close_marker(*language)
            ),
        }
    }

    /// Items joined by single newlines; continuation lines indented to the
    /// item's content column.
    fn list(&self, items: &[Block], ordered_start: Option<u64>) -> String {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let marker = ListMarker::render(ordered_start, i);
                let body = self.blocks(item.children().unwrap_or_default());
                let pad = " ".repeat(marker.len());
                let mut lines = body.split('\n');
                let mut out = format!("{marker}{}", lines.next().unwrap_or_default());
                for line in lines {
                    out.push('\n');
                    if !line.is_empty() {
                        out.push_str(&pad);
                        out.push_str(line);
                    }
                }
                out
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn quote(&self, content: &[Block]) -> String {
        let marker = self.options.quote_marker;
        self.blocks(content)
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    marker.to_string()
                } else {
                    format!("{marker} {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Strips leading newlines and trailing whitespace so repeated round trips do
/// not accumulate blank lines inside a container.
pub fn normalize_body(body: &str) -> &str {
    body.trim_start_matches('\n').trim_end()
}
