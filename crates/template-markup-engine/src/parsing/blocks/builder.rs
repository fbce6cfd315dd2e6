use crate::model::{Block, Language, TextRun};
use crate::parsing::{ParseContext, inline::parse_inline, rope::span::Span, scanner::scan_markers};

use super::{
    classify::{LineClass, TemplateLineClassifier},
    content::ContentLine,
    kinds::{BlockQuote, ConditionalBlock, Heading, LanguageBlock, ListMarker, Paragraph},
    open::BlockOpen,
};

#[derive(Debug, Clone)]
enum LeafState {
    None,
    Paragraph { start: Span, lines: Vec<String> },
}

/// Phase 2 of block parsing: turns classified lines into blocks.
///
/// Containers (quotes, list items, conditional and language blocks) collect
/// their lines, strip their prefixes and hand them to a nested builder with
/// the context narrowed as needed.
pub struct BlockBuilder {
    classifier: TemplateLineClassifier,
    leaf: LeafState,
    out: Vec<Block>,
}

impl BlockBuilder {
    pub fn new(ctx: ParseContext) -> Self {
        Self {
            classifier: TemplateLineClassifier { ctx },
            leaf: LeafState::None,
            out: vec![],
        }
    }

    fn ctx(&self) -> ParseContext {
        self.classifier.ctx
    }

    pub fn build(mut self, lines: &[ContentLine]) -> Vec<Block> {
        let mut i = 0;
        while i < lines.len() {
            let class = self.classifier.classify(&lines[i]);
            if class.is_blank {
                self.flush_paragraph();
                i += 1;
                continue;
            }
            if let Some(consumed) = self.try_open_block(&class, &lines[i..]) {
                i += consumed;
                continue;
            }
            self.extend_paragraph(&lines[i]);
            i += 1;
        }
        self.finish()
    }

    pub fn finish(mut self) -> Vec<Block> {
        self.flush_paragraph();
        self.out
    }

    /// Opens the block announced by `class`, returning how many lines it used.
    fn try_open_block(&mut self, class: &LineClass, lines: &[ContentLine]) -> Option<usize> {
        let open = class.open.as_ref()?;
        let (block, consumed) = match open {
            BlockOpen::Conditional { condition, body_at } => {
                self.collect_conditional(condition, *body_at, lines)?
            }
            BlockOpen::Language { language, body_at } => {
                self.collect_language(*language, *body_at, lines)?
            }
            BlockOpen::Rule => (Block::HorizontalRule, 1),
            BlockOpen::Heading { level } => {
                let (_, text) = Heading::parse(lines[0].text.trim_start())?;
                let block = Block::Heading {
                    level: *level,
                    content: parse_inline(text, self.ctx()),
                };
                (block, 1)
            }
            BlockOpen::Quote => self.collect_quote(lines),
            BlockOpen::ListItem { .. } if class.indent > 3 => return None,
            BlockOpen::ListItem { marker, .. } => self.collect_list(*marker, lines),
        };
        self.flush_paragraph();
        self.out.push(block);
        Some(consumed)
    }

    /// Collects `((condition??` .. `))`, carrying marker depth across lines.
    ///
    /// Declines when the terminator sits on the opening line (that is an inline
    /// conditional), when text follows the terminator, or when none is found.
    fn collect_conditional(
        &self,
        condition: &str,
        body_at: usize,
        lines: &[ContentLine],
    ) -> Option<(Block, usize)> {
        let first = lines[0].skip(leading_ws(&lines[0].text) + body_at);
        let scan = scan_markers(&first.text, 0);
        if scan.found() {
            return None;
        }

        let mut body = vec![];
        if !first.is_blank() {
            body.push(first.clone());
        }
        let mut depth = scan.depth;
        for (j, line) in lines.iter().enumerate().skip(1) {
            let scan = scan_markers(&line.text, depth);
            let Some(close) = scan.close else {
                depth = scan.depth;
                body.push(line.clone());
                continue;
            };
            let after = &line.text[close + ConditionalBlock::CLOSE.len()..];
            if !after.trim().is_empty() {
                log::trace!(
                    "declined conditional block at {:?}: text after closing marker",
                    lines[0].content
                );
                return None;
            }
            let before = ContentLine::new(&line.text[..close], line.content.start);
            if !before.is_blank() {
                body.push(before);
            }
            let children = non_empty(
                BlockBuilder::new(self.ctx().inside_conditional()).build(&body),
            );
            return Some((Block::conditional(condition, children), j + 1));
        }
        log::trace!("unterminated conditional block at {:?}", lines[0].content);
        None
    }

    /// Collects `[[xx]]` .. `[[/xx]]`. Text after the opener on the same line
    /// becomes the first paragraph. A close marker followed by more text on
    /// its line does not close the block.
    fn collect_language(
        &self,
        language: Language,
        body_at: usize,
        lines: &[ContentLine],
    ) -> Option<(Block, usize)> {
        let close_len = LanguageBlock::close_marker(language).len();
        let first = lines[0].skip(leading_ws(&lines[0].text) + body_at);

        let mut body = vec![];
        let mut end = None;
        for (j, line) in std::iter::once(&first).chain(lines.iter().skip(1)).enumerate() {
            match LanguageBlock::find_close(&line.text, language) {
                Some(close) if line.text[close + close_len..].trim().is_empty() => {
                    let before = ContentLine::new(&line.text[..close], line.content.start);
                    if !before.is_blank() {
                        body.push(before);
                    }
                    end = Some(j + 1);
                    break;
                }
                Some(_) => {
                    log::trace!("close marker with trailing text kept as body: {:?}", line.text);
                    body.push(line.clone());
                }
                None => body.push(line.clone()),
            }
        }
        let consumed = end?;
        let children = non_empty(
            BlockBuilder::new(self.ctx().inside_language_block()).build(&body),
        );
        Some((Block::language(language, children), consumed))
    }

    /// Collects consecutive quote-marked lines.
    fn collect_quote(&self, lines: &[ContentLine]) -> (Block, usize) {
        let mut inner = vec![];
        for line in lines {
            let lead = leading_ws(&line.text);
            let Some(offset) = BlockQuote::content_offset(&line.text[lead..]) else {
                break;
            };
            inner.push(line.skip(lead + offset));
        }
        let consumed = inner.len();
        let children = non_empty(BlockBuilder::new(self.ctx()).build(&inner));
        (Block::Blockquote { content: children }, consumed)
    }

    /// Collects the items of one list.
    ///
    /// An item continues while lines are indented at least as far as its
    /// content. Blank lines stay inside the item only when an indented line
    /// follows them.
    fn collect_list(&self, first_marker: ListMarker, lines: &[ContentLine]) -> (Block, usize) {
        let mut items = vec![];
        let mut i = 0;
        while i < lines.len() {
            let lead = leading_ws(&lines[i].text);
            let Some((marker, width)) = ListMarker::parse(&lines[i].text[lead..]) else {
                break;
            };
            if !marker.same_list(first_marker) || lines[i].indent() > 3 {
                break;
            }
            let content_indent = lines[i].indent() + width;
            let mut item_lines = vec![lines[i].skip(lead + width)];
            i += 1;
            while i < lines.len() {
                let line = &lines[i];
                if line.is_blank() {
                    let next = lines[i..].iter().find(|l| !l.is_blank());
                    if next.is_some_and(|l| l.indent() >= content_indent) {
                        item_lines.push(line.clone());
                        i += 1;
                        continue;
                    }
                    break;
                }
                if line.indent() < content_indent {
                    break;
                }
                item_lines.push(line.dedent(content_indent));
                i += 1;
            }
            let children = non_empty(BlockBuilder::new(self.ctx()).build(&item_lines));
            items.push(Block::ListItem { content: children });
        }

        let block = match first_marker {
            ListMarker::Bullet => Block::BulletList { content: items },
            ListMarker::Ordered(start) => Block::OrderedList {
                start,
                content: items,
            },
        };
        (block, i.max(1))
    }

    fn extend_paragraph(&mut self, line: &ContentLine) {
        match &mut self.leaf {
            LeafState::Paragraph { lines, .. } => lines.push(line.text.clone()),
            LeafState::None => {
                self.leaf = LeafState::Paragraph {
                    start: line.content,
                    lines: vec![line.text.clone()],
                }
            }
        }
    }

    fn flush_paragraph(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Paragraph { start, lines } = prev {
            let text = Paragraph::join_lines(lines.iter().map(String::as_str));
            log::trace!("paragraph at {start:?}: {} lines", lines.len());
            self.out.push(Block::paragraph(parse_inline(&text, self.ctx())));
        }
    }
}

fn leading_ws(s: &str) -> usize {
    s.len() - s.trim_start().len()
}

/// Containers always hold at least one block.
fn non_empty(blocks: Vec<Block>) -> Vec<Block> {
    if blocks.is_empty() {
        vec![Block::paragraph(Vec::<TextRun>::new())]
    } else {
        blocks
    }
}
