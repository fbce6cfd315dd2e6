//! Position lookups shared by commands, rules and navigation.

use std::ops::Range;

use crate::model::{
    Block, Document, TextRun,
    position::{TextblockPos, block_at, textblock_at, textblocks},
};
use crate::parsing::ParseContext;

/// Runs of a located text block.
pub fn runs_of<'a>(doc: &'a Document, tb: &TextblockPos) -> &'a [TextRun] {
    block_at(doc, &tb.path)
        .and_then(Block::inline_content)
        .unwrap_or(&[])
}

/// Text block holding `pos` together with its runs.
pub fn textblock_with_runs(doc: &Document, pos: usize) -> Option<(TextblockPos, &[TextRun])> {
    let tb = textblock_at(doc, pos)?;
    let runs = runs_of(doc, &tb);
    Some((tb, runs))
}

/// Which template constructs may be created at `path`, looking at the node
/// itself and all of its ancestors.
pub fn context_at(doc: &Document, path: &[usize]) -> ParseContext {
    (1..=path.len())
        .filter_map(|len| block_at(doc, &path[..len]))
        .fold(ParseContext::default(), |ctx, block| match block {
            Block::ConditionalBlock { .. } => ctx.inside_conditional(),
            Block::LanguageBlock { .. } => ctx.inside_language_block(),
            _ => ctx,
        })
}

/// Nearest caret position to `pos`: the start of the first text block at or
/// after it, else the end of the last one.
pub fn caret_near(doc: &Document, pos: usize) -> usize {
    let blocks = textblocks(doc);
    if blocks.iter().any(|tb| tb.contains(pos)) {
        return pos;
    }
    blocks
        .iter()
        .find(|tb| tb.start >= pos)
        .or(blocks.last())
        .map_or(0, |tb| tb.start.max(tb.end.min(pos)))
}

/// Sibling blocks covering the text blocks at `from` and `to`, as a container
/// path and a child range.
///
/// Lists are never split apart: when the covering container is a list, the
/// whole list is taken from its own parent.
pub fn covering_blocks(doc: &Document, from: usize, to: usize) -> Option<(Vec<usize>, Range<usize>)> {
    let a = textblock_at(doc, from)?.path;
    let b = textblock_at(doc, to)?.path;
    let common = a.iter().zip(&b).take_while(|(x, y)| x == y).count();
    // The deepest shared container sits above both text blocks.
    let depth = common.min(a.len() - 1).min(b.len() - 1);
    let mut parent = a[..depth].to_vec();
    let mut range = a[depth]..b[depth] + 1;
    while let Some(container) = block_at(doc, &parent)
        && (container.is_list() || matches!(container, Block::ListItem { .. }))
    {
        let Some(&index) = parent.last() else { break };
        parent.pop();
        range = index..index + 1;
    }
    Some((parent, range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_markup;
    use pretty_assertions::assert_eq;

    #[test]
    fn context_narrows_inside_constructs() {
        let doc = parse_markup("[[en]]\n((a??\nx\n))\n[[/en]]");
        let ctx = context_at(&doc, &[0, 0, 0]);
        assert!(!ctx.allow_conditional);
        assert!(!ctx.allow_language_block);
        assert_eq!(context_at(&doc, &[]), ParseContext::default());
    }

    #[test]
    fn covering_blocks_in_one_container() {
        // 0 <p>a</p> 3 <p>b</p> 6 <p>c</p> 9
        let doc = parse_markup("a\n\nb\n\nc");
        assert_eq!(covering_blocks(&doc, 1, 5), Some((vec![], 0..2)));
        assert_eq!(covering_blocks(&doc, 7, 7), Some((vec![], 2..3)));
    }

    #[test]
    fn covering_blocks_lifts_out_of_lists() {
        let doc = parse_markup("- a\n- b\n\nafter");
        // 0 <ul> 1 <li> 2 <p> 3 "a"
        assert_eq!(covering_blocks(&doc, 3, 3), Some((vec![], 0..1)));
    }

    #[test]
    fn caret_near_snaps_to_text() {
        // 0 <hr> 1 <p> 2 "x" 3 </p> 4
        let doc = parse_markup("---\n\nx");
        assert_eq!(caret_near(&doc, 0), 2);
        assert_eq!(caret_near(&doc, 3), 3);
        assert_eq!(caret_near(&doc, 4), 3);
    }
}
