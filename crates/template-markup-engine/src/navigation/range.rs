//! Locating the full extent of a mark or block instance around a position.
//!
//! Lookups are scoped to the text block holding the position, never the whole
//! document.

use crate::model::{
    Block, Document, Mark, TextRun,
    position::{BlockRange, find_ancestor, find_blocks, textblock_at},
};

/// A contiguous stretch of equal marks, in document positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkRange {
    pub from: usize,
    pub to: usize,
    pub mark: Mark,
}

impl MarkRange {
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }
}

/// Merged ranges of marks matching `pred` within one text block whose content
/// starts at `start`.
///
/// Runs carrying an equal spanning mark merge when they touch; non-spanning
/// marks (variables) yield one range per run.
pub fn mark_ranges(runs: &[TextRun], start: usize, pred: impl Fn(&Mark) -> bool) -> Vec<MarkRange> {
    let mut out: Vec<MarkRange> = vec![];
    let mut pos = start;
    for run in runs {
        let from = pos;
        pos += run.len();
        for mark in run.marks.iter().filter(|m| pred(m)) {
            match out.last_mut() {
                Some(last) if last.mark == *mark && mark.is_spanning() && from <= last.to => {
                    last.to = last.to.max(pos);
                }
                _ => out.push(MarkRange {
                    from,
                    to: pos,
                    mark: mark.clone(),
                }),
            }
        }
    }
    out
}

/// Finds the range of a mark matching `pred` at `pos`.
///
/// A range holding the char after `pos` wins; otherwise a range ending exactly
/// at `pos` (the char before) is returned. Returns `None` when `pos` is not in
/// a text block or no such mark touches it.
pub fn find_mark_range(
    doc: &Document,
    pos: usize,
    pred: impl Fn(&Mark) -> bool,
) -> Option<MarkRange> {
    let tb = textblock_at(doc, pos)?;
    let block = crate::model::position::block_at(doc, &tb.path)?;
    let ranges = mark_ranges(block.inline_content()?, tb.start, pred);
    ranges
        .iter()
        .find(|r| r.from <= pos && pos < r.to)
        .or_else(|| ranges.iter().find(|r| r.to == pos && pos > 0))
        .cloned()
}

/// Range of the inline conditional whose content holds the char after `pos`.
pub fn conditional_after(doc: &Document, pos: usize) -> Option<MarkRange> {
    find_mark_range(doc, pos, |m| m.condition().is_some()).filter(|r| r.from <= pos && pos < r.to)
}

/// Range of the inline conditional whose content holds the char before `pos`.
pub fn conditional_before(doc: &Document, pos: usize) -> Option<MarkRange> {
    if pos == 0 {
        return None;
    }
    let tb = textblock_at(doc, pos)?;
    if pos == tb.start {
        return None;
    }
    let block = crate::model::position::block_at(doc, &tb.path)?;
    mark_ranges(block.inline_content()?, tb.start, |m| m.condition().is_some())
        .into_iter()
        .find(|r| r.from < pos && pos <= r.to)
}

/// Nearest conditional block enclosing the text block at `pos`.
pub fn enclosing_conditional_block(doc: &Document, pos: usize) -> Option<BlockRange> {
    let tb = textblock_at(doc, pos)?;
    let path = find_ancestor(doc, &tb.path, Block::is_conditional)?;
    find_blocks(doc, Block::is_conditional)
        .into_iter()
        .find(|b| b.path == path)
}

/// Conditional block starting exactly at `from`.
pub fn conditional_block_at(doc: &Document, from: usize) -> Option<BlockRange> {
    find_blocks(doc, Block::is_conditional)
        .into_iter()
        .find(|b| b.from == from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_markup;
    use pretty_assertions::assert_eq;

    fn is_cond(m: &Mark) -> bool {
        m.condition().is_some()
    }

    #[test]
    fn merges_touching_runs_with_equal_condition() {
        let c = Mark::conditional("c");
        let runs = vec![
            TextRun::new("a", vec![c.clone()]),
            TextRun::new("b", vec![c.clone(), Mark::Bold]),
            TextRun::new("d", vec![c.clone()]),
        ];
        assert_eq!(
            mark_ranges(&runs, 1, is_cond),
            vec![MarkRange {
                from: 1,
                to: 4,
                mark: c
            }]
        );
    }

    #[test]
    fn different_conditions_do_not_merge() {
        let doc = parse_markup("((a??x))((b??y))");
        let r = find_mark_range(&doc, 1, is_cond).unwrap();
        assert_eq!((r.from, r.to), (1, 2));
        let r = find_mark_range(&doc, 2, is_cond).unwrap();
        assert_eq!(r.mark, Mark::conditional("b"));
    }

    #[test]
    fn variables_never_merge() {
        let doc = parse_markup("((a))((b))");
        let r = find_mark_range(&doc, 1, |m| *m == Mark::Variable).unwrap();
        assert_eq!((r.from, r.to), (1, 2));
        let r = find_mark_range(&doc, 2, |m| *m == Mark::Variable).unwrap();
        assert_eq!((r.from, r.to), (2, 3));
    }

    #[test]
    fn boundary_falls_back_to_preceding_char() {
        // 0 <p> 1 "ab" 3 </p>, conditional covers 1..3
        let doc = parse_markup("((c??ab))");
        let r = find_mark_range(&doc, 3, is_cond).unwrap();
        assert_eq!((r.from, r.to), (1, 3));
        assert!(conditional_after(&doc, 3).is_none());
        assert_eq!(conditional_before(&doc, 3), Some(r));
        assert!(conditional_before(&doc, 1).is_none());
    }

    #[test]
    fn miss_outside_textblocks() {
        let doc = parse_markup("plain");
        assert!(find_mark_range(&doc, 2, is_cond).is_none());
        assert!(find_mark_range(&doc, 99, is_cond).is_none());
    }

    #[test]
    fn finds_enclosing_conditional_block() {
        // 0 <cond> 1 <p> 2 "x" 3 </p> 4 </cond> 5
        let doc = parse_markup("((c??\nx\n))");
        let b = enclosing_conditional_block(&doc, 2).unwrap();
        assert_eq!((b.from, b.to), (0, 5));
        assert_eq!(conditional_block_at(&doc, 0), Some(b));
    }
}
