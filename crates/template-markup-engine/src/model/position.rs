//! Integer positions over the document tree.
//!
//! Entering or leaving a non-leaf node costs one position, each character of
//! inline text costs one, and a horizontal rule costs one. Position 0 is the
//! start of the document content.

use super::node::{Block, Document, content_size};
use super::text::inline_len;

/// A position resolved to the innermost node whose content holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    /// Child indices from the document root to the parent node. Empty for the root.
    pub path: Vec<usize>,
    /// Position where the parent's content starts.
    pub start: usize,
}

impl ResolvedPos {
    pub fn parent_offset(&self) -> usize {
        self.pos - self.start
    }

    pub fn parent<'a>(&self, doc: &'a Document) -> Option<&'a Block> {
        block_at(doc, &self.path)
    }
}

/// Resolves `pos`, or `None` when it lies past the end of the document.
pub fn resolve(doc: &Document, pos: usize) -> Option<ResolvedPos> {
    if pos > doc.content_size() {
        return None;
    }
    let mut path = vec![];
    let mut start = 0;
    let mut children: &[Block] = &doc.content;
    'descend: loop {
        let mut offset = start;
        for (i, child) in children.iter().enumerate() {
            let size = child.node_size();
            let end = offset + size;
            if pos > offset && pos < end && size > 1 {
                path.push(i);
                start = offset + 1;
                match child.children() {
                    Some(c) => {
                        children = c;
                        continue 'descend;
                    }
                    None => break 'descend,
                }
            }
            if pos < end {
                break;
            }
            offset = end;
        }
        break;
    }
    Some(ResolvedPos { pos, path, start })
}

/// Children of the container at `path`; the empty path is the document.
pub fn children_at<'a>(doc: &'a Document, path: &[usize]) -> Option<&'a [Block]> {
    match path.split_last() {
        None => Some(&doc.content),
        Some(_) => block_at(doc, path)?.children(),
    }
}

pub fn children_at_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Option<&'a mut Vec<Block>> {
    match path.split_last() {
        None => Some(&mut doc.content),
        Some(_) => block_at_mut(doc, path)?.children_mut(),
    }
}

/// Block at a non-empty `path`.
pub fn block_at<'a>(doc: &'a Document, path: &[usize]) -> Option<&'a Block> {
    let (&last, parent) = path.split_last()?;
    children_at(doc, parent)?.get(last)
}

pub fn block_at_mut<'a>(doc: &'a mut Document, path: &[usize]) -> Option<&'a mut Block> {
    let (&last, parent) = path.split_last()?;
    children_at_mut(doc, parent)?.get_mut(last)
}

/// Position directly before the block at `path`.
pub fn block_start(doc: &Document, path: &[usize]) -> Option<usize> {
    let (&last, parent) = path.split_last()?;
    let siblings = children_at(doc, parent)?;
    if last > siblings.len() {
        return None;
    }
    Some(content_start(doc, parent)? + content_size(&siblings[..last]))
}

/// Position where the content of the container at `path` starts.
pub fn content_start(doc: &Document, path: &[usize]) -> Option<usize> {
    if path.is_empty() {
        return Some(0);
    }
    Some(block_start(doc, path)? + 1)
}

/// A text block located in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextblockPos {
    pub path: Vec<usize>,
    /// First content position.
    pub start: usize,
    /// Last content position.
    pub end: usize,
}

impl TextblockPos {
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The text block whose content holds `pos`.
pub fn textblock_at(doc: &Document, pos: usize) -> Option<TextblockPos> {
    let resolved = resolve(doc, pos)?;
    let runs = resolved.parent(doc)?.inline_content()?;
    Some(TextblockPos {
        start: resolved.start,
        end: resolved.start + inline_len(runs),
        path: resolved.path,
    })
}

/// Every text block in document order.
pub fn textblocks(doc: &Document) -> Vec<TextblockPos> {
    let mut out = vec![];
    collect_textblocks(&doc.content, 0, &mut vec![], &mut out);
    out
}

fn collect_textblocks(
    blocks: &[Block],
    start: usize,
    path: &mut Vec<usize>,
    out: &mut Vec<TextblockPos>,
) {
    let mut offset = start;
    for (i, block) in blocks.iter().enumerate() {
        path.push(i);
        if let Some(runs) = block.inline_content() {
            out.push(TextblockPos {
                path: path.clone(),
                start: offset + 1,
                end: offset + 1 + inline_len(runs),
            });
        } else if let Some(children) = block.children() {
            collect_textblocks(children, offset + 1, path, out);
        }
        path.pop();
        offset += block.node_size();
    }
}

/// A block located in the document, spanning `from..to` in its parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRange {
    pub path: Vec<usize>,
    pub from: usize,
    pub to: usize,
}

/// Every block matching `pred`, in document order.
pub fn find_blocks(doc: &Document, pred: impl Fn(&Block) -> bool) -> Vec<BlockRange> {
    let mut out = vec![];
    collect_blocks(&doc.content, 0, &mut vec![], &pred, &mut out);
    out
}

fn collect_blocks(
    blocks: &[Block],
    start: usize,
    path: &mut Vec<usize>,
    pred: &impl Fn(&Block) -> bool,
    out: &mut Vec<BlockRange>,
) {
    let mut offset = start;
    for (i, block) in blocks.iter().enumerate() {
        path.push(i);
        let size = block.node_size();
        if pred(block) {
            out.push(BlockRange {
                path: path.clone(),
                from: offset,
                to: offset + size,
            });
        }
        if let Some(children) = block.children() {
            collect_blocks(children, offset + 1, path, pred, out);
        }
        path.pop();
        offset += size;
    }
}

/// Nearest strict ancestor of the node at `path` matching `pred`.
pub fn find_ancestor(
    doc: &Document,
    path: &[usize],
    pred: impl Fn(&Block) -> bool,
) -> Option<Vec<usize>> {
    (1..path.len())
        .rev()
        .map(|len| &path[..len])
        .find(|prefix| block_at(doc, prefix).is_some_and(&pred))
        .map(<[usize]>::to_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        // 0 <p>ab</p> 4 <cond> 5 <p>c</p> 8 </cond> 9 <hr> 10
        Document::new(vec![
            Block::paragraph(vec![TextRun::plain("ab")]),
            Block::conditional("x", vec![Block::paragraph(vec![TextRun::plain("c")])]),
            Block::HorizontalRule,
        ])
    }

    #[test]
    fn resolves_into_textblocks() {
        let doc = sample();
        assert_eq!(doc.content_size(), 10);
        let r = resolve(&doc, 2).unwrap();
        assert_eq!(r.path, vec![0]);
        assert_eq!(r.parent_offset(), 1);
        let r = resolve(&doc, 6).unwrap();
        assert_eq!(r.path, vec![1, 0]);
        assert_eq!(r.start, 6);
    }

    #[test]
    fn boundary_positions_resolve_to_container() {
        let doc = sample();
        assert_eq!(resolve(&doc, 4).unwrap().path, Vec::<usize>::new());
        assert_eq!(resolve(&doc, 5).unwrap().path, vec![1]);
        assert!(resolve(&doc, 11).is_none());
    }

    #[test]
    fn lists_textblocks_in_order() {
        let doc = sample();
        let tbs = textblocks(&doc);
        assert_eq!(tbs.len(), 2);
        assert_eq!((tbs[0].start, tbs[0].end), (1, 3));
        assert_eq!((tbs[1].start, tbs[1].end), (6, 7));
        assert_eq!(textblock_at(&doc, 7), Some(tbs[1].clone()));
    }

    #[test]
    fn block_starts_and_ancestors() {
        let doc = sample();
        assert_eq!(block_start(&doc, &[1]), Some(4));
        assert_eq!(block_start(&doc, &[1, 0]), Some(5));
        assert_eq!(find_ancestor(&doc, &[1, 0], Block::is_conditional), Some(vec![1]));
        assert_eq!(find_ancestor(&doc, &[0], Block::is_conditional), None);
        let found = find_blocks(&doc, Block::is_conditional);
        assert_eq!(found, vec![BlockRange { path: vec![1], from: 4, to: 9 }]);
    }
}
