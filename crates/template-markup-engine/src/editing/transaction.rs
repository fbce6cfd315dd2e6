//! Atomic, position-addressed document edits.

use std::ops::Range;

use crate::model::{
    Block, Document, Language, Mark, MarkKind, TextRun,
    mark::{add_mark, remove_mark},
    node::content_size,
    position::{block_at, block_at_mut, children_at, children_at_mut, content_start, textblock_at},
    text,
};

use super::error::EditError;

/// One primitive edit. Text steps must stay within a single text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    InsertText {
        at: usize,
        text: String,
        marks: Vec<Mark>,
    },
    DeleteText {
        from: usize,
        to: usize,
    },
    AddMark {
        from: usize,
        to: usize,
        mark: Mark,
    },
    RemoveMark {
        from: usize,
        to: usize,
        kind: MarkKind,
    },
    /// Replaces children `range` of the container at `parent` (empty path = document).
    ReplaceBlocks {
        parent: Vec<usize>,
        range: Range<usize>,
        blocks: Vec<Block>,
    },
    SetBlockAttrs {
        path: Vec<usize>,
        attrs: BlockAttrs,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockAttrs {
    Condition(String),
    Language(Language),
}

/// How positions move through one step: `old_size` positions at `pos` became `new_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepMap {
    pub pos: usize,
    pub old_size: usize,
    pub new_size: usize,
}

/// Which side a position inside a replaced region sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

impl StepMap {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        let end = self.pos + self.old_size;
        if pos < self.pos || (self.old_size == 0 && self.new_size == 0) {
            return pos;
        }
        if pos > end {
            return pos - self.old_size + self.new_size;
        }
        if self.old_size > 0 && pos == self.pos {
            return self.pos;
        }
        if self.old_size > 0 && pos == end {
            return self.pos + self.new_size;
        }
        match assoc {
            Assoc::Before => self.pos,
            Assoc::After => self.pos + self.new_size,
        }
    }

    /// Region of the new document written by this step.
    pub fn changed(&self) -> Option<Range<usize>> {
        (self.old_size > 0 || self.new_size > 0).then(|| self.pos..self.pos + self.new_size)
    }
}

/// Step maps of a whole transaction, applied in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    pub maps: Vec<StepMap>,
}

impl Mapping {
    pub fn map(&self, pos: usize, assoc: Assoc) -> usize {
        self.maps.iter().fold(pos, |p, m| m.map(p, assoc))
    }
}

impl Step {
    /// Applies the step in place, returning its position map.
    pub fn apply(&self, doc: &mut Document) -> Result<StepMap, EditError> {
        match self {
            Step::InsertText { at, text, marks } => {
                let (runs, start) = runs_for(doc, *at, *at)?;
                *runs = text::insert_text(runs, at - start, text, marks);
                Ok(StepMap {
                    pos: *at,
                    old_size: 0,
                    new_size: text.chars().count(),
                })
            }
            Step::DeleteText { from, to } => {
                let (runs, start) = runs_for(doc, *from, *to)?;
                *runs = text::delete_text(runs, from - start, to - start);
                Ok(StepMap {
                    pos: *from,
                    old_size: to - from,
                    new_size: 0,
                })
            }
            Step::AddMark { from, to, mark } => {
                let (runs, start) = runs_for(doc, *from, *to)?;
                *runs = text::map_marks(runs, from - start, to - start, |m| {
                    add_mark(m, mark.clone())
                });
                Ok(StepMap::identity())
            }
            Step::RemoveMark { from, to, kind } => {
                let (runs, start) = runs_for(doc, *from, *to)?;
                *runs = text::map_marks(runs, from - start, to - start, |m| remove_mark(m, *kind));
                Ok(StepMap::identity())
            }
            Step::ReplaceBlocks {
                parent,
                range,
                blocks,
            } => replace_blocks(doc, parent, range.clone(), blocks),
            Step::SetBlockAttrs { path, attrs } => {
                let block =
                    block_at_mut(doc, path).ok_or_else(|| EditError::InvalidPath(path.clone()))?;
                match (block, attrs) {
                    (Block::ConditionalBlock { condition, .. }, BlockAttrs::Condition(new)) => {
                        *condition = new.clone();
                    }
                    (Block::LanguageBlock { language, .. }, BlockAttrs::Language(new)) => {
                        *language = *new;
                    }
                    _ => return Err(EditError::AttrMismatch(path.clone())),
                }
                Ok(StepMap::identity())
            }
        }
    }
}

/// Mutable runs of the text block holding `from..to`, with its content start.
fn runs_for(
    doc: &mut Document,
    from: usize,
    to: usize,
) -> Result<(&mut Vec<TextRun>, usize), EditError> {
    if to < from {
        return Err(EditError::CrossesTextblocks { from, to });
    }
    let tb = textblock_at(doc, from).ok_or(EditError::NotInTextblock(from))?;
    if to > tb.end {
        return Err(EditError::CrossesTextblocks { from, to });
    }
    let runs = block_at_mut(doc, &tb.path)
        .and_then(Block::inline_content_mut)
        .ok_or(EditError::NotInTextblock(from))?;
    Ok((runs, tb.start))
}

fn replace_blocks(
    doc: &mut Document,
    parent: &[usize],
    range: Range<usize>,
    blocks: &[Block],
) -> Result<StepMap, EditError> {
    let start = content_start(doc, parent).ok_or_else(|| EditError::InvalidPath(parent.to_vec()))?;
    let siblings = children_at(doc, parent).ok_or_else(|| EditError::InvalidPath(parent.to_vec()))?;
    if range.start > range.end || range.end > siblings.len() {
        return Err(EditError::InvalidChildRange {
            path: parent.to_vec(),
            range,
        });
    }
    let pos = start + content_size(&siblings[..range.start]);
    let old_size = content_size(&siblings[range.clone()]);
    let fill = refills_when_empty(doc, parent);

    let children =
        children_at_mut(doc, parent).ok_or_else(|| EditError::InvalidPath(parent.to_vec()))?;
    children.splice(range, blocks.iter().cloned());
    let mut new_size = content_size(blocks);
    if children.is_empty() && fill {
        children.push(Block::empty_paragraph());
        new_size += 2;
    }
    Ok(StepMap {
        pos,
        old_size,
        new_size,
    })
}

/// Containers that get an empty paragraph instead of becoming empty. Lists are
/// left empty so the invariant check rejects the edit.
fn refills_when_empty(doc: &Document, parent: &[usize]) -> bool {
    if parent.is_empty() {
        return true;
    }
    block_at(doc, parent).is_some_and(|b| !b.is_list())
}

/// What a transaction does to a piece of editor state besides the document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Update<T> {
    #[default]
    Keep,
    Set(T),
    Unset,
}

/// Where a transaction came from, for logging and post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    User,
    InputRule,
    Paste,
    AutoWrap,
    Navigation,
    Command,
}

/// An ordered list of steps plus selection and stored-mark updates, applied
/// all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub steps: Vec<Step>,
    pub selection: Option<Range<usize>>,
    pub stored_marks: Update<Vec<Mark>>,
    pub synthetic_space: Update<usize>,
    pub origin: Origin,
}

impl Transaction {
    pub fn new(origin: Origin) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn insert_text(self, at: usize, text: impl Into<String>, marks: Vec<Mark>) -> Self {
        self.step(Step::InsertText {
            at,
            text: text.into(),
            marks,
        })
    }

    pub fn delete(self, from: usize, to: usize) -> Self {
        if from == to {
            return self;
        }
        self.step(Step::DeleteText { from, to })
    }

    pub fn add_mark(self, from: usize, to: usize, mark: Mark) -> Self {
        self.step(Step::AddMark { from, to, mark })
    }

    pub fn remove_mark(self, from: usize, to: usize, kind: MarkKind) -> Self {
        self.step(Step::RemoveMark { from, to, kind })
    }

    pub fn replace_blocks(self, parent: Vec<usize>, range: Range<usize>, blocks: Vec<Block>) -> Self {
        self.step(Step::ReplaceBlocks {
            parent,
            range,
            blocks,
        })
    }

    pub fn set_block_attrs(self, path: Vec<usize>, attrs: BlockAttrs) -> Self {
        self.step(Step::SetBlockAttrs { path, attrs })
    }

    pub fn select(mut self, selection: Range<usize>) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn caret(self, pos: usize) -> Self {
        self.select(pos..pos)
    }

    pub fn set_stored_marks(mut self, marks: Vec<Mark>) -> Self {
        self.stored_marks = Update::Set(marks);
        self
    }

    /// Drops stored marks so typed text takes the marks at the caret.
    pub fn reset_stored_marks(mut self) -> Self {
        self.stored_marks = Update::Unset;
        self
    }

    pub fn mark_synthetic_space(mut self, pos: usize) -> Self {
        self.synthetic_space = Update::Set(pos);
        self
    }

    pub fn clear_synthetic_space(mut self) -> Self {
        self.synthetic_space = Update::Unset;
        self
    }

    pub fn changes_doc(&self) -> bool {
        !self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_markup;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::before(2, Assoc::After, 2)]
    #[case::after(9, Assoc::After, 12)]
    #[case::insert_point_after(5, Assoc::After, 8)]
    #[case::insert_point_before(5, Assoc::Before, 5)]
    fn insertion_mapping(#[case] pos: usize, #[case] assoc: Assoc, #[case] expected: usize) {
        let map = StepMap {
            pos: 5,
            old_size: 0,
            new_size: 3,
        };
        assert_eq!(map.map(pos, assoc), expected);
    }

    #[test]
    fn deletion_mapping_collapses_to_start() {
        let map = StepMap {
            pos: 5,
            old_size: 3,
            new_size: 0,
        };
        assert_eq!(map.map(6, Assoc::After), 5);
        assert_eq!(map.map(8, Assoc::After), 5);
        assert_eq!(map.map(10, Assoc::After), 7);
    }

    #[test]
    fn text_steps_edit_runs() {
        let mut doc = parse_markup("hello");
        Step::InsertText {
            at: 6,
            text: "!".into(),
            marks: vec![],
        }
        .apply(&mut doc)
        .unwrap();
        Step::AddMark {
            from: 1,
            to: 3,
            mark: Mark::Bold,
        }
        .apply(&mut doc)
        .unwrap();
        assert_eq!(
            doc.content[0],
            Block::paragraph(vec![
                TextRun::new("he", vec![Mark::Bold]),
                TextRun::plain("llo!"),
            ])
        );
    }

    #[test]
    fn text_steps_stay_in_one_textblock() {
        let mut doc = parse_markup("ab\n\ncd");
        let err = Step::DeleteText { from: 2, to: 6 }.apply(&mut doc).unwrap_err();
        assert!(matches!(err, EditError::CrossesTextblocks { .. }));
    }

    #[test]
    fn emptying_a_conditional_block_leaves_a_paragraph() {
        let mut doc = parse_markup("((a??\nx\n))");
        let map = Step::ReplaceBlocks {
            parent: vec![0],
            range: 0..1,
            blocks: vec![],
        }
        .apply(&mut doc)
        .unwrap();
        assert_eq!(
            doc.content[0],
            Block::conditional("a", vec![Block::empty_paragraph()])
        );
        assert_eq!(
            map,
            StepMap {
                pos: 1,
                old_size: 3,
                new_size: 2
            }
        );
    }

    #[test]
    fn set_attrs_must_match_block_kind() {
        let mut doc = parse_markup("plain");
        let err = Step::SetBlockAttrs {
            path: vec![0],
            attrs: BlockAttrs::Condition("x".into()),
        }
        .apply(&mut doc)
        .unwrap_err();
        assert!(matches!(err, EditError::AttrMismatch(_)));
    }
}
