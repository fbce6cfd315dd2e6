use std::ops::Range;

use crate::model::{Document, Mark, invariants, text::marks_at};
use crate::parsing::parse_markup;

use super::error::EditError;
use super::locate::textblock_with_runs;
use super::patch::Patch;
use super::transaction::{Assoc, Mapping, Transaction, Update};

/// Immutable editor state: document, selection and pending marks.
///
/// Every change goes through [`EditorState::apply`], which either produces a
/// new state satisfying the document invariants or rejects the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub doc: Document,
    pub selection: Range<usize>,
    /// Marks the next typed text takes instead of the marks at the caret.
    pub stored_marks: Option<Vec<Mark>>,
    pub version: u64,
    /// Position of a space inserted to step out of a trailing inline
    /// conditional, removed again if the caret steps back in.
    pub synthetic_space: Option<usize>,
}

impl EditorState {
    pub fn new(doc: Document) -> Self {
        Self {
            doc,
            selection: 1..1,
            stored_marks: None,
            version: 0,
            synthetic_space: None,
        }
    }

    pub fn from_markup(text: &str) -> Self {
        Self::new(parse_markup(text))
    }

    pub fn caret(&self) -> usize {
        self.selection.start
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.start == self.selection.end
    }

    /// Marks the next typed character will carry.
    pub fn effective_marks(&self) -> Vec<Mark> {
        if let Some(stored) = &self.stored_marks {
            return stored.clone();
        }
        let pos = self.caret();
        textblock_with_runs(&self.doc, pos)
            .map(|(tb, runs)| marks_at(runs, pos - tb.start))
            .unwrap_or_default()
    }

    /// Applies `tx` atomically, returning the next state and what changed.
    pub fn apply(&self, tx: &Transaction) -> Result<(EditorState, Patch), EditError> {
        let mut doc = self.doc.clone();
        let mut mapping = Mapping::default();
        for step in &tx.steps {
            mapping.maps.push(step.apply(&mut doc)?);
        }
        let doc_changed = doc != self.doc;
        if doc_changed {
            invariants::check(&doc)?;
        }

        let size = doc.content_size();
        let selection = match &tx.selection {
            Some(sel) => sel.clone(),
            None => {
                mapping.map(self.selection.start, Assoc::After)
                    ..mapping.map(self.selection.end, Assoc::After)
            }
        };
        if selection.start > size || selection.end > size {
            return Err(EditError::OutOfBounds(selection.end.max(selection.start)));
        }

        let stored_marks = match &tx.stored_marks {
            Update::Set(marks) => Some(marks.clone()),
            Update::Unset => None,
            Update::Keep if doc_changed => None,
            Update::Keep => self.stored_marks.clone(),
        };
        let synthetic_space = match tx.synthetic_space {
            Update::Set(pos) => Some(pos),
            Update::Unset => None,
            Update::Keep => self
                .synthetic_space
                .map(|p| mapping.map(p, Assoc::Before))
                .filter(|p| *p < size),
        };

        let version = if doc_changed {
            self.version + 1
        } else {
            self.version
        };
        let changed = mapping.maps.iter().filter_map(|m| m.changed()).collect();

        let next = EditorState {
            doc,
            selection: selection.clone(),
            stored_marks,
            version,
            synthetic_space,
        };
        let patch = Patch {
            changed,
            new_selection: selection,
            version,
            doc_changed,
            mapping,
        };
        Ok((next, patch))
    }
}
