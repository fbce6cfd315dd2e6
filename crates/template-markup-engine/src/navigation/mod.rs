//! # Caret Navigation Around Conditionals
//!
//! Conditionals have a condition label that is edited in its own input, so
//! the caret cannot simply walk through them. Navigation is a set of pure
//! functions: the current position is classified against the live document
//! on every key press, and the matching transition yields a transaction and
//! the next focus target.
//!
//! ## States
//!
//! - `OutsideLeft` / `OutsideRight`: caret directly before or after a construct
//! - `OnInputFocused`: the condition label has focus
//! - `InsideContentStart` / `InsideContentMiddle` / `InsideContentEnd`: caret in the content
//! - `OnToolbar`: focus was handed to the external toolbar
//!
//! When a construct cannot be resolved at the recorded position the key is
//! reported as unhandled and native caret movement applies.

pub mod block;
pub mod inline;
pub mod range;

use crate::editing::EditorState;
use crate::editing::transaction::Transaction;
use crate::model::{
    BlockRange,
    position::{block_at, textblocks},
};
use range::{MarkRange, conditional_after, conditional_before, conditional_block_at, enclosing_conditional_block};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    ShiftTab,
}

/// Construct whose condition label has focus, by its start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTarget {
    Inline { pos: usize },
    Block { pos: usize },
}

impl LabelTarget {
    pub fn pos(self) -> usize {
        match self {
            LabelTarget::Inline { pos } | LabelTarget::Block { pos } => pos,
        }
    }

    pub fn with_pos(self, pos: usize) -> Self {
        match self {
            LabelTarget::Inline { .. } => LabelTarget::Inline { pos },
            LabelTarget::Block { .. } => LabelTarget::Block { pos },
        }
    }
}

/// Where keyboard input currently goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Content,
    ConditionLabel {
        target: LabelTarget,
        /// Caret within the label text, in chars.
        caret: usize,
    },
    Toolbar,
}

/// Fire-and-forget notifications for collaborators outside the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    RequestToolbarFocus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Handled {
        transaction: Option<Transaction>,
        focus: Focus,
        signal: Option<Signal>,
        /// Caret position to restore once the view has re-rendered.
        deferred: Option<usize>,
    },
    Unhandled,
}

impl NavOutcome {
    pub fn focus(focus: Focus) -> Self {
        NavOutcome::Handled {
            transaction: None,
            focus,
            signal: None,
            deferred: None,
        }
    }

    pub fn apply(transaction: Transaction, focus: Focus) -> Self {
        NavOutcome::Handled {
            transaction: Some(transaction),
            focus,
            signal: None,
            deferred: None,
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, NavOutcome::Handled { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    OutsideLeft,
    OnInputFocused,
    InsideContentStart,
    InsideContentMiddle,
    InsideContentEnd,
    OutsideRight,
    OnToolbar,
    Elsewhere,
}

/// The construct a navigation state refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Inline(MarkRange),
    Block(BlockRange),
}

/// Classifies the caret (or label focus) against the live document.
pub fn classify(state: &EditorState, focus: &Focus) -> (NavState, Option<Target>) {
    match focus {
        Focus::Toolbar => (NavState::OnToolbar, None),
        Focus::ConditionLabel { target, .. } => match resolve_label(state, *target) {
            Some(t) => (NavState::OnInputFocused, Some(t)),
            None => {
                log::debug!("condition label target {target:?} no longer resolves");
                (NavState::Elsewhere, None)
            }
        },
        Focus::Content if !state.is_collapsed() => (NavState::Elsewhere, None),
        Focus::Content => match classify_inline(state) {
            Some((nav, r)) => (nav, Some(Target::Inline(r))),
            None => match classify_block(state) {
                Some((nav, b)) => (nav, Some(Target::Block(b))),
                None => (NavState::Elsewhere, None),
            },
        },
    }
}

/// Re-resolves a label target from its recorded position.
pub fn resolve_label(state: &EditorState, target: LabelTarget) -> Option<Target> {
    match target {
        LabelTarget::Inline { pos } => conditional_after(&state.doc, pos)
            .filter(|r| r.from == pos)
            .map(Target::Inline),
        LabelTarget::Block { pos } => conditional_block_at(&state.doc, pos).map(Target::Block),
    }
}

fn classify_inline(state: &EditorState) -> Option<(NavState, MarkRange)> {
    let pos = state.caret();
    let marks = state.effective_marks();
    let inside = |r: &MarkRange| marks.contains(&r.mark);
    let before = conditional_before(&state.doc, pos);
    let after = conditional_after(&state.doc, pos);

    if let Some(r) = &before
        && r.to == pos
        && inside(r)
    {
        return Some((NavState::InsideContentEnd, r.clone()));
    }
    if let Some(r) = after {
        if r.from < pos {
            return Some((NavState::InsideContentMiddle, r));
        }
        let nav = if inside(&r) {
            NavState::InsideContentStart
        } else {
            NavState::OutsideLeft
        };
        return Some((nav, r));
    }
    if let Some(r) = before {
        return Some((NavState::OutsideRight, r));
    }
    // Just past a space inserted to leave a trailing conditional.
    let space = state.synthetic_space.filter(|s| s + 1 == pos)?;
    conditional_before(&state.doc, space)
        .filter(|r| r.to == space)
        .map(|r| (NavState::OutsideRight, r))
}

fn classify_block(state: &EditorState) -> Option<(NavState, BlockRange)> {
    let pos = state.caret();
    let blocks = textblocks(&state.doc);
    let index = blocks.iter().position(|tb| tb.contains(pos))?;
    let tb = &blocks[index];

    if let Some(b) = enclosing_conditional_block(&state.doc, pos) {
        let inside: Vec<_> = blocks
            .iter()
            .filter(|t| t.path.starts_with(&b.path))
            .collect();
        let nav = if inside.first().is_some_and(|t| t.path == tb.path) && pos == tb.start {
            NavState::InsideContentStart
        } else if inside.last().is_some_and(|t| t.path == tb.path) && pos == tb.end {
            NavState::InsideContentEnd
        } else {
            NavState::InsideContentMiddle
        };
        return Some((nav, b));
    }

    if pos == tb.end
        && let Some(next) = blocks.get(index + 1)
        && let Some(b) = enclosing_conditional_block(&state.doc, next.start)
    {
        return Some((NavState::OutsideLeft, b));
    }
    if pos == tb.start
        && let Some(prev) = index.checked_sub(1).and_then(|i| blocks.get(i))
        && let Some(b) = enclosing_conditional_block(&state.doc, prev.end)
    {
        return Some((NavState::OutsideRight, b));
    }
    None
}

/// Condition text shown in the label of `target`.
pub fn label_text(state: &EditorState, target: &Target) -> Option<String> {
    match target {
        Target::Inline(r) => r.mark.condition().map(str::to_string),
        Target::Block(b) => match block_at(&state.doc, &b.path)? {
            crate::model::Block::ConditionalBlock { condition, .. } => Some(condition.clone()),
            _ => None,
        },
    }
}

/// Runs the transition for `key` from the current position.
pub fn handle_key(state: &EditorState, focus: &Focus, key: Key) -> NavOutcome {
    let (nav, target) = classify(state, focus);
    log::trace!("navigation {key:?} in state {nav:?}");
    match target {
        Some(Target::Inline(r)) => inline::transition(state, focus, nav, &r, key),
        Some(Target::Block(b)) => block::transition(state, focus, nav, &b, key),
        None => NavOutcome::Unhandled,
    }
}
