//! Transitions around an inline conditional.

use crate::editing::EditorState;
use crate::editing::commands::{SplitMode, convert_inline_to_block};
use crate::editing::locate::textblock_with_runs;
use crate::editing::transaction::{Origin, Transaction};
use crate::model::{
    Mark, MarkKind,
    mark::{with_mark, without_kind},
    text::marks_of_char,
};

use super::range::MarkRange;
use super::{Focus, Key, LabelTarget, NavOutcome, NavState, Signal};

/// Marks of the char at document position `pos`.
fn marks_at_char(state: &EditorState, pos: usize) -> Vec<Mark> {
    textblock_with_runs(&state.doc, pos)
        .and_then(|(tb, runs)| marks_of_char(runs, pos.checked_sub(tb.start)?).map(<[Mark]>::to_vec))
        .unwrap_or_default()
}

fn label_len(r: &MarkRange) -> usize {
    r.mark.condition().map_or(0, |c| c.chars().count())
}

fn label_focus(r: &MarkRange, caret: usize) -> Focus {
    Focus::ConditionLabel {
        target: LabelTarget::Inline { pos: r.from },
        caret,
    }
}

/// Caret at the first content position, with the conditional stored so the
/// next typed char lands inside it.
fn enter_content(state: &EditorState, r: &MarkRange) -> NavOutcome {
    let marks = with_mark(&marks_at_char(state, r.from), r.mark.clone());
    NavOutcome::apply(
        Transaction::new(Origin::Navigation)
            .caret(r.from)
            .set_stored_marks(marks),
        Focus::Content,
    )
}

/// Caret just before the conditional, typing outside of it.
fn leave_left(state: &EditorState, r: &MarkRange) -> NavOutcome {
    let before = r
        .from
        .checked_sub(1)
        .map(|p| marks_at_char(state, p))
        .unwrap_or_default();
    NavOutcome::apply(
        Transaction::new(Origin::Navigation)
            .caret(r.from)
            .set_stored_marks(without_kind(&before, MarkKind::ConditionalInline)),
        Focus::Content,
    )
}

/// Leaves the content to the right. A conditional filling its whole text
/// block gets a space after it so the caret has somewhere to go.
fn leave_right(state: &EditorState, r: &MarkRange) -> NavOutcome {
    let Some((tb, _)) = textblock_with_runs(&state.doc, r.from) else {
        log::debug!("no text block at {} for inline conditional", r.from);
        return NavOutcome::Unhandled;
    };
    if r.from == tb.start && r.to == tb.end {
        return NavOutcome::apply(
            Transaction::new(Origin::Navigation)
                .insert_text(r.to, " ", vec![])
                .caret(r.to + 1)
                .set_stored_marks(vec![])
                .mark_synthetic_space(r.to),
            Focus::Content,
        );
    }
    let last = marks_at_char(state, r.to - 1);
    NavOutcome::apply(
        Transaction::new(Origin::Navigation)
            .caret(r.to)
            .set_stored_marks(without_kind(&last, MarkKind::ConditionalInline)),
        Focus::Content,
    )
}

/// Re-enters the content from the right, dropping a synthetic space.
fn reenter_right(state: &EditorState, r: &MarkRange) -> NavOutcome {
    let marks = marks_at_char(state, r.to - 1);
    let mut tx = Transaction::new(Origin::Navigation);
    if state.synthetic_space == Some(r.to) && state.caret() == r.to + 1 {
        tx = tx.delete(r.to, r.to + 1).clear_synthetic_space();
    }
    NavOutcome::apply(tx.caret(r.to).set_stored_marks(marks), Focus::Content)
}

/// Runs the inline transition for `key` in state `nav`.
pub fn transition(
    state: &EditorState,
    focus: &Focus,
    nav: NavState,
    r: &MarkRange,
    key: Key,
) -> NavOutcome {
    match (nav, key) {
        (NavState::OutsideLeft, Key::ArrowRight) => NavOutcome::focus(label_focus(r, 0)),

        (NavState::OnInputFocused, _) => {
            let caret = match focus {
                Focus::ConditionLabel { caret, .. } => *caret,
                _ => 0,
            };
            match key {
                Key::ArrowRight if caret < label_len(r) => {
                    NavOutcome::focus(label_focus(r, caret + 1))
                }
                Key::ArrowLeft if caret > 0 => NavOutcome::focus(label_focus(r, caret - 1)),
                Key::ArrowRight | Key::Enter | Key::Tab => enter_content(state, r),
                Key::ArrowLeft => leave_left(state, r),
                Key::ShiftTab => NavOutcome::Handled {
                    transaction: None,
                    focus: Focus::Toolbar,
                    signal: Some(Signal::RequestToolbarFocus),
                    deferred: None,
                },
            }
        }

        (NavState::InsideContentStart, Key::ArrowLeft) => {
            NavOutcome::focus(label_focus(r, label_len(r)))
        }

        (
            NavState::InsideContentStart | NavState::InsideContentMiddle | NavState::InsideContentEnd,
            Key::Enter,
        ) => match convert_inline_to_block(state, SplitMode::At(state.caret())) {
            Some(tx) => {
                let caret = tx.selection.as_ref().map(|s| s.start);
                NavOutcome::Handled {
                    transaction: Some(tx),
                    focus: Focus::Content,
                    signal: None,
                    deferred: caret,
                }
            }
            None => NavOutcome::Unhandled,
        },

        (NavState::InsideContentEnd, Key::ArrowRight) => leave_right(state, r),

        (NavState::OutsideRight, Key::ArrowLeft) => reenter_right(state, r),

        _ => NavOutcome::Unhandled,
    }
}
