//! Transitions around a conditional block.
//!
//! Mirrors the inline transitions with text blocks in place of characters:
//! the content starts in the block's first text block and ends in its last.

use crate::editing::EditorState;
use crate::editing::transaction::{Origin, Transaction};
use crate::model::{
    Block, BlockRange,
    position::{TextblockPos, textblocks},
};

use super::{Focus, Key, LabelTarget, NavOutcome, NavState, Signal, Target, label_text};

fn label_focus(b: &BlockRange, caret: usize) -> Focus {
    Focus::ConditionLabel {
        target: LabelTarget::Block { pos: b.from },
        caret,
    }
}

fn label_len(state: &EditorState, b: &BlockRange) -> usize {
    label_text(state, &Target::Block(b.clone())).map_or(0, |c| c.chars().count())
}

/// Text blocks inside `b`, and those before and after it.
fn split_textblocks(
    state: &EditorState,
    b: &BlockRange,
) -> (Vec<TextblockPos>, Vec<TextblockPos>, Vec<TextblockPos>) {
    let mut before = vec![];
    let mut inside = vec![];
    let mut after = vec![];
    for tb in textblocks(&state.doc) {
        if tb.path.starts_with(&b.path) {
            inside.push(tb);
        } else if tb.end < b.from {
            before.push(tb);
        } else {
            after.push(tb);
        }
    }
    (before, inside, after)
}

fn move_to(pos: usize) -> NavOutcome {
    NavOutcome::apply(
        Transaction::new(Origin::Navigation)
            .caret(pos)
            .reset_stored_marks(),
        Focus::Content,
    )
}

/// Moves the caret next to the block on `side`, adding an empty paragraph
/// when there is no text block to land in.
fn leave(state: &EditorState, b: &BlockRange, right: bool) -> NavOutcome {
    let (before, _, after) = split_textblocks(state, b);
    let landing = if right {
        after.first().map(|tb| tb.start)
    } else {
        before.last().map(|tb| tb.end)
    };
    if let Some(pos) = landing {
        return move_to(pos);
    }
    let Some((&index, parent)) = b.path.split_last() else {
        return NavOutcome::Unhandled;
    };
    let (at, caret) = if right {
        (index + 1, b.to + 1)
    } else {
        (index, b.from + 1)
    };
    NavOutcome::apply(
        Transaction::new(Origin::Navigation)
            .replace_blocks(parent.to_vec(), at..at, vec![Block::empty_paragraph()])
            .caret(caret)
            .reset_stored_marks(),
        Focus::Content,
    )
}

/// Runs the block transition for `key` in state `nav`.
pub fn transition(
    state: &EditorState,
    focus: &Focus,
    nav: NavState,
    b: &BlockRange,
    key: Key,
) -> NavOutcome {
    match (nav, key) {
        (NavState::OutsideLeft, Key::ArrowRight) => NavOutcome::focus(label_focus(b, 0)),

        (NavState::OnInputFocused, _) => {
            let caret = match focus {
                Focus::ConditionLabel { caret, .. } => *caret,
                _ => 0,
            };
            let len = label_len(state, b);
            match key {
                Key::ArrowRight if caret < len => NavOutcome::focus(label_focus(b, caret + 1)),
                Key::ArrowLeft if caret > 0 => NavOutcome::focus(label_focus(b, caret - 1)),
                Key::ArrowRight | Key::Enter | Key::Tab => {
                    let (_, inside, _) = split_textblocks(state, b);
                    match inside.first() {
                        Some(tb) => move_to(tb.start),
                        None => {
                            log::debug!("conditional block at {} has no text block", b.from);
                            NavOutcome::Unhandled
                        }
                    }
                }
                Key::ArrowLeft => leave(state, b, false),
                Key::ShiftTab => NavOutcome::Handled {
                    transaction: None,
                    focus: Focus::Toolbar,
                    signal: Some(Signal::RequestToolbarFocus),
                    deferred: None,
                },
            }
        }

        (NavState::InsideContentStart, Key::ArrowLeft) => {
            NavOutcome::focus(label_focus(b, label_len(state, b)))
        }

        (NavState::InsideContentEnd, Key::ArrowRight) => leave(state, b, true),

        (NavState::OutsideRight, Key::ArrowLeft) => {
            let (_, inside, _) = split_textblocks(state, b);
            match inside.last() {
                Some(tb) => move_to(tb.end),
                None => NavOutcome::Unhandled,
            }
        }

        _ => NavOutcome::Unhandled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::handle_key;
    use crate::serialize::serialize;
    use pretty_assertions::assert_eq;

    // 0 <p> 1 "a" 2 </p> 3 <cond> 4 <p> 5 "x" 6 </p> 7 </cond> 8 <p> 9 "b"
    const MARKUP: &str = "a\n\n((c??\nx\n))\n\nb";

    fn at(markup: &str, pos: usize) -> EditorState {
        let mut state = EditorState::from_markup(markup);
        state.selection = pos..pos;
        state
    }

    fn label(caret: usize) -> Focus {
        Focus::ConditionLabel {
            target: LabelTarget::Block { pos: 3 },
            caret,
        }
    }

    fn caret_after(state: &EditorState, outcome: NavOutcome) -> usize {
        match outcome {
            NavOutcome::Handled {
                transaction: Some(tx),
                ..
            } => state.apply(&tx).unwrap().0.caret(),
            other => panic!("expected a transaction, got {other:?}"),
        }
    }

    #[test]
    fn walks_through_label_into_content() {
        let s = at(MARKUP, 2);
        assert_eq!(
            handle_key(&s, &Focus::Content, Key::ArrowRight),
            NavOutcome::focus(label(0))
        );
        assert_eq!(handle_key(&s, &label(0), Key::ArrowRight), NavOutcome::focus(label(1)));
        assert_eq!(caret_after(&s, handle_key(&s, &label(1), Key::ArrowRight)), 5);
        assert_eq!(caret_after(&s, handle_key(&s, &label(0), Key::Tab)), 5);
        assert_eq!(caret_after(&s, handle_key(&s, &label(0), Key::ArrowLeft)), 2);
    }

    #[test]
    fn content_edges() {
        assert_eq!(
            handle_key(&at(MARKUP, 5), &Focus::Content, Key::ArrowLeft),
            NavOutcome::focus(label(1))
        );
        let s = at(MARKUP, 6);
        assert_eq!(caret_after(&s, handle_key(&s, &Focus::Content, Key::ArrowRight)), 9);
        let s = at(MARKUP, 9);
        assert_eq!(caret_after(&s, handle_key(&s, &Focus::Content, Key::ArrowLeft)), 6);
    }

    #[test]
    fn leaving_a_final_block_adds_a_paragraph() {
        // 0 <cond> 1 <p> 2 "x" 3 </p> 4 </cond> 5
        let s = at("((c??\nx\n))", 3);
        let NavOutcome::Handled {
            transaction: Some(tx),
            ..
        } = handle_key(&s, &Focus::Content, Key::ArrowRight)
        else {
            panic!("arrow right was not handled");
        };
        let (next, _) = s.apply(&tx).unwrap();
        assert_eq!(next.doc.content.len(), 2);
        assert_eq!(next.caret(), 6);
        // The trailing empty paragraph writes nothing, so saving is stable.
        let saved = serialize(&next.doc);
        assert_eq!(saved, "((c??\nx\n))");
        assert_eq!(serialize(&crate::parsing::parse_markup(&saved)), saved);
    }
}
