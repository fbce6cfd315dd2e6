//! Rules that turn markup typed into a paragraph into structure.
//!
//! Run after each text input, in order: inline conditional, variable, block
//! marker. The first rule that matches produces the transaction.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{
    Block, Mark, MarkKind, TextRun,
    mark::without_kind,
    position::{TextblockPos, block_at, block_start},
    text::{byte_offset, char_offset, inline_len, marks_of_char, plain_text, slice_runs},
};
use crate::navigation::range::mark_ranges;
use crate::parsing::inline::kinds::{Conditional, Variable};
use crate::parsing::scanner::{CLOSE, scan_markers};

use super::commands::{has_conditional_run, is_conditional_mark};
use super::locate::{context_at, textblock_with_runs};
use super::state::EditorState;
use super::transaction::{Origin, Transaction};

fn conditional_header() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\(([^?()\n]+)\?\?").expect("Invalid conditional regex"))
}

fn variable_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(\(([^()\n]+)\)\)$").expect("Invalid variable regex"))
}

fn block_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:(#{1,6}) |([-*+]) |(\d{1,9})\. |([\^>]) |(---))$")
            .expect("Invalid block marker regex")
    })
}

/// Block shortcut typed at the start of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMarker {
    Heading(u8),
    Bullet,
    Ordered(u64),
    Quote,
    Rule,
}

impl BlockMarker {
    pub fn parse(text: &str) -> Option<BlockMarker> {
        let caps = block_marker().captures(text)?;
        if let Some(hashes) = caps.get(1) {
            return u8::try_from(hashes.as_str().len()).ok().map(BlockMarker::Heading);
        }
        if caps.get(2).is_some() {
            return Some(BlockMarker::Bullet);
        }
        if let Some(n) = caps.get(3) {
            return n.as_str().parse().ok().map(BlockMarker::Ordered);
        }
        if caps.get(4).is_some() {
            return Some(BlockMarker::Quote);
        }
        caps.get(5).map(|_| BlockMarker::Rule)
    }

    /// Blocks replacing a paragraph whose remaining text is `rest`, plus the
    /// caret offset from the start of the first block.
    pub fn build(self, rest: Vec<TextRun>) -> (Vec<Block>, usize) {
        let para = Block::paragraph(rest.clone());
        match self {
            BlockMarker::Heading(level) => (
                vec![Block::Heading {
                    level,
                    content: rest,
                }],
                1,
            ),
            BlockMarker::Bullet => (
                vec![Block::BulletList {
                    content: vec![Block::ListItem {
                        content: vec![para],
                    }],
                }],
                3,
            ),
            BlockMarker::Ordered(start) => (
                vec![Block::OrderedList {
                    start,
                    content: vec![Block::ListItem {
                        content: vec![para],
                    }],
                }],
                3,
            ),
            BlockMarker::Quote => (vec![Block::Blockquote { content: vec![para] }], 2),
            BlockMarker::Rule => (vec![Block::HorizontalRule, para], 2),
        }
    }
}

/// Applies the first input rule matching the text before the caret.
pub fn after_text_input(state: &EditorState) -> Option<Transaction> {
    if !state.is_collapsed() {
        return None;
    }
    let (tb, runs) = textblock_with_runs(&state.doc, state.caret())?;
    let text = plain_text(runs);
    let offset = state.caret() - tb.start;
    let tx = conditional_rule(state, &tb, runs, &text, offset)
        .or_else(|| variable_rule(&tb, runs, &text, offset))
        .or_else(|| block_marker_rule(state, &tb, runs, &text, offset));
    if let Some(tx) = &tx {
        log::debug!("input rule fired at {}: {} steps", state.caret(), tx.steps.len());
    }
    tx
}

/// `((condition??content))` just closed at the caret becomes an inline conditional.
fn conditional_rule(
    state: &EditorState,
    tb: &TextblockPos,
    runs: &[TextRun],
    text: &str,
    offset: usize,
) -> Option<Transaction> {
    let caret_byte = byte_offset(text, offset);
    let before = &text[..caret_byte];
    if !before.as_bytes().ends_with(CLOSE) || text[caret_byte..].starts_with(')') {
        return None;
    }
    if !context_at(&state.doc, &tb.path).allow_conditional {
        return None;
    }

    let header = conditional_header()
        .captures_iter(before)
        .filter_map(|caps| Some((caps.get(0)?, caps.get(1)?)))
        .filter(|(whole, _)| {
            let scan = scan_markers(&before[whole.end()..], 0);
            scan.close.map(|c| whole.end() + c + CLOSE.len()) == Some(caret_byte)
        })
        .last()?;
    let (whole, condition) = header;
    let content = &before[whole.end()..caret_byte - CLOSE.len()];
    if !Conditional::is_valid_content(content) {
        return None;
    }

    let open = char_offset(text, whole.start());
    let body_from = char_offset(text, whole.end());
    let body_to = offset - CLOSE.len();
    if slice_runs(runs, open, offset).iter().any(has_conditional_run) {
        return None;
    }

    let len = body_to - body_from;
    let at = |o: usize| tb.start + o;
    let last_marks = marks_of_char(runs, body_to - 1).unwrap_or(&[]);
    Some(
        Transaction::new(Origin::InputRule)
            .delete(at(body_to), at(offset))
            .delete(at(open), at(body_from))
            .add_mark(at(open), at(open + len), Mark::conditional(condition.as_str().trim()))
            .caret(at(open + len))
            .set_stored_marks(without_kind(last_marks, MarkKind::ConditionalInline)),
    )
}

/// `((name))` just typed becomes a variable.
fn variable_rule(
    tb: &TextblockPos,
    runs: &[TextRun],
    text: &str,
    offset: usize,
) -> Option<Transaction> {
    let caret_byte = byte_offset(text, offset);
    let before = &text[..caret_byte];
    let caps = variable_tail().captures(before)?;
    let whole = caps.get(0)?;
    let raw = caps.get(1)?.as_str();
    let name = raw.trim();
    if !Variable::is_valid_name(name) {
        return None;
    }
    let open = char_offset(text, whole.start());
    if slice_runs(runs, open, offset)
        .iter()
        .any(|r| r.marks.contains(&Mark::Variable))
    {
        return None;
    }
    let lead = raw.chars().take_while(|c| c.is_whitespace()).count();
    let name_from = open + 2 + lead;
    let name_to = name_from + name.chars().count();
    let at = |o: usize| tb.start + o;
    Some(
        Transaction::new(Origin::InputRule)
            .delete(at(name_to), at(offset))
            .delete(at(open), at(name_from))
            .add_mark(at(open), at(open + name_to - name_from), Mark::Variable)
            .caret(at(open + name_to - name_from)),
    )
}

/// A block marker typed at the start of a paragraph converts it. Inside an
/// inline conditional covering the whole paragraph, the result is wrapped in
/// a conditional block instead.
fn block_marker_rule(
    state: &EditorState,
    tb: &TextblockPos,
    runs: &[TextRun],
    text: &str,
    offset: usize,
) -> Option<Transaction> {
    if !matches!(block_at(&state.doc, &tb.path)?, Block::Paragraph { .. }) {
        return None;
    }
    let head: String = text.chars().take(offset).collect();
    let marker = BlockMarker::parse(&head)?;
    if marker == BlockMarker::Rule && offset != inline_len(runs) {
        return None;
    }

    let ranges = mark_ranges(runs, tb.start, is_conditional_mark);
    let whole_conditional = match ranges.as_slice() {
        [r] if r.from == tb.start && r.to == tb.end => r.mark.condition().map(str::to_string),
        _ => None,
    };
    let mut rest = slice_runs(runs, offset, inline_len(runs));
    if whole_conditional.is_some() {
        for run in &mut rest {
            run.marks.retain(|m| !is_conditional_mark(m));
        }
    }

    let (mut blocks, mut caret) = marker.build(rest);
    if let Some(condition) = whole_conditional {
        blocks = vec![Block::conditional(condition, blocks)];
        caret += 1;
    }
    let (&index, parent) = tb.path.split_last()?;
    let start = block_start(&state.doc, &tb.path)?;
    Some(
        Transaction::new(Origin::InputRule)
            .replace_blocks(parent.to_vec(), index..index + 1, blocks)
            .caret(start + caret),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::commands::insert_text;
    use crate::serialize::serialize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Types `input` one char at a time into an empty document, running the
    /// input rules after each char.
    fn type_into(initial: &str, caret: usize, input: &str) -> EditorState {
        let mut state = EditorState::from_markup(initial);
        state.selection = caret..caret;
        for ch in input.chars() {
            let tx = insert_text(&state, &ch.to_string()).expect("caret in text");
            state = state.apply(&tx).unwrap().0;
            if let Some(rule) = after_text_input(&state) {
                state = state.apply(&rule).unwrap().0;
            }
        }
        state
    }

    #[test]
    fn typed_conditional_becomes_mark() {
        let state = type_into("", 1, "((v??content))");
        assert_eq!(
            state.doc.content[0],
            Block::paragraph(vec![TextRun::new("content", vec![Mark::conditional("v")])])
        );
        assert_eq!(state.selection, 8..8);
        assert_eq!(state.stored_marks, Some(vec![]));
    }

    #[test]
    fn typing_after_conditional_stays_outside() {
        let state = type_into("", 1, "((v??a)) b");
        assert_eq!(serialize(&state.doc), "((v??a)) b");
    }

    #[test]
    fn adjacent_variables_stay_distinct() {
        let state = type_into("", 1, "((a))((b))");
        assert_eq!(
            state.doc.content[0],
            Block::paragraph(vec![
                TextRun::new("a", vec![Mark::Variable]),
                TextRun::new("b", vec![Mark::Variable]),
            ])
        );
    }

    #[test]
    fn variable_inside_conditional() {
        let state = type_into("", 1, "((v??hi ((name))))");
        assert_eq!(serialize(&state.doc), "((v??hi ((name))))");
        assert!(state.doc.content[0].contains_run(&|r| r.marks.contains(&Mark::Variable)));
    }

    #[test]
    fn no_conditional_inside_conditional_block() {
        // 0 <cond> 1 <p> 2
        let state = type_into("((a??\n\n))", 2, "((b??x))");
        assert_eq!(serialize(&state.doc), "((a??\n((b??x))\n))");
        assert!(!state.doc.content[0].contains_run(&has_conditional_run));
    }

    #[rstest]
    #[case::heading("## ", "## ")]
    #[case::bullet("- ", "- ")]
    #[case::ordered("3. ", "3. ")]
    #[case::quote("> ", "^ ")]
    fn markers_convert_paragraph(#[case] typed: &str, #[case] stored: &str) {
        let state = type_into("", 1, &format!("{typed}x"));
        assert_eq!(serialize(&state.doc), format!("{stored}x"));
    }

    #[test]
    fn rule_marker_adds_paragraph_after() {
        let state = type_into("", 1, "---");
        assert_eq!(state.doc.content[0], Block::HorizontalRule);
        assert_eq!(state.selection, 2..2);
    }

    #[test]
    fn marker_in_whole_line_conditional_makes_conditional_block() {
        // 0 <p> 1 "- x"(cond) 4 </p>; caret after "- "
        let mut state = EditorState::from_markup("((v??- x))");
        state.selection = 3..3;
        let tx = after_text_input(&state).expect("marker rule applies");
        let (next, _) = state.apply(&tx).unwrap();
        assert_eq!(serialize(&next.doc), "((v??\n- x\n))");
        // <cond> <ul> <li> <p>
        assert_eq!(next.selection, 4..4);
    }
}
