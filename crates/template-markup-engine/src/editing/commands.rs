//! Editing commands exposed to the toolbar and keymap.
//!
//! Every command inspects the current state and returns the transaction that
//! performs it, or `None` when the command does not apply here. Refusing is
//! how structural rules (no nested conditionals, no nested language blocks)
//! surface to callers; nothing is ever half-applied.

use crate::model::{
    Block, DEFAULT_CONDITION, Language, Mark, MarkKind, TextRun,
    mark::without_kind,
    position::{block_at, block_start, find_ancestor, textblock_at},
    text::{
        inline_len, normalize_runs, plain_text, slice_runs, split_runs, trim_runs_end,
        trim_runs_start,
    },
};
use crate::navigation::range::{MarkRange, enclosing_conditional_block, find_mark_range};
use crate::parsing::inline::kinds::{Conditional, Variable};

use super::locate::{caret_near, context_at, covering_blocks, runs_of, textblock_with_runs};
use super::state::EditorState;
use super::transaction::{BlockAttrs, Origin, Transaction};

/// Where an inline conditional is split when it becomes a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    /// Two paragraphs, split at this document position.
    At(usize),
    /// One paragraph holding all of the content.
    Whole,
}

/// Toolbar commands, compiled against the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cmd {
    InsertVariable { name: String },
    SetInlineConditional { condition: String },
    RemoveInlineConditional,
    SetInlineCondition { at: usize, condition: String },
    WrapInConditionalBlock { condition: String },
    UnwrapConditionalBlock,
    SetBlockCondition { condition: String },
    ToggleLanguageBlock { language: Language },
    DeleteSelection,
    DeleteCurrentBlock,
    SplitBlock,
    ConvertToBlock { mode: SplitMode },
}

/// Compiles a command into a transaction; `None` when it does not apply.
pub fn compile_command(state: &EditorState, cmd: &Cmd) -> Option<Transaction> {
    match cmd {
        Cmd::InsertVariable { name } => insert_variable(state, name),
        Cmd::SetInlineConditional { condition } => set_inline_conditional(state, condition),
        Cmd::RemoveInlineConditional => remove_inline_conditional(state),
        Cmd::SetInlineCondition { at, condition } => set_inline_condition(state, *at, condition),
        Cmd::WrapInConditionalBlock { condition } => wrap_in_conditional_block(state, condition),
        Cmd::UnwrapConditionalBlock => unwrap_conditional_block(state),
        Cmd::SetBlockCondition { condition } => set_block_condition(state, condition),
        Cmd::ToggleLanguageBlock { language } => toggle_language_block(state, *language),
        Cmd::DeleteSelection => delete_selection(state),
        Cmd::DeleteCurrentBlock => delete_current_block(state),
        Cmd::SplitBlock => split_block(state),
        Cmd::ConvertToBlock { mode } => convert_inline_to_block(state, *mode),
    }
}

/// Normalizes a condition typed by the user; blank becomes the default.
fn clean_condition(condition: &str) -> Option<String> {
    let trimmed = condition.trim();
    if trimmed.is_empty() {
        return Some(DEFAULT_CONDITION.to_string());
    }
    Conditional::is_valid_condition(trimmed).then(|| trimmed.to_string())
}

pub(crate) fn is_conditional_mark(mark: &Mark) -> bool {
    mark.kind() == MarkKind::ConditionalInline
}

pub(crate) fn has_conditional_run(run: &TextRun) -> bool {
    run.marks.iter().any(is_conditional_mark)
}

/// Replaces the selection (if any) with `text`, taking the effective marks.
pub fn insert_text(state: &EditorState, text: &str) -> Option<Transaction> {
    let sel = state.selection.clone();
    let tb = textblock_at(&state.doc, sel.start)?;
    if !tb.contains(sel.end) {
        return None;
    }
    let marks = if sel.start == sel.end {
        state.effective_marks()
    } else {
        let runs = runs_of(&state.doc, &tb);
        crate::model::text::marks_of_char(runs, sel.start - tb.start)
            .map(<[Mark]>::to_vec)
            .unwrap_or_default()
    };
    let end = sel.start + text.chars().count();
    Some(
        Transaction::new(Origin::User)
            .delete(sel.start, sel.end)
            .insert_text(sel.start, text, marks)
            .caret(end),
    )
}

/// Inserts `((name))` at the caret, replacing any selection.
pub fn insert_variable(state: &EditorState, name: &str) -> Option<Transaction> {
    let name = name.trim();
    if !Variable::is_valid_name(name) {
        return None;
    }
    let sel = state.selection.clone();
    let tb = textblock_at(&state.doc, sel.start)?;
    if !tb.contains(sel.end) {
        return None;
    }
    let mut marks = without_kind(&state.effective_marks(), MarkKind::Link);
    crate::model::mark::add_mark(&mut marks, Mark::Variable);
    let end = sel.start + name.chars().count();
    Some(
        Transaction::new(Origin::Command)
            .delete(sel.start, sel.end)
            .insert_text(sel.start, name, marks)
            .caret(end)
            .reset_stored_marks(),
    )
}

/// Wraps the selected text in an inline conditional.
///
/// Refused for an empty or multi-line selection and inside conditional blocks.
pub fn set_inline_conditional(state: &EditorState, condition: &str) -> Option<Transaction> {
    let condition = clean_condition(condition)?;
    let sel = state.selection.clone();
    if sel.start == sel.end {
        return None;
    }
    let (tb, runs) = textblock_with_runs(&state.doc, sel.start)?;
    if !tb.contains(sel.end) || !context_at(&state.doc, &tb.path).allow_conditional {
        return None;
    }
    let selected = plain_text(&slice_runs(runs, sel.start - tb.start, sel.end - tb.start));
    if !Conditional::is_valid_content(&selected) {
        return None;
    }
    Some(Transaction::new(Origin::Command).add_mark(
        sel.start,
        sel.end,
        Mark::conditional(condition),
    ))
}

fn conditional_at(state: &EditorState, pos: usize) -> Option<MarkRange> {
    find_mark_range(&state.doc, pos, is_conditional_mark)
}

/// Removes the inline conditional around the caret, keeping its text.
pub fn remove_inline_conditional(state: &EditorState) -> Option<Transaction> {
    let range = conditional_at(state, state.caret())?;
    Some(Transaction::new(Origin::Command).remove_mark(
        range.from,
        range.to,
        MarkKind::ConditionalInline,
    ))
}

/// Changes the condition of the inline conditional touching `pos`.
pub fn set_inline_condition(state: &EditorState, pos: usize, condition: &str) -> Option<Transaction> {
    let condition = clean_condition(condition)?;
    let range = conditional_at(state, pos)?;
    if range.mark.condition() == Some(condition.as_str()) {
        return None;
    }
    Some(Transaction::new(Origin::Command).add_mark(
        range.from,
        range.to,
        Mark::conditional(condition),
    ))
}

/// Wraps the blocks covered by the selection in a conditional block.
///
/// Refused inside a conditional block and when the covered blocks already
/// hold a conditional block or inline conditionals.
pub fn wrap_in_conditional_block(state: &EditorState, condition: &str) -> Option<Transaction> {
    let condition = clean_condition(condition)?;
    let (parent, range) = covering_blocks(&state.doc, state.selection.start, state.selection.end)?;
    if !context_at(&state.doc, &parent).allow_conditional {
        return None;
    }
    let children = crate::model::position::children_at(&state.doc, &parent)?;
    let wrapped = children[range.clone()].to_vec();
    let conflicts = wrapped.iter().any(|b| {
        b.contains_block(&Block::is_conditional) || b.contains_run(&has_conditional_run)
    });
    if conflicts {
        return None;
    }
    let sel = state.selection.clone();
    Some(
        Transaction::new(Origin::Command)
            .replace_blocks(parent, range, vec![Block::conditional(condition, wrapped)])
            .select(sel.start + 1..sel.end + 1),
    )
}

/// Replaces the container at `path` with its children.
fn unwrap_block(state: &EditorState, path: Vec<usize>) -> Option<Transaction> {
    let block = block_at(&state.doc, &path)?;
    let children = block.children()?.to_vec();
    let from = block_start(&state.doc, &path)?;
    let to = from + block.node_size();
    let (&index, parent) = path.split_last()?;
    // The wrapper's open and close tokens disappear.
    let map = |p: usize| match p {
        p if p <= from => p,
        p if p < to => p - 1,
        p => p - 2,
    };
    let sel = state.selection.clone();
    Some(
        Transaction::new(Origin::Command)
            .replace_blocks(parent.to_vec(), index..index + 1, children)
            .select(map(sel.start)..map(sel.end)),
    )
}

/// Lifts the content of the conditional block around the caret out of it.
pub fn unwrap_conditional_block(state: &EditorState) -> Option<Transaction> {
    let block = enclosing_conditional_block(&state.doc, state.caret())?;
    unwrap_block(state, block.path)
}

/// Changes the condition of the conditional block around the caret.
pub fn set_block_condition(state: &EditorState, condition: &str) -> Option<Transaction> {
    let condition = clean_condition(condition)?;
    let block = enclosing_conditional_block(&state.doc, state.caret())?;
    Some(
        Transaction::new(Origin::Command)
            .set_block_attrs(block.path, BlockAttrs::Condition(condition)),
    )
}

/// Wraps the selection in a language block, or unwraps the block it is in.
///
/// Inside a block of another language the command is refused, as is wrapping
/// blocks that already contain a language block.
pub fn toggle_language_block(state: &EditorState, language: Language) -> Option<Transaction> {
    let tb = textblock_at(&state.doc, state.caret())?;
    if let Some(path) = find_ancestor(&state.doc, &tb.path, Block::is_language) {
        return match block_at(&state.doc, &path)? {
            Block::LanguageBlock { language: current, .. } if *current == language => {
                unwrap_block(state, path)
            }
            _ => None,
        };
    }

    let (parent, range) = covering_blocks(&state.doc, state.selection.start, state.selection.end)?;
    let children = crate::model::position::children_at(&state.doc, &parent)?;
    let wrapped = children[range.clone()].to_vec();
    if wrapped.iter().any(|b| b.contains_block(&Block::is_language)) {
        return None;
    }
    let sel = state.selection.clone();
    Some(
        Transaction::new(Origin::Command)
            .replace_blocks(parent, range, vec![Block::language(language, wrapped)])
            .select(sel.start + 1..sel.end + 1),
    )
}

/// Deletes the selection.
///
/// Within one text block this removes text; across sibling text blocks the
/// first and last are joined and everything between removed. Selections
/// spanning different containers are refused.
pub fn delete_selection(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection.clone();
    if sel.start == sel.end {
        return None;
    }
    let first = textblock_at(&state.doc, sel.start)?;
    if first.contains(sel.end) {
        return Some(
            Transaction::new(Origin::User)
                .delete(sel.start, sel.end)
                .caret(sel.start),
        );
    }
    let last = textblock_at(&state.doc, sel.end)?;
    let (&i, parent) = first.path.split_last()?;
    let (&j, last_parent) = last.path.split_last()?;
    if parent != last_parent {
        return None;
    }
    let head_runs = runs_of(&state.doc, &first);
    let tail_runs = runs_of(&state.doc, &last);
    let (head, _) = split_runs(head_runs, sel.start - first.start);
    let (_, tail) = split_runs(tail_runs, sel.end - last.start);
    let joined = block_at(&state.doc, &first.path)?
        .with_inline(normalize_runs(head.into_iter().chain(tail).collect()));
    Some(
        Transaction::new(Origin::User)
            .replace_blocks(parent.to_vec(), i..j + 1, vec![joined])
            .caret(sel.start),
    )
}

/// Removes the text block holding the caret. An emptied container keeps one
/// empty paragraph.
pub fn delete_current_block(state: &EditorState) -> Option<Transaction> {
    let tb = textblock_at(&state.doc, state.caret())?;
    let (&index, parent) = tb.path.split_last()?;
    let start = block_start(&state.doc, &tb.path)?;
    let tx = Transaction::new(Origin::User).replace_blocks(parent.to_vec(), index..index + 1, vec![]);
    let mut scratch = state.doc.clone();
    for step in &tx.steps {
        step.apply(&mut scratch).ok()?;
    }
    Some(tx.caret(caret_near(&scratch, start)))
}

/// Splits the text block at the caret (plain Enter).
///
/// A paragraph directly inside a list item splits the item, so the new
/// paragraph starts a new item.
pub fn split_block(state: &EditorState) -> Option<Transaction> {
    let sel = state.selection.clone();
    let tb = textblock_at(&state.doc, sel.start)?;
    if !tb.contains(sel.end) {
        return None;
    }
    let runs = runs_of(&state.doc, &tb);
    let block = block_at(&state.doc, &tb.path)?;
    let (left, _) = split_runs(runs, sel.start - tb.start);
    let (_, right) = split_runs(runs, sel.end - tb.start);
    let left_len = inline_len(&left);
    let first = block.with_inline(left);
    let second = Block::paragraph(right);

    let (&index, parent) = tb.path.split_last()?;
    if let Some((&item_index, list_path)) = parent.split_last()
        && let Some(Block::ListItem { content }) = block_at(&state.doc, parent)
    {
        let mut kept = content[..index].to_vec();
        kept.push(first);
        let mut moved = vec![second];
        moved.extend(content[index + 1..].iter().cloned());
        return Some(
            Transaction::new(Origin::User)
                .replace_blocks(
                    list_path.to_vec(),
                    item_index..item_index + 1,
                    vec![
                        Block::ListItem { content: kept },
                        Block::ListItem { content: moved },
                    ],
                )
                .caret(tb.start + left_len + 4),
        );
    }
    Some(
        Transaction::new(Origin::User)
            .replace_blocks(parent.to_vec(), index..index + 1, vec![first, second])
            .caret(tb.start + left_len + 2),
    )
}

/// Replaces the inline conditional around the caret with a conditional block.
///
/// Text before and after the conditional stays in blocks of its own when it
/// is not blank. The caret ends at the start of the second paragraph for
/// [`SplitMode::At`] and of the only paragraph for [`SplitMode::Whole`].
pub fn convert_inline_to_block(state: &EditorState, mode: SplitMode) -> Option<Transaction> {
    let pos = match mode {
        SplitMode::At(pos) => pos,
        SplitMode::Whole => state.caret(),
    };
    let range = conditional_at(state, pos)?;
    if let SplitMode::At(at) = mode
        && !(range.from..=range.to).contains(&at)
    {
        return None;
    }
    let condition = range.mark.condition()?.to_string();
    let (tb, runs) = textblock_with_runs(&state.doc, range.from)?;
    let block = block_at(&state.doc, &tb.path)?;
    let (&index, parent) = tb.path.split_last()?;
    if !context_at(&state.doc, parent).allow_conditional {
        return None;
    }

    let a = range.from - tb.start;
    let b = range.to - tb.start;
    let before = trim_runs_end(slice_runs(runs, 0, a));
    let after = trim_runs_start(slice_runs(runs, b, inline_len(runs)));
    let content: Vec<TextRun> = slice_runs(runs, a, b)
        .into_iter()
        .map(|r| TextRun::new(r.text, without_kind(&r.marks, MarkKind::ConditionalInline)))
        .collect();

    let (body, caret_offset) = match mode {
        SplitMode::At(at) => {
            let (first, second) = split_runs(&content, at - range.from);
            let offset = inline_len(&first) + 4;
            (vec![Block::paragraph(first), Block::paragraph(second)], offset)
        }
        SplitMode::Whole => (vec![Block::paragraph(normalize_runs(content))], 2),
    };

    let mut blocks = vec![];
    let mut base = block_start(&state.doc, &tb.path)?;
    if !before.is_empty() {
        let head = block.with_inline(before);
        base += head.node_size();
        blocks.push(head);
    }
    blocks.push(Block::conditional(condition, body));
    if !after.is_empty() {
        blocks.push(Block::paragraph(after));
    }
    Some(
        Transaction::new(Origin::Command)
            .replace_blocks(parent.to_vec(), index..index + 1, blocks)
            .caret(base + caret_offset)
            .reset_stored_marks(),
    )
}
