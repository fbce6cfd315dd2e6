//! Pasting markup text at the selection.

use crate::model::{
    Block, Mark, MarkKind, TextRun,
    mark::{add_mark, has_kind},
    position::{block_at, block_start, textblocks},
    text::{inline_len, insert_runs, split_runs},
};
use crate::parsing::parse_blocks;

use super::locate::{caret_near, context_at, textblock_with_runs};
use super::state::EditorState;
use super::transaction::{Origin, Transaction};

/// Builds the transaction pasting `text` at the selection.
///
/// The text is parsed with the constructs allowed where it lands, so markup
/// pasted into a conditional block cannot create a nested conditional. A
/// single paragraph is inserted inline and takes the marks at the caret;
/// anything else splits the current text block around the pasted blocks.
pub fn paste_text(state: &EditorState, text: &str) -> Option<Transaction> {
    let sel = state.selection.clone();
    let (tb, runs) = textblock_with_runs(&state.doc, sel.start)?;
    if !tb.contains(sel.end) {
        return None;
    }
    let mut ctx = context_at(&state.doc, &tb.path);
    if has_kind(&state.effective_marks(), MarkKind::ConditionalInline) {
        ctx = ctx.inside_conditional();
    }
    let blocks = parse_blocks(text, ctx);
    log::debug!("paste of {} bytes parsed into {} blocks", text.len(), blocks.len());

    let from = sel.start - tb.start;
    let to = sel.end - tb.start;

    if let [Block::Paragraph { content }] = blocks.as_slice() {
        let base = state.effective_marks();
        let pasted: Vec<TextRun> = content
            .iter()
            .map(|run| TextRun::new(run.text.clone(), merge_marks(&base, &run.marks)))
            .collect();
        let (head, _) = split_runs(runs, from);
        let (_, tail) = split_runs(runs, to);
        let mut joined = head;
        joined.extend(tail);
        let joined = insert_runs(&joined, from, &pasted);
        let block = block_at(&state.doc, &tb.path)?.with_inline(joined);
        let (&index, parent) = tb.path.split_last()?;
        return Some(
            Transaction::new(Origin::Paste)
                .replace_blocks(parent.to_vec(), index..index + 1, vec![block])
                .caret(sel.start + inline_len(&pasted)),
        );
    }
    if blocks.is_empty() {
        return None;
    }

    let current = block_at(&state.doc, &tb.path)?;
    let (head, _) = split_runs(runs, from);
    let (_, tail) = split_runs(runs, to);
    let has_tail = !tail.is_empty();
    let mut replacement = vec![];
    if !head.is_empty() {
        replacement.push(current.with_inline(head));
    }
    replacement.extend(blocks);
    if has_tail {
        replacement.push(Block::paragraph(tail));
    }
    let (&index, parent) = tb.path.split_last()?;
    let tx = Transaction::new(Origin::Paste).replace_blocks(
        parent.to_vec(),
        index..index + 1,
        replacement.clone(),
    );

    // Caret goes to the end of the last pasted text block.
    let mut scratch = state.doc.clone();
    for step in &tx.steps {
        step.apply(&mut scratch).ok()?;
    }
    let start = block_start(&state.doc, &tb.path)?;
    let pasted_end = start
        + replacement
            .iter()
            .take(replacement.len() - usize::from(has_tail))
            .map(Block::node_size)
            .sum::<usize>();
    let caret = textblocks(&scratch)
        .iter()
        .rev()
        .find(|t| t.end < pasted_end)
        .map_or_else(|| caret_near(&scratch, pasted_end), |t| t.end);
    Some(tx.caret(caret))
}

/// Caret marks plus the pasted run's own marks, the pasted ones winning.
fn merge_marks(base: &[Mark], own: &[Mark]) -> Vec<Mark> {
    let mut marks = base.to_vec();
    for mark in own {
        add_mark(&mut marks, mark.clone());
    }
    marks
}
