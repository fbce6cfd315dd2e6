//! Wraps stand-alone conditional markers into a conditional block.
//!
//! While editing, `((condition??` and `))` can end up as paragraphs of their
//! own (typed on separate lines with Enter). This pass finds such a pair in
//! one container and replaces it, and everything between, with a conditional
//! block. The checks are the same ones the block parser applies.

use crate::model::{
    Block, Document,
    position::{block_start, children_at},
    text::plain_text,
};
use crate::parsing::blocks::kinds::ConditionalBlock;

use super::commands::has_conditional_run;
use super::locate::{caret_near, context_at};
use super::state::EditorState;
use super::transaction::{Origin, Transaction};

/// Condition of a paragraph holding only a block opener.
fn opener_condition(block: &Block) -> Option<String> {
    let Block::Paragraph { content } = block else {
        return None;
    };
    if content.iter().any(has_conditional_run) {
        return None;
    }
    let text = plain_text(content);
    let text = text.trim();
    let (condition, body_at) = ConditionalBlock::opener(text)?;
    (body_at == text.len()).then(|| condition.trim().to_string())
}

fn is_closer(block: &Block) -> bool {
    matches!(block, Block::Paragraph { content } if plain_text(content).trim() == ConditionalBlock::CLOSE)
}

/// A marker pair found in the container at `parent`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MarkerPair {
    parent: Vec<usize>,
    open: usize,
    close: usize,
    condition: String,
}

fn find_pair(doc: &Document, parent: &[usize]) -> Option<MarkerPair> {
    if !context_at(doc, parent).allow_conditional {
        return None;
    }
    let children = children_at(doc, parent)?;
    for (i, block) in children.iter().enumerate() {
        let Some(condition) = opener_condition(block) else {
            continue;
        };
        let Some(offset) = children[i + 1..].iter().position(is_closer) else {
            continue;
        };
        let close = i + 1 + offset;
        let body = &children[i + 1..close];
        let valid = body.iter().all(|b| {
            !b.contains_block(&Block::is_conditional) && !b.contains_run(&has_conditional_run)
        });
        if valid {
            return Some(MarkerPair {
                parent: parent.to_vec(),
                open: i,
                close,
                condition,
            });
        }
        log::trace!("marker pair at {parent:?}[{i}..={close}] holds conditionals; left as text");
    }
    // Recurse into nested containers.
    children.iter().enumerate().find_map(|(i, child)| {
        if child.is_conditional() || child.children().is_none() {
            return None;
        }
        let mut path = parent.to_vec();
        path.push(i);
        find_pair(doc, &path)
    })
}

/// Builds the transaction wrapping the first stand-alone marker pair, if any.
///
/// Running it again on the result finds nothing new.
pub fn auto_wrap(state: &EditorState) -> Option<Transaction> {
    let pair = find_pair(&state.doc, &[])?;
    let children = children_at(&state.doc, &pair.parent)?;
    let body: Vec<Block> = children[pair.open + 1..pair.close].to_vec();
    let body = if body.is_empty() {
        vec![Block::empty_paragraph()]
    } else {
        body
    };
    let wrapped = Block::conditional(pair.condition.clone(), body);

    let mut open_path = pair.parent.clone();
    open_path.push(pair.open);
    let open_start = block_start(&state.doc, &open_path)?;
    let header = children[pair.open].node_size();
    let close_start = open_start + crate::model::content_size(&children[pair.open..pair.close]);
    let old_end = close_start + children[pair.close].node_size();
    let new_end = open_start + wrapped.node_size();

    let tx = Transaction::new(Origin::AutoWrap).replace_blocks(
        pair.parent.clone(),
        pair.open..pair.close + 1,
        vec![wrapped],
    );
    let mut scratch = state.doc.clone();
    for step in &tx.steps {
        step.apply(&mut scratch).ok()?;
    }

    let map = |p: usize| {
        let mapped = if p < open_start {
            p
        } else if p < open_start + header {
            open_start + 2
        } else if p <= close_start {
            p - header + 1
        } else if p < old_end {
            new_end - 2
        } else {
            p - old_end + new_end
        };
        caret_near(&scratch, mapped)
    };
    let sel = state.selection.clone();
    log::debug!(
        "wrapping marker paragraphs {}..={} at {:?} in a conditional block",
        pair.open,
        pair.close,
        pair.parent
    );
    Some(tx.select(map(sel.start)..map(sel.end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;
    use crate::serialize::serialize;
    use pretty_assertions::assert_eq;

    fn para(text: &str) -> Block {
        Block::paragraph(vec![TextRun::plain(text)])
    }

    fn state_with(blocks: Vec<Block>, caret: usize) -> EditorState {
        let mut state = EditorState::new(Document::new(blocks));
        state.selection = caret..caret;
        state
    }

    #[test]
    fn wraps_marker_paragraphs() {
        // 0 <p> 1 "((v??" 6 </p> 7 <p> 8 "Hello" 13 </p> 14 <p> 15 "))" 17 </p> 18
        let state = state_with(vec![para("((v??"), para("Hello"), para("))")], 10);
        let tx = auto_wrap(&state).expect("pair found");
        let (next, _) = state.apply(&tx).unwrap();
        assert_eq!(
            next.doc.content,
            vec![Block::conditional("v", vec![para("Hello")])]
        );
        // 0 <cond> 1 <p> 2 "Hello"
        assert_eq!(next.selection, 4..4);
        assert_eq!(auto_wrap(&next), None);
    }

    #[test]
    fn caret_on_closer_moves_to_end_of_body() {
        let state = state_with(vec![para("((v??"), para("Hello"), para("))")], 17);
        let tx = auto_wrap(&state).expect("pair found");
        let (next, _) = state.apply(&tx).unwrap();
        assert_eq!(next.selection, 7..7);
    }

    #[test]
    fn empty_body_gets_paragraph() {
        let state = state_with(vec![para("((v??"), para("))"), para("after")], 1);
        let (next, _) = state.apply(&auto_wrap(&state).unwrap()).unwrap();
        assert_eq!(serialize(&next.doc), "((v??\n\n))\n\nafter");
        assert_eq!(next.selection, 2..2);
    }

    #[test]
    fn body_with_inline_conditional_is_left_alone() {
        let body = Block::paragraph(vec![TextRun::new("x", vec![crate::model::Mark::conditional("c")])]);
        let state = state_with(vec![para("((v??"), body, para("))")], 1);
        assert_eq!(auto_wrap(&state), None);
    }

    #[test]
    fn markers_inside_conditional_block_are_left_alone() {
        let inner = Block::conditional("a", vec![para("((v??"), para("x"), para("))")]);
        let state = state_with(vec![inner], 2);
        assert_eq!(auto_wrap(&state), None);
    }

    #[test]
    fn wraps_inside_language_block() {
        let lang = Block::language(
            crate::model::Language::Fr,
            vec![para("((v??"), para("x"), para("))")],
        );
        let state = state_with(vec![lang], 2);
        let (next, _) = state.apply(&auto_wrap(&state).unwrap()).unwrap();
        assert_eq!(serialize(&next.doc), "[[fr]]\n((v??\nx\n))\n[[/fr]]");
    }
}
