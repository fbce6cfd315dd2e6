//! Per-construct views for a host renderer.
//!
//! Each template construct gets one view object, chosen by construct kind
//! while walking the tree once. Views hold the position they were found at
//! and re-resolve it against the live document whenever they act.

use crate::model::{
    Block, Document, Language, Mark, MarkKind,
    position::{block_at, find_blocks, textblocks},
    text::{plain_text, slice_runs},
};
use crate::navigation::range::{MarkRange, conditional_after, conditional_block_at, mark_ranges};
use crate::navigation::{self, Focus, Key, NavOutcome, Target};
use crate::parsing::inline::kinds::{Conditional, Variable};
use crate::render::{block_html, inline_html};

use super::commands::{is_conditional_mark, set_inline_condition};
use super::locate::textblock_with_runs;
use super::state::EditorState;
use super::transaction::{BlockAttrs, Origin, Transaction};

/// Rendering and interaction hooks for one construct instance.
pub trait NodeView {
    /// Position the construct starts at.
    fn pos(&self) -> usize;

    /// HTML for the construct, or an empty string when it no longer exists.
    fn render(&self, doc: &Document) -> String;

    /// Handles a key while the caret or label focus is on this construct.
    fn on_key(&self, state: &EditorState, focus: &Focus, key: Key) -> NavOutcome;

    /// Applies text edited in the construct's label input.
    fn commit(&self, state: &EditorState, label: &str) -> Option<Transaction>;

    /// Refreshes cached attributes; `false` when the construct is gone.
    fn update(&mut self, doc: &Document) -> bool;
}

/// Runs navigation only when it resolves to the construct starting at `pos`.
fn navigate_if_target(state: &EditorState, focus: &Focus, key: Key, pos: usize) -> NavOutcome {
    let targets_self = match navigation::classify(state, focus).1 {
        Some(Target::Inline(r)) => r.from == pos,
        Some(Target::Block(b)) => b.from == pos,
        None => false,
    };
    if targets_self {
        navigation::handle_key(state, focus, key)
    } else {
        NavOutcome::Unhandled
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBlockView {
    pub pos: usize,
    pub condition: String,
}

impl NodeView for ConditionalBlockView {
    fn pos(&self) -> usize {
        self.pos
    }

    fn render(&self, doc: &Document) -> String {
        conditional_block_at(doc, self.pos)
            .and_then(|b| block_at(doc, &b.path))
            .map(block_html)
            .unwrap_or_default()
    }

    fn on_key(&self, state: &EditorState, focus: &Focus, key: Key) -> NavOutcome {
        navigate_if_target(state, focus, key, self.pos)
    }

    fn commit(&self, state: &EditorState, label: &str) -> Option<Transaction> {
        let label = label.trim();
        if !Conditional::is_valid_condition(label) {
            return None;
        }
        let block = conditional_block_at(&state.doc, self.pos)?;
        Some(
            Transaction::new(Origin::Command)
                .set_block_attrs(block.path, BlockAttrs::Condition(label.to_string())),
        )
    }

    fn update(&mut self, doc: &Document) -> bool {
        match conditional_block_at(doc, self.pos).and_then(|b| block_at(doc, &b.path)) {
            Some(Block::ConditionalBlock { condition, .. }) => {
                self.condition = condition.clone();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalInlineView {
    pub range: MarkRange,
}

impl NodeView for ConditionalInlineView {
    fn pos(&self) -> usize {
        self.range.from
    }

    fn render(&self, doc: &Document) -> String {
        let Some((tb, runs)) = textblock_with_runs(doc, self.range.from) else {
            return String::new();
        };
        inline_html(&slice_runs(
            runs,
            self.range.from - tb.start,
            self.range.to - tb.start,
        ))
    }

    fn on_key(&self, state: &EditorState, focus: &Focus, key: Key) -> NavOutcome {
        navigate_if_target(state, focus, key, self.range.from)
    }

    fn commit(&self, state: &EditorState, label: &str) -> Option<Transaction> {
        set_inline_condition(state, self.range.from, label)
    }

    fn update(&mut self, doc: &Document) -> bool {
        match conditional_after(doc, self.range.from).filter(|r| r.from == self.range.from) {
            Some(range) => {
                self.range = range;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableView {
    pub range: MarkRange,
    pub name: String,
}

impl NodeView for VariableView {
    fn pos(&self) -> usize {
        self.range.from
    }

    fn render(&self, _doc: &Document) -> String {
        format!(
            "<span data-type=\"variable\">{}</span>",
            html_escape::encode_text(&self.name)
        )
    }

    fn on_key(&self, _state: &EditorState, _focus: &Focus, _key: Key) -> NavOutcome {
        NavOutcome::Unhandled
    }

    /// Renames the variable, keeping its other marks.
    fn commit(&self, state: &EditorState, label: &str) -> Option<Transaction> {
        let name = label.trim();
        if !Variable::is_valid_name(name) || name == self.name {
            return None;
        }
        let (tb, runs) = textblock_with_runs(&state.doc, self.range.from)?;
        let marks = slice_runs(runs, self.range.from - tb.start, self.range.to - tb.start)
            .first()?
            .marks
            .clone();
        Some(
            Transaction::new(Origin::Command)
                .delete(self.range.from, self.range.to)
                .insert_text(self.range.from, name, marks),
        )
    }

    fn update(&mut self, doc: &Document) -> bool {
        let Some((tb, runs)) = textblock_with_runs(doc, self.range.from) else {
            return false;
        };
        let found = mark_ranges(runs, tb.start, |m| m.kind() == MarkKind::Variable)
            .into_iter()
            .find(|r| r.from == self.range.from);
        match found {
            Some(range) => {
                self.name = plain_text(&slice_runs(runs, range.from - tb.start, range.to - tb.start));
                self.range = range;
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBlockView {
    pub pos: usize,
    pub language: Language,
}

impl LanguageBlockView {
    fn block<'a>(&self, doc: &'a Document) -> Option<(Vec<usize>, &'a Block)> {
        let found = find_blocks(doc, Block::is_language)
            .into_iter()
            .find(|b| b.from == self.pos)?;
        let block = block_at(doc, &found.path)?;
        Some((found.path, block))
    }
}

impl NodeView for LanguageBlockView {
    fn pos(&self) -> usize {
        self.pos
    }

    fn render(&self, doc: &Document) -> String {
        self.block(doc)
            .map(|(_, block)| block_html(block))
            .unwrap_or_default()
    }

    fn on_key(&self, _state: &EditorState, _focus: &Focus, _key: Key) -> NavOutcome {
        NavOutcome::Unhandled
    }

    /// Switches the block's language from a language code.
    fn commit(&self, state: &EditorState, label: &str) -> Option<Transaction> {
        let language = Language::from_code(label.trim())?;
        let (path, _) = self.block(&state.doc)?;
        Some(
            Transaction::new(Origin::Command)
                .set_block_attrs(path, BlockAttrs::Language(language)),
        )
    }

    fn update(&mut self, doc: &Document) -> bool {
        match self.block(doc) {
            Some((_, Block::LanguageBlock { language, .. })) => {
                self.language = *language;
                true
            }
            _ => false,
        }
    }
}

/// A view selected by construct kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    ConditionalBlock(ConditionalBlockView),
    ConditionalInline(ConditionalInlineView),
    Variable(VariableView),
    LanguageBlock(LanguageBlockView),
}

impl ViewKind {
    pub fn as_view(&self) -> &dyn NodeView {
        match self {
            ViewKind::ConditionalBlock(v) => v,
            ViewKind::ConditionalInline(v) => v,
            ViewKind::Variable(v) => v,
            ViewKind::LanguageBlock(v) => v,
        }
    }

    pub fn as_view_mut(&mut self) -> &mut dyn NodeView {
        match self {
            ViewKind::ConditionalBlock(v) => v,
            ViewKind::ConditionalInline(v) => v,
            ViewKind::Variable(v) => v,
            ViewKind::LanguageBlock(v) => v,
        }
    }
}

/// Collects one view per construct, ordered by position.
pub fn collect_views(doc: &Document) -> Vec<ViewKind> {
    let mut views = vec![];
    walk_blocks(&doc.content, 0, &mut views);
    for tb in textblocks(doc) {
        let Some(runs) = block_at(doc, &tb.path).and_then(Block::inline_content) else {
            continue;
        };
        for range in mark_ranges(runs, tb.start, is_conditional_mark) {
            views.push(ViewKind::ConditionalInline(ConditionalInlineView { range }));
        }
        for range in mark_ranges(runs, tb.start, |m| *m == Mark::Variable) {
            let name = plain_text(&slice_runs(runs, range.from - tb.start, range.to - tb.start));
            views.push(ViewKind::Variable(VariableView { range, name }));
        }
    }
    views.sort_by_key(|v| v.as_view().pos());
    views
}

fn walk_blocks(blocks: &[Block], start: usize, views: &mut Vec<ViewKind>) {
    let mut pos = start;
    for block in blocks {
        match block {
            Block::ConditionalBlock { condition, .. } => {
                views.push(ViewKind::ConditionalBlock(ConditionalBlockView {
                    pos,
                    condition: condition.clone(),
                }))
            }
            Block::LanguageBlock { language, .. } => {
                views.push(ViewKind::LanguageBlock(LanguageBlockView {
                    pos,
                    language: *language,
                }))
            }
            _ => {}
        }
        if let Some(children) = block.children() {
            walk_blocks(children, pos + 1, views);
        }
        pos += block.node_size();
    }
}

/// Views for the current document, rebuilt only when its version changes.
#[derive(Debug, Default)]
pub struct ViewCache {
    version: Option<u64>,
    views: Vec<ViewKind>,
    rebuilds: usize,
}

impl ViewCache {
    pub fn get(&mut self, state: &EditorState) -> &[ViewKind] {
        if self.version != Some(state.version) {
            self.views = collect_views(&state.doc);
            self.version = Some(state.version);
            self.rebuilds += 1;
            log::trace!("rebuilt {} views for version {}", self.views.len(), state.version);
        }
        &self.views
    }

    /// How many times the views were rebuilt.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn invalidate(&mut self) {
        self.version = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse_markup;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_views_in_document_order() {
        // 0 <lang> 1 <cond> 2 <p> 3 "x" 4 </p> 5 </cond> 6 </lang> 7 <p> 8 "a"(var) 9 "b"(cond)
        let doc = parse_markup("[[en]]\n((c??\nx\n))\n[[/en]]\n\n((a))((d??b))");
        let kinds: Vec<(usize, &str)> = collect_views(&doc)
            .iter()
            .map(|v| {
                let name = match v {
                    ViewKind::ConditionalBlock(_) => "conditional",
                    ViewKind::ConditionalInline(_) => "conditional-inline",
                    ViewKind::Variable(_) => "variable",
                    ViewKind::LanguageBlock(_) => "language",
                };
                (v.as_view().pos(), name)
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                (0, "language"),
                (1, "conditional"),
                (8, "variable"),
                (9, "conditional-inline"),
            ]
        );
    }

    #[test]
    fn views_render_their_construct() {
        let doc = parse_markup("Hi ((name)) ((c??x))");
        let html: Vec<String> = collect_views(&doc)
            .iter()
            .map(|v| v.as_view().render(&doc))
            .collect();
        insta::assert_debug_snapshot!(html, @r#"
        [
            "<span data-type=\"variable\">name</span>",
            "<span data-type=\"conditional-inline\" data-condition=\"c\">x</span>",
        ]
        "#);
    }

    #[test]
    fn commit_renames_block_condition_and_variable() {
        let state = EditorState::from_markup("((a??\nHi ((name))\n))");
        let views = collect_views(&state.doc);
        let ViewKind::ConditionalBlock(block) = &views[0] else {
            panic!("expected conditional block view");
        };
        let (next, _) = state.apply(&block.commit(&state, " b ").unwrap()).unwrap();
        assert_eq!(crate::serialize::serialize(&next.doc), "((b??\nHi ((name))\n))");

        let ViewKind::Variable(var) = &views[1] else {
            panic!("expected variable view");
        };
        assert_eq!(var.commit(&state, "name"), None);
        let (next, _) = state.apply(&var.commit(&state, "first").unwrap()).unwrap();
        assert_eq!(crate::serialize::serialize(&next.doc), "((a??\nHi ((first))\n))");
        assert!(block.commit(&state, "bad??").is_none());
    }

    #[test]
    fn update_reports_vanished_construct() {
        let doc = parse_markup("((c??x))");
        let mut views = collect_views(&doc);
        assert!(views[0].as_view_mut().update(&doc));
        assert!(!views[0].as_view_mut().update(&parse_markup("x")));
    }

    #[test]
    fn cache_rebuilds_only_on_new_version() {
        let mut state = EditorState::from_markup("((a))");
        let mut cache = ViewCache::default();
        assert_eq!(cache.get(&state).len(), 1);
        state.selection = 2..2;
        cache.get(&state);
        assert_eq!(cache.rebuilds(), 1);
        state.version += 1;
        cache.get(&state);
        assert_eq!(cache.rebuilds(), 2);
    }
}
