//! The editor: current state plus the rules that run around each change.

use std::ops::Range;

use crate::model::{Document, position::textblocks};
use crate::navigation::{Focus, Key, LabelTarget, NavOutcome, Signal};
use crate::options::MarkupOptions;
use crate::parsing::parse_markup;
use crate::render::to_html;
use crate::serialize::serialize_with;

use super::auto_wrap::auto_wrap;
use super::commands::{Cmd, compile_command, insert_text, split_block};
use super::input_rules::after_text_input;
use super::locate::caret_near;
use super::paste::paste_text;
use super::patch::Patch;
use super::state::EditorState;
use super::transaction::{Assoc, Mapping, Origin, Transaction};
use super::views::{ViewCache, ViewKind};

/// Owns the editor state and applies every change through [`Editor::dispatch`].
#[derive(Debug)]
pub struct Editor {
    state: EditorState,
    options: MarkupOptions,
    focus: Focus,
    views: ViewCache,
    /// Caret positions to restore once the host has re-rendered.
    deferred: Vec<usize>,
    signals: Vec<Signal>,
    last_patch: Option<Patch>,
}

impl Editor {
    pub fn new(doc: Document, options: MarkupOptions) -> Self {
        Self {
            state: EditorState::new(doc),
            options,
            focus: Focus::Content,
            views: ViewCache::default(),
            deferred: vec![],
            signals: vec![],
            last_patch: None,
        }
    }

    pub fn from_markup(text: &str, options: MarkupOptions) -> Self {
        Self::new(parse_markup(text), options)
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn options(&self) -> &MarkupOptions {
        &self.options
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    /// Patch of the last transaction that applied.
    pub fn last_patch(&self) -> Option<&Patch> {
        self.last_patch.as_ref()
    }

    /// Applies `tx`, then wraps any stand-alone conditional markers.
    ///
    /// Returns `false`, leaving everything untouched, when the transaction is
    /// rejected.
    pub fn dispatch(&mut self, tx: Transaction) -> bool {
        let (mut next, patch) = match self.state.apply(&tx) {
            Ok(applied) => applied,
            Err(err) => {
                log::warn!("rejected {:?} transaction: {err}", tx.origin);
                return false;
            }
        };
        let mut mapping = patch.mapping.clone();
        let mut last = patch;
        while let Some(wrap) = auto_wrap(&next) {
            match next.apply(&wrap) {
                Ok((wrapped, patch)) => {
                    mapping.maps.extend(patch.mapping.maps.iter().cloned());
                    next = wrapped;
                    last = patch;
                }
                Err(err) => {
                    log::warn!("auto-wrap rejected: {err}");
                    break;
                }
            }
        }
        self.remap(&mapping);
        self.state = next;
        self.last_patch = Some(last);
        true
    }

    fn remap(&mut self, mapping: &Mapping) {
        if let Focus::ConditionLabel { target, caret } = self.focus {
            let pos = mapping.map(target.pos(), Assoc::After);
            self.focus = Focus::ConditionLabel {
                target: target.with_pos(pos),
                caret,
            };
        }
        for pos in &mut self.deferred {
            *pos = mapping.map(*pos, Assoc::After);
        }
    }

    pub fn set_selection(&mut self, selection: Range<usize>) -> bool {
        self.focus = Focus::Content;
        self.dispatch(
            Transaction::new(Origin::Navigation)
                .select(selection)
                .reset_stored_marks(),
        )
    }

    /// Types `text` at the selection and runs the input rules.
    pub fn type_text(&mut self, text: &str) -> bool {
        if self.focus != Focus::Content {
            return false;
        }
        let Some(tx) = insert_text(&self.state, text) else {
            log::debug!("no text block at {:?}", self.state.selection);
            return false;
        };
        if !self.dispatch(tx.clear_synthetic_space()) {
            return false;
        }
        if let Some(rule) = after_text_input(&self.state) {
            self.dispatch(rule);
        }
        true
    }

    pub fn paste(&mut self, text: &str) -> bool {
        if self.focus != Focus::Content {
            return false;
        }
        match paste_text(&self.state, text) {
            Some(tx) => self.dispatch(tx),
            None => false,
        }
    }

    /// Runs a toolbar command; `false` when it was refused.
    pub fn run(&mut self, cmd: &Cmd) -> bool {
        match compile_command(&self.state, cmd) {
            Some(tx) => self.dispatch(tx),
            None => {
                log::debug!("command {cmd:?} refused");
                false
            }
        }
    }

    /// Handles a key press, falling back to plain caret movement when no
    /// construct claims it.
    pub fn press(&mut self, key: Key) -> bool {
        if self.focus == Focus::Toolbar {
            return false;
        }
        let state = &self.state;
        let focus = self.focus;
        let outcome = self
            .views
            .get(state)
            .iter()
            .map(|view| view.as_view().on_key(state, &focus, key))
            .find(NavOutcome::is_handled);
        match outcome {
            Some(NavOutcome::Handled {
                transaction,
                focus,
                signal,
                deferred,
            }) => {
                if let Some(tx) = transaction
                    && !self.dispatch(tx)
                {
                    return false;
                }
                self.focus = focus;
                self.signals.extend(signal);
                self.deferred.extend(deferred);
                true
            }
            _ if matches!(self.focus, Focus::ConditionLabel { .. }) => false,
            _ => self.native_key(key),
        }
    }

    fn native_key(&mut self, key: Key) -> bool {
        let tx = match key {
            Key::ArrowLeft | Key::ArrowRight => {
                let Some(pos) = self.step_caret(key == Key::ArrowRight) else {
                    return false;
                };
                Transaction::new(Origin::Navigation)
                    .caret(pos)
                    .reset_stored_marks()
            }
            Key::Enter => match split_block(&self.state) {
                Some(tx) => tx,
                None => return false,
            },
            Key::Tab | Key::ShiftTab => return false,
        };
        self.dispatch(tx)
    }

    /// Caret one char over, crossing into the neighbouring text block at edges.
    fn step_caret(&self, forward: bool) -> Option<usize> {
        let caret = if forward {
            self.state.selection.end
        } else {
            self.state.selection.start
        };
        if !self.state.is_collapsed() {
            return Some(caret);
        }
        let blocks = textblocks(&self.state.doc);
        let i = blocks.iter().position(|tb| tb.contains(caret))?;
        let tb = &blocks[i];
        if forward {
            if caret < tb.end {
                Some(caret + 1)
            } else {
                blocks.get(i + 1).map(|next| next.start)
            }
        } else if caret > tb.start {
            Some(caret - 1)
        } else {
            i.checked_sub(1).map(|prev| blocks[prev].end)
        }
    }

    /// Applies `label` typed into the focused condition label.
    pub fn commit_label(&mut self, label: &str) -> bool {
        let Focus::ConditionLabel { target, .. } = self.focus else {
            return false;
        };
        let tx = self.views.get(&self.state).iter().find_map(|view| {
            let matches = match (target, view) {
                (LabelTarget::Inline { pos }, ViewKind::ConditionalInline(v)) => v.range.from == pos,
                (LabelTarget::Block { pos }, ViewKind::ConditionalBlock(v)) => v.pos == pos,
                _ => false,
            };
            matches.then(|| view.as_view().commit(&self.state, label)).flatten()
        });
        match tx {
            Some(tx) => self.dispatch(tx),
            None => false,
        }
    }

    /// Applies `label` to the construct view starting at `pos`.
    pub fn commit_view(&mut self, pos: usize, label: &str) -> bool {
        let tx = self
            .views
            .get(&self.state)
            .iter()
            .map(ViewKind::as_view)
            .filter(|view| view.pos() == pos)
            .find_map(|view| view.commit(&self.state, label));
        match tx {
            Some(tx) => self.dispatch(tx),
            None => false,
        }
    }

    /// Restores deferred carets, checked against the document as it is now.
    pub fn flush_deferred(&mut self) -> bool {
        let Some(pos) = self.deferred.drain(..).last() else {
            return false;
        };
        let pos = caret_near(&self.state.doc, pos.min(self.state.doc.content_size()));
        if self.focus == Focus::Content && self.state.selection == (pos..pos) {
            return false;
        }
        self.focus = Focus::Content;
        self.dispatch(Transaction::new(Origin::Navigation).caret(pos))
    }

    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub fn views(&mut self) -> &[ViewKind] {
        self.views.get(&self.state)
    }

    /// How many times the construct views were rebuilt.
    pub fn view_rebuilds(&self) -> usize {
        self.views.rebuilds()
    }

    pub fn to_markup(&self) -> String {
        serialize_with(&self.state.doc, &self.options)
    }

    pub fn to_html(&self) -> String {
        to_html(&self.state.doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, Mark, TextRun};
    use crate::navigation::LabelTarget;
    use pretty_assertions::assert_eq;

    fn editor(markup: &str) -> Editor {
        Editor::from_markup(markup, MarkupOptions::default())
    }

    #[test]
    fn typing_runs_input_rules() {
        let mut ed = editor("");
        for ch in "Hi ((name))".chars() {
            assert!(ed.type_text(&ch.to_string()));
        }
        assert_eq!(ed.to_markup(), "Hi ((name))");
        assert_eq!(
            ed.state().doc.content[0],
            Block::paragraph(vec![
                TextRun::plain("Hi "),
                TextRun::new("name", vec![Mark::Variable]),
            ])
        );
    }

    #[test]
    fn typed_markers_on_separate_lines_are_wrapped() {
        let mut ed = editor("");
        ed.type_text("((v??");
        ed.press(Key::Enter);
        ed.type_text("body");
        ed.press(Key::Enter);
        ed.type_text("))");
        assert_eq!(ed.to_markup(), "((v??\nbody\n))");
        assert!(matches!(ed.state().doc.content[0], Block::ConditionalBlock { .. }));
    }

    #[test]
    fn refused_command_leaves_document_alone() {
        let mut ed = editor("((a??\nx\n))");
        ed.set_selection(3..3);
        let before = ed.state().clone();
        assert!(!ed.run(&Cmd::WrapInConditionalBlock {
            condition: "b".into()
        }));
        assert_eq!(ed.state(), &before);
    }

    #[test]
    fn rejected_transaction_returns_false() {
        let mut ed = editor("x");
        assert!(!ed.dispatch(Transaction::new(Origin::User).caret(99)));
        assert_eq!(ed.to_markup(), "x");
    }

    #[test]
    fn shift_tab_on_label_signals_toolbar() {
        let mut ed = editor("a ((c??xy)) b");
        ed.set_focus(Focus::ConditionLabel {
            target: LabelTarget::Inline { pos: 3 },
            caret: 0,
        });
        assert!(ed.press(Key::ShiftTab));
        assert_eq!(ed.focus(), Focus::Toolbar);
        assert_eq!(ed.take_signals(), vec![Signal::RequestToolbarFocus]);
        assert!(ed.take_signals().is_empty());
        assert!(!ed.press(Key::ArrowRight));
    }

    #[test]
    fn commit_label_renames_condition() {
        let mut ed = editor("a ((c??xy)) b");
        ed.set_focus(Focus::ConditionLabel {
            target: LabelTarget::Inline { pos: 3 },
            caret: 0,
        });
        assert!(ed.commit_label("vip"));
        assert_eq!(ed.to_markup(), "a ((vip??xy)) b");
    }

    #[test]
    fn label_focus_follows_edits_before_it() {
        let mut ed = editor("a ((c??xy)) b");
        ed.set_selection(1..1);
        ed.type_text("zz");
        ed.set_focus(Focus::ConditionLabel {
            target: LabelTarget::Inline { pos: 5 },
            caret: 0,
        });
        ed.dispatch(Transaction::new(Origin::User).insert_text(1, "q", vec![]));
        assert_eq!(
            ed.focus(),
            Focus::ConditionLabel {
                target: LabelTarget::Inline { pos: 6 },
                caret: 0,
            }
        );
    }

    #[test]
    fn views_rebuild_only_on_document_change() {
        let mut ed = editor("((a)) b");
        assert_eq!(ed.views().len(), 1);
        ed.set_selection(3..3);
        ed.press(Key::ArrowRight);
        ed.views();
        assert_eq!(ed.view_rebuilds(), 1);
        ed.type_text("x");
        ed.views();
        assert_eq!(ed.view_rebuilds(), 2);
    }

    #[test]
    fn native_arrows_cross_text_blocks() {
        // 0 <p> 1 "a" 2 </p> 3 <p> 4 "b"
        let mut ed = editor("a\n\nb");
        ed.set_selection(2..2);
        assert!(ed.press(Key::ArrowRight));
        assert_eq!(ed.state().selection, 4..4);
        assert!(ed.press(Key::ArrowLeft));
        assert_eq!(ed.state().selection, 2..2);
    }

    #[test]
    fn deferred_caret_is_checked_against_live_document() {
        let mut ed = editor("ab");
        ed.deferred.push(40);
        assert!(ed.flush_deferred());
        assert_eq!(ed.state().selection, 3..3);
        assert!(!ed.flush_deferred());
    }
}
