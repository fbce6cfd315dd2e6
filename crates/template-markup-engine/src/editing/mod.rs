/*!
 * # Editing Core
 *
 * All changes to a template document go through transactions.
 *
 * ## Architecture Overview
 *
 * ### 1. Immutable State, Atomic Transactions
 * - [`EditorState`] holds the document tree, selection, stored marks and a version
 * - A [`Transaction`] is an ordered list of [`Step`]s plus selection updates
 * - Applying one either yields a new state that passes the structural checks
 *   (no nested conditionals or language blocks, no empty containers) or an
 *   [`EditError`] with the old state untouched
 * - Every step yields a [`StepMap`] so positions follow the edit
 *
 * ### 2. Commands and Rules Compile to Transactions
 * - **`commands`**: toolbar commands; `None` means the command does not apply
 * - **`input_rules`**: markup typed into a paragraph becomes marks and blocks
 * - **`paste`**: pasted markup is parsed for the context it lands in
 * - **`auto_wrap`**: stand-alone `((cond??` / `))` paragraphs become a conditional block
 *
 * ### 3. Views
 * - **`views`**: one view per construct, collected in a single tree walk and
 *   rebuilt only when the document version changes
 *
 * ## Usage Pattern
 *
 * ```rust
 * use template_markup_engine::editing::*;
 * use template_markup_engine::MarkupOptions;
 *
 * let mut editor = Editor::from_markup("Hello", MarkupOptions::default());
 * editor.set_selection(6..6);
 * editor.type_text(" ((name))");
 * assert_eq!(editor.to_markup(), "Hello ((name))");
 *
 * // Toolbar commands report whether they applied.
 * assert!(editor.run(&Cmd::InsertVariable { name: "last".into() }));
 * ```
 */

pub mod auto_wrap;
pub mod commands;
pub mod editor;
pub mod error;
pub mod input_rules;
pub mod locate;
pub mod paste;
pub mod patch;
pub mod state;
pub mod transaction;
pub mod views;

pub use commands::{Cmd, SplitMode, compile_command};
pub use editor::Editor;
pub use error::EditError;
pub use patch::Patch;
pub use state::EditorState;
pub use transaction::{Assoc, BlockAttrs, Mapping, Origin, Step, StepMap, Transaction, Update};
pub use views::{
    ConditionalBlockView, ConditionalInlineView, LanguageBlockView, NodeView, VariableView,
    ViewCache, ViewKind, collect_views,
};
